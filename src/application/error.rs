use thiserror::Error;

use crate::domain::BetStatus;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Bet not found: {0}")]
    BetNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid odd {odd}: must be a number of at least {min}")]
    InvalidOdd { odd: f64, min: f64 },

    #[error("Bet {id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        id: String,
        from: BetStatus,
        to: BetStatus,
    },

    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Amounts must be positive, finite currency values.
pub(crate) fn check_amount(amount: f64) -> Result<(), LedgerError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::InvalidAmount(format!(
            "{} (must be positive)",
            amount
        )));
    }
    Ok(())
}
