use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Amount;

pub type TransactionId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Cash moved into the betting bank
    Deposit,
    /// Cash taken out of the betting bank
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deposit" => Some(TransactionType::Deposit),
            "withdrawal" | "withdraw" => Some(TransactionType::Withdrawal),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cash movement in the bank ledger. Transactions are immutable;
/// the only correction is deleting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Always positive; the direction comes from `kind`
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Transaction {
    pub fn from_new(new: NewTransaction) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: new.date,
            kind: new.kind,
            amount: new.amount,
            description: new.description,
        }
    }

    /// Amount with the sign of its effect on the bank balance.
    pub fn signed_amount(&self) -> Amount {
        match self.kind {
            TransactionType::Deposit => self.amount,
            TransactionType::Withdrawal => -self.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: DateTime<Utc>,
    pub kind: TransactionType,
    pub amount: Amount,
    pub description: Option<String>,
}

impl NewTransaction {
    pub fn new(kind: TransactionType, amount: Amount, date: DateTime<Utc>) -> Self {
        Self {
            date,
            kind,
            amount,
            description: None,
        }
    }

    pub fn deposit(amount: Amount, date: DateTime<Utc>) -> Self {
        Self::new(TransactionType::Deposit, amount, date)
    }

    pub fn withdrawal(amount: Amount, date: DateTime<Utc>) -> Self {
        Self::new(TransactionType::Withdrawal, amount, date)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
