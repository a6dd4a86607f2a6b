use serde::{Deserialize, Serialize};

use super::{Amount, Bet, BetStatus, Transaction, TransactionType};

/// Aggregate over a set of bets. Always recomputed, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetStats {
    pub total_bets: usize,
    pub total_won: usize,
    pub total_lost: usize,
    /// Sum of all stakes, settled or not
    pub total_amount: Amount,
    /// Sum of amount * odd over won bets
    pub total_winnings: Amount,
    /// Percentage of won bets over all bets, 0 when there are none
    pub win_rate: f64,
    pub profit: Amount,
}

impl BetStats {
    pub fn compute(bets: &[Bet]) -> Self {
        let mut stats = bets.iter().fold(BetStats::default(), |mut acc, bet| {
            acc.total_bets += 1;
            acc.total_amount += bet.amount;
            match bet.status {
                BetStatus::Won => {
                    acc.total_won += 1;
                    acc.total_winnings += bet.payout();
                }
                BetStatus::Lost => acc.total_lost += 1,
                BetStatus::Pending => {}
            }
            acc
        });

        stats.win_rate = if stats.total_bets > 0 {
            stats.total_won as f64 / stats.total_bets as f64 * 100.0
        } else {
            0.0
        };
        stats.profit = stats.total_winnings - stats.total_amount;
        stats
    }
}

/// Aggregate over the bank ledger combined with betting winnings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankStats {
    pub total_deposits: Amount,
    pub total_withdrawals: Amount,
    /// deposits + winnings - withdrawals
    pub total_balance: Amount,
    /// balance - deposits
    pub total_profit: Amount,
}

impl BankStats {
    pub fn compute(transactions: &[Transaction], total_winnings: Amount) -> Self {
        let (total_deposits, total_withdrawals) =
            transactions
                .iter()
                .fold((0.0, 0.0), |(deposits, withdrawals), tx| match tx.kind {
                    TransactionType::Deposit => (deposits + tx.amount, withdrawals),
                    TransactionType::Withdrawal => (deposits, withdrawals + tx.amount),
                });

        let total_balance = total_deposits + total_winnings - total_withdrawals;
        Self {
            total_deposits,
            total_withdrawals,
            total_balance,
            total_profit: total_balance - total_deposits,
        }
    }
}
