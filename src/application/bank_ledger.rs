use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::domain::{BankStats, NewTransaction, Transaction};
use crate::storage::{
    BANK_STORAGE_KEY, LoadReport, Storage, decode_transactions, encode_transactions,
};

use super::error::check_amount;
use super::{BetStatsSource, LedgerError};

/// Owns the cash deposits and withdrawals of the betting bank and
/// persists them to the `bank-storage` record.
pub struct BankLedger {
    storage: Arc<dyn Storage>,
    bets: Arc<dyn BetStatsSource>,
    transactions: RwLock<Vec<Transaction>>,
    /// Serializes mutations with their storage writes.
    write_gate: Mutex<()>,
}

impl BankLedger {
    /// Create an empty ledger. `bets` supplies the winnings that feed the
    /// balance.
    pub fn new(storage: Arc<dyn Storage>, bets: Arc<dyn BetStatsSource>) -> Self {
        Self {
            storage,
            bets,
            transactions: RwLock::new(Vec::new()),
            write_gate: Mutex::new(()),
        }
    }

    #[instrument(skip(storage, bets))]
    pub async fn load(
        storage: Arc<dyn Storage>,
        bets: Arc<dyn BetStatsSource>,
    ) -> Result<(Self, LoadReport), LedgerError> {
        let raw = storage.get(BANK_STORAGE_KEY).await?;
        let rehydrated = decode_transactions(raw.as_deref());

        info!(
            accepted = rehydrated.report.accepted,
            rejected = rehydrated.report.rejected.len(),
            "bank ledger loaded"
        );

        let ledger = Self {
            storage,
            bets,
            transactions: RwLock::new(rehydrated.records),
            write_gate: Mutex::new(()),
        };
        Ok((ledger, rehydrated.report))
    }

    /// All transactions in insertion order.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.read().clone()
    }

    /// Transactions sorted by date, most recent first.
    pub fn transactions_newest_first(&self) -> Vec<Transaction> {
        let mut transactions = self.transactions();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        transactions
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub async fn add_transaction(&self, new: NewTransaction) -> Result<Transaction, LedgerError> {
        check_amount(new.amount)?;

        let transaction = Transaction::from_new(new);
        let _gate = self.write_gate.lock().await;
        let snapshot = {
            let mut transactions = self.write();
            transactions.push(transaction.clone());
            encode_transactions(&transactions)?
        };
        debug!(
            id = %transaction.id,
            kind = %transaction.kind,
            amount = transaction.amount,
            "transaction added"
        );

        self.persist(snapshot).await?;
        Ok(transaction)
    }

    pub async fn delete_transaction(&self, id: &str) -> Result<Transaction, LedgerError> {
        let _gate = self.write_gate.lock().await;
        let (removed, snapshot) = {
            let mut transactions = self.write();
            let position = transactions
                .iter()
                .position(|tx| tx.id == id)
                .ok_or_else(|| LedgerError::TransactionNotFound(id.to_string()))?;
            let removed = transactions.remove(position);
            (removed, encode_transactions(&transactions)?)
        };
        debug!(id, "transaction deleted");

        self.persist(snapshot).await?;
        Ok(removed)
    }

    /// Remove every transaction. Irreversible.
    pub async fn clear_transactions(&self) -> Result<usize, LedgerError> {
        let _gate = self.write_gate.lock().await;
        let (removed, snapshot) = {
            let mut transactions = self.write();
            let removed = transactions.len();
            transactions.clear();
            (removed, encode_transactions(&transactions)?)
        };
        info!(removed, "bank ledger cleared");

        self.persist(snapshot).await?;
        Ok(removed)
    }

    /// Empty the ledger and delete its stored record altogether.
    pub(crate) async fn forget(&self) -> Result<usize, LedgerError> {
        let _gate = self.write_gate.lock().await;
        let removed = {
            let mut transactions = self.write();
            let removed = transactions.len();
            transactions.clear();
            removed
        };
        self.storage.remove(BANK_STORAGE_KEY).await?;
        info!(removed, "bank ledger record removed");
        Ok(removed)
    }

    /// Bank totals combined with the winnings of every bet.
    pub fn get_stats(&self) -> BankStats {
        let total_winnings = self.bets.bet_stats().total_winnings;
        BankStats::compute(&self.read(), total_winnings)
    }

    async fn persist(&self, snapshot: String) -> Result<(), LedgerError> {
        self.storage.set(BANK_STORAGE_KEY, &snapshot).await?;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Transaction>> {
        self.transactions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Transaction>> {
        self.transactions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
