use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{BetFilter, average_odd, profit_over_time, sport_distribution};
use crate::storage::{LoadReport, MemoryStorage, SqliteStorage, Storage};

use super::{BankLedger, BetLedger, LedgerError, ResetSummary, StatisticsReport};

/// Application service holding both ledgers.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct BetbookService {
    bets: Arc<BetLedger>,
    bank: BankLedger,
}

/// Load reports of both ledgers from startup.
#[derive(Debug, Clone)]
pub struct LoadReports {
    pub bets: LoadReport,
    pub bank: LoadReport,
}

impl LoadReports {
    pub fn is_clean(&self) -> bool {
        self.bets.is_clean() && self.bank.is_clean()
    }
}

impl BetbookService {
    /// Load both ledgers from `storage`. The bank ledger reads winnings
    /// from the bet ledger, never the other way round.
    pub async fn with_storage(
        storage: Arc<dyn Storage>,
    ) -> Result<(Self, LoadReports), LedgerError> {
        let (bets, bet_report) = BetLedger::load(Arc::clone(&storage)).await?;
        let bets = Arc::new(bets);
        let (bank, bank_report) = BankLedger::load(storage, bets.clone()).await?;

        let reports = LoadReports {
            bets: bet_report,
            bank: bank_report,
        };
        if !reports.is_clean() {
            warn!(
                rejected_bets = reports.bets.rejected.len(),
                rejected_transactions = reports.bank.rejected.len(),
                "some stored records were dropped during load"
            );
        }

        Ok((Self { bets, bank }, reports))
    }

    /// Open the database at the given path, creating it if needed.
    pub async fn init(database_path: &str) -> Result<(Self, LoadReports), LedgerError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let storage = SqliteStorage::init(&db_url).await?;
        info!(path = database_path, "database ready");
        Self::with_storage(Arc::new(storage)).await
    }

    /// Open an existing database.
    pub async fn connect(database_path: &str) -> Result<(Self, LoadReports), LedgerError> {
        let db_url = format!("sqlite:{}", database_path);
        let storage = SqliteStorage::connect(&db_url).await?;
        Self::with_storage(Arc::new(storage)).await
    }

    /// Empty ledgers over volatile storage.
    pub fn in_memory() -> Self {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let bets = Arc::new(BetLedger::new(Arc::clone(&storage)));
        let bank = BankLedger::new(storage, bets.clone());
        Self { bets, bank }
    }

    pub fn bets(&self) -> &BetLedger {
        &self.bets
    }

    pub fn bank(&self) -> &BankLedger {
        &self.bank
    }

    /// Wipe every bet and every transaction and delete both stored
    /// records, leaving storage as on first start.
    pub async fn reset_all(&self) -> Result<ResetSummary, LedgerError> {
        let bets_removed = self.bets.forget().await?;
        let transactions_removed = self.bank.forget().await?;
        info!(bets_removed, transactions_removed, "all data cleared");

        Ok(ResetSummary {
            bets_removed,
            transactions_removed,
        })
    }

    /// Statistics over the bets matching `filter`.
    pub fn statistics_report(&self, filter: &BetFilter) -> StatisticsReport {
        let bets = self.bets.filter_bets(filter);

        StatisticsReport {
            from_date: filter.from_date,
            to_date: filter.to_date,
            sport: filter.sport,
            status: filter.status,
            stats: self.bets.get_stats(Some(bets.as_slice())),
            average_odd: average_odd(&bets),
            profit_over_time: profit_over_time(&bets),
            sport_distribution: sport_distribution(&bets),
        }
    }
}
