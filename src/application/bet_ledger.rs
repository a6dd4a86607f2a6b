use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::domain::{Bet, BetFilter, BetStats, BetStatus, MIN_ODD, NewBet, Sport};
use crate::storage::{BET_STORAGE_KEY, LoadReport, Storage, decode_bets, encode_bets};

use super::LedgerError;
use super::error::check_amount;

/// Read-only access to statistics over the full bet collection.
///
/// The bank ledger depends on this capability instead of on `BetLedger`
/// itself, so the dependency stays one-way.
pub trait BetStatsSource: Send + Sync {
    fn bet_stats(&self) -> BetStats;
}

/// Owns the collection of bets, in insertion order, and persists it to
/// the `bet-storage` record after every mutation.
pub struct BetLedger {
    storage: Arc<dyn Storage>,
    bets: RwLock<Vec<Bet>>,
    /// Held from the in-memory change until its snapshot is stored, so
    /// snapshots reach storage in mutation order.
    write_gate: Mutex<()>,
}

impl BetLedger {
    /// Create an empty ledger. Nothing is read from storage.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            bets: RwLock::new(Vec::new()),
            write_gate: Mutex::new(()),
        }
    }

    /// Rehydrate the ledger from storage, dropping records that fail
    /// validation.
    #[instrument(skip(storage))]
    pub async fn load(storage: Arc<dyn Storage>) -> Result<(Self, LoadReport), LedgerError> {
        let raw = storage.get(BET_STORAGE_KEY).await?;
        let rehydrated = decode_bets(raw.as_deref());

        info!(
            accepted = rehydrated.report.accepted,
            rejected = rehydrated.report.rejected.len(),
            "bet ledger loaded"
        );

        let ledger = Self {
            storage,
            bets: RwLock::new(rehydrated.records),
            write_gate: Mutex::new(()),
        };
        Ok((ledger, rehydrated.report))
    }

    /// All bets in insertion order.
    pub fn bets(&self) -> Vec<Bet> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn get_bet(&self, id: &str) -> Option<Bet> {
        self.read().iter().find(|bet| bet.id == id).cloned()
    }

    // ========================
    // Mutations
    // ========================

    /// Record a new pending bet.
    ///
    /// If storage rejects the write the bet stays in memory and the
    /// storage error is returned; the next successful mutation stores it.
    /// Check [`BetLedger::bets`] before retrying to avoid a duplicate.
    pub async fn add_bet(&self, new: NewBet) -> Result<Bet, LedgerError> {
        check_amount(new.amount)?;
        if !new.odd.is_finite() || new.odd < MIN_ODD {
            return Err(LedgerError::InvalidOdd {
                odd: new.odd,
                min: MIN_ODD,
            });
        }

        let bet = Bet::from_new(new);
        let _gate = self.write_gate.lock().await;
        let snapshot = {
            let mut bets = self.write();
            bets.push(bet.clone());
            encode_bets(&bets)?
        };
        debug!(id = %bet.id, sport = %bet.sport, amount = bet.amount, "bet added");

        self.persist(snapshot).await?;
        Ok(bet)
    }

    /// Settle a pending bet as won or lost.
    pub async fn update_bet_status(&self, id: &str, status: BetStatus) -> Result<Bet, LedgerError> {
        let _gate = self.write_gate.lock().await;
        let (bet, snapshot) = {
            let mut bets = self.write();
            let bet = bets
                .iter_mut()
                .find(|bet| bet.id == id)
                .ok_or_else(|| LedgerError::BetNotFound(id.to_string()))?;

            if !bet.status.can_transition_to(status) {
                return Err(LedgerError::InvalidStatusTransition {
                    id: id.to_string(),
                    from: bet.status,
                    to: status,
                });
            }
            bet.status = status;
            let updated = bet.clone();
            (updated, encode_bets(&bets)?)
        };
        debug!(id, %status, "bet settled");

        self.persist(snapshot).await?;
        Ok(bet)
    }

    /// Remove a bet, returning it.
    pub async fn delete_bet(&self, id: &str) -> Result<Bet, LedgerError> {
        let _gate = self.write_gate.lock().await;
        let (removed, snapshot) = {
            let mut bets = self.write();
            let position = bets
                .iter()
                .position(|bet| bet.id == id)
                .ok_or_else(|| LedgerError::BetNotFound(id.to_string()))?;
            let removed = bets.remove(position);
            (removed, encode_bets(&bets)?)
        };
        debug!(id, "bet deleted");

        self.persist(snapshot).await?;
        Ok(removed)
    }

    /// Remove every bet. Irreversible. Returns how many were removed.
    pub async fn clear_bets(&self) -> Result<usize, LedgerError> {
        let _gate = self.write_gate.lock().await;
        let (removed, snapshot) = {
            let mut bets = self.write();
            let removed = bets.len();
            bets.clear();
            (removed, encode_bets(&bets)?)
        };
        info!(removed, "bet ledger cleared");

        self.persist(snapshot).await?;
        Ok(removed)
    }

    /// Same as [`BetLedger::clear_bets`].
    pub async fn reset_bets(&self) -> Result<usize, LedgerError> {
        self.clear_bets().await
    }

    /// Empty the ledger and delete its stored record altogether.
    pub(crate) async fn forget(&self) -> Result<usize, LedgerError> {
        let _gate = self.write_gate.lock().await;
        let removed = {
            let mut bets = self.write();
            let removed = bets.len();
            bets.clear();
            removed
        };
        self.storage.remove(BET_STORAGE_KEY).await?;
        info!(removed, "bet ledger record removed");
        Ok(removed)
    }

    // ========================
    // Queries
    // ========================

    pub fn get_bets_by_status(&self, status: BetStatus) -> Vec<Bet> {
        self.collect(|bet| bet.status == status)
    }

    pub fn get_bets_by_sport(&self, sport: Sport) -> Vec<Bet> {
        self.collect(|bet| bet.sport == sport)
    }

    /// Bets dated between `start` and `end`, both inclusive.
    pub fn get_bets_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Bet> {
        self.collect(|bet| bet.date >= start && bet.date <= end)
    }

    pub fn filter_bets(&self, filter: &BetFilter) -> Vec<Bet> {
        self.collect(|bet| filter.matches(bet))
    }

    /// Statistics over `subset` when given, otherwise over every bet.
    pub fn get_stats(&self, subset: Option<&[Bet]>) -> BetStats {
        match subset {
            Some(bets) => BetStats::compute(bets),
            None => BetStats::compute(&self.read()),
        }
    }

    fn collect(&self, predicate: impl Fn(&Bet) -> bool) -> Vec<Bet> {
        self.read()
            .iter()
            .filter(|bet| predicate(bet))
            .cloned()
            .collect()
    }

    async fn persist(&self, snapshot: String) -> Result<(), LedgerError> {
        self.storage.set(BET_STORAGE_KEY, &snapshot).await?;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Bet>> {
        self.bets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Bet>> {
        self.bets.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BetStatsSource for BetLedger {
    fn bet_stats(&self) -> BetStats {
        self.get_stats(None)
    }
}
