use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BetStats, BetStatus, ProfitPoint, Sport, SportCount};

/// Everything the statistics view shows for one filter selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub sport: Option<Sport>,
    pub status: Option<BetStatus>,
    pub stats: BetStats,
    pub average_odd: f64,
    pub profit_over_time: Vec<ProfitPoint>,
    pub sport_distribution: Vec<SportCount>,
}

/// Outcome of wiping both ledgers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSummary {
    pub bets_removed: usize,
    pub transactions_removed: usize,
}
