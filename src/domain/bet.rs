use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Amount;

pub type BetId = String;

/// Lowest decimal odd a bookmaker can offer.
pub const MIN_ODD: f64 = 1.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    Soccer,
    Basketball,
    Tennis,
    Volleyball,
    Other,
}

impl Sport {
    pub const ALL: [Sport; 5] = [
        Sport::Soccer,
        Sport::Basketball,
        Sport::Tennis,
        Sport::Volleyball,
        Sport::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Soccer => "Soccer",
            Sport::Basketball => "Basketball",
            Sport::Tennis => "Tennis",
            Sport::Volleyball => "Volleyball",
            Sport::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "soccer" | "football" => Some(Sport::Soccer),
            "basketball" => Some(Sport::Basketball),
            "tennis" => Some(Sport::Tennis),
            "volleyball" => Some(Sport::Volleyball),
            "other" => Some(Sport::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetType {
    /// One selection
    Single,
    /// Accumulator: every selection must win
    Multiple,
    /// Combination of accumulators over a set of selections
    System,
}

impl BetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetType::Single => "Single",
            BetType::Multiple => "Multiple",
            BetType::System => "System",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" => Some(BetType::Single),
            "multiple" | "accumulator" => Some(BetType::Multiple),
            "system" => Some(BetType::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for BetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
}

impl BetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetStatus::Pending => "Pending",
            BetStatus::Won => "Won",
            BetStatus::Lost => "Lost",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(BetStatus::Pending),
            "won" => Some(BetStatus::Won),
            "lost" => Some(BetStatus::Lost),
            _ => None,
        }
    }

    /// A bet is settled exactly once: Pending -> Won or Pending -> Lost.
    pub fn can_transition_to(&self, next: BetStatus) -> bool {
        matches!(
            (self, next),
            (BetStatus::Pending, BetStatus::Won) | (BetStatus::Pending, BetStatus::Lost)
        )
    }
}

impl std::fmt::Display for BetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single wager. Only `status` ever changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub id: BetId,
    /// When the event takes place
    pub date: DateTime<Utc>,
    pub sport: Sport,
    pub bet_type: BetType,
    /// Decimal odd, payout = amount * odd
    pub odd: f64,
    /// Stake in currency units
    pub amount: Amount,
    pub status: BetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Bet {
    /// Create a pending bet with a fresh id from user input.
    pub fn from_new(new: NewBet) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: new.date,
            sport: new.sport,
            bet_type: new.bet_type,
            odd: new.odd,
            amount: new.amount,
            status: BetStatus::Pending,
            description: new.description,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status != BetStatus::Pending
    }

    /// Gross return of the stake at this bet's odd.
    pub fn payout(&self) -> Amount {
        self.amount * self.odd
    }

    /// Net result of the bet. Unsettled stakes count as spent, matching
    /// `BetStats::profit`.
    pub fn profit(&self) -> Amount {
        match self.status {
            BetStatus::Won => self.payout() - self.amount,
            BetStatus::Lost | BetStatus::Pending => -self.amount,
        }
    }
}

/// User input for a new bet; id and status are assigned by the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBet {
    pub date: DateTime<Utc>,
    pub sport: Sport,
    pub bet_type: BetType,
    pub odd: f64,
    pub amount: Amount,
    pub description: Option<String>,
}

impl NewBet {
    pub fn new(
        sport: Sport,
        bet_type: BetType,
        odd: f64,
        amount: Amount,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            date,
            sport,
            bet_type,
            odd,
            amount,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Combined filter used by the history and statistics views.
/// Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct BetFilter {
    pub sport: Option<Sport>,
    pub status: Option<BetStatus>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub settled_only: bool,
}

impl BetFilter {
    pub fn matches(&self, bet: &Bet) -> bool {
        if self.settled_only && !bet.is_settled() {
            return false;
        }
        if self.sport.is_some_and(|sport| bet.sport != sport) {
            return false;
        }
        if self.status.is_some_and(|status| bet.status != status) {
            return false;
        }
        if self.from_date.is_some_and(|from| bet.date < from) {
            return false;
        }
        if self.to_date.is_some_and(|to| bet.date > to) {
            return false;
        }
        true
    }
}
