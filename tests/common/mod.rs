// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use betbook::application::{BetbookService, LoadReports};
use betbook::domain::{Bet, BetStatus, BetType, NewBet, Sport};
use chrono::{DateTime, NaiveDate, Utc};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(BetbookService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let (service, _) = BetbookService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Reopen the database created by `test_service`
pub async fn reopen(temp_dir: &TempDir) -> Result<(BetbookService, LoadReports)> {
    let db_path = temp_dir.path().join("test.db");
    Ok(BetbookService::connect(db_path.to_str().unwrap()).await?)
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

pub fn new_bet(sport: Sport, amount: f64, odd: f64, date: &str) -> NewBet {
    NewBet::new(sport, BetType::Single, odd, amount, parse_date(date))
}

/// Add a bet and settle it in one go
pub async fn settled_bet(
    service: &BetbookService,
    new: NewBet,
    status: BetStatus,
) -> Result<Bet> {
    let bet = service.bets().add_bet(new).await?;
    if status == BetStatus::Pending {
        return Ok(bet);
    }
    Ok(service.bets().update_bet_status(&bet.id, status).await?)
}
