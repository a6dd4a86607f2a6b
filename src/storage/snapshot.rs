//! JSON snapshot format of the two ledger records.
//!
//! `bet-storage` holds `{"bets": [...]}` and `bank-storage` holds
//! `{"transactions": [...]}`. Reading also accepts the `{"state": {...},
//! "version": 0}` envelope written by the browser build of the app.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::{BANK_STORAGE_KEY, BET_STORAGE_KEY};
use crate::domain::{Bet, RecordRejection, Transaction, validate_bet, validate_transaction};

#[derive(Serialize)]
struct BetSnapshot<'a> {
    bets: &'a [Bet],
}

#[derive(Serialize)]
struct BankSnapshot<'a> {
    transactions: &'a [Transaction],
}

/// A stored record that failed validation and was left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    /// Position of the record in the stored array
    pub index: usize,
    pub reason: RecordRejection,
}

/// What happened while rehydrating one ledger record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadReport {
    pub key: &'static str,
    /// False when nothing was stored yet (first start)
    pub found: bool,
    pub accepted: usize,
    pub rejected: Vec<Rejected>,
    /// Set when the whole document was unreadable and the ledger started empty
    pub corrupt: Option<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.corrupt.is_none()
    }
}

/// Records that passed validation, in stored order, plus the load report.
#[derive(Debug, Clone)]
pub struct Rehydrated<T> {
    pub records: Vec<T>,
    pub report: LoadReport,
}

pub fn encode_bets(bets: &[Bet]) -> serde_json::Result<String> {
    serde_json::to_string(&BetSnapshot { bets })
}

pub fn encode_transactions(transactions: &[Transaction]) -> serde_json::Result<String> {
    serde_json::to_string(&BankSnapshot { transactions })
}

pub fn decode_bets(raw: Option<&str>) -> Rehydrated<Bet> {
    decode(BET_STORAGE_KEY, "bets", raw, validate_bet, bet_id)
}

pub fn decode_transactions(raw: Option<&str>) -> Rehydrated<Transaction> {
    decode(BANK_STORAGE_KEY, "transactions", raw, validate_transaction, transaction_id)
}

fn decode<T>(
    key: &'static str,
    collection: &str,
    raw: Option<&str>,
    validate: fn(&Value) -> Result<T, RecordRejection>,
    id_of: fn(&T) -> &str,
) -> Rehydrated<T> {
    let mut report = LoadReport {
        key,
        ..Default::default()
    };

    let Some(raw) = raw else {
        return Rehydrated {
            records: Vec::new(),
            report,
        };
    };
    report.found = true;

    let items = match collection_items(raw, collection) {
        Ok(items) => items,
        Err(reason) => {
            warn!(key, %reason, "stored snapshot is unreadable, starting empty");
            report.corrupt = Some(reason);
            return Rehydrated {
                records: Vec::new(),
                report,
            };
        }
    };

    let mut records = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        // The first record with a given id wins.
        let checked = validate(item).and_then(|record| {
            if seen.insert(id_of(&record).to_string()) {
                Ok(record)
            } else {
                Err(RecordRejection::DuplicateId(id_of(&record).to_string()))
            }
        });
        match checked {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!(key, index, %reason, "dropping invalid stored record");
                report.rejected.push(Rejected { index, reason });
            }
        }
    }
    report.accepted = records.len();

    Rehydrated { records, report }
}

fn bet_id(bet: &Bet) -> &str {
    &bet.id
}

fn transaction_id(tx: &Transaction) -> &str {
    &tx.id
}

fn collection_items(raw: &str, collection: &str) -> Result<Vec<Value>, String> {
    let mut document: Value =
        serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {}", e))?;

    let state = match document.get_mut("state").map(Value::take) {
        Some(inner) if inner.is_object() => inner,
        _ => document,
    };

    match state.get(collection) {
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(_) => Err(format!("'{}' is not an array", collection)),
        None => Err(format!("missing '{}' array", collection)),
    }
}
