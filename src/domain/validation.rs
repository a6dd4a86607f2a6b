//! Validation of records read back from durable storage.
//!
//! Stored snapshots are untyped JSON and may come from an older build or a
//! hand-edited file, so each record is checked field by field before it is
//! accepted into memory. A record that fails is rejected as a whole; nothing
//! is repaired.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use super::{Bet, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordRejection {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing or empty id")]
    MissingId,

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("unknown {field}: {value}")]
    UnknownVariant { field: &'static str, value: String },

    #[error("field '{0}' is not a number")]
    NotANumber(&'static str),
}

/// Parse a stored date. RFC 3339 text is the normal form; a bare
/// `YYYY-MM-DD` is read as midnight UTC.
pub fn parse_stored_date(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Validate one stored bet record.
pub fn validate_bet(record: &Value) -> Result<Bet, RecordRejection> {
    let fields = record.as_object().ok_or(RecordRejection::NotAnObject)?;

    Ok(Bet {
        id: id_field(fields)?,
        date: date_field(fields)?,
        sport: variant_field(fields, "sport")?,
        bet_type: variant_field(fields, "betType")?,
        odd: number_field(fields, "odd")?,
        amount: number_field(fields, "amount")?,
        status: variant_field(fields, "status")?,
        description: description_field(fields),
    })
}

/// Validate one stored bank transaction record.
pub fn validate_transaction(record: &Value) -> Result<Transaction, RecordRejection> {
    let fields = record.as_object().ok_or(RecordRejection::NotAnObject)?;

    Ok(Transaction {
        id: id_field(fields)?,
        date: date_field(fields)?,
        kind: variant_field(fields, "type")?,
        amount: number_field(fields, "amount")?,
        description: description_field(fields),
    })
}

fn id_field(fields: &Map<String, Value>) -> Result<String, RecordRejection> {
    match fields.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(RecordRejection::MissingId),
    }
}

fn date_field(fields: &Map<String, Value>) -> Result<DateTime<Utc>, RecordRejection> {
    let raw = fields.get("date").cloned().unwrap_or(Value::Null);
    raw.as_str()
        .and_then(parse_stored_date)
        .ok_or_else(|| RecordRejection::InvalidDate(raw.to_string()))
}

fn variant_field<T: DeserializeOwned>(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<T, RecordRejection> {
    let raw = fields.get(field).cloned().unwrap_or(Value::Null);
    // Only exact variant spellings are accepted; serde enforces that.
    match raw {
        Value::String(_) => serde_json::from_value(raw.clone()).map_err(|_| {
            RecordRejection::UnknownVariant {
                field,
                value: raw.to_string(),
            }
        }),
        other => Err(RecordRejection::UnknownVariant {
            field,
            value: other.to_string(),
        }),
    }
}

fn number_field(fields: &Map<String, Value>, field: &'static str) -> Result<f64, RecordRejection> {
    fields
        .get(field)
        .and_then(Value::as_f64)
        .ok_or(RecordRejection::NotANumber(field))
}

fn description_field(fields: &Map<String, Value>) -> Option<String> {
    fields
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string)
}
