use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::BetbookService;
use crate::domain::{Bet, Transaction, format_amount};

/// Full snapshot of both ledgers for backup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub bets: Vec<Bet>,
    pub transactions: Vec<Transaction>,
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    service: &'a BetbookService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a BetbookService) -> Self {
        Self { service }
    }

    /// Export bets to CSV format, in insertion order
    pub fn export_bets_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let bets = self.service.bets().bets();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "date",
            "sport",
            "bet_type",
            "odd",
            "amount",
            "status",
            "payout",
            "description",
        ])?;

        for bet in &bets {
            csv_writer.write_record([
                bet.id.clone(),
                bet.date.to_rfc3339(),
                bet.sport.to_string(),
                bet.bet_type.to_string(),
                bet.odd.to_string(),
                format_amount(bet.amount),
                bet.status.to_string(),
                format_amount(bet.payout()),
                bet.description.clone().unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(bets.len())
    }

    /// Export bank transactions to CSV format
    pub fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.bank().transactions();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "type", "amount", "description"])?;

        for tx in &transactions {
            csv_writer.write_record([
                tx.id.clone(),
                tx.date.to_rfc3339(),
                tx.kind.to_string(),
                format_amount(tx.amount),
                tx.description.clone().unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export both ledgers as one JSON document
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            bets: self.service.bets().bets(),
            transactions: self.service.bank().transactions(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
