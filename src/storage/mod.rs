mod memory;
mod snapshot;
mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

pub use memory::*;
pub use snapshot::*;
pub use sqlite::*;

/// SQL migration for the key-value table
pub const MIGRATION_001_KV_STORE: &str = include_str!("migrations/001_kv_store.sql");

/// Record holding the bet ledger snapshot.
pub const BET_STORAGE_KEY: &str = "bet-storage";

/// Record holding the bank ledger snapshot.
pub const BANK_STORAGE_KEY: &str = "bank-storage";

/// Durable key-value storage the ledgers write their snapshots to.
///
/// Every record is rewritten wholesale; there is no partial update and no
/// transaction spanning several keys.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Read a record, `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or replace a record.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a record. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
