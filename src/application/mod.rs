// Application layer - ledgers and the service wiring them together.
// Front ends (the CLI today) only talk to `BetbookService`.

mod bank_ledger;
mod bet_ledger;
pub mod error;
mod reporting;
mod service;

pub use bank_ledger::*;
pub use bet_ledger::*;
pub use error::*;
pub use reporting::*;
pub use service::*;
