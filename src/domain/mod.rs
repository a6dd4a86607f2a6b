mod analytics;
mod bet;
mod money;
mod stats;
mod transaction;
mod validation;

pub use analytics::*;
pub use bet::*;
pub use money::*;
pub use stats::*;
pub use transaction::*;
pub use validation::*;
