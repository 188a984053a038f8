pub mod stats;
pub mod transaction;

pub use stats::{round2, PlayerSessionStats, SessionStats};
pub use transaction::{normalize_amount, StatementRow, Transaction};
