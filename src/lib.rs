pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod model;
pub mod report;
pub mod session;
pub mod statement;

pub use config::LedgerConfig;
pub use error::{LedgerError, Result};
pub use model::*;
