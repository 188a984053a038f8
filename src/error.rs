use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid date: {0}")]
    Format(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Reconciliation error: {0}")]
    Logic(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
