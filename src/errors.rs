use std::result::Result as StdResult;

use thiserror::Error;

/// Error type that captures ledger engine and collaborator failures.
///
/// Input normalization never produces an error; only caller bugs and I/O do.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("Recalculation index {index} out of range for {len} days")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Day {day} does not exist in a {len}-day month")]
    DayOutOfRange { day: u32, len: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, LedgerError>;

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("Invalid input: {0}")]
    Input(String),
}
