use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the ledger, storage, and export layers.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Persisted data could not be parsed, or a record failed boundary
    /// validation (missing or unusable required fields).
    #[error("Malformed budget data: {0}")]
    MalformedInput(String),
    /// Positional removal outside the current entry range.
    #[error("Entry index {index} out of range (ledger has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
    /// An `add` input violated the entry contract. The interactive surface
    /// gates required fields before calling in; the ledger still refuses
    /// bad input instead of trusting its caller.
    #[error("Invalid entry: {0}")]
    Validation(String),
    /// Encoding or resource failure while producing a printable export.
    #[error("Export resource error: {0}")]
    ExportResource(String),
    /// Filesystem failure in the persistence layer.
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = StdResult<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::MalformedInput(err.to_string())
    }
}
