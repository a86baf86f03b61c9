//! Error types for the import and resync layer.

use crate::phase::ResyncPhase;
use crate::report::ResyncReport;
use ordersheet_storage::StorageError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
///
/// Bad row data never shows up here; it is reported in validation and
/// transform results instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A resync is already running on this orchestrator.
    #[error("resync already in progress")]
    AlreadyInProgress,

    /// A sheet key other than `hiddenOrders`, `actionLog` or `userSettings`.
    #[error("unknown sheet: {0}")]
    UnknownSheet(String),

    /// Cache error.
    #[error("cache error: {0}")]
    Storage(#[from] StorageError),

    /// External tabular store error.
    #[error("sheet store error: {0}")]
    Sheet(String),

    /// A record could not be written out as a row.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A fatal resync step. `report` holds the trace up to the failure.
    #[error("resync failed while {step}: {reason}")]
    ResyncFailed {
        step: ResyncPhase,
        reason: String,
        report: Box<ResyncReport>,
    },
}

impl From<ordersheet_types::Error> for SyncError {
    fn from(err: ordersheet_types::Error) -> Self {
        match err {
            ordersheet_types::Error::UnknownKind(key) => Self::UnknownSheet(key),
            ordersheet_types::Error::Serialization(e) => Self::Serialization(e),
            other => Self::InvalidRecord(other.to_string()),
        }
    }
}
