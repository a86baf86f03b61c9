//! Core record types for the ordersheet cache pipeline.
//!
//! This crate defines the typed shapes that flow between the external
//! spreadsheet and the local cache:
//! - [`HiddenOrderRecord`], [`ActionLogRecord`], [`UserSettingsRecord`]
//! - The closed enumerations [`HiddenType`] and [`ActionType`]
//! - [`RecordKind`], naming the three sheets
//! - [`IsoTimestamp`], a millisecond-precision UTC instant that always
//!   renders as `YYYY-MM-DDTHH:MM:SS.sssZ`
//!
//! Rows coming from the spreadsheet are untyped [`RawRow`]s. Turning them
//! into records is the job of `ordersheet-validate` and
//! `ordersheet-transform`.

mod kind;
pub mod layout;
mod records;
mod sheets;
mod tags;
mod timestamp;

pub use kind::RecordKind;
pub use layout::{ActionLogCells, HiddenOrderCells, UserSettingsCells};
pub use records::{ActionLogRecord, ActionType, HiddenOrderRecord, HiddenType, UserSettingsRecord};
pub use sheets::SheetsData;
pub use tags::{join_tags, split_tags};
pub use timestamp::IsoTimestamp;

/// One spreadsheet row, positional and untyped.
pub type RawRow = Vec<String>;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("unknown record kind: {0}")]
    UnknownKind(String),

    #[error("invalid {field} \"{value}\"")]
    InvalidEnum { field: &'static str, value: String },
}
