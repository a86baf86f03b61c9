//! Validation and sanitization of raw spreadsheet rows.
//!
//! Two layers:
//! - [`field`]: one function per field category. Each takes a raw cell and
//!   the 0-based row index and returns a [`FieldOutcome`] with the sanitized
//!   value plus any errors (fatal to the row) and warnings (not fatal).
//! - [`RowValidator`]: positional decoding of whole rows for each record
//!   kind, assembling records from rows whose fields all passed.
//!
//! Bad data never produces an `Err`. Every call returns a result value
//! describing what was accepted and why the rest was not.

pub mod field;
mod limits;
mod row;
mod stats;

pub use field::FieldOutcome;
pub use limits::*;
pub use row::{
    RowValidator, ValidationResult, ACTION_LOG_REQUIRED_COLUMNS, HIDDEN_ORDER_REQUIRED_COLUMNS,
    USER_SETTINGS_REQUIRED_COLUMNS,
};
pub use stats::ValidationStats;
