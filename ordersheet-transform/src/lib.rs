//! Bidirectional mapping between spreadsheet rows and typed records.
//!
//! The [`Transformer`] has three directions per record kind:
//! - **from external**: strict row -> record. Rows missing required cells
//!   or failing length/enum checks are dropped and reported.
//! - **to external**: record -> row in the sheet's column order, with a
//!   final check that the required slots are filled.
//! - **recovery**: lenient row -> record that defaults instead of
//!   rejecting. Bounded by [`Transformer::attempt_recovery`].
//!
//! No direction ever returns an `Err` for bad data; each call returns a
//! [`TransformOutcome`] carrying the accepted values and the reasons for
//! everything that was dropped.

mod outcome;
mod recovery;
mod transformer;

pub use outcome::{TransformOutcome, TransformStats};
pub use recovery::{RecoveredSheets, RecoveryMeta, DEFAULT_MAX_RECOVERY_ATTEMPTS, UNKNOWN_USER};
pub use transformer::{
    Transformer, ACTION_LOG_MIN_COLUMNS, HIDDEN_ORDER_MIN_COLUMNS, USER_SETTINGS_MIN_COLUMNS,
};
