//! Whole-row validation for the three record kinds.
//!
//! A row shorter than the kind's column count is rejected outright. Longer
//! rows are decoded positionally, every field validator runs, and the record
//! is assembled only when none of them reported an error. Errors and
//! warnings of dropped rows are still reported.

use crate::field::{self, row_label, FieldOutcome};
use crate::stats::ValidationStats;
use ordersheet_types::layout::non_blank;
use ordersheet_types::{
    ActionLogCells, ActionLogRecord, HiddenOrderCells, HiddenOrderRecord, IsoTimestamp, RawRow,
    RecordKind, UserSettingsCells, UserSettingsRecord,
};
use serde::Serialize;
use tracing::debug;

/// Columns the row validator requires for a hidden-order row.
pub const HIDDEN_ORDER_REQUIRED_COLUMNS: usize = 6;
/// Columns the row validator requires for an action-log row.
pub const ACTION_LOG_REQUIRED_COLUMNS: usize = 6;
/// Columns the row validator requires for a user-settings row.
pub const USER_SETTINGS_REQUIRED_COLUMNS: usize = 2;

/// Outcome of validating a batch of rows.
///
/// `is_valid` is false as soon as any row produced an error, but
/// `sanitized_data` still holds every row that passed on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult<T> {
    pub is_valid: bool,
    pub sanitized_data: Vec<T>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl<T> ValidationResult<T> {
    /// Aggregate statistics for this batch.
    #[must_use]
    pub fn stats(&self) -> ValidationStats {
        ValidationStats::from_counts(self.sanitized_data.len(), self.errors.len(), self.warnings.len())
    }
}

impl<T> Default for ValidationResult<T> {
    fn default() -> Self {
        Self {
            is_valid: true,
            sanitized_data: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

#[derive(Default)]
struct RowDiagnostics {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl RowDiagnostics {
    fn take<T>(&mut self, outcome: FieldOutcome<T>) -> Option<T> {
        self.errors.extend(outcome.errors);
        self.warnings.extend(outcome.warnings);
        outcome.sanitized
    }
}

/// Validates whole sheets of raw rows into sanitized records.
#[derive(Debug, Clone, Default)]
pub struct RowValidator {
    /// Fixed "now" for plausibility checks; the wall clock when unset.
    reference_time: Option<IsoTimestamp>,
}

impl RowValidator {
    /// Creates a validator that checks plausibility against the wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator that checks plausibility against a fixed instant.
    #[must_use]
    pub fn with_reference_time(reference_time: IsoTimestamp) -> Self {
        Self {
            reference_time: Some(reference_time),
        }
    }

    fn now(&self) -> IsoTimestamp {
        self.reference_time.unwrap_or_else(IsoTimestamp::now)
    }

    /// Validates hidden-order rows
    /// (`[orderId, orderDate, hiddenBy, tags, hiddenType, hiddenAt, lastModified?]`).
    pub fn validate_hidden_orders(&self, rows: &[RawRow]) -> ValidationResult<HiddenOrderRecord> {
        let now = self.now();
        validate_batch(
            rows,
            RecordKind::HiddenOrders,
            HIDDEN_ORDER_REQUIRED_COLUMNS,
            |row, index, diag| {
                let cells = HiddenOrderCells::decode(row);
                let order_id = diag.take(field::validate_order_id(cells.order_id, index));
                let order_date = diag.take(field::validate_date(cells.order_date, index, &now));
                let hidden_by = diag.take(field::validate_username(cells.hidden_by, index));
                let tags = diag.take(field::validate_tags(cells.tags, index));
                let hidden_type = diag.take(field::validate_hidden_type(cells.hidden_type, index));
                let hidden_at = diag.take(field::validate_timestamp(cells.hidden_at, index, &now));
                let last_modified = match non_blank(cells.last_modified) {
                    Some(raw) => diag.take(field::validate_last_modified(Some(raw), index, &now)),
                    None => hidden_at,
                };

                Some(HiddenOrderRecord {
                    order_id: order_id?,
                    order_date: Some(order_date?),
                    hidden_by: hidden_by?,
                    tags: tags?,
                    hidden_type: hidden_type?,
                    hidden_at: hidden_at?,
                    last_modified: last_modified?,
                })
            },
        )
    }

    /// Validates action-log rows
    /// (`[action, orderId, performedBy, timestamp, tags, browserInfo]`).
    pub fn validate_action_log(&self, rows: &[RawRow]) -> ValidationResult<ActionLogRecord> {
        let now = self.now();
        validate_batch(
            rows,
            RecordKind::ActionLog,
            ACTION_LOG_REQUIRED_COLUMNS,
            |row, index, diag| {
                let cells = ActionLogCells::decode(row);
                let action = diag.take(field::validate_action_type(cells.action, index));
                let order_id = diag.take(field::validate_order_id(cells.order_id, index));
                let performed_by = diag.take(field::validate_username(cells.performed_by, index));
                let timestamp = diag.take(field::validate_timestamp(cells.timestamp, index, &now));
                let tags = diag.take(field::validate_tags(cells.tags, index));
                let browser_info = diag.take(field::validate_browser_info(cells.browser_info, index));

                Some(ActionLogRecord {
                    action: action?,
                    order_id: order_id?,
                    performed_by: performed_by?,
                    timestamp: timestamp?,
                    tags: tags?,
                    browser_info: browser_info?,
                })
            },
        )
    }

    /// Validates user-settings rows (`[username, lastModified]`).
    pub fn validate_user_settings(&self, rows: &[RawRow]) -> ValidationResult<UserSettingsRecord> {
        let now = self.now();
        validate_batch(
            rows,
            RecordKind::UserSettings,
            USER_SETTINGS_REQUIRED_COLUMNS,
            |row, index, diag| {
                let cells = UserSettingsCells::decode(row);
                let username = diag.take(field::validate_username(cells.username, index));
                let last_modified =
                    diag.take(field::validate_timestamp(cells.last_modified, index, &now));

                Some(UserSettingsRecord {
                    username: username?,
                    last_modified: last_modified?,
                })
            },
        )
    }
}

fn validate_batch<T>(
    rows: &[RawRow],
    kind: RecordKind,
    required_columns: usize,
    mut assemble: impl FnMut(&[String], usize, &mut RowDiagnostics) -> Option<T>,
) -> ValidationResult<T> {
    let mut result = ValidationResult::default();

    for (index, row) in rows.iter().enumerate() {
        if row.len() < required_columns {
            result.errors.push(format!(
                "{}: Expected at least {required_columns} columns, got {}",
                row_label(index),
                row.len()
            ));
            continue;
        }

        let mut diag = RowDiagnostics::default();
        let record = assemble(row.as_slice(), index, &mut diag);

        match record {
            Some(record) if diag.errors.is_empty() => result.sanitized_data.push(record),
            _ => debug!("Dropping {} row {}: {} error(s)", kind, index + 1, diag.errors.len()),
        }
        result.errors.extend(diag.errors);
        result.warnings.extend(diag.warnings);
    }

    result.is_valid = result.errors.is_empty();
    result
}
