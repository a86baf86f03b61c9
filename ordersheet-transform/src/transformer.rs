//! Strict row <-> record mapping.

use crate::outcome::TransformOutcome;
use crate::recovery::DEFAULT_MAX_RECOVERY_ATTEMPTS;
use ordersheet_types::layout::non_blank;
use ordersheet_types::{
    join_tags, split_tags, ActionLogCells, ActionLogRecord, ActionType, HiddenOrderCells,
    HiddenOrderRecord, HiddenType, IsoTimestamp, RawRow, RecordKind, UserSettingsCells,
    UserSettingsRecord,
};
use ordersheet_validate::{
    MAX_BROWSER_INFO_LEN, MAX_ORDER_ID_LEN, MAX_TAGS, MAX_TAG_LEN, MAX_USERNAME_LEN,
};
use tracing::{debug, warn};

/// Fewest columns a hidden-order row may have in strict mode.
pub const HIDDEN_ORDER_MIN_COLUMNS: usize = 6;
/// Fewest columns an action-log row may have in strict mode.
pub const ACTION_LOG_MIN_COLUMNS: usize = 4;
/// Fewest columns a user-settings row may have in strict mode.
pub const USER_SETTINGS_MIN_COLUMNS: usize = 1;

/// Maps rows to records and back. See the crate docs for the directions.
#[derive(Debug, Clone)]
pub struct Transformer {
    pub(crate) max_recovery_attempts: u32,
    pub(crate) recovery_attempts: u32,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer {
    /// Creates a transformer allowing [`DEFAULT_MAX_RECOVERY_ATTEMPTS`] recoveries.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_recovery_attempts(DEFAULT_MAX_RECOVERY_ATTEMPTS)
    }

    /// Creates a transformer with a custom recovery bound.
    #[must_use]
    pub fn with_max_recovery_attempts(max_recovery_attempts: u32) -> Self {
        Self {
            max_recovery_attempts,
            recovery_attempts: 0,
        }
    }

    // ── External -> records ──────────────────────────────────────

    /// Strictly maps hidden-order rows. Requires order ID, hidden-by and
    /// hidden-at; order date, tags and last-modified are optional.
    pub fn hidden_orders_from_external(&self, rows: &[RawRow]) -> TransformOutcome<HiddenOrderRecord> {
        collect_rows(rows, RecordKind::HiddenOrders, HIDDEN_ORDER_MIN_COLUMNS, hidden_order_from_row)
    }

    /// Strictly maps action-log rows. Requires action, order ID,
    /// performed-by and timestamp; tags and browser info are optional.
    pub fn action_log_from_external(&self, rows: &[RawRow]) -> TransformOutcome<ActionLogRecord> {
        collect_rows(rows, RecordKind::ActionLog, ACTION_LOG_MIN_COLUMNS, action_from_row)
    }

    /// Strictly maps user-settings rows. Requires the username; a blank
    /// last-modified cell defaults to now.
    pub fn user_settings_from_external(&self, rows: &[RawRow]) -> TransformOutcome<UserSettingsRecord> {
        collect_rows(rows, RecordKind::UserSettings, USER_SETTINGS_MIN_COLUMNS, settings_from_row)
    }

    // ── Records -> external ──────────────────────────────────────

    /// Maps hidden orders to
    /// `[orderId, orderDate, hiddenBy, tags, hiddenType, hiddenAt, lastModified]`.
    pub fn hidden_orders_to_external(&self, records: &[HiddenOrderRecord]) -> TransformOutcome<RawRow> {
        collect_records(records, RecordKind::HiddenOrders, HiddenOrderCells::REQUIRED_SLOTS, |r| {
            vec![
                r.order_id.clone(),
                r.order_date.map(|d| d.to_iso_string()).unwrap_or_default(),
                r.hidden_by.clone(),
                join_tags(&r.tags),
                r.hidden_type.as_str().to_string(),
                r.hidden_at.to_iso_string(),
                r.last_modified.to_iso_string(),
            ]
        })
    }

    /// Maps action-log entries to
    /// `[action, orderId, performedBy, timestamp, tags, browserInfo]`.
    pub fn action_log_to_external(&self, records: &[ActionLogRecord]) -> TransformOutcome<RawRow> {
        collect_records(records, RecordKind::ActionLog, ActionLogCells::REQUIRED_SLOTS, |r| {
            vec![
                r.action.as_str().to_string(),
                r.order_id.clone(),
                r.performed_by.clone(),
                r.timestamp.to_iso_string(),
                join_tags(&r.tags),
                r.browser_info.clone(),
            ]
        })
    }

    /// Maps user settings to `[username, lastModified]`.
    pub fn user_settings_to_external(&self, records: &[UserSettingsRecord]) -> TransformOutcome<RawRow> {
        collect_records(records, RecordKind::UserSettings, UserSettingsCells::REQUIRED_SLOTS, |r| {
            vec![r.username.clone(), r.last_modified.to_iso_string()]
        })
    }
}

fn collect_rows<T>(
    rows: &[RawRow],
    kind: RecordKind,
    min_columns: usize,
    parse: impl Fn(&[String], usize) -> Result<T, String>,
) -> TransformOutcome<T> {
    let mut outcome = TransformOutcome::default();

    for (index, row) in rows.iter().enumerate() {
        let parsed = if row.len() < min_columns {
            Err(format!(
                "Row {}: expected at least {min_columns} columns, got {}",
                index + 1,
                row.len()
            ))
        } else {
            parse(row.as_slice(), index)
        };

        match parsed {
            Ok(record) => outcome.records.push(record),
            Err(reason) => {
                warn!("Skipping {} row {}: {}", kind, index + 1, reason);
                outcome.errors.push(reason);
            }
        }
    }

    debug!(
        "Transformed {} {} ({} skipped)",
        outcome.records.len(),
        kind.label(),
        outcome.errors.len()
    );
    outcome
}

fn collect_records<T>(
    records: &[T],
    kind: RecordKind,
    required_slots: &[usize],
    to_row: impl Fn(&T) -> RawRow,
) -> TransformOutcome<RawRow> {
    let mut outcome = TransformOutcome::default();

    for (index, record) in records.iter().enumerate() {
        let row = to_row(record);
        let missing: Vec<usize> = required_slots
            .iter()
            .copied()
            .filter(|slot| row.get(*slot).is_none_or(|cell| cell.trim().is_empty()))
            .collect();

        if missing.is_empty() {
            outcome.records.push(row);
        } else {
            let reason = format!("Record {}: required columns {missing:?} are empty", index + 1);
            warn!("Skipping outgoing {} record: {}", kind, reason);
            outcome.errors.push(reason);
        }
    }
    outcome
}

fn required<'a>(value: Option<&'a str>, index: usize, name: &str) -> Result<&'a str, String> {
    non_blank(value).ok_or_else(|| format!("Row {}: missing {name}", index + 1))
}

fn within(value: &str, max: usize, index: usize, name: &str) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("Row {}: {name} longer than {max} characters", index + 1));
    }
    Ok(())
}

fn instant(value: &str, index: usize, name: &str) -> Result<IsoTimestamp, String> {
    IsoTimestamp::parse(value).ok_or_else(|| format!("Row {}: invalid {name} \"{value}\"", index + 1))
}

fn checked_tags(cell: Option<&str>, index: usize) -> Result<Vec<String>, String> {
    let tags = split_tags(cell.unwrap_or_default());
    if tags.len() > MAX_TAGS {
        return Err(format!("Row {}: more than {MAX_TAGS} tags", index + 1));
    }
    for tag in &tags {
        within(tag, MAX_TAG_LEN, index, "tag")?;
    }
    Ok(tags)
}

fn hidden_order_from_row(row: &[String], index: usize) -> Result<HiddenOrderRecord, String> {
    let cells = HiddenOrderCells::decode(row);

    let order_id = required(cells.order_id, index, "orderId")?;
    let hidden_by = required(cells.hidden_by, index, "hiddenBy")?;
    let hidden_at = instant(required(cells.hidden_at, index, "hiddenAt")?, index, "hiddenAt")?;

    let order_date = non_blank(cells.order_date)
        .map(|raw| instant(raw, index, "orderDate"))
        .transpose()?;
    let hidden_type = match non_blank(cells.hidden_type) {
        Some(raw) => HiddenType::from_cell(raw)
            .ok_or_else(|| format!("Row {}: invalid hiddenType \"{raw}\"", index + 1))?,
        None => HiddenType::default(),
    };
    let last_modified = match non_blank(cells.last_modified) {
        Some(raw) => instant(raw, index, "lastModified")?,
        None => hidden_at,
    };

    within(order_id, MAX_ORDER_ID_LEN, index, "orderId")?;
    within(hidden_by, MAX_USERNAME_LEN, index, "hiddenBy")?;
    let tags = checked_tags(cells.tags, index)?;

    Ok(HiddenOrderRecord {
        order_id: order_id.to_string(),
        order_date,
        hidden_by: hidden_by.to_string(),
        tags,
        hidden_type,
        hidden_at,
        last_modified,
    })
}

fn action_from_row(row: &[String], index: usize) -> Result<ActionLogRecord, String> {
    let cells = ActionLogCells::decode(row);

    let action_raw = required(cells.action, index, "action")?;
    let order_id = required(cells.order_id, index, "orderId")?;
    let performed_by = required(cells.performed_by, index, "performedBy")?;
    let timestamp = instant(required(cells.timestamp, index, "timestamp")?, index, "timestamp")?;
    let browser_info = non_blank(cells.browser_info).unwrap_or_default();

    let action = ActionType::from_cell(action_raw)
        .ok_or_else(|| format!("Row {}: invalid action \"{action_raw}\"", index + 1))?;
    within(order_id, MAX_ORDER_ID_LEN, index, "orderId")?;
    within(performed_by, MAX_USERNAME_LEN, index, "performedBy")?;
    within(browser_info, MAX_BROWSER_INFO_LEN, index, "browserInfo")?;
    let tags = checked_tags(cells.tags, index)?;

    Ok(ActionLogRecord {
        action,
        order_id: order_id.to_string(),
        performed_by: performed_by.to_string(),
        timestamp,
        tags,
        browser_info: browser_info.to_string(),
    })
}

fn settings_from_row(row: &[String], index: usize) -> Result<UserSettingsRecord, String> {
    let cells = UserSettingsCells::decode(row);

    let username = required(cells.username, index, "username")?;
    within(username, MAX_USERNAME_LEN, index, "username")?;
    let last_modified = match non_blank(cells.last_modified) {
        Some(raw) => instant(raw, index, "lastModified")?,
        None => IsoTimestamp::now(),
    };

    Ok(UserSettingsRecord {
        username: username.to_string(),
        last_modified,
    })
}
