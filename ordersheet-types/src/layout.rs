//! Positional column layouts for the three sheets.
//!
//! Each `*Cells` struct is a borrowed, named view over one raw row. Decoding
//! never fails: a column that is missing from a short row decodes as `None`.
//! Callers apply their own column-count guard before decoding.

/// Columns in a full hidden-orders row (the last one is optional).
pub const HIDDEN_ORDER_COLUMNS: usize = 7;
/// Columns in a full action-log row.
pub const ACTION_LOG_COLUMNS: usize = 6;
/// Columns in a full user-settings row (the last one is optional).
pub const USER_SETTINGS_COLUMNS: usize = 2;

fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index).map(String::as_str)
}

/// `[orderId, orderDate, hiddenBy, tags, hiddenType, hiddenAt, lastModified?]`
#[derive(Debug, Clone, Copy, Default)]
pub struct HiddenOrderCells<'a> {
    pub order_id: Option<&'a str>,
    pub order_date: Option<&'a str>,
    pub hidden_by: Option<&'a str>,
    pub tags: Option<&'a str>,
    pub hidden_type: Option<&'a str>,
    pub hidden_at: Option<&'a str>,
    pub last_modified: Option<&'a str>,
}

impl<'a> HiddenOrderCells<'a> {
    /// Slots that must be non-empty in an outgoing row.
    pub const REQUIRED_SLOTS: &'static [usize] = &[0, 2, 5];

    #[must_use]
    pub fn decode(row: &'a [String]) -> Self {
        Self {
            order_id: cell(row, 0),
            order_date: cell(row, 1),
            hidden_by: cell(row, 2),
            tags: cell(row, 3),
            hidden_type: cell(row, 4),
            hidden_at: cell(row, 5),
            last_modified: cell(row, 6),
        }
    }
}

/// `[action, orderId, performedBy, timestamp, tags, browserInfo]`
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionLogCells<'a> {
    pub action: Option<&'a str>,
    pub order_id: Option<&'a str>,
    pub performed_by: Option<&'a str>,
    pub timestamp: Option<&'a str>,
    pub tags: Option<&'a str>,
    pub browser_info: Option<&'a str>,
}

impl<'a> ActionLogCells<'a> {
    /// Slots that must be non-empty in an outgoing row.
    pub const REQUIRED_SLOTS: &'static [usize] = &[0, 1, 2, 3];

    #[must_use]
    pub fn decode(row: &'a [String]) -> Self {
        Self {
            action: cell(row, 0),
            order_id: cell(row, 1),
            performed_by: cell(row, 2),
            timestamp: cell(row, 3),
            tags: cell(row, 4),
            browser_info: cell(row, 5),
        }
    }
}

/// `[username, lastModified?]`
#[derive(Debug, Clone, Copy, Default)]
pub struct UserSettingsCells<'a> {
    pub username: Option<&'a str>,
    pub last_modified: Option<&'a str>,
}

impl<'a> UserSettingsCells<'a> {
    /// Slots that must be non-empty in an outgoing row.
    pub const REQUIRED_SLOTS: &'static [usize] = &[0];

    #[must_use]
    pub fn decode(row: &'a [String]) -> Self {
        Self {
            username: cell(row, 0),
            last_modified: cell(row, 1),
        }
    }
}

/// Trims a cell, mapping missing and blank cells to `None`.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
