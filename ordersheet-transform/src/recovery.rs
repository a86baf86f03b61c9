//! Lenient recovery parsing.
//!
//! Recovery keeps every row that still identifies a record and fills the
//! rest with defaults: hidden type becomes `details`, an unknown action
//! becomes `hide`, missing timestamps become now and over-long text is
//! clamped. Output is stamped with [`RecoveryMeta`] so it can be told
//! apart from strictly validated data.

use crate::transformer::Transformer;
use ordersheet_types::layout::non_blank;
use ordersheet_types::{
    split_tags, ActionLogCells, ActionLogRecord, ActionType, HiddenOrderCells, HiddenOrderRecord,
    HiddenType, IsoTimestamp, RawRow, SheetsData, UserSettingsCells, UserSettingsRecord,
};
use ordersheet_validate::field::clamp_chars;
use ordersheet_validate::{
    MAX_BROWSER_INFO_LEN, MAX_ORDER_ID_LEN, MAX_TAGS, MAX_TAG_LEN, MAX_USERNAME_LEN,
};
use serde::Serialize;
use tracing::{error, info, warn};

/// Recovery attempts allowed per transformer unless configured otherwise.
pub const DEFAULT_MAX_RECOVERY_ATTEMPTS: u32 = 3;

/// Placeholder for a missing hidden-by / performed-by cell.
pub const UNKNOWN_USER: &str = "unknown";

const HIDDEN_ORDER_RECOVERY_COLUMNS: usize = 2;
const ACTION_LOG_RECOVERY_COLUMNS: usize = 2;
const USER_SETTINGS_RECOVERY_COLUMNS: usize = 1;

/// Marks data produced by recovery rather than strict validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryMeta {
    pub recovered: bool,
    /// 1-based attempt number that produced the data.
    pub recovery_attempt: u32,
}

/// Records recovered from raw sheets. A kind is `None` when its sheet was
/// not part of the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveredSheets {
    #[serde(flatten)]
    pub meta: RecoveryMeta,
    pub hidden_orders: Option<Vec<HiddenOrderRecord>>,
    pub action_log: Option<Vec<ActionLogRecord>>,
    pub user_settings: Option<Vec<UserSettingsRecord>>,
}

impl RecoveredSheets {
    /// Total records recovered across all kinds.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.hidden_orders.as_ref().map_or(0, Vec::len)
            + self.action_log.as_ref().map_or(0, Vec::len)
            + self.user_settings.as_ref().map_or(0, Vec::len)
    }
}

impl Transformer {
    /// Number of recovery attempts made so far.
    #[must_use]
    pub fn recovery_attempts(&self) -> u32 {
        self.recovery_attempts
    }

    /// Upper bound on recovery attempts.
    #[must_use]
    pub fn max_recovery_attempts(&self) -> u32 {
        self.max_recovery_attempts
    }

    /// Re-arms recovery after a successful strict pass.
    pub fn reset_recovery(&mut self) {
        self.recovery_attempts = 0;
    }

    /// Runs lenient parsing over every supplied sheet.
    ///
    /// `errors` are the strict-pass errors that triggered recovery; they are
    /// only logged. Returns `None` once the attempt bound is exhausted.
    pub fn attempt_recovery(&mut self, original: &SheetsData, errors: &[String]) -> Option<RecoveredSheets> {
        if self.recovery_attempts >= self.max_recovery_attempts {
            error!(
                "Max recovery attempts ({}) reached, giving up on {} error(s)",
                self.max_recovery_attempts,
                errors.len()
            );
            return None;
        }

        self.recovery_attempts += 1;
        let attempt = self.recovery_attempts;
        warn!(
            "Recovery attempt {}/{} after {} error(s)",
            attempt,
            self.max_recovery_attempts,
            errors.len()
        );

        let recovered = RecoveredSheets {
            meta: RecoveryMeta {
                recovered: true,
                recovery_attempt: attempt,
            },
            hidden_orders: original.hidden_orders.as_deref().map(|rows| self.recover_hidden_orders(rows)),
            action_log: original.action_log.as_deref().map(|rows| self.recover_action_log(rows)),
            user_settings: original.user_settings.as_deref().map(|rows| self.recover_user_settings(rows)),
        };

        info!("Recovery attempt {} salvaged {} record(s)", attempt, recovered.record_count());
        Some(recovered)
    }

    /// Lenient hidden-order parsing: needs two columns and an order ID.
    pub fn recover_hidden_orders(&self, rows: &[RawRow]) -> Vec<HiddenOrderRecord> {
        rows.iter()
            .filter(|row| row.len() >= HIDDEN_ORDER_RECOVERY_COLUMNS)
            .filter_map(|row| {
                let cells = HiddenOrderCells::decode(row);
                let order_id = non_blank(cells.order_id)?;
                let hidden_at = lenient_instant(cells.hidden_at);
                Some(HiddenOrderRecord {
                    order_id: clamp_chars(order_id, MAX_ORDER_ID_LEN),
                    order_date: non_blank(cells.order_date).and_then(IsoTimestamp::parse),
                    hidden_by: lenient_user(cells.hidden_by),
                    tags: lenient_tags(cells.tags),
                    hidden_type: HiddenType::Details,
                    hidden_at,
                    last_modified: non_blank(cells.last_modified)
                        .and_then(IsoTimestamp::parse)
                        .unwrap_or(hidden_at),
                })
            })
            .collect()
    }

    /// Lenient action-log parsing: needs two columns and an order ID.
    pub fn recover_action_log(&self, rows: &[RawRow]) -> Vec<ActionLogRecord> {
        rows.iter()
            .filter(|row| row.len() >= ACTION_LOG_RECOVERY_COLUMNS)
            .filter_map(|row| {
                let cells = ActionLogCells::decode(row);
                let order_id = non_blank(cells.order_id)?;
                Some(ActionLogRecord {
                    action: non_blank(cells.action)
                        .and_then(ActionType::from_cell)
                        .unwrap_or_default(),
                    order_id: clamp_chars(order_id, MAX_ORDER_ID_LEN),
                    performed_by: lenient_user(cells.performed_by),
                    timestamp: lenient_instant(cells.timestamp),
                    tags: lenient_tags(cells.tags),
                    browser_info: non_blank(cells.browser_info)
                        .map(|info| clamp_chars(info, MAX_BROWSER_INFO_LEN))
                        .unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Lenient user-settings parsing: needs a username.
    pub fn recover_user_settings(&self, rows: &[RawRow]) -> Vec<UserSettingsRecord> {
        rows.iter()
            .filter(|row| row.len() >= USER_SETTINGS_RECOVERY_COLUMNS)
            .filter_map(|row| {
                let cells = UserSettingsCells::decode(row);
                let username = non_blank(cells.username)?;
                Some(UserSettingsRecord {
                    username: clamp_chars(username, MAX_USERNAME_LEN),
                    last_modified: lenient_instant(cells.last_modified),
                })
            })
            .collect()
    }
}

fn lenient_instant(cell: Option<&str>) -> IsoTimestamp {
    non_blank(cell)
        .and_then(IsoTimestamp::parse)
        .unwrap_or_else(IsoTimestamp::now)
}

fn lenient_user(cell: Option<&str>) -> String {
    non_blank(cell)
        .map(|user| clamp_chars(user, MAX_USERNAME_LEN))
        .unwrap_or_else(|| UNKNOWN_USER.to_string())
}

fn lenient_tags(cell: Option<&str>) -> Vec<String> {
    split_tags(cell.unwrap_or_default())
        .into_iter()
        .take(MAX_TAGS)
        .map(|tag| clamp_chars(&tag, MAX_TAG_LEN))
        .collect()
}
