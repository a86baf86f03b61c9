//! Raw rows for all three sheets, as fetched from the spreadsheet.

use crate::{RawRow, RecordKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw rows per sheet. A `None` sheet was not supplied and is skipped by
/// import and rebuild; `Some(vec![])` is a supplied, empty sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetsData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_orders: Option<Vec<RawRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_log: Option<Vec<RawRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_settings: Option<Vec<RawRow>>,
}

impl SheetsData {
    /// Builds sheet data from a map keyed by sheet key
    /// (`hiddenOrders`, `actionLog`, `userSettings`).
    ///
    /// Any other key is rejected.
    pub fn from_named(named: HashMap<String, Vec<RawRow>>) -> crate::Result<Self> {
        let mut data = Self::default();
        for (key, rows) in named {
            match key.parse::<RecordKind>()? {
                RecordKind::HiddenOrders => data.hidden_orders = Some(rows),
                RecordKind::ActionLog => data.action_log = Some(rows),
                RecordKind::UserSettings => data.user_settings = Some(rows),
            }
        }
        Ok(data)
    }

    /// Rows for one kind, if that sheet was supplied.
    #[must_use]
    pub fn rows(&self, kind: RecordKind) -> Option<&[RawRow]> {
        match kind {
            RecordKind::HiddenOrders => self.hidden_orders.as_deref(),
            RecordKind::ActionLog => self.action_log.as_deref(),
            RecordKind::UserSettings => self.user_settings.as_deref(),
        }
    }

    /// Kinds that were supplied, in [`RecordKind::ALL`] order.
    pub fn present_kinds(&self) -> impl Iterator<Item = RecordKind> + '_ {
        RecordKind::ALL
            .into_iter()
            .filter(|kind| self.rows(*kind).is_some())
    }
}
