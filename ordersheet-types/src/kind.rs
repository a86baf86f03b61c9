//! The three sheet kinds mirrored into the cache.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three record kinds (and the sheet that holds it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    HiddenOrders,
    ActionLog,
    UserSettings,
}

impl RecordKind {
    /// All kinds, in rebuild/report order.
    pub const ALL: [Self; 3] = [Self::HiddenOrders, Self::ActionLog, Self::UserSettings];

    /// Key used for this kind in named sheet maps and reports.
    #[must_use]
    pub const fn sheet_key(&self) -> &'static str {
        match self {
            Self::HiddenOrders => "hiddenOrders",
            Self::ActionLog => "actionLog",
            Self::UserSettings => "userSettings",
        }
    }

    /// Human-readable plural label for logs and trace lines.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::HiddenOrders => "hidden orders",
            Self::ActionLog => "action log entries",
            Self::UserSettings => "user settings",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_key())
    }
}

impl FromStr for RecordKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.sheet_key() == s)
            .ok_or_else(|| crate::Error::UnknownKind(s.to_string()))
    }
}
