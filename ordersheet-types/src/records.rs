//! Typed records for the three sheets.
//!
//! Records are built fresh by each validation or transform call and never
//! mutated afterwards. Field names serialize in camelCase; the aliases
//! accept the alternative names older cache entries used
//! (`username`/`timestamp` on hidden orders, `actionType` on log entries).

use crate::IsoTimestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an order is hidden. `details` is the only accepted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiddenType {
    #[default]
    Details,
}

impl HiddenType {
    /// Accepted cell values, lowercase.
    pub const ALLOWED: &'static [&'static str] = &["details"];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Details => "details",
        }
    }

    /// Case-insensitive match against [`Self::ALLOWED`].
    #[must_use]
    pub fn from_cell(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "details" => Some(Self::Details),
            _ => None,
        }
    }
}

impl fmt::Display for HiddenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HiddenType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_cell(s).ok_or_else(|| crate::Error::InvalidEnum {
            field: "hidden type",
            value: s.to_string(),
        })
    }
}

/// The action recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    #[default]
    Hide,
    Unhide,
}

impl ActionType {
    /// Accepted cell values, lowercase.
    pub const ALLOWED: &'static [&'static str] = &["hide", "unhide"];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hide => "hide",
            Self::Unhide => "unhide",
        }
    }

    /// Case-insensitive match against [`Self::ALLOWED`].
    #[must_use]
    pub fn from_cell(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "hide" => Some(Self::Hide),
            "unhide" => Some(Self::Unhide),
            _ => None,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_cell(s).ok_or_else(|| crate::Error::InvalidEnum {
            field: "action type",
            value: s.to_string(),
        })
    }
}

/// An order hidden from the order history view.
///
/// Sheet layout: `[orderId, orderDate, hiddenBy, tags, hiddenType, hiddenAt, lastModified?]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenOrderRecord {
    /// Join key with [`ActionLogRecord::order_id`].
    pub order_id: String,
    pub order_date: Option<IsoTimestamp>,
    #[serde(alias = "username")]
    pub hidden_by: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub hidden_type: HiddenType,
    #[serde(alias = "timestamp")]
    pub hidden_at: IsoTimestamp,
    pub last_modified: IsoTimestamp,
}

/// One hide/unhide action in the audit log.
///
/// Sheet layout: `[action, orderId, performedBy, timestamp, tags, browserInfo]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLogRecord {
    #[serde(alias = "actionType")]
    pub action: ActionType,
    pub order_id: String,
    #[serde(alias = "username")]
    pub performed_by: String,
    pub timestamp: IsoTimestamp,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub browser_info: String,
}

/// Per-user settings row.
///
/// Sheet layout: `[username, lastModified?]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettingsRecord {
    /// Unique per user.
    pub username: String,
    #[serde(alias = "timestamp")]
    pub last_modified: IsoTimestamp,
}
