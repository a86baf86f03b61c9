//! Resync state machine phases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a resync currently is.
///
/// ```text
/// Idle -> Snapshotting -> Clearing -> Importing -> Rebuilding -> Verifying -> Done
///              \____________\___________\____________\___________\-> Failed
/// ```
///
/// `Idle`, `Done` and `Failed` are at rest; a new resync may start from any
/// of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResyncPhase {
    #[default]
    Idle,
    Snapshotting,
    Clearing,
    Importing,
    Rebuilding,
    Verifying,
    Done,
    Failed,
}

impl ResyncPhase {
    /// True while a resync is running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Idle | Self::Done | Self::Failed)
    }

    /// Phase that follows this one on success. At-rest phases have none.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Snapshotting),
            Self::Snapshotting => Some(Self::Clearing),
            Self::Clearing => Some(Self::Importing),
            Self::Importing => Some(Self::Rebuilding),
            Self::Rebuilding => Some(Self::Verifying),
            Self::Verifying => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Snapshotting => "snapshotting",
            Self::Clearing => "clearing",
            Self::Importing => "importing",
            Self::Rebuilding => "rebuilding",
            Self::Verifying => "verifying",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ResyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
