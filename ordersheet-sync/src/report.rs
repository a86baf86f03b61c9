//! What a resync hands back to its caller.

use ordersheet_transform::RecoveryMeta;
use ordersheet_types::{IsoTimestamp, RecordKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// Cache record counts for one kind before clearing and after rebuilding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindStatistics {
    pub before: usize,
    pub after: usize,
}

/// Post-rebuild comparison of cache counts against imported counts.
///
/// A failing report does not make the resync fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub passed: bool,
    /// One line per kind.
    pub checks: Vec<String>,
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self {
            passed: true,
            checks: Vec::new(),
        }
    }
}

impl IntegrityReport {
    pub(crate) fn check(&mut self, kind: RecordKind, expected: usize, found: usize) {
        if expected == found {
            self.checks.push(format!("{kind}: ok ({found} records)"));
        } else {
            self.passed = false;
            self.checks
                .push(format!("{kind}: mismatch, expected {expected} records, found {found}"));
        }
    }

    pub(crate) fn unreadable(&mut self, reason: &str) {
        self.passed = false;
        self.checks.push(format!("cache could not be re-read: {reason}"));
    }
}

/// Outcome of one resync.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResyncReport {
    /// When the resync started.
    pub timestamp: IsoTimestamp,
    /// Human-readable trace, one line per step.
    pub steps: Vec<String>,
    pub statistics: BTreeMap<RecordKind, KindStatistics>,
    pub validation: IntegrityReport,
    /// True when every step up to verification completed.
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when some records came from lenient recovery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery: Option<RecoveryMeta>,
}

impl ResyncReport {
    pub(crate) fn start() -> Self {
        Self {
            timestamp: IsoTimestamp::now(),
            steps: Vec::new(),
            statistics: RecordKind::ALL
                .into_iter()
                .map(|kind| (kind, KindStatistics::default()))
                .collect(),
            validation: IntegrityReport::default(),
            success: false,
            error: None,
            recovery: None,
        }
    }

    pub(crate) fn step(&mut self, line: impl Into<String>) {
        self.steps.push(line.into());
    }

    /// Statistics for one kind.
    #[must_use]
    pub fn statistics_for(&self, kind: RecordKind) -> KindStatistics {
        self.statistics.get(&kind).copied().unwrap_or_default()
    }
}
