use serde::Serialize;

/// Values produced by one transform call plus the reasons for every
/// dropped input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutcome<T> {
    pub records: Vec<T>,
    pub errors: Vec<String>,
}

impl<T> TransformOutcome<T> {
    /// Counts for this call.
    #[must_use]
    pub fn stats(&self) -> TransformStats {
        TransformStats {
            accepted: self.records.len(),
            rejected: self.errors.len(),
        }
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<T> Default for TransformOutcome<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Accepted/rejected counts for a [`TransformOutcome`].
///
/// Every dropped input contributes exactly one error, so `rejected` is a
/// row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformStats {
    pub accepted: usize,
    pub rejected: usize,
}

impl TransformStats {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}
