//! Batch statistics.

use serde::{Deserialize, Serialize};

/// Summary counts for a [`crate::ValidationResult`].
///
/// `total_rows` is `valid_rows + error_rows`, where `error_rows` is the
/// number of error *messages*, not of failing rows. A row that fails two
/// fields counts twice, which skews `success_rate` downwards for batches
/// with multi-error rows. Reports built from these numbers rely on that
/// formula, so it is kept as is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub error_rows: usize,
    pub warning_rows: usize,
    /// Percentage with one decimal place; `0.0` for an empty batch.
    pub success_rate: f64,
}

impl ValidationStats {
    /// Builds statistics from raw counts.
    #[must_use]
    pub fn from_counts(valid: usize, errors: usize, warnings: usize) -> Self {
        let total = valid + errors;
        let success_rate = if total == 0 {
            0.0
        } else {
            (valid as f64 / total as f64 * 1000.0).round() / 10.0
        };

        Self {
            total_rows: total,
            valid_rows: valid,
            error_rows: errors,
            warning_rows: warnings,
            success_rate,
        }
    }
}
