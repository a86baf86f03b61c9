//! Sheet import: row validation plus logging and an aggregate summary.

use ordersheet_types::{
    ActionLogRecord, HiddenOrderRecord, RawRow, RecordKind, SheetsData, UserSettingsRecord,
};
use ordersheet_validate::{RowValidator, ValidationResult, ValidationStats};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Validation part of an [`ImportResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Sanitized records for one sheet and how validation went.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult<T> {
    pub data: Vec<T>,
    pub validation: ImportValidation,
}

impl<T> From<ValidationResult<T>> for ImportResult<T> {
    fn from(result: ValidationResult<T>) -> Self {
        let stats = result.stats();
        Self {
            data: result.sanitized_data,
            validation: ImportValidation {
                is_valid: result.is_valid,
                errors: result.errors,
                warnings: result.warnings,
                stats,
            },
        }
    }
}

/// Totals across every imported sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total_errors: usize,
    pub total_warnings: usize,
    /// Only kinds that were imported have an entry.
    pub success_rates: BTreeMap<RecordKind, f64>,
}

/// Import results for whichever sheets were supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportAllResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_orders: Option<ImportResult<HiddenOrderRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_log: Option<ImportResult<ActionLogRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_settings: Option<ImportResult<UserSettingsRecord>>,
    pub validation_summary: ValidationSummary,
}

impl ImportAllResult {
    /// Validation details for one kind, if it was imported.
    #[must_use]
    pub fn validation(&self, kind: RecordKind) -> Option<&ImportValidation> {
        match kind {
            RecordKind::HiddenOrders => self.hidden_orders.as_ref().map(|r| &r.validation),
            RecordKind::ActionLog => self.action_log.as_ref().map(|r| &r.validation),
            RecordKind::UserSettings => self.user_settings.as_ref().map(|r| &r.validation),
        }
    }

    /// Number of sanitized records for one kind, if it was imported.
    #[must_use]
    pub fn record_count(&self, kind: RecordKind) -> Option<usize> {
        match kind {
            RecordKind::HiddenOrders => self.hidden_orders.as_ref().map(|r| r.data.len()),
            RecordKind::ActionLog => self.action_log.as_ref().map(|r| r.data.len()),
            RecordKind::UserSettings => self.user_settings.as_ref().map(|r| r.data.len()),
        }
    }
}

/// Validates whole sheets. Does not alter what the validator produces.
#[derive(Debug, Clone, Default)]
pub struct Importer {
    validator: RowValidator,
}

impl Importer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom validator, e.g. one with a fixed reference time.
    #[must_use]
    pub fn with_validator(validator: RowValidator) -> Self {
        Self { validator }
    }

    pub fn import_hidden_orders(&self, rows: &[RawRow]) -> ImportResult<HiddenOrderRecord> {
        let result = ImportResult::from(self.validator.validate_hidden_orders(rows));
        log_import(RecordKind::HiddenOrders, &result.validation);
        result
    }

    pub fn import_action_log(&self, rows: &[RawRow]) -> ImportResult<ActionLogRecord> {
        let result = ImportResult::from(self.validator.validate_action_log(rows));
        log_import(RecordKind::ActionLog, &result.validation);
        result
    }

    pub fn import_user_settings(&self, rows: &[RawRow]) -> ImportResult<UserSettingsRecord> {
        let result = ImportResult::from(self.validator.validate_user_settings(rows));
        log_import(RecordKind::UserSettings, &result.validation);
        result
    }

    /// Imports every sheet present in `sheets`. Absent sheets are absent
    /// from the result.
    pub fn import_all(&self, sheets: &SheetsData) -> ImportAllResult {
        let mut result = ImportAllResult {
            hidden_orders: sheets.hidden_orders.as_deref().map(|rows| self.import_hidden_orders(rows)),
            action_log: sheets.action_log.as_deref().map(|rows| self.import_action_log(rows)),
            user_settings: sheets.user_settings.as_deref().map(|rows| self.import_user_settings(rows)),
            validation_summary: ValidationSummary::default(),
        };

        let mut summary = ValidationSummary::default();
        for kind in RecordKind::ALL {
            if let Some(validation) = result.validation(kind) {
                summary.total_errors += validation.errors.len();
                summary.total_warnings += validation.warnings.len();
                summary.success_rates.insert(kind, validation.stats.success_rate);
            }
        }

        info!(
            "Import finished: {} error(s), {} warning(s) across {} sheet(s)",
            summary.total_errors,
            summary.total_warnings,
            summary.success_rates.len()
        );
        result.validation_summary = summary;
        result
    }
}

fn log_import(kind: RecordKind, validation: &ImportValidation) {
    let stats = &validation.stats;
    info!(
        "Imported {} of {} {} ({:.1}% success)",
        stats.valid_rows,
        stats.total_rows,
        kind.label(),
        stats.success_rate
    );
    if !validation.errors.is_empty() {
        warn!("{} error(s) importing {}", validation.errors.len(), kind.label());
        for error in &validation.errors {
            warn!("  {}", error);
        }
    }
    if !validation.warnings.is_empty() {
        info!("{} warning(s) importing {}", validation.warnings.len(), kind.label());
    }
}
