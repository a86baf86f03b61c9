//! Resync and sheet layout configuration.

use ordersheet_storage::DEFAULT_NAMESPACE;
use ordersheet_transform::DEFAULT_MAX_RECOVERY_ATTEMPTS;
use serde::{Deserialize, Serialize};

/// Configuration for the resync orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResyncConfig {
    /// Cache key namespace owned by this pipeline.
    pub namespace: String,
    /// Recovery attempts allowed over the orchestrator's lifetime.
    pub max_recovery_attempts: u32,
    /// Run lenient recovery for a sheet whose rows all failed validation.
    pub recover_invalid_sheets: bool,
}

impl Default for ResyncConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            max_recovery_attempts: DEFAULT_MAX_RECOVERY_ATTEMPTS,
            recover_invalid_sheets: false,
        }
    }
}

/// Where each record kind lives in the spreadsheet. Ranges skip the header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetLayout {
    pub hidden_orders_range: String,
    pub action_log_range: String,
    pub user_settings_range: String,
    /// Sheet that new audit rows are appended to.
    pub action_log_sheet: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            hidden_orders_range: "HiddenOrders!A2:G".to_string(),
            action_log_range: "ActionLog!A2:F".to_string(),
            user_settings_range: "UserSettings!A2:B".to_string(),
            action_log_sheet: "ActionLog".to_string(),
        }
    }
}
