//! Reading and writing the spreadsheet through a [`TabularStore`].
//!
//! Rows are positional and the column order per sheet is fixed. Reordering
//! columns in the spreadsheet is only caught by column-count checks.

use crate::config::SheetLayout;
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use ordersheet_transform::{TransformOutcome, Transformer};
use ordersheet_types::{
    ActionLogRecord, HiddenOrderRecord, RawRow, RecordKind, SheetsData, UserSettingsRecord,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// External spreadsheet client.
///
/// Ranges use A1 notation (`Sheet!A2:G`). Implementations own retries and
/// timeouts and report failures as [`SyncError::Sheet`].
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Reads every row in `range`. Trailing empty cells may be omitted.
    async fn get_rows(&self, range: &str) -> SyncResult<Vec<RawRow>>;

    /// Writes `rows` starting at the top-left of `range`.
    async fn put_rows(&self, range: &str, rows: Vec<RawRow>) -> SyncResult<()>;

    /// Appends one row after the last non-empty row of `sheet`.
    async fn append_row(&self, sheet: &str, row: RawRow) -> SyncResult<()>;

    /// Empties every cell in `range`.
    async fn clear_range(&self, range: &str) -> SyncResult<()>;
}

/// Result of replacing one sheet's contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushReport {
    pub rows_written: usize,
    /// Records left out because a required column came out empty.
    pub rejected: Vec<String>,
}

/// Reads all three sheets concurrently.
pub async fn fetch_sheets(store: &dyn TabularStore, layout: &SheetLayout) -> SyncResult<SheetsData> {
    let (hidden_orders, action_log, user_settings) = tokio::try_join!(
        store.get_rows(&layout.hidden_orders_range),
        store.get_rows(&layout.action_log_range),
        store.get_rows(&layout.user_settings_range),
    )?;

    debug!(
        "Fetched {} hidden order, {} action log and {} user settings row(s)",
        hidden_orders.len(),
        action_log.len(),
        user_settings.len()
    );

    Ok(SheetsData {
        hidden_orders: Some(hidden_orders),
        action_log: Some(action_log),
        user_settings: Some(user_settings),
    })
}

async fn replace_range(
    store: &dyn TabularStore,
    range: &str,
    kind: RecordKind,
    outcome: TransformOutcome<RawRow>,
) -> SyncResult<PushReport> {
    if !outcome.errors.is_empty() {
        warn!("{} {} record(s) not pushed", outcome.errors.len(), kind.label());
    }

    let rows_written = outcome.records.len();
    store.clear_range(range).await?;
    if rows_written > 0 {
        store.put_rows(range, outcome.records).await?;
    }

    info!("Pushed {} {} to {}", rows_written, kind.label(), range);
    Ok(PushReport {
        rows_written,
        rejected: outcome.errors,
    })
}

/// Replaces the hidden-orders sheet with `records`.
pub async fn push_hidden_orders(
    store: &dyn TabularStore,
    layout: &SheetLayout,
    transformer: &Transformer,
    records: &[HiddenOrderRecord],
) -> SyncResult<PushReport> {
    let outcome = transformer.hidden_orders_to_external(records);
    replace_range(store, &layout.hidden_orders_range, RecordKind::HiddenOrders, outcome).await
}

/// Replaces the action-log sheet with `records`.
pub async fn push_action_log(
    store: &dyn TabularStore,
    layout: &SheetLayout,
    transformer: &Transformer,
    records: &[ActionLogRecord],
) -> SyncResult<PushReport> {
    let outcome = transformer.action_log_to_external(records);
    replace_range(store, &layout.action_log_range, RecordKind::ActionLog, outcome).await
}

/// Replaces the user-settings sheet with `records`.
pub async fn push_user_settings(
    store: &dyn TabularStore,
    layout: &SheetLayout,
    transformer: &Transformer,
    records: &[UserSettingsRecord],
) -> SyncResult<PushReport> {
    let outcome = transformer.user_settings_to_external(records);
    replace_range(store, &layout.user_settings_range, RecordKind::UserSettings, outcome).await
}

/// Appends one audit entry to the action-log sheet.
pub async fn append_action(
    store: &dyn TabularStore,
    layout: &SheetLayout,
    transformer: &Transformer,
    record: &ActionLogRecord,
) -> SyncResult<()> {
    let mut outcome = transformer.action_log_to_external(std::slice::from_ref(record));
    let Some(row) = outcome.records.pop() else {
        return Err(SyncError::InvalidRecord(outcome.errors.join("; ")));
    };
    store.append_row(&layout.action_log_sheet, row).await?;
    debug!("Appended {} of order {} to {}", record.action, record.order_id, layout.action_log_sheet);
    Ok(())
}
