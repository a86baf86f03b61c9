//! Import and cache resync for ordersheet.
//!
//! - [`Importer`] validates whole sheets and summarizes the result.
//! - [`SyncOrchestrator`] clears and rebuilds the cache from sheet rows,
//!   then checks the rebuilt counts.
//! - [`TabularStore`] is the spreadsheet client; [`fetch_sheets`] and the
//!   `push_*` functions move data between it and typed records.

mod config;
mod error;
mod gateway;
mod importer;
mod orchestrator;
mod phase;
mod report;

pub use config::{ResyncConfig, SheetLayout};
pub use error::{SyncError, SyncResult};
pub use gateway::{
    append_action, fetch_sheets, push_action_log, push_hidden_orders, push_user_settings,
    PushReport, TabularStore,
};
pub use importer::{ImportAllResult, ImportResult, ImportValidation, Importer, ValidationSummary};
pub use orchestrator::SyncOrchestrator;
pub use ordersheet_types::SheetsData;
pub use phase::ResyncPhase;
pub use report::{IntegrityReport, KindStatistics, ResyncReport};
