//! Full cache resync.
//!
//! A resync re-derives the namespaced part of the cache from sheet rows:
//!
//! 1. Snapshot the current counts. A failed read degrades to zero counts.
//! 2. Clear every key in the namespace. Fatal on failure.
//! 3. Import (validate) the supplied sheets, optionally recovering sheets
//!    whose rows all failed.
//! 4. Rebuild the cache. Kinds are written concurrently, records within a
//!    kind one at a time. Fatal on the first failed write.
//! 5. Verify the cache counts against the imported counts. A mismatch is
//!    reported, not raised.
//!
//! Only one resync runs per orchestrator at a time; a second request fails
//! with [`SyncError::AlreadyInProgress`] before touching the cache.

use crate::config::{ResyncConfig, SheetLayout};
use crate::error::{SyncError, SyncResult};
use crate::gateway::{fetch_sheets, TabularStore};
use crate::importer::{ImportAllResult, Importer};
use crate::phase::ResyncPhase;
use crate::report::ResyncReport;
use ordersheet_storage::{CacheCounts, CacheStore, CachedRecord, RecordCache, StorageResult};
use ordersheet_transform::Transformer;
use ordersheet_types::{
    ActionLogRecord, HiddenOrderRecord, RecordKind, SheetsData, UserSettingsRecord,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

/// Drives resyncs of one cache namespace.
pub struct SyncOrchestrator {
    cache: RecordCache,
    importer: Importer,
    transformer: Mutex<Transformer>,
    config: ResyncConfig,
    syncing: AtomicBool,
    phase: Mutex<ResyncPhase>,
    diagnostics: Mutex<Diagnostics>,
}

#[derive(Debug, Default)]
struct Diagnostics {
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Clears the in-progress flag when the resync ends, however it ends.
struct SyncGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SyncGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Records headed for the cache, per kind. `None` kinds were not supplied.
#[derive(Debug, Default)]
struct RebuildSet {
    hidden_orders: Option<Vec<HiddenOrderRecord>>,
    action_log: Option<Vec<ActionLogRecord>>,
    user_settings: Option<Vec<UserSettingsRecord>>,
}

impl RebuildSet {
    fn from_import(imported: ImportAllResult) -> Self {
        Self {
            hidden_orders: imported.hidden_orders.map(|r| r.data),
            action_log: imported.action_log.map(|r| r.data),
            user_settings: imported.user_settings.map(|r| r.data),
        }
    }

    fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::HiddenOrders => self.hidden_orders.as_ref().map_or(0, Vec::len),
            RecordKind::ActionLog => self.action_log.as_ref().map_or(0, Vec::len),
            RecordKind::UserSettings => self.user_settings.as_ref().map_or(0, Vec::len),
        }
    }
}

async fn rebuild_kind<T: CachedRecord>(cache: &RecordCache, records: Option<&[T]>) -> StorageResult<usize> {
    let Some(records) = records else {
        return Ok(0);
    };
    for record in records {
        cache.store(record).await?;
    }
    debug!("Rebuilt {} {}", records.len(), T::KIND.label());
    Ok(records.len())
}

fn describe_counts(counts: &CacheCounts) -> String {
    format!(
        "{} hidden orders, {} action log entries, {} user settings",
        counts.hidden_orders, counts.action_log, counts.user_settings
    )
}

impl SyncOrchestrator {
    /// Creates an orchestrator with the default configuration.
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self::with_config(store, ResyncConfig::default())
    }

    pub fn with_config(store: Arc<dyn CacheStore>, config: ResyncConfig) -> Self {
        Self {
            cache: RecordCache::with_namespace(store, config.namespace.clone()),
            importer: Importer::new(),
            transformer: Mutex::new(Transformer::with_max_recovery_attempts(config.max_recovery_attempts)),
            config,
            syncing: AtomicBool::new(false),
            phase: Mutex::new(ResyncPhase::Idle),
            diagnostics: Mutex::new(Diagnostics::default()),
        }
    }

    /// Replaces the importer, e.g. to validate against a fixed clock.
    #[must_use]
    pub fn with_importer(mut self, importer: Importer) -> Self {
        self.importer = importer;
        self
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    pub fn config(&self) -> &ResyncConfig {
        &self.config
    }

    /// True while a resync holds the guard.
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> ResyncPhase {
        *lock(&self.phase)
    }

    /// Errors collected by the most recent resync.
    pub fn last_errors(&self) -> Vec<String> {
        lock(&self.diagnostics).errors.clone()
    }

    /// Warnings collected by the most recent resync.
    pub fn last_warnings(&self) -> Vec<String> {
        lock(&self.diagnostics).warnings.clone()
    }

    /// Recovery attempts used so far.
    pub fn recovery_attempts(&self) -> u32 {
        lock(&self.transformer).recovery_attempts()
    }

    /// Rebuilds the cache from `sheets`.
    ///
    /// Returns `Err` only for [`SyncError::AlreadyInProgress`] and for a
    /// fatal step ([`SyncError::ResyncFailed`]). Bad rows and integrity
    /// mismatches are in the returned report.
    pub async fn resync(&self, sheets: SheetsData) -> SyncResult<ResyncReport> {
        let _guard = self.begin()?;
        self.run(&sheets).await
    }

    /// Fetches all sheets from `store` and resyncs from them.
    pub async fn resync_from_store(
        &self,
        store: &dyn TabularStore,
        layout: &SheetLayout,
    ) -> SyncResult<ResyncReport> {
        let _guard = self.begin()?;
        let sheets = match fetch_sheets(store, layout).await {
            Ok(sheets) => sheets,
            Err(e) => {
                error!("Could not fetch sheets for resync: {}", e);
                self.push_error(format!("Fetching sheets failed: {e}"));
                return Err(e);
            }
        };
        self.run(&sheets).await
    }

    fn begin(&self) -> SyncResult<SyncGuard<'_>> {
        let Some(guard) = SyncGuard::acquire(&self.syncing) else {
            warn!("Resync requested while another resync is running");
            return Err(SyncError::AlreadyInProgress);
        };
        *lock(&self.diagnostics) = Diagnostics::default();
        Ok(guard)
    }

    async fn run(&self, sheets: &SheetsData) -> SyncResult<ResyncReport> {
        let mut report = ResyncReport::start();
        info!("Starting resync of namespace {}", self.cache.namespace());

        self.enter(ResyncPhase::Snapshotting);
        let before = match self.cache.counts().await {
            Ok(counts) => counts,
            Err(e) => {
                let message = format!("Could not read cache counts, assuming empty: {e}");
                warn!("{}", message);
                self.push_warning(message);
                CacheCounts::default()
            }
        };
        for kind in RecordKind::ALL {
            report.statistics.entry(kind).or_default().before = before.get(kind);
        }
        report.step(format!("Snapshot: {}", describe_counts(&before)));

        self.enter(ResyncPhase::Clearing);
        let removed = match self.cache.clear().await {
            Ok(removed) => removed,
            Err(e) => return Err(self.abort(ResyncPhase::Clearing, e.to_string(), report)),
        };
        report.step(format!("Cleared {removed} cache key(s)"));

        self.enter(ResyncPhase::Importing);
        let imported = self.importer.import_all(sheets);
        self.collect_import_diagnostics(&imported);
        report.step(format!(
            "Imported {} sheet(s): {} error(s), {} warning(s)",
            imported.validation_summary.success_rates.len(),
            imported.validation_summary.total_errors,
            imported.validation_summary.total_warnings
        ));
        let records = self.prepare_rebuild(sheets, imported, &mut report);

        self.enter(ResyncPhase::Rebuilding);
        let rebuilt = tokio::try_join!(
            rebuild_kind(&self.cache, records.hidden_orders.as_deref()),
            rebuild_kind(&self.cache, records.action_log.as_deref()),
            rebuild_kind(&self.cache, records.user_settings.as_deref()),
        );
        let (hidden_orders, action_log, user_settings) = match rebuilt {
            Ok(counts) => counts,
            Err(e) => return Err(self.abort(ResyncPhase::Rebuilding, e.to_string(), report)),
        };
        report.step(format!(
            "Rebuilt: {}",
            describe_counts(&CacheCounts {
                hidden_orders,
                action_log,
                user_settings,
            })
        ));

        self.enter(ResyncPhase::Verifying);
        match self.cache.counts().await {
            Ok(after) => {
                for kind in RecordKind::ALL {
                    report.statistics.entry(kind).or_default().after = after.get(kind);
                    report.validation.check(kind, records.count(kind), after.get(kind));
                }
            }
            Err(e) => report.validation.unreadable(&e.to_string()),
        }
        if report.validation.passed {
            report.step("Verified: cache matches imported data");
        } else {
            warn!("Integrity check failed after resync: {:?}", report.validation.checks);
            self.push_warning(format!(
                "Integrity check failed: {}",
                report.validation.checks.join("; ")
            ));
            report.step("Verified: cache does not match imported data");
        }

        self.enter(ResyncPhase::Done);
        report.success = true;
        info!(
            "Resync finished in {} step(s), integrity {}",
            report.steps.len(),
            if report.validation.passed { "passed" } else { "failed" }
        );
        Ok(report)
    }

    /// Turns the import into rebuild input, running recovery for sheets
    /// with rows but no valid records when configured to.
    fn prepare_rebuild(
        &self,
        sheets: &SheetsData,
        imported: ImportAllResult,
        report: &mut ResyncReport,
    ) -> RebuildSet {
        if !self.config.recover_invalid_sheets {
            return RebuildSet::from_import(imported);
        }

        let failed: Vec<RecordKind> = sheets
            .present_kinds()
            .filter(|kind| {
                imported.record_count(*kind) == Some(0)
                    && sheets.rows(*kind).is_some_and(|rows| !rows.is_empty())
            })
            .collect();

        if failed.is_empty() {
            if imported.validation_summary.total_errors == 0 {
                lock(&self.transformer).reset_recovery();
            }
            return RebuildSet::from_import(imported);
        }

        let subset = SheetsData {
            hidden_orders: sheets.hidden_orders.clone().filter(|_| failed.contains(&RecordKind::HiddenOrders)),
            action_log: sheets.action_log.clone().filter(|_| failed.contains(&RecordKind::ActionLog)),
            user_settings: sheets.user_settings.clone().filter(|_| failed.contains(&RecordKind::UserSettings)),
        };
        let errors: Vec<String> = failed
            .iter()
            .filter_map(|kind| imported.validation(*kind))
            .flat_map(|validation| validation.errors.iter().cloned())
            .collect();
        let recovered = lock(&self.transformer).attempt_recovery(&subset, &errors);

        let mut records = RebuildSet::from_import(imported);
        let kinds = failed.iter().map(RecordKind::to_string).collect::<Vec<_>>().join(", ");
        match recovered {
            Some(recovered) => {
                report.step(format!(
                    "Recovered {} record(s) for {} (attempt {})",
                    recovered.record_count(),
                    kinds,
                    recovered.meta.recovery_attempt
                ));
                self.push_warning(format!("Rebuilt {kinds} from recovered data"));
                report.recovery = Some(recovered.meta);
                if let Some(rows) = recovered.hidden_orders {
                    records.hidden_orders = Some(rows);
                }
                if let Some(rows) = recovered.action_log {
                    records.action_log = Some(rows);
                }
                if let Some(rows) = recovered.user_settings {
                    records.user_settings = Some(rows);
                }
            }
            None => {
                report.step(format!("Recovery for {kinds} skipped: attempt limit reached"));
                self.push_error(format!("Recovery attempt limit reached for {kinds}"));
            }
        }
        records
    }

    fn enter(&self, phase: ResyncPhase) {
        *lock(&self.phase) = phase;
        debug!("Resync phase: {}", phase);
    }

    fn abort(&self, step: ResyncPhase, reason: String, mut report: ResyncReport) -> SyncError {
        error!("Resync failed while {}: {}", step, reason);
        self.push_error(format!("Resync failed while {step}: {reason}"));
        self.enter(ResyncPhase::Failed);

        report.step(format!("Failed while {step}: {reason}"));
        report.success = false;
        report.error = Some(reason.clone());
        SyncError::ResyncFailed {
            step,
            reason,
            report: Box::new(report),
        }
    }

    fn collect_import_diagnostics(&self, imported: &ImportAllResult) {
        let mut diagnostics = lock(&self.diagnostics);
        for kind in RecordKind::ALL {
            if let Some(validation) = imported.validation(kind) {
                diagnostics.errors.extend(validation.errors.iter().cloned());
                diagnostics.warnings.extend(validation.warnings.iter().cloned());
            }
        }
    }

    fn push_error(&self, message: String) {
        lock(&self.diagnostics).errors.push(message);
    }

    fn push_warning(&self, message: String) {
        lock(&self.diagnostics).warnings.push(message);
    }
}
