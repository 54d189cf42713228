//! Risk result persistence with bounded retention and legacy fallback.
//!
//! # Store cycle
//!
//! ```text
//! store_result(result)
//!   ├─ insert_result ──── fails ──> report Persistence, StoreOutcome::Lost
//!   ├─ delete_oldest_beyond(limit)      (Cleanup on failure, continue)
//!   ├─ store_exposure_windows(id)       (Cleanup on failure, continue)
//!   └─ delete_orphaned_exposure_windows (Cleanup on failure)
//! ```
//!
//! Steps run strictly in sequence. Concurrent cycles are not serialized
//! here; callers that need the retention bound under concurrency must run
//! recomputation single-flight.

use std::sync::Arc;
use std::time::Instant;

use futures_util::stream::{BoxStream, StreamExt};
use tracing::{debug, error, trace, warn};

use super::window::ExposureWindowRetention;
use crate::application::stream::watch_query;
use crate::domain::{latest_or_initial, ExposureWindow, LatestResults, PersistedResult};
use crate::domain::{ResultId, RiskLevelResult};
use crate::error::Result;
use crate::port::outbound::legacy::LegacyResultMigrator;
use crate::port::outbound::report::{ErrorReporter, Failure, FailureKind};
use crate::port::outbound::store::ResultStorageBackend;

/// Number of results [`RiskResultStore::get_latest_results`] returns at most.
pub const LATEST_RESULTS_CAP: usize = 2;

/// Outcome of one [`RiskResultStore::store_result`] cycle.
///
/// Cleanup counters are `None` when that step failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    Stored {
        id: ResultId,
        trimmed: Option<usize>,
        windows_stored: Option<usize>,
        orphans_deleted: Option<usize>,
    },
    /// Insert failed; the result was dropped.
    Lost,
}

impl StoreOutcome {
    #[must_use]
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored { .. })
    }

    /// Whether every cleanup step after the insert succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        match self {
            Self::Stored {
                trimmed,
                windows_stored,
                orphans_deleted,
                ..
            } => trimmed.is_some() && windows_stored.is_some() && orphans_deleted.is_some(),
            Self::Lost => false,
        }
    }
}

/// Orchestrates result persistence on top of a [`ResultStorageBackend`].
pub struct RiskResultStore {
    backend: Arc<dyn ResultStorageBackend>,
    windows: Arc<dyn ExposureWindowRetention>,
    migrator: Arc<dyn LegacyResultMigrator>,
    reporter: Arc<dyn ErrorReporter>,
    stored_result_limit: usize,
}

impl RiskResultStore {
    /// Create a store keeping at most `stored_result_limit` results.
    pub fn new(
        backend: Arc<dyn ResultStorageBackend>,
        windows: Arc<dyn ExposureWindowRetention>,
        migrator: Arc<dyn LegacyResultMigrator>,
        reporter: Arc<dyn ErrorReporter>,
        stored_result_limit: usize,
    ) -> Self {
        Self {
            backend,
            windows,
            migrator,
            reporter,
            stored_result_limit,
        }
    }

    /// Persist `result`, trim old results and reconcile exposure windows.
    ///
    /// Never fails; failures are logged, reported and reflected in the outcome.
    pub async fn store_result(&self, result: &RiskLevelResult) -> StoreOutcome {
        debug!(
            exposure_windows = ?result.exposure_windows().map(<[ExposureWindow]>::len),
            "Storing result"
        );

        let id = match self.insert(result).await {
            Ok(id) => id,
            Err(e) => {
                error!(
                    error = %e,
                    risk_level = %result.risk_level(),
                    calculated_at = %result.calculated_at(),
                    "Failed to store latest result"
                );
                self.reporter
                    .report(Failure::new(FailureKind::Persistence, "insert_result", &e));
                return StoreOutcome::Lost;
            }
        };

        debug!("Cleaning up old results");
        let trimmed = self.cleanup(
            "delete_oldest",
            self.backend
                .delete_oldest_beyond(self.stored_result_limit)
                .await,
        );
        if let Some(count) = trimmed {
            debug!(count, "Old results deleted");
        }

        debug!("Storing exposure windows");
        let windows_stored = self.cleanup(
            "store_exposure_windows",
            self.windows.store_exposure_windows(&id, result).await,
        );

        debug!("Deleting orphaned exposure windows");
        let orphans_deleted = self.cleanup(
            "delete_orphaned_exposure_windows",
            self.windows.delete_orphaned_exposure_windows().await,
        );

        StoreOutcome::Stored {
            id,
            trimmed,
            windows_stored,
            orphans_deleted,
        }
    }

    async fn insert(&self, result: &RiskLevelResult) -> Result<ResultId> {
        let started = Instant::now();
        let persisted = PersistedResult::from_result(result)?;
        self.backend.insert_result(&persisted).await?;
        debug!(
            id = %persisted.id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Stored risk level result"
        );
        Ok(persisted.id)
    }

    fn cleanup<T>(&self, operation: &'static str, outcome: Result<T>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(operation, error = %e, "Result cleanup step failed");
                self.reporter
                    .report(Failure::new(FailureKind::Cleanup, operation, &e));
                None
            }
        }
    }

    /// All stored results, oldest first; the legacy set when nothing is stored.
    ///
    /// Emits on subscription and after every backend change. The legacy
    /// migration runs again on every read that finds the table empty.
    pub fn risk_level_results(&self) -> BoxStream<'static, Vec<RiskLevelResult>> {
        let backend = Arc::clone(&self.backend);
        let migrator = Arc::clone(&self.migrator);
        watch_query(self.backend.changes(), move || {
            let backend = Arc::clone(&backend);
            let migrator = Arc::clone(&migrator);
            async move {
                match load_results(backend.as_ref(), migrator.as_ref()).await {
                    Ok(results) => Some(results),
                    Err(e) => {
                        error!(error = %e, "Failed to read risk level results");
                        None
                    }
                }
            }
        })
    }

    /// Newest result, or the initial sentinel when there is none.
    pub fn last_risk_level_result(&self) -> BoxStream<'static, RiskLevelResult> {
        self.risk_level_results()
            .map(|results| latest_or_initial(&results))
            .boxed()
    }

    /// All stored exposure windows.
    pub fn exposure_windows(&self) -> BoxStream<'static, Vec<ExposureWindow>> {
        let backend = Arc::clone(&self.backend);
        watch_query(self.backend.changes(), move || {
            let backend = Arc::clone(&backend);
            async move {
                match backend.windows().await {
                    Ok(rows) => Some(rows.into_iter().map(|row| row.window).collect()),
                    Err(e) => {
                        error!(error = %e, "Failed to read exposure windows");
                        None
                    }
                }
            }
        })
    }

    /// The two most recent results, oldest first.
    ///
    /// `limit` does not widen or narrow the answer; the cap is
    /// [`LATEST_RESULTS_CAP`].
    pub async fn get_latest_results(&self, limit: usize) -> Vec<RiskLevelResult> {
        let mut results = self.current_risk_level_results().await;
        results.sort_by_key(RiskLevelResult::calculated_at);
        let skip = results.len().saturating_sub(LATEST_RESULTS_CAP);
        let latest = results.split_off(skip);
        trace!(requested = limit, returned = latest.len(), "Latest results");
        latest
    }

    /// Latest and latest successful result of the current set.
    pub async fn latest_results(&self) -> LatestResults {
        LatestResults::from_results(&self.current_risk_level_results().await)
    }

    /// One read of what [`risk_level_results`](Self::risk_level_results)
    /// would emit now. A failed read yields an empty set.
    pub async fn current_risk_level_results(&self) -> Vec<RiskLevelResult> {
        match load_results(self.backend.as_ref(), self.migrator.as_ref()).await {
            Ok(results) => results,
            Err(e) => {
                error!(error = %e, "Failed to read risk level results");
                Vec::new()
            }
        }
    }

    /// One read of the stored exposure windows. A failed read yields an empty set.
    pub async fn current_exposure_windows(&self) -> Vec<ExposureWindow> {
        match self.backend.windows().await {
            Ok(rows) => rows.into_iter().map(|row| row.window).collect(),
            Err(e) => {
                error!(error = %e, "Failed to read exposure windows");
                Vec::new()
            }
        }
    }

    /// Empty result and window tables. Returns whether the clear went through.
    pub async fn clear(&self) -> bool {
        warn!("Clearing stored risk level and exposure window results");
        match self.backend.clear_all().await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to clear stored results");
                self.reporter
                    .report(Failure::new(FailureKind::Persistence, "clear_all", &e));
                false
            }
        }
    }
}

async fn load_results(
    backend: &dyn ResultStorageBackend,
    migrator: &dyn LegacyResultMigrator,
) -> Result<Vec<RiskLevelResult>> {
    let rows = backend.results().await?;
    let results: Vec<RiskLevelResult> = rows
        .iter()
        .filter_map(|row| match row.to_result() {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(id = %row.id, error = %e, "Skipping unreadable result row");
                None
            }
        })
        .collect();

    if results.is_empty() {
        debug!("No stored results, using legacy results");
        return Ok(migrator.legacy_results().await);
    }
    Ok(results)
}
