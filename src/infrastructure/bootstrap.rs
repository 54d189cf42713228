//! Composition root: builds the store and the config monitor from settings.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::info;

use crate::adapter::outbound::legacy::{NoLegacyResults, SnapshotMigrator};
use crate::adapter::outbound::report::TracingReporter;
use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use crate::adapter::outbound::sqlite::SqliteResultBackend;
use crate::application::monitor::ConfigChangeMonitor;
use crate::application::storage::RiskResultStore;
use crate::error::Result;
use crate::infrastructure::config::settings::Settings;
use crate::port::outbound::config::ConfigProvider;
use crate::port::outbound::engine::ScoringEngine;
use crate::port::outbound::legacy::LegacyResultMigrator;
use crate::port::outbound::report::ErrorReporter;
use crate::port::outbound::scheduler::TaskScheduler;
use crate::port::outbound::state::{RiskLevelData, RiskLevelState};
use crate::port::outbound::store::ResultStorageBackend;

/// Open (and migrate) the configured database and build a result store on it.
///
/// # Errors
/// Returns an error if the database cannot be opened or migrated.
pub fn build_result_store(settings: &Settings, runtime: Handle) -> Result<RiskResultStore> {
    build_result_store_with_reporter(settings, runtime, Arc::new(TracingReporter::new()))
}

/// Same as [`build_result_store`] with a caller-supplied diagnostics sink.
///
/// # Errors
/// Returns an error if the database cannot be opened or migrated.
pub fn build_result_store_with_reporter(
    settings: &Settings,
    runtime: Handle,
    reporter: Arc<dyn ErrorReporter>,
) -> Result<RiskResultStore> {
    let pool = create_pool(&settings.database)?;
    run_migrations(&pool)?;

    let backend: Arc<dyn ResultStorageBackend> =
        Arc::new(SqliteResultBackend::new(pool, runtime));
    let windows = settings
        .storage
        .exposure_windows
        .retention(Arc::clone(&backend));
    let migrator: Arc<dyn LegacyResultMigrator> = match &settings.storage.legacy_snapshot {
        Some(path) => Arc::new(SnapshotMigrator::new(path)),
        None => Arc::new(NoLegacyResults),
    };

    info!(
        database = %settings.database,
        stored_result_limit = settings.storage.stored_result_limit,
        exposure_windows = ?settings.storage.exposure_windows,
        "Result store ready"
    );

    Ok(RiskResultStore::new(
        backend,
        windows,
        migrator,
        reporter,
        settings.storage.stored_result_limit,
    ))
}

/// Host-owned collaborators the config monitor drives.
pub struct MonitorDeps {
    pub config_provider: Arc<dyn ConfigProvider>,
    pub scheduler: Arc<dyn TaskScheduler>,
    pub risk_level_data: Arc<dyn RiskLevelData>,
    pub risk_level_state: Arc<dyn RiskLevelState>,
    pub engine: Arc<dyn ScoringEngine>,
}

/// Build a config monitor reporting through the tracing log. Not launched.
#[must_use]
pub fn build_config_monitor(deps: MonitorDeps, runtime: Handle) -> Arc<ConfigChangeMonitor> {
    Arc::new(ConfigChangeMonitor::new(
        deps.config_provider,
        deps.scheduler,
        deps.risk_level_data,
        deps.risk_level_state,
        deps.engine,
        Arc::new(TracingReporter::new()),
        runtime,
    ))
}
