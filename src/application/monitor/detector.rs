//! Reacts to configuration changes.
//!
//! ```text
//! ConfigProvider --(distinct by identifier)--> ConfigChangeMonitor
//!                                                   |
//!                                                   +-- identifier changed?
//!                                                   |     reset risk level, submit RiskLevel task
//!                                                   |
//!                                                   +-- mapping differs from engine?
//!                                                         push mapping to ScoringEngine
//! ```

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::{FutureExt, StreamExt};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};

use crate::application::stream::distinct_until_changed_by;
use crate::domain::{ConfigData, RiskLevel};
use crate::error::{EngineError, Error, Result};
use crate::port::outbound::config::ConfigProvider;
use crate::port::outbound::engine::ScoringEngine;
use crate::port::outbound::report::{ErrorReporter, Failure, FailureKind};
use crate::port::outbound::scheduler::{TaskKind, TaskRequest, TaskScheduler};
use crate::port::outbound::state::{RiskLevelData, RiskLevelState};

/// Origin tag attached to tasks this monitor submits.
pub const ORIGIN_TAG: &str = "ConfigChangeMonitor";

/// What [`ConfigChangeMonitor::check_for_risk_calculation`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskCheck {
    /// No identifier recorded yet; this config is the baseline.
    NoBaseline,
    /// Same identifier as last time.
    Unchanged,
    /// Risk level reset and recalculation submitted.
    Reset,
}

/// What [`ConfigChangeMonitor::check_for_diagnosis_keys_data_mapping`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingCheck {
    Unchanged,
    Applied,
    /// Engine refused the mapping; it stays stale until the next change.
    Rejected { status_code: i32 },
}

/// Watches the configuration stream and invalidates stale risk state.
pub struct ConfigChangeMonitor {
    config_provider: Arc<dyn ConfigProvider>,
    scheduler: Arc<dyn TaskScheduler>,
    risk_level_data: Arc<dyn RiskLevelData>,
    risk_level_state: Arc<dyn RiskLevelState>,
    engine: Arc<dyn ScoringEngine>,
    reporter: Arc<dyn ErrorReporter>,
    runtime: Handle,
}

impl ConfigChangeMonitor {
    /// Create a monitor that runs on `runtime` once launched.
    pub fn new(
        config_provider: Arc<dyn ConfigProvider>,
        scheduler: Arc<dyn TaskScheduler>,
        risk_level_data: Arc<dyn RiskLevelData>,
        risk_level_state: Arc<dyn RiskLevelState>,
        engine: Arc<dyn ScoringEngine>,
        reporter: Arc<dyn ErrorReporter>,
        runtime: Handle,
    ) -> Self {
        Self {
            config_provider,
            scheduler,
            risk_level_data,
            risk_level_state,
            engine,
            reporter,
            runtime,
        }
    }

    /// Start monitoring.
    ///
    /// Every call spawns another independent subscription; call it once.
    /// The task lives until the config stream ends or the runtime shuts down.
    pub fn launch(self: &Arc<Self>) -> JoinHandle<()> {
        debug!("Monitoring config changes");
        let monitor = Arc::clone(self);
        let mut configs = distinct_until_changed_by(self.config_provider.current_config(), |c| {
            c.identifier.clone()
        })
        .boxed();

        self.runtime.spawn(async move {
            while let Some(config) = configs.next().await {
                monitor.on_config(&config).await;
            }
            info!("Config stream closed, stopped monitoring config changes");
        })
    }

    async fn on_config(&self, config: &ConfigData) {
        trace!(identifier = %config.identifier, "Running app config change checks");

        match AssertUnwindSafe(self.run_checks(config))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(identifier = %config.identifier, error = %e, "App config change checks failed");
                self.reporter.report(Failure::new(
                    FailureKind::Pipeline,
                    "config_change_checks",
                    &e,
                ));
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(identifier = %config.identifier, panic = %message, "App config change checks panicked");
                self.reporter.report(Failure::new(
                    FailureKind::Pipeline,
                    "config_change_checks",
                    message,
                ));
            }
        }
    }

    async fn run_checks(&self, config: &ConfigData) -> Result<()> {
        self.check_for_risk_calculation(&config.identifier);
        self.check_for_diagnosis_keys_data_mapping(config).await?;
        Ok(())
    }

    /// Reset the risk level and request a recalculation when the identifier
    /// differs from the one the last calculation used.
    pub fn check_for_risk_calculation(&self, new_identifier: &str) -> RiskCheck {
        let Some(old_identifier) = self.risk_level_data.last_used_config_identifier() else {
            debug!("Config changed, but no previous identifier is available");
            return RiskCheck::NoBaseline;
        };

        if new_identifier == old_identifier {
            trace!(identifier = %old_identifier, "Config identifier didn't change, NOOP");
            return RiskCheck::Unchanged;
        }

        info!(
            new = %new_identifier,
            old = %old_identifier,
            "New config id differs from last one, resetting"
        );
        self.risk_level_state.set_risk_level(RiskLevel::Undetermined);
        self.scheduler
            .submit(TaskRequest::new(TaskKind::RiskLevel, ORIGIN_TAG));
        self.risk_level_data
            .set_last_used_config_identifier(Some(new_identifier.to_string()));
        RiskCheck::Reset
    }

    /// Push the config's diagnosis keys data mapping to the engine if it
    /// differs from the active one.
    ///
    /// # Errors
    /// Returns an error if the active mapping cannot be read, or if pushing
    /// fails with anything other than a status-coded vendor error.
    pub async fn check_for_diagnosis_keys_data_mapping(
        &self,
        config: &ConfigData,
    ) -> Result<MappingCheck> {
        let current = self.engine.diagnosis_keys_data_mapping().await?;
        if current == config.diagnosis_keys_data_mapping {
            return Ok(MappingCheck::Unchanged);
        }

        info!("New DiagnosisKeysDataMapping differs from last one, applying");
        match self
            .engine
            .set_diagnosis_keys_data_mapping(&config.diagnosis_keys_data_mapping)
            .await
        {
            Ok(()) => Ok(MappingCheck::Applied),
            Err(Error::Engine(err @ EngineError::Api { status_code, .. })) => {
                error!(status_code, error = %err, "Failed to set DiagnosisKeysDataMapping");
                self.reporter.report(Failure::new(
                    FailureKind::ExternalEngine,
                    "set_diagnosis_keys_data_mapping",
                    &err,
                ));
                Ok(MappingCheck::Rejected { status_code })
            }
            Err(e) => Err(e),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
