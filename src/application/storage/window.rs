//! Exposure-window retention policies plugged into the result store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{ResultId, RiskLevelResult};
use crate::error::Result;
use crate::port::outbound::store::ResultStorageBackend;

/// Decides what happens to a result's exposure windows after it is stored.
#[async_trait]
pub trait ExposureWindowRetention: Send + Sync {
    /// Persist the windows of `result` under `result_id`. Returns count stored.
    async fn store_exposure_windows(
        &self,
        result_id: &ResultId,
        result: &RiskLevelResult,
    ) -> Result<usize>;

    /// Remove windows whose parent result is gone. Returns count deleted.
    async fn delete_orphaned_exposure_windows(&self) -> Result<usize>;
}

/// Keeps no windows. Orphans left over from a retaining build are still removed.
pub struct DiscardWindows {
    backend: Arc<dyn ResultStorageBackend>,
}

impl DiscardWindows {
    #[must_use]
    pub fn new(backend: Arc<dyn ResultStorageBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ExposureWindowRetention for DiscardWindows {
    async fn store_exposure_windows(
        &self,
        _result_id: &ResultId,
        _result: &RiskLevelResult,
    ) -> Result<usize> {
        Ok(0)
    }

    async fn delete_orphaned_exposure_windows(&self) -> Result<usize> {
        self.backend.delete_orphan_windows().await
    }
}

/// Persists every window next to its result, for inspection builds.
pub struct RetainWindows {
    backend: Arc<dyn ResultStorageBackend>,
}

impl RetainWindows {
    #[must_use]
    pub fn new(backend: Arc<dyn ResultStorageBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ExposureWindowRetention for RetainWindows {
    async fn store_exposure_windows(
        &self,
        result_id: &ResultId,
        result: &RiskLevelResult,
    ) -> Result<usize> {
        let windows = result.exposure_windows().unwrap_or_default();
        for window in windows {
            self.backend.insert_window(result_id, window).await?;
        }
        debug!(result_id = %result_id, count = windows.len(), "Stored exposure windows");
        Ok(windows.len())
    }

    async fn delete_orphaned_exposure_windows(&self) -> Result<usize> {
        self.backend.delete_orphan_windows().await
    }
}
