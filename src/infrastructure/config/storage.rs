//! Result storage settings.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::storage::{DiscardWindows, ExposureWindowRetention, RetainWindows};
use crate::error::{ConfigError, Result};
use crate::port::outbound::store::ResultStorageBackend;

/// What happens to exposure windows handed over with a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExposureWindowMode {
    /// Store none (production).
    #[default]
    Discard,
    /// Store every window next to its result (tester builds).
    Retain,
}

impl ExposureWindowMode {
    /// Build the matching retention policy over `backend`.
    #[must_use]
    pub fn retention(
        self,
        backend: Arc<dyn ResultStorageBackend>,
    ) -> Arc<dyn ExposureWindowRetention> {
        match self {
            Self::Discard => Arc::new(DiscardWindows::new(backend)),
            Self::Retain => Arc::new(RetainWindows::new(backend)),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Results kept after each store cycle. Must be at least 1.
    pub stored_result_limit: usize,
    pub exposure_windows: ExposureWindowMode,
    /// JSON snapshot left by older versions, read when no results are stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_snapshot: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            stored_result_limit: 2,
            exposure_windows: ExposureWindowMode::Discard,
            legacy_snapshot: None,
        }
    }
}

impl StorageConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.stored_result_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "storage.stored_result_limit",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
