//! Exposure-scoring engine port.

use async_trait::async_trait;

use crate::domain::DiagnosisKeysDataMapping;
use crate::error::Result;

/// Platform subsystem that scores proximity data and accepts parameters.
///
/// Vendor rejections surface as
/// [`EngineError::Api`](crate::error::EngineError::Api) wrapped in
/// [`Error::Engine`](crate::error::Error::Engine).
#[async_trait]
pub trait ScoringEngine: Send + Sync {
    /// Mapping currently active in the engine.
    async fn diagnosis_keys_data_mapping(&self) -> Result<DiagnosisKeysDataMapping>;

    /// Replace the active mapping.
    async fn set_diagnosis_keys_data_mapping(&self, mapping: &DiagnosisKeysDataMapping)
        -> Result<()>;
}
