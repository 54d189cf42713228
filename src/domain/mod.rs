//! Storage- and transport-agnostic domain types.

pub mod config;
pub mod id;
pub mod persisted;
pub mod risk;
pub mod window;

pub use config::{ConfigData, DiagnosisKeysDataMapping};
pub use id::ResultId;
pub use persisted::{PersistedResult, PersistedWindow};
pub use risk::{
    latest_or_initial, AggregatedRiskLevel, AggregatedRiskResult, LatestResults, RiskLevel,
    RiskLevelResult,
};
pub use window::{ExposureWindow, Infectiousness, ReportType, ScanInstance};
