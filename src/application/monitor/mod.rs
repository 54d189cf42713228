//! Configuration change monitoring.

mod detector;

pub use detector::{ConfigChangeMonitor, MappingCheck, RiskCheck, ORIGIN_TAG};
