//! Process-wide risk state handles.

use crate::domain::RiskLevel;

/// Remembers which configuration the last risk calculation used.
pub trait RiskLevelData: Send + Sync {
    fn last_used_config_identifier(&self) -> Option<String>;

    fn set_last_used_config_identifier(&self, identifier: Option<String>);
}

/// Holder of the risk level currently shown to the user.
pub trait RiskLevelState: Send + Sync {
    fn current_risk_level(&self) -> RiskLevel;

    fn set_risk_level(&self, level: RiskLevel);
}
