//! Process-wide risk state held in memory.

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::domain::RiskLevel;
use crate::port::outbound::state::{RiskLevelData, RiskLevelState};

/// Last used config identifier plus the current risk level.
///
/// Level changes are observable through [`subscribe`](Self::subscribe).
pub struct InMemoryRiskState {
    last_used_config_identifier: RwLock<Option<String>>,
    risk_level: watch::Sender<RiskLevel>,
}

impl InMemoryRiskState {
    #[must_use]
    pub fn new(initial: RiskLevel) -> Self {
        let (risk_level, _) = watch::channel(initial);
        Self {
            last_used_config_identifier: RwLock::new(None),
            risk_level,
        }
    }

    /// Receiver observing every risk level change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RiskLevel> {
        self.risk_level.subscribe()
    }
}

impl Default for InMemoryRiskState {
    fn default() -> Self {
        Self::new(RiskLevel::Undetermined)
    }
}

impl RiskLevelData for InMemoryRiskState {
    fn last_used_config_identifier(&self) -> Option<String> {
        self.last_used_config_identifier.read().clone()
    }

    fn set_last_used_config_identifier(&self, identifier: Option<String>) {
        *self.last_used_config_identifier.write() = identifier;
    }
}

impl RiskLevelState for InMemoryRiskState {
    fn current_risk_level(&self) -> RiskLevel {
        *self.risk_level.borrow()
    }

    fn set_risk_level(&self, level: RiskLevel) {
        self.risk_level.send_replace(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_starts_unset() {
        let state = InMemoryRiskState::default();
        assert_eq!(state.last_used_config_identifier(), None);

        state.set_last_used_config_identifier(Some("v1".into()));
        assert_eq!(state.last_used_config_identifier().as_deref(), Some("v1"));
    }

    #[test]
    fn level_changes_reach_subscribers() {
        let state = InMemoryRiskState::new(RiskLevel::Low);
        let mut rx = state.subscribe();

        state.set_risk_level(RiskLevel::Undetermined);

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), RiskLevel::Undetermined);
        assert_eq!(state.current_risk_level(), RiskLevel::Undetermined);
    }
}
