//! Fixed legacy result source.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::RiskLevelResult;
use crate::port::outbound::legacy::LegacyResultMigrator;

/// Returns the same legacy set on every call and counts the calls.
#[derive(Debug, Default)]
pub struct StaticMigrator {
    results: Vec<RiskLevelResult>,
    calls: AtomicUsize,
}

impl StaticMigrator {
    pub fn new(results: Vec<RiskLevelResult>) -> Self {
        Self {
            results,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LegacyResultMigrator for StaticMigrator {
    async fn legacy_results(&self) -> Vec<RiskLevelResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results.clone()
    }
}
