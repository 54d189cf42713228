//! Legacy result migration port.

use async_trait::async_trait;

use crate::domain::RiskLevelResult;

/// Reads results persisted by an older schema and converts them.
///
/// Implementations swallow their own failures and return an empty list;
/// a broken legacy source must never break the primary read path.
#[async_trait]
pub trait LegacyResultMigrator: Send + Sync {
    async fn legacy_results(&self) -> Vec<RiskLevelResult>;
}
