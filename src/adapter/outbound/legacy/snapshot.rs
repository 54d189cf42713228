//! Legacy key-value snapshot migration.
//!
//! Older versions kept only the last risk level, the last successful risk
//! level and the time of the last calculation:
//!
//! ```json
//! {
//!   "risk_level_score": 2,
//!   "risk_level_score_successful": 3,
//!   "last_calculated_at_millis": 1605000000000
//! }
//! ```

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{RiskLevel, RiskLevelResult};
use crate::error::{Error, Result};
use crate::port::outbound::legacy::LegacyResultMigrator;

/// Raw legacy snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LegacySnapshot {
    #[serde(default)]
    pub risk_level_score: Option<i32>,
    #[serde(default)]
    pub risk_level_score_successful: Option<i32>,
    #[serde(default)]
    pub last_calculated_at_millis: Option<i64>,
}

impl LegacySnapshot {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    /// Returns [`Error::Json`] if the document is malformed.
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert into results: the last successful level first, then the last
    /// calculated level. Both carry the legacy timestamp.
    ///
    /// # Errors
    /// Returns [`Error::Parse`] if the timestamp is out of range.
    pub fn into_results(self) -> Result<Vec<RiskLevelResult>> {
        let Some(millis) = self.last_calculated_at_millis else {
            return Ok(Vec::new());
        };
        let calculated_at = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| Error::Parse(format!("legacy timestamp out of range: {millis}")))?;

        Ok([self.risk_level_score_successful, self.risk_level_score]
            .into_iter()
            .flatten()
            .map(|raw| RiskLevelResult::new(RiskLevel::from_raw(raw), calculated_at))
            .collect())
    }
}

/// Reads a [`LegacySnapshot`] JSON file.
pub struct SnapshotMigrator {
    path: PathBuf,
}

impl SnapshotMigrator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<Vec<RiskLevelResult>> {
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No legacy snapshot");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        LegacySnapshot::parse(&json)?.into_results()
    }
}

#[async_trait]
impl LegacyResultMigrator for SnapshotMigrator {
    async fn legacy_results(&self) -> Vec<RiskLevelResult> {
        match self.read().await {
            Ok(results) => {
                debug!(count = results.len(), "Migrated legacy results");
                results
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to migrate legacy results");
                Vec::new()
            }
        }
    }
}

/// Migrator for installs that never had a legacy store.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLegacyResults;

#[async_trait]
impl LegacyResultMigrator for NoLegacyResults {
    async fn legacy_results(&self) -> Vec<RiskLevelResult> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn snapshot_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn yields_successful_then_last_level() {
        let file = snapshot_file(
            r#"{"risk_level_score": 1, "risk_level_score_successful": 3, "last_calculated_at_millis": 1605000000000}"#,
        );

        let results = SnapshotMigrator::new(file.path()).legacy_results().await;

        let levels: Vec<RiskLevel> = results.iter().map(RiskLevelResult::risk_level).collect();
        assert_eq!(
            levels,
            vec![RiskLevel::Increased, RiskLevel::NoCalculationPossibleTracingOff]
        );
        assert!(results
            .iter()
            .all(|r| r.calculated_at().timestamp_millis() == 1_605_000_000_000));
    }

    #[tokio::test]
    async fn missing_timestamp_yields_nothing() {
        let file = snapshot_file(r#"{"risk_level_score": 2}"#);
        assert!(SnapshotMigrator::new(file.path())
            .legacy_results()
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn missing_file_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let migrator = SnapshotMigrator::new(dir.path().join("absent.json"));
        assert!(migrator.legacy_results().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_snapshot_yields_nothing() {
        let file = snapshot_file("{risk_level_score");
        assert!(SnapshotMigrator::new(file.path())
            .legacy_results()
            .await
            .is_empty());
    }

    #[test]
    fn only_last_level_when_never_successful() {
        let snapshot = LegacySnapshot {
            risk_level_score: Some(5),
            risk_level_score_successful: None,
            last_calculated_at_millis: Some(0),
        };
        let results = snapshot.into_results().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].risk_level(), RiskLevel::UnknownRiskInitial);
    }
}
