//! Storage-shaped records for results and exposure windows.
//!
//! These are what storage backends read and write. Conversion to and from
//! the domain types lives here so every backend encodes the same way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ResultId;
use super::risk::{AggregatedRiskResult, RiskLevel, RiskLevelResult};
use super::window::ExposureWindow;
use crate::error::{Error, Result};

/// Durable result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedResult {
    pub id: ResultId,
    pub calculated_at: DateTime<Utc>,
    pub risk_level: RiskLevel,
    /// JSON-encoded [`AggregatedRiskResult`].
    pub aggregated_risk_result: Option<String>,
    pub matched_key_count: u32,
    pub days_since_last_exposure: u32,
}

impl PersistedResult {
    /// Encode a result under a freshly generated id.
    ///
    /// Exposure windows are not part of the row; they are stored separately.
    ///
    /// # Errors
    /// Returns an error if the aggregated result cannot be serialized.
    pub fn from_result(result: &RiskLevelResult) -> Result<Self> {
        Self::from_result_with_id(ResultId::generate(), result)
    }

    /// Encode a result under the given id.
    ///
    /// # Errors
    /// Returns an error if the aggregated result cannot be serialized.
    pub fn from_result_with_id(id: ResultId, result: &RiskLevelResult) -> Result<Self> {
        let aggregated_risk_result = result
            .aggregated_risk_result()
            .map(serde_json::to_string)
            .transpose()?;

        Ok(Self {
            id,
            calculated_at: result.calculated_at(),
            risk_level: result.risk_level(),
            aggregated_risk_result,
            matched_key_count: result.matched_key_count(),
            days_since_last_exposure: result.days_since_last_exposure(),
        })
    }

    /// Decode back into a domain result (without exposure windows).
    ///
    /// # Errors
    /// Returns [`Error::Parse`] if the stored aggregate is not valid JSON.
    pub fn to_result(&self) -> Result<RiskLevelResult> {
        let mut result = RiskLevelResult::new(self.risk_level, self.calculated_at)
            .with_counts(self.matched_key_count, self.days_since_last_exposure);

        if let Some(json) = &self.aggregated_risk_result {
            let aggregated: AggregatedRiskResult = serde_json::from_str(json).map_err(|e| {
                Error::Parse(format!("result {}: bad aggregated result: {e}", self.id))
            })?;
            result = result.with_aggregated_risk_result(aggregated);
        }

        Ok(result)
    }
}

/// Durable exposure-window row tied to its parent result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedWindow {
    pub result_id: ResultId,
    pub window: ExposureWindow,
}
