//! Risk level results and their aggregated breakdown.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::window::ExposureWindow;

/// Categorical outcome of a risk computation.
///
/// Raw codes are stable; they are what older app versions persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Undetermined,
    NoCalculationPossibleTracingOff,
    Low,
    Increased,
    UnknownRiskOutdatedResults,
    UnknownRiskInitial,
    UnknownRiskOutdatedResultsManual,
}

impl RiskLevel {
    /// Stable numeric code of this level.
    #[must_use]
    pub const fn raw(self) -> i32 {
        match self {
            Self::Undetermined => 0,
            Self::NoCalculationPossibleTracingOff => 1,
            Self::Low => 2,
            Self::Increased => 3,
            Self::UnknownRiskOutdatedResults => 4,
            Self::UnknownRiskInitial => 5,
            Self::UnknownRiskOutdatedResultsManual => 6,
        }
    }

    /// Decode a stored code. Unknown codes decode as [`RiskLevel::Undetermined`].
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::NoCalculationPossibleTracingOff,
            2 => Self::Low,
            3 => Self::Increased,
            4 => Self::UnknownRiskOutdatedResults,
            5 => Self::UnknownRiskInitial,
            6 => Self::UnknownRiskOutdatedResultsManual,
            _ => Self::Undetermined,
        }
    }

    /// Whether this level came out of a completed calculation.
    #[must_use]
    pub const fn is_successful(self) -> bool {
        matches!(self, Self::Low | Self::Increased)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Undetermined => "UNDETERMINED",
            Self::NoCalculationPossibleTracingOff => "NO_CALCULATION_POSSIBLE_TRACING_OFF",
            Self::Low => "LOW_LEVEL_RISK",
            Self::Increased => "INCREASED_RISK",
            Self::UnknownRiskOutdatedResults => "UNKNOWN_RISK_OUTDATED_RESULTS",
            Self::UnknownRiskInitial => "UNKNOWN_RISK_INITIAL",
            Self::UnknownRiskOutdatedResultsManual => "UNKNOWN_RISK_OUTDATED_RESULTS_MANUAL",
        };
        f.write_str(name)
    }
}

/// Risk classification used inside the aggregated breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregatedRiskLevel {
    #[default]
    Unspecified,
    Low,
    High,
}

impl fmt::Display for AggregatedRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::Low => "LOW",
            Self::High => "HIGH",
        };
        f.write_str(name)
    }
}

/// Per-day and per-encounter subtotals backing a single risk level.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregatedRiskResult {
    pub total_risk_level: AggregatedRiskLevel,
    pub total_minimum_distinct_encounters_with_high_risk: u32,
    pub total_minimum_distinct_encounters_with_low_risk: u32,
    pub most_recent_date_with_high_risk: Option<DateTime<Utc>>,
    pub most_recent_date_with_low_risk: Option<DateTime<Utc>>,
    pub number_of_days_with_high_risk: u32,
    pub number_of_days_with_low_risk: u32,
}

fn display_date(date: Option<DateTime<Utc>>) -> String {
    date.map_or_else(|| "null".to_string(), |d| d.to_rfc3339())
}

impl fmt::Display for AggregatedRiskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total RiskLevel: {}", self.total_risk_level)?;
        writeln!(
            f,
            "Total Minimum Distinct Encounters With High Risk: {}",
            self.total_minimum_distinct_encounters_with_high_risk
        )?;
        writeln!(
            f,
            "Total Minimum Distinct Encounters With Low Risk: {}",
            self.total_minimum_distinct_encounters_with_low_risk
        )?;
        writeln!(
            f,
            "Most Recent Date With High Risk: {}",
            display_date(self.most_recent_date_with_high_risk)
        )?;
        writeln!(
            f,
            "Most Recent Date With Low Risk: {}",
            display_date(self.most_recent_date_with_low_risk)
        )?;
        writeln!(
            f,
            "Number of Days With High Risk: {}",
            self.number_of_days_with_high_risk
        )?;
        writeln!(
            f,
            "Number of Days With Low Risk: {}",
            self.number_of_days_with_low_risk
        )
    }
}

/// Output of one risk computation.
///
/// Fields are private; a result never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLevelResult {
    calculated_at: DateTime<Utc>,
    risk_level: RiskLevel,
    #[serde(default)]
    aggregated_risk_result: Option<AggregatedRiskResult>,
    #[serde(default)]
    exposure_windows: Option<Vec<ExposureWindow>>,
    #[serde(default)]
    matched_key_count: u32,
    #[serde(default)]
    days_since_last_exposure: u32,
}

impl RiskLevelResult {
    /// Create a result without aggregate or windows.
    #[must_use]
    pub fn new(risk_level: RiskLevel, calculated_at: DateTime<Utc>) -> Self {
        Self {
            calculated_at,
            risk_level,
            aggregated_risk_result: None,
            exposure_windows: None,
            matched_key_count: 0,
            days_since_last_exposure: 0,
        }
    }

    /// Attach the aggregated breakdown.
    #[must_use]
    pub fn with_aggregated_risk_result(mut self, aggregated: AggregatedRiskResult) -> Self {
        self.aggregated_risk_result = Some(aggregated);
        self
    }

    /// Attach the exposure windows the computation consumed.
    #[must_use]
    pub fn with_exposure_windows(mut self, windows: Vec<ExposureWindow>) -> Self {
        self.exposure_windows = Some(windows);
        self
    }

    /// Set matched key and days-since-exposure counters.
    #[must_use]
    pub fn with_counts(mut self, matched_key_count: u32, days_since_last_exposure: u32) -> Self {
        self.matched_key_count = matched_key_count;
        self.days_since_last_exposure = days_since_last_exposure;
        self
    }

    /// Sentinel reported when nothing has been calculated yet.
    #[must_use]
    pub fn initial() -> Self {
        Self::new(RiskLevel::Low, DateTime::<Utc>::UNIX_EPOCH)
    }

    #[must_use]
    pub fn calculated_at(&self) -> DateTime<Utc> {
        self.calculated_at
    }

    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    #[must_use]
    pub fn aggregated_risk_result(&self) -> Option<&AggregatedRiskResult> {
        self.aggregated_risk_result.as_ref()
    }

    #[must_use]
    pub fn exposure_windows(&self) -> Option<&[ExposureWindow]> {
        self.exposure_windows.as_deref()
    }

    #[must_use]
    pub fn matched_key_count(&self) -> u32 {
        self.matched_key_count
    }

    #[must_use]
    pub fn days_since_last_exposure(&self) -> u32 {
        self.days_since_last_exposure
    }

    #[must_use]
    pub fn is_increased_risk(&self) -> bool {
        self.risk_level == RiskLevel::Increased
    }
}

/// Newest result, or the initial sentinel for an empty set.
#[must_use]
pub fn latest_or_initial(results: &[RiskLevelResult]) -> RiskLevelResult {
    results
        .iter()
        .max_by_key(|r| r.calculated_at())
        .cloned()
        .unwrap_or_else(RiskLevelResult::initial)
}

/// Newest result plus newest successful result of a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestResults {
    pub latest: RiskLevelResult,
    pub latest_successful: RiskLevelResult,
}

impl LatestResults {
    /// Split a result set into latest and latest-successful, defaulting both
    /// to the initial sentinel.
    #[must_use]
    pub fn from_results(results: &[RiskLevelResult]) -> Self {
        let latest_successful = results
            .iter()
            .filter(|r| r.risk_level().is_successful())
            .max_by_key(|r| r.calculated_at())
            .cloned()
            .unwrap_or_else(RiskLevelResult::initial);

        Self {
            latest: latest_or_initial(results),
            latest_successful,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn raw_codes_roundtrip_and_unknown_is_undetermined() {
        for level in [
            RiskLevel::Undetermined,
            RiskLevel::Low,
            RiskLevel::Increased,
            RiskLevel::UnknownRiskInitial,
        ] {
            assert_eq!(RiskLevel::from_raw(level.raw()), level);
        }
        assert_eq!(RiskLevel::from_raw(42), RiskLevel::Undetermined);
    }

    #[test]
    fn increased_risk_follows_level() {
        assert!(RiskLevelResult::new(RiskLevel::Increased, at(1)).is_increased_risk());
        assert!(!RiskLevelResult::new(RiskLevel::Low, at(1)).is_increased_risk());
    }

    #[test]
    fn initial_sentinel_is_low_at_epoch() {
        let initial = RiskLevelResult::initial();
        assert_eq!(initial.risk_level(), RiskLevel::Low);
        assert_eq!(initial.calculated_at().timestamp(), 0);
        assert_eq!(initial.matched_key_count(), 0);
        assert_eq!(initial.days_since_last_exposure(), 0);
        assert!(initial.aggregated_risk_result().is_none());
        assert!(initial.exposure_windows().is_none());
    }

    #[test]
    fn latest_or_initial_picks_max_calculated_at() {
        let results = vec![
            RiskLevelResult::new(RiskLevel::Low, at(5)),
            RiskLevelResult::new(RiskLevel::Increased, at(9)),
            RiskLevelResult::new(RiskLevel::Low, at(7)),
        ];
        assert_eq!(latest_or_initial(&results).calculated_at(), at(9));
        assert_eq!(latest_or_initial(&[]), RiskLevelResult::initial());
    }

    #[test]
    fn latest_successful_skips_failed_calculations() {
        let results = vec![
            RiskLevelResult::new(RiskLevel::Increased, at(5)),
            RiskLevelResult::new(RiskLevel::NoCalculationPossibleTracingOff, at(9)),
        ];
        let latest = LatestResults::from_results(&results);
        assert_eq!(
            latest.latest.risk_level(),
            RiskLevel::NoCalculationPossibleTracingOff
        );
        assert_eq!(latest.latest_successful.risk_level(), RiskLevel::Increased);
    }

    #[test]
    fn aggregated_result_renders_readable_lines() {
        let aggregated = AggregatedRiskResult {
            total_risk_level: AggregatedRiskLevel::High,
            number_of_days_with_high_risk: 2,
            ..Default::default()
        };
        let text = aggregated.to_string();
        assert!(text.contains("Total RiskLevel: HIGH"));
        assert!(text.contains("Number of Days With High Risk: 2"));
        assert_eq!(text.lines().count(), 7);
    }
}
