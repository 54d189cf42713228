//! Builders for domain values used across tests.
//!
//! Timestamps are plain seconds since the epoch so assertions can compare
//! `calculated_at().timestamp()` directly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{
    DiagnosisKeysDataMapping, ExposureWindow, Infectiousness, ReportType, RiskLevel,
    RiskLevelResult, ScanInstance,
};

/// UTC instant `secs` seconds after the epoch.
pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Low-risk result calculated at `secs`.
pub fn result_at(secs: i64) -> RiskLevelResult {
    RiskLevelResult::new(RiskLevel::Low, at(secs))
}

/// Increased-risk result at `secs` carrying `count` exposure windows.
pub fn result_with_windows(secs: i64, count: usize) -> RiskLevelResult {
    let windows = (0..count).map(|i| window(secs + i as i64)).collect();
    RiskLevelResult::new(RiskLevel::Increased, at(secs))
        .with_counts(count as u32, 1)
        .with_exposure_windows(windows)
}

/// Exposure window on day `day` with a single scan instance.
pub fn window(day: i64) -> ExposureWindow {
    ExposureWindow {
        date: at(day * 86_400),
        calibration_confidence: 1,
        infectiousness: Infectiousness::Standard,
        report_type: ReportType::ConfirmedTest,
        scan_instances: vec![ScanInstance {
            min_attenuation_db: 30,
            typical_attenuation_db: 35,
            seconds_since_last_scan: 300,
        }],
    }
}

/// Mapping that differs from the default for every `report_type_when_missing`.
pub fn mapping(report_type_when_missing: ReportType) -> DiagnosisKeysDataMapping {
    DiagnosisKeysDataMapping {
        days_since_onset_to_infectiousness: BTreeMap::from([
            (0, Infectiousness::High),
            (1, Infectiousness::Standard),
        ]),
        report_type_when_missing,
        infectiousness_when_days_since_onset_missing: Infectiousness::Standard,
    }
}
