//! Exposure windows handed over by the scoring engine.
//!
//! The crate never interprets these beyond storing and listing them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Infectiousness assigned to a diagnosis key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Infectiousness {
    #[default]
    None,
    Standard,
    High,
}

impl Infectiousness {
    #[must_use]
    pub const fn raw(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Standard => 1,
            Self::High => 2,
        }
    }

    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Standard,
            2 => Self::High,
            _ => Self::None,
        }
    }
}

/// Diagnosis report type attached to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[default]
    Unknown,
    ConfirmedTest,
    ConfirmedClinicalDiagnosis,
    SelfReport,
    Recursive,
    Revoked,
}

impl ReportType {
    #[must_use]
    pub const fn raw(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::ConfirmedTest => 1,
            Self::ConfirmedClinicalDiagnosis => 2,
            Self::SelfReport => 3,
            Self::Recursive => 4,
            Self::Revoked => 5,
        }
    }

    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::ConfirmedTest,
            2 => Self::ConfirmedClinicalDiagnosis,
            3 => Self::SelfReport,
            4 => Self::Recursive,
            5 => Self::Revoked,
            _ => Self::Unknown,
        }
    }
}

/// Single Bluetooth scan within a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanInstance {
    pub min_attenuation_db: u8,
    pub typical_attenuation_db: u8,
    pub seconds_since_last_scan: u32,
}

/// Bounded time segment of proximity-scan data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureWindow {
    pub date: DateTime<Utc>,
    pub calibration_confidence: u8,
    pub infectiousness: Infectiousness,
    pub report_type: ReportType,
    #[serde(default)]
    pub scan_instances: Vec<ScanInstance>,
}

impl ExposureWindow {
    /// Total scan time covered by this window.
    #[must_use]
    pub fn scanned_seconds(&self) -> u64 {
        self.scan_instances
            .iter()
            .map(|s| u64::from(s.seconds_since_last_scan))
            .sum()
    }
}

impl fmt::Display for ExposureWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExposureWindow(date={}, reportType={:?}, infectiousness={:?}, calibrationConfidence={}, scanInstances={})",
            self.date.date_naive(),
            self.report_type,
            self.infectiousness,
            self.calibration_confidence,
            self.scan_instances.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_codes_decode_unknown_to_default() {
        assert_eq!(Infectiousness::from_raw(Infectiousness::High.raw()), Infectiousness::High);
        assert_eq!(Infectiousness::from_raw(99), Infectiousness::None);
        assert_eq!(ReportType::from_raw(ReportType::Revoked.raw()), ReportType::Revoked);
        assert_eq!(ReportType::from_raw(-1), ReportType::Unknown);
    }

    #[test]
    fn scanned_seconds_sums_instances() {
        let window = ExposureWindow {
            date: Utc::now(),
            calibration_confidence: 1,
            infectiousness: Infectiousness::Standard,
            report_type: ReportType::ConfirmedTest,
            scan_instances: vec![
                ScanInstance {
                    min_attenuation_db: 30,
                    typical_attenuation_db: 35,
                    seconds_since_last_scan: 180,
                },
                ScanInstance {
                    min_attenuation_db: 40,
                    typical_attenuation_db: 45,
                    seconds_since_last_scan: 300,
                },
            ],
        };
        assert_eq!(window.scanned_seconds(), 480);
    }
}
