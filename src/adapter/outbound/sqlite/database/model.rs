//! Database model types for Diesel ORM.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{exposure_windows, risk_results};
use crate::domain::{
    ExposureWindow, Infectiousness, PersistedResult, PersistedWindow, ReportType, ResultId,
    RiskLevel, ScanInstance,
};
use crate::error::{Error, Result};

/// Database row for a risk result.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = risk_results)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RiskResultRow {
    pub id: String,
    /// Nanoseconds since the Unix epoch.
    pub calculated_at: i64,
    pub risk_level: i32,
    pub aggregated_result: Option<String>,
    pub matched_key_count: i64,
    pub days_since_last_exposure: i64,
}

impl RiskResultRow {
    /// # Errors
    /// Returns [`Error::Database`] if `calculated_at` cannot be stored in
    /// nanoseconds.
    pub fn from_persisted(result: &PersistedResult) -> Result<Self> {
        let calculated_at = result.calculated_at.timestamp_nanos_opt().ok_or_else(|| {
            Error::Database(format!(
                "calculated_at out of storable range: {}",
                result.calculated_at
            ))
        })?;

        Ok(Self {
            id: result.id.to_string(),
            calculated_at,
            risk_level: result.risk_level.raw(),
            aggregated_result: result.aggregated_risk_result.clone(),
            matched_key_count: i64::from(result.matched_key_count),
            days_since_last_exposure: i64::from(result.days_since_last_exposure),
        })
    }

    /// # Errors
    /// Returns [`Error::Parse`] if a counter does not fit its domain type.
    pub fn into_persisted(self) -> Result<PersistedResult> {
        Ok(PersistedResult {
            calculated_at: DateTime::from_timestamp_nanos(self.calculated_at),
            risk_level: RiskLevel::from_raw(self.risk_level),
            aggregated_risk_result: self.aggregated_result,
            matched_key_count: column_value(&self.id, "matched_key_count", self.matched_key_count)?,
            days_since_last_exposure: column_value(
                &self.id,
                "days_since_last_exposure",
                self.days_since_last_exposure,
            )?,
            id: ResultId::from(self.id),
        })
    }
}

/// Database row for an exposure window (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = exposure_windows)]
pub struct NewExposureWindowRow {
    pub risk_result_id: String,
    pub date_millis: i64,
    pub calibration_confidence: i32,
    pub infectiousness: i32,
    pub report_type: i32,
    pub scan_instances: String,
}

impl NewExposureWindowRow {
    /// # Errors
    /// Returns an error if the scan instances cannot be serialized.
    pub fn from_window(result_id: &ResultId, window: &ExposureWindow) -> Result<Self> {
        Ok(Self {
            risk_result_id: result_id.to_string(),
            date_millis: window.date.timestamp_millis(),
            calibration_confidence: i32::from(window.calibration_confidence),
            infectiousness: window.infectiousness.raw(),
            report_type: window.report_type.raw(),
            scan_instances: serde_json::to_string(&window.scan_instances)?,
        })
    }
}

/// Database row for an exposure window (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = exposure_windows)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExposureWindowRow {
    pub id: i32,
    pub risk_result_id: String,
    pub date_millis: i64,
    pub calibration_confidence: i32,
    pub infectiousness: i32,
    pub report_type: i32,
    pub scan_instances: String,
}

impl ExposureWindowRow {
    /// # Errors
    /// Returns [`Error::Parse`] if the timestamp or scan instances are invalid.
    pub fn into_persisted(self) -> Result<PersistedWindow> {
        let scan_instances: Vec<ScanInstance> = serde_json::from_str(&self.scan_instances)
            .map_err(|e| Error::Parse(format!("window {}: {e}", self.id)))?;

        Ok(PersistedWindow {
            result_id: ResultId::from(self.risk_result_id),
            window: ExposureWindow {
                date: from_millis(self.date_millis)?,
                calibration_confidence: column_value(
                    &self.id.to_string(),
                    "calibration_confidence",
                    self.calibration_confidence,
                )?,
                infectiousness: Infectiousness::from_raw(self.infectiousness),
                report_type: ReportType::from_raw(self.report_type),
                scan_instances,
            },
        })
    }
}

fn column_value<S, T>(row: &str, column: &str, value: S) -> Result<T>
where
    S: Copy + std::fmt::Display,
    T: TryFrom<S>,
{
    T::try_from(value)
        .map_err(|_| Error::Parse(format!("row {row}: {column} out of range: {value}")))
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| Error::Parse(format!("timestamp out of range: {millis}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn persisted(calculated_at: DateTime<Utc>, matched_key_count: u32) -> PersistedResult {
        PersistedResult {
            id: ResultId::from("r1"),
            calculated_at,
            risk_level: RiskLevel::Increased,
            aggregated_risk_result: None,
            matched_key_count,
            days_since_last_exposure: 1,
        }
    }

    #[test]
    fn result_row_keeps_nanosecond_precision() {
        let calculated_at = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let persisted = persisted(calculated_at, u32::MAX);

        let row = RiskResultRow::from_persisted(&persisted).unwrap();
        assert_eq!(row.risk_level, 3);
        assert_eq!(row.calculated_at, 1_700_000_000_123_456_789);
        assert_eq!(row.into_persisted().unwrap(), persisted);
    }

    #[test]
    fn timestamp_beyond_nanosecond_range_is_rejected() {
        let calculated_at = Utc.with_ymd_and_hms(2300, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            RiskResultRow::from_persisted(&persisted(calculated_at, 0)),
            Err(Error::Database(_))
        ));
    }

    #[test]
    fn negative_counter_is_a_parse_error() {
        let row = RiskResultRow {
            id: "r1".into(),
            calculated_at: 0,
            risk_level: 2,
            aggregated_result: None,
            matched_key_count: -1,
            days_since_last_exposure: 0,
        };
        assert!(matches!(row.into_persisted(), Err(Error::Parse(_))));
    }

    #[test]
    fn window_row_rejects_corrupt_scan_instances() {
        let row = ExposureWindowRow {
            id: 7,
            risk_result_id: "r1".into(),
            date_millis: 0,
            calibration_confidence: 1,
            infectiousness: 1,
            report_type: 1,
            scan_instances: "[{".into(),
        };
        assert!(matches!(row.into_persisted(), Err(Error::Parse(_))));
    }
}
