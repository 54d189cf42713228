//! Risk-scoring configuration as delivered by the config provider.
//!
//! Values arrive already parsed; this module only defines their shape and
//! value equality.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::risk::AggregatedRiskLevel;
use super::window::{Infectiousness, ReportType};

/// Numeric interval with optional exclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub min_exclusive: bool,
    #[serde(default)]
    pub max_exclusive: bool,
}

/// Drops windows whose minutes at an attenuation range fall in `drop_if_minutes_in_range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinutesAtAttenuationFilter {
    pub attenuation_range: Range,
    pub drop_if_minutes_in_range: Range,
}

/// Weight applied to minutes spent in an attenuation range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinutesAtAttenuationWeight {
    pub attenuation_range: Range,
    pub weight: f64,
}

/// Maps infectiousness and report type to a transmission risk level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransmissionRiskLevelEncoding {
    pub infectiousness_offset_standard: i32,
    pub infectiousness_offset_high: i32,
    pub report_type_offset_recursive: i32,
    pub report_type_offset_self_report: i32,
    pub report_type_offset_confirmed_clinical_diagnosis: i32,
    pub report_type_offset_confirmed_test: i32,
}

/// Drops windows whose transmission risk level falls in `drop_if_trl_in_range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionRiskLevelFilter {
    pub drop_if_trl_in_range: Range,
}

/// Maps normalized exposure time to a risk level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTimeToRiskLevelMapping {
    pub normalized_time_range: Range,
    pub risk_level: AggregatedRiskLevel,
}

/// Mapping from raw key metadata to values the scoring engine understands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiagnosisKeysDataMapping {
    pub days_since_onset_to_infectiousness: BTreeMap<i32, Infectiousness>,
    pub report_type_when_missing: ReportType,
    pub infectiousness_when_days_since_onset_missing: Infectiousness,
}

/// One parsed configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigData {
    /// Identifier of this configuration revision.
    pub identifier: String,
    pub transmission_risk_level_multiplier: f64,
    #[serde(default)]
    pub minutes_at_attenuation_filters: Vec<MinutesAtAttenuationFilter>,
    #[serde(default)]
    pub minutes_at_attenuation_weights: Vec<MinutesAtAttenuationWeight>,
    #[serde(default)]
    pub transmission_risk_level_encoding: TransmissionRiskLevelEncoding,
    #[serde(default)]
    pub transmission_risk_level_filters: Vec<TransmissionRiskLevelFilter>,
    #[serde(default)]
    pub normalized_time_per_exposure_window_to_risk_level_mapping:
        Vec<NormalizedTimeToRiskLevelMapping>,
    #[serde(default)]
    pub normalized_time_per_day_to_risk_level_mapping: Vec<NormalizedTimeToRiskLevelMapping>,
    #[serde(default)]
    pub diagnosis_keys_data_mapping: DiagnosisKeysDataMapping,
}

impl ConfigData {
    /// Configuration with the given identifier and neutral scoring parameters.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            transmission_risk_level_multiplier: 1.0,
            minutes_at_attenuation_filters: Vec::new(),
            minutes_at_attenuation_weights: Vec::new(),
            transmission_risk_level_encoding: TransmissionRiskLevelEncoding::default(),
            transmission_risk_level_filters: Vec::new(),
            normalized_time_per_exposure_window_to_risk_level_mapping: Vec::new(),
            normalized_time_per_day_to_risk_level_mapping: Vec::new(),
            diagnosis_keys_data_mapping: DiagnosisKeysDataMapping::default(),
        }
    }

    /// Replace the diagnosis keys data mapping.
    #[must_use]
    pub fn with_diagnosis_keys_data_mapping(mut self, mapping: DiagnosisKeysDataMapping) -> Self {
        self.diagnosis_keys_data_mapping = mapping;
        self
    }
}
