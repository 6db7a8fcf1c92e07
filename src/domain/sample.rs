//! Vital-sign sample types
//!
//! A [`Sample`] is one timestamped set of vital-sign readings for a patient.
//! A [`VitalsUpdate`] is an incoming partial update carrying any subset of
//! the vitals fields; it merges onto the previous latest sample so that
//! missing fields inherit prior values and never reset them.

use crate::domain::ids::PatientId;
use crate::domain::{PulsegridError, Result};
use serde::{Deserialize, Serialize};

/// Plausibility bounds for incoming vitals, checked before any state mutation.
/// These are deliberately wide: they reject corrupt data, not abnormal
/// readings (the alert thresholds handle the clinical side).
pub const HR_RANGE: (u16, u16) = (20, 300);
/// Valid SpO2 range (percent)
pub const SPO2_RANGE: (u8, u8) = (0, 100);
/// Valid systolic pressure range (mmHg)
pub const SYS_RANGE: (u16, u16) = (40, 300);
/// Valid diastolic pressure range (mmHg)
pub const DIA_RANGE: (u16, u16) = (20, 200);
/// Valid temperature range (°C)
pub const TEMP_RANGE: (f64, f64) = (30.0, 45.0);

/// One timestamped observation of a patient's vital signs
///
/// All vitals fields are independently optional: a sample materialized from
/// a partial update carries only the fields observed so far. Timestamps are
/// epoch milliseconds (wall clock at ingestion).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Observation instant, epoch milliseconds
    #[serde(rename = "t")]
    pub timestamp_ms: i64,

    /// Heart rate, beats per minute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hr: Option<u16>,

    /// Peripheral oxygen saturation, percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spo2: Option<u8>,

    /// Systolic blood pressure, mmHg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sys: Option<u16>,

    /// Diastolic blood pressure, mmHg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dia: Option<u16>,

    /// Body temperature, °C, one fractional digit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
}

impl Sample {
    /// Creates an empty sample at the given instant
    pub fn at(timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            hr: None,
            spo2: None,
            sys: None,
            dia: None,
            temp: None,
        }
    }

    /// True if no vitals field is set
    pub fn is_empty(&self) -> bool {
        self.hr.is_none()
            && self.spo2.is_none()
            && self.sys.is_none()
            && self.dia.is_none()
            && self.temp.is_none()
    }
}

/// A partial vitals update for one patient
///
/// This is the wire shape of a `patient-update` stream event: the patient
/// identifier plus any subset of the vitals fields. Unknown fields are
/// ignored so the schema can grow without breaking older clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsUpdate {
    /// Target patient identifier
    pub patient_id: PatientId,

    /// Observation instant, epoch milliseconds; ingestion time when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<i64>,

    /// Heart rate, beats per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr: Option<u16>,

    /// Peripheral oxygen saturation, percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spo2: Option<u8>,

    /// Systolic blood pressure, mmHg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys: Option<u16>,

    /// Diastolic blood pressure, mmHg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dia: Option<u16>,

    /// Body temperature, °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
}

impl VitalsUpdate {
    /// Creates an update carrying every field of a fully materialized sample
    ///
    /// Used by the demo feed to route generated samples through the same
    /// merge path as remote updates.
    pub fn from_sample(patient_id: PatientId, sample: &Sample) -> Self {
        Self {
            patient_id,
            t: Some(sample.timestamp_ms),
            hr: sample.hr,
            spo2: sample.spo2,
            sys: sample.sys,
            dia: sample.dia,
            temp: sample.temp,
        }
    }

    /// Validates every present field against its plausibility range
    ///
    /// # Errors
    ///
    /// Returns [`PulsegridError::Validation`] naming the offending field.
    /// The caller must not have mutated any state before calling this.
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = self.t {
            if t < 0 {
                return Err(PulsegridError::Validation(format!(
                    "timestamp must be non-negative, got {t}"
                )));
            }
        }
        if let Some(hr) = self.hr {
            check_range("hr", u32::from(hr), HR_RANGE.0.into(), HR_RANGE.1.into())?;
        }
        if let Some(spo2) = self.spo2 {
            check_range(
                "spo2",
                u32::from(spo2),
                SPO2_RANGE.0.into(),
                SPO2_RANGE.1.into(),
            )?;
        }
        if let Some(sys) = self.sys {
            check_range("sys", u32::from(sys), SYS_RANGE.0.into(), SYS_RANGE.1.into())?;
        }
        if let Some(dia) = self.dia {
            check_range("dia", u32::from(dia), DIA_RANGE.0.into(), DIA_RANGE.1.into())?;
        }
        if let Some(temp) = self.temp {
            if !temp.is_finite() || temp < TEMP_RANGE.0 || temp > TEMP_RANGE.1 {
                return Err(PulsegridError::Validation(format!(
                    "temp out of range [{}, {}]: {temp}",
                    TEMP_RANGE.0, TEMP_RANGE.1
                )));
            }
        }
        Ok(())
    }

    /// Materializes the full sample this update produces
    ///
    /// Present fields override; missing fields inherit from the prior latest
    /// sample, or remain unset when there is no prior sample. The timestamp
    /// falls back to `now_ms` when the update carries none.
    pub fn merged_onto(&self, prev: Option<&Sample>, now_ms: i64) -> Sample {
        Sample {
            timestamp_ms: self.t.unwrap_or(now_ms),
            hr: self.hr.or_else(|| prev.and_then(|p| p.hr)),
            spo2: self.spo2.or_else(|| prev.and_then(|p| p.spo2)),
            sys: self.sys.or_else(|| prev.and_then(|p| p.sys)),
            dia: self.dia.or_else(|| prev.and_then(|p| p.dia)),
            temp: self.temp.or_else(|| prev.and_then(|p| p.temp)),
        }
    }
}

fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(PulsegridError::Validation(format!(
            "{field} out of range [{min}, {max}]: {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn update(id: &str) -> VitalsUpdate {
        VitalsUpdate {
            patient_id: PatientId::from_str(id).unwrap(),
            t: None,
            hr: None,
            spo2: None,
            sys: None,
            dia: None,
            temp: None,
        }
    }

    #[test]
    fn test_merge_inherits_unset_fields() {
        let prev = Sample {
            timestamp_ms: 1_000,
            hr: Some(80),
            spo2: Some(97),
            sys: None,
            dia: None,
            temp: None,
        };
        let mut upd = update("PAC001");
        upd.hr = Some(110);

        let merged = upd.merged_onto(Some(&prev), 2_000);
        assert_eq!(merged.hr, Some(110));
        assert_eq!(merged.spo2, Some(97));
        assert_eq!(merged.timestamp_ms, 2_000);
    }

    #[test]
    fn test_merge_never_resets_prior_values() {
        let prev = Sample {
            timestamp_ms: 1_000,
            hr: Some(80),
            spo2: Some(97),
            sys: Some(120),
            dia: Some(80),
            temp: Some(36.6),
        };
        let upd = update("PAC001");

        let merged = upd.merged_onto(Some(&prev), 2_000);
        assert_eq!(merged.hr, Some(80));
        assert_eq!(merged.spo2, Some(97));
        assert_eq!(merged.sys, Some(120));
        assert_eq!(merged.dia, Some(80));
        assert_eq!(merged.temp, Some(36.6));
    }

    #[test]
    fn test_merge_without_prior_leaves_fields_unset() {
        let mut upd = update("PAC001");
        upd.spo2 = Some(95);

        let merged = upd.merged_onto(None, 5_000);
        assert_eq!(merged.spo2, Some(95));
        assert_eq!(merged.hr, None);
        assert_eq!(merged.temp, None);
        assert_eq!(merged.timestamp_ms, 5_000);
    }

    #[test]
    fn test_update_timestamp_overrides_ingestion_time() {
        let mut upd = update("PAC001");
        upd.t = Some(1_234);

        let merged = upd.merged_onto(None, 9_999);
        assert_eq!(merged.timestamp_ms, 1_234);
    }

    #[test]
    fn test_validate_accepts_plausible_values() {
        let mut upd = update("PAC001");
        upd.hr = Some(180);
        upd.spo2 = Some(88);
        upd.sys = Some(200);
        upd.dia = Some(110);
        upd.temp = Some(40.2);
        assert!(upd.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_hr() {
        let mut upd = update("PAC001");
        upd.hr = Some(10);
        let err = upd.validate().unwrap_err();
        assert!(matches!(err, PulsegridError::Validation(_)));
        assert!(err.to_string().contains("hr"));
    }

    #[test]
    fn test_validate_rejects_non_finite_temp() {
        let mut upd = update("PAC001");
        upd.temp = Some(f64::NAN);
        assert!(upd.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_timestamp() {
        let mut upd = update("PAC001");
        upd.t = Some(-1);
        assert!(upd.validate().is_err());
    }

    #[test]
    fn test_update_deserializes_partial_payload() {
        let upd: VitalsUpdate =
            serde_json::from_str(r#"{"patientId":"PAC001","hr":105}"#).unwrap();
        assert_eq!(upd.patient_id.as_str(), "PAC001");
        assert_eq!(upd.hr, Some(105));
        assert_eq!(upd.spo2, None);
        assert_eq!(upd.t, None);
    }

    #[test]
    fn test_update_ignores_unknown_fields() {
        let upd: VitalsUpdate = serde_json::from_str(
            r#"{"patientId":"PAC001","hr":90,"respiratoryRate":17,"status":"NORMAL"}"#,
        )
        .unwrap();
        assert_eq!(upd.hr, Some(90));
    }

    #[test]
    fn test_update_rejects_missing_patient_id() {
        let result = serde_json::from_str::<VitalsUpdate>(r#"{"hr":105}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_sample_is_empty() {
        assert!(Sample::at(0).is_empty());
        let mut s = Sample::at(0);
        s.hr = Some(60);
        assert!(!s.is_empty());
    }
}
