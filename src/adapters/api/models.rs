//! Snapshot endpoint wire models

use crate::domain::{PatientId, PatientSeed, PulsegridError, Result, Sample};
use chrono::Utc;
use serde::Deserialize;

/// One patient row as delivered by the snapshot endpoint
///
/// Only the identifier is required; every vital is optional so the endpoint
/// can serve patients that have not reported yet. Unknown fields (status
/// strings, respiratory rate, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRow {
    /// Stable patient identifier, e.g. `PAC001`
    pub patient_id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub age: Option<u8>,

    #[serde(default)]
    pub hr: Option<u16>,

    #[serde(default)]
    pub spo2: Option<u8>,

    #[serde(default)]
    pub sys: Option<u16>,

    #[serde(default)]
    pub dia: Option<u16>,

    #[serde(default)]
    pub temp: Option<f64>,

    /// Instant of the latest reading, epoch milliseconds
    #[serde(default)]
    pub last_update: Option<i64>,
}

impl SnapshotRow {
    /// Converts the wire row into an authoritative store seed
    ///
    /// A row carrying any vital yields a one-sample history; a row without
    /// vitals seeds an empty window.
    ///
    /// # Errors
    ///
    /// Returns [`PulsegridError::Validation`] for an empty identifier.
    pub fn into_seed(self) -> Result<PatientSeed> {
        let id = PatientId::new(self.patient_id).map_err(PulsegridError::Validation)?;

        let latest = Sample {
            timestamp_ms: self
                .last_update
                .unwrap_or_else(|| Utc::now().timestamp_millis()),
            hr: self.hr,
            spo2: self.spo2,
            sys: self.sys,
            dia: self.dia,
            temp: self.temp,
        };

        Ok(PatientSeed {
            id,
            display_name: self.display_name,
            age: self.age,
            history: if latest.is_empty() { vec![] } else { vec![latest] },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_with_vitals_seeds_one_sample() {
        let row: SnapshotRow = serde_json::from_str(
            r#"{"patientId":"PAC002","displayName":"Maria Santos","age":59,
                "hr":120,"spo2":96,"sys":130,"dia":85,"temp":37.2,"lastUpdate":1000}"#,
        )
        .unwrap();

        let seed = row.into_seed().unwrap();
        assert_eq!(seed.id.as_str(), "PAC002");
        assert_eq!(seed.history.len(), 1);
        assert_eq!(seed.history[0].hr, Some(120));
        assert_eq!(seed.history[0].timestamp_ms, 1000);
    }

    #[test]
    fn test_row_without_vitals_seeds_empty_history() {
        let row: SnapshotRow =
            serde_json::from_str(r#"{"patientId":"PAC009"}"#).unwrap();
        let seed = row.into_seed().unwrap();
        assert!(seed.history.is_empty());
    }

    #[test]
    fn test_row_ignores_unknown_fields() {
        let row: SnapshotRow = serde_json::from_str(
            r#"{"patientId":"PAC001","hr":78,"status":"NORMAL","respiratoryRate":16}"#,
        )
        .unwrap();
        assert_eq!(row.hr, Some(78));
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let row: SnapshotRow = serde_json::from_str(r#"{"patientId":"  "}"#).unwrap();
        assert!(row.into_seed().is_err());
    }
}
