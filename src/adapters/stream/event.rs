//! Stream event parsing
//!
//! Maps decoded SSE frames onto engine events. Unknown event names are
//! ignored so the server can add event types without breaking deployed
//! clients; undecodable payloads surface as [`StreamError::Decode`] for the
//! client to count and drop.

use super::decoder::SseFrame;
use crate::domain::{StreamError, VitalsUpdate};

/// A stream event the engine reacts to
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// Partial vitals update to merge into patient state
    PatientUpdate(VitalsUpdate),
    /// Liveness signal; resets the idle timer, carries no data
    Heartbeat,
}

/// Interprets one SSE frame
///
/// Returns `Ok(None)` for frames the engine does not care about (unknown
/// event names, unnamed frames).
///
/// # Errors
///
/// Returns [`StreamError::Decode`] when a `patient-update` payload is not
/// valid JSON or does not match the update schema.
pub fn parse_event(frame: &SseFrame) -> Result<Option<StreamEvent>, StreamError> {
    match frame.event.as_deref() {
        Some("patient-update") => {
            let update: VitalsUpdate = serde_json::from_str(&frame.data)
                .map_err(|e| StreamError::Decode(format!("patient-update: {e}")))?;
            Ok(Some(StreamEvent::PatientUpdate(update)))
        }
        Some("heartbeat") => Ok(Some(StreamEvent::Heartbeat)),
        Some(other) => {
            tracing::debug!(event = other, "Ignoring unknown stream event");
            Ok(None)
        }
        None => Ok(None),
    }
}
