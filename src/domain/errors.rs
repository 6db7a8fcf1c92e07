//! Domain error types
//!
//! This module defines the error hierarchy for Pulsegrid. All errors are
//! domain-specific and don't expose third-party types. Data-level errors
//! (validation, decode) are handled locally by the component that raises
//! them; connection-level errors drive the stream client's reconnect state
//! machine and only surface to the consumer once retries are exhausted.

use thiserror::Error;

/// Main Pulsegrid error type
///
/// This is the primary error type used throughout the engine.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum PulsegridError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed or out-of-range sample data, rejected before mutating state
    #[error("Validation error: {0}")]
    Validation(String),

    /// Query for an unknown patient identifier
    #[error("Patient not found: {0}")]
    NotFound(String),

    /// Stream transport errors
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    /// Snapshot endpoint errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Stream transport errors
///
/// Errors raised by the server-push stream client. Apart from
/// [`StreamError::Unavailable`], none of these abort the stream: decode
/// errors are counted and dropped, connection errors trigger reconnection.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Failed to establish the stream connection
    #[error("Failed to connect to stream endpoint: {0}")]
    ConnectionFailed(String),

    /// Credential rejected at connection open
    #[error("Stream authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Server responded with an unexpected status or content type
    #[error("Invalid stream response: {0}")]
    InvalidResponse(String),

    /// Unparseable event payload; the event is dropped, the connection stays open
    #[error("Failed to decode stream event: {0}")]
    Decode(String),

    /// No event (including heartbeat) within the idle window
    #[error("Stream idle for {seconds}s, treating connection as dead")]
    IdleTimeout { seconds: u64 },

    /// Reconnect ceiling exhausted; surfaced to the consumer layer
    #[error("Stream unavailable after {attempts} reconnect attempts")]
    Unavailable { attempts: u32 },
}

/// Snapshot endpoint errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Failed to reach the snapshot endpoint
    #[error("Failed to connect to snapshot endpoint: {0}")]
    ConnectionFailed(String),

    /// Credential rejected
    #[error("Snapshot authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Response body did not match the expected schema
    #[error("Invalid snapshot payload: {0}")]
    InvalidPayload(String),

    /// Request timeout
    #[error("Snapshot request timeout: {0}")]
    Timeout(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for PulsegridError {
    fn from(err: std::io::Error) -> Self {
        PulsegridError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PulsegridError {
    fn from(err: serde_json::Error) -> Self {
        PulsegridError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PulsegridError {
    fn from(err: toml::de::Error) -> Self {
        PulsegridError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulsegrid_error_display() {
        let err = PulsegridError::Validation("hr out of range".to_string());
        assert_eq!(err.to_string(), "Validation error: hr out of range");
    }

    #[test]
    fn test_stream_error_conversion() {
        let stream_err = StreamError::ConnectionFailed("network error".to_string());
        let err: PulsegridError = stream_err.into();
        assert!(matches!(err, PulsegridError::Stream(_)));
    }

    #[test]
    fn test_snapshot_error_conversion() {
        let snap_err = SnapshotError::ClientError {
            status: 404,
            message: "not found".to_string(),
        };
        let err: PulsegridError = snap_err.into();
        assert!(matches!(err, PulsegridError::Snapshot(_)));
    }

    #[test]
    fn test_idle_timeout_display() {
        let err = StreamError::IdleTimeout { seconds: 60 };
        assert_eq!(
            err.to_string(),
            "Stream idle for 60s, treating connection as dead"
        );
    }

    #[test]
    fn test_unavailable_display() {
        let err = StreamError::Unavailable { attempts: 10 };
        assert_eq!(
            err.to_string(),
            "Stream unavailable after 10 reconnect attempts"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PulsegridError = io_err.into();
        assert!(matches!(err, PulsegridError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PulsegridError = json_err.into();
        assert!(matches!(err, PulsegridError::Serialization(_)));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = PulsegridError::NotFound("PAC001".to_string());
        let _: &dyn std::error::Error = &err;
        let err = StreamError::Decode("bad payload".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
