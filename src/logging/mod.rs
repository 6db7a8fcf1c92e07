//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels
//! - Console output, plus optional JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use pulsegrid::logging::init_logging;
//! use pulsegrid::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Session started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a reconnect attempt with its backoff delay
///
/// # Example
///
/// ```no_run
/// use pulsegrid::log_retry_attempt;
///
/// log_retry_attempt!(2, 10, 1000);
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay_ms:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay_ms,
            "Reconnecting after backoff"
        );
    };
}

/// Log an alert flag change for a patient
///
/// # Example
///
/// ```no_run
/// use pulsegrid::log_alert_change;
///
/// log_alert_change!("PAC002", true);
/// ```
#[macro_export]
macro_rules! log_alert_change {
    ($patient_id:expr, $alert:expr) => {
        tracing::info!(
            patient_id = %$patient_id,
            alert = $alert,
            "Alert state changed"
        );
    };
}
