//! Configuration schema types
//!
//! This module defines the TOML configuration structure for Pulsegrid.
//! Every section validates itself; [`PulsegridConfig::validate`] runs them
//! all and is called by the loader after parsing.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main Pulsegrid configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PulsegridConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Snapshot/stream endpoint configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Stream client behavior
    #[serde(default)]
    pub stream: StreamConfig,

    /// Engine parameters (window, ticking, demo patients)
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PulsegridConfig {
    /// Loads and validates configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::domain::Result<Self> {
        crate::config::loader::load_config(path)
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value found
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate(&self.environment)?;
        self.stream.validate()?;
        self.engine.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Snapshot and stream endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the monitoring backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer credential supplied by the authentication collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<SecretString>,

    /// Snapshot endpoint path under the base URL
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    /// Per-request timeout for snapshot fetches, seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Verify TLS certificates
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            snapshot_path: default_snapshot_path(),
            timeout_seconds: default_timeout_seconds(),
            tls_verify: default_true(),
        }
    }
}

impl ApiConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid api.base_url '{}': {}", self.base_url, e))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(format!(
                    "api.base_url must use http or https, got '{other}'"
                ))
            }
        }
        if *environment == Environment::Production && url.scheme() == "http" {
            return Err("api.base_url must use https in production".to_string());
        }
        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be greater than zero".to_string());
        }
        if !self.snapshot_path.starts_with('/') {
            return Err("api.snapshot_path must start with '/'".to_string());
        }
        Ok(())
    }
}

/// Stream client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Stream endpoint path under the base URL
    #[serde(default = "default_stream_path")]
    pub endpoint_path: String,

    /// Idle window after which the connection is treated as dead, seconds
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Reconnect backoff schedule
    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            endpoint_path: default_stream_path(),
            idle_timeout_secs: default_idle_timeout_secs(),
            reconnect: ReconnectConfig::default(),
        }
    }
}

impl StreamConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.endpoint_path.starts_with('/') {
            return Err("stream.endpoint_path must start with '/'".to_string());
        }
        if self.idle_timeout_secs == 0 {
            return Err("stream.idle_timeout_secs must be greater than zero".to_string());
        }
        self.reconnect.validate()
    }
}

/// Reconnect backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Maximum reconnect attempts before the stream is declared unavailable
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Backoff ceiling in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Multiplier applied per attempt
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl ReconnectConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("stream.reconnect.max_retries must be greater than zero".to_string());
        }
        if self.initial_delay_ms == 0 {
            return Err("stream.reconnect.initial_delay_ms must be greater than zero".to_string());
        }
        if self.max_delay_ms < self.initial_delay_ms {
            return Err(
                "stream.reconnect.max_delay_ms must be >= initial_delay_ms".to_string(),
            );
        }
        if self.backoff_multiplier < 1.0 {
            return Err("stream.reconnect.backoff_multiplier must be >= 1.0".to_string());
        }
        Ok(())
    }
}

/// Engine parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Per-patient sample window capacity
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,

    /// Demo feed tick interval, milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Random-walk history length each demo patient starts with
    #[serde(default = "default_seed_history")]
    pub seed_history: usize,

    /// Patients simulated by the demo feed
    #[serde(default = "default_demo_patients")]
    pub demo_patients: Vec<DemoPatient>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_capacity: default_window_capacity(),
            tick_interval_ms: default_tick_interval_ms(),
            seed_history: default_seed_history(),
            demo_patients: default_demo_patients(),
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<(), String> {
        if self.window_capacity == 0 {
            return Err("engine.window_capacity must be greater than zero".to_string());
        }
        if self.tick_interval_ms == 0 {
            return Err("engine.tick_interval_ms must be greater than zero".to_string());
        }
        if self.seed_history == 0 {
            return Err("engine.seed_history must be greater than zero".to_string());
        }
        let mut seen = std::collections::HashSet::new();
        for patient in &self.demo_patients {
            if patient.id.trim().is_empty() {
                return Err("engine.demo_patients entries must have a non-empty id".to_string());
            }
            if !seen.insert(patient.id.as_str()) {
                return Err(format!(
                    "engine.demo_patients contains duplicate id '{}'",
                    patient.id
                ));
            }
        }
        Ok(())
    }
}

/// One simulated patient for the demo feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoPatient {
    /// Patient identifier, e.g. `PAC001`
    pub id: String,
    /// Display name
    pub name: String,
    /// Age in years
    pub age: u8,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to rotating local files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: daily or hourly
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path must be set when local_enabled = true".to_string());
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_snapshot_path() -> String {
    "/api/v1/patients".to_string()
}

fn default_stream_path() -> String {
    "/api/v1/patients/stream".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_idle_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    10
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_window_capacity() -> usize {
    120
}

fn default_tick_interval_ms() -> u64 {
    200
}

fn default_seed_history() -> usize {
    40
}

fn default_demo_patients() -> Vec<DemoPatient> {
    vec![
        DemoPatient {
            id: "PAC001".to_string(),
            name: "João Silva".to_string(),
            age: 65,
        },
        DemoPatient {
            id: "PAC002".to_string(),
            name: "Maria Santos".to_string(),
            age: 59,
        },
        DemoPatient {
            id: "PAC003".to_string(),
            name: "Pedro Oliveira".to_string(),
            age: 71,
        },
    ]
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PulsegridConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.window_capacity, 120);
        assert_eq!(config.engine.tick_interval_ms, 200);
        assert_eq!(config.stream.idle_timeout_secs, 60);
        assert_eq!(config.engine.demo_patients.len(), 3);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = PulsegridConfig::default();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = PulsegridConfig::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_requires_https() {
        let mut config = PulsegridConfig::default();
        config.environment = Environment::Production;
        assert!(config.validate().is_err());

        config.api.base_url = "https://monitor.example.com".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_window_capacity_rejected() {
        let mut config = PulsegridConfig::default();
        config.engine.window_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backoff_bounds_validated() {
        let mut config = PulsegridConfig::default();
        config.stream.reconnect.max_delay_ms = 100;
        config.stream.reconnect.initial_delay_ms = 500;
        assert!(config.validate().is_err());

        let mut config = PulsegridConfig::default();
        config.stream.reconnect.backoff_multiplier = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_demo_patient_rejected() {
        let mut config = PulsegridConfig::default();
        config.engine.demo_patients.push(DemoPatient {
            id: "PAC001".to_string(),
            name: "Duplicate".to_string(),
            age: 40,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_minimal_toml_parses_with_defaults() {
        let config: PulsegridConfig = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.stream.endpoint_path, "/api/v1/patients/stream");
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config: PulsegridConfig = toml::from_str(
            r#"
            [application]
            log_level = "debug"

            [api]
            base_url = "https://monitor.example.com"
            token = "secret-token"

            [stream]
            idle_timeout_secs = 30

            [stream.reconnect]
            max_retries = 5

            [engine]
            window_capacity = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.api.base_url, "https://monitor.example.com");
        assert!(config.api.token.is_some());
        assert_eq!(config.stream.idle_timeout_secs, 30);
        assert_eq!(config.stream.reconnect.max_retries, 5);
        assert_eq!(config.engine.window_capacity, 60);
        assert!(config.validate().is_ok());
    }
}
