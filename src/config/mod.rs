//! Configuration management for Pulsegrid.
//!
//! TOML-based configuration loading, parsing, and validation with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PULSEGRID_*` environment variable overrides
//! - Default values for every optional setting
//! - Per-section validation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pulsegrid::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pulsegrid.toml")?;
//! println!("Backend: {}", config.api.base_url);
//! println!("Window capacity: {}", config.engine.window_capacity);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [api]
//! base_url = "https://monitor.example.com"
//! token = "${PULSEGRID_API_TOKEN}"
//!
//! [stream]
//! idle_timeout_secs = 60
//!
//! [stream.reconnect]
//! max_retries = 10
//! initial_delay_ms = 500
//!
//! [engine]
//! window_capacity = 120
//! tick_interval_ms = 200
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used items
pub use loader::load_config;
pub use schema::{
    ApiConfig, ApplicationConfig, DemoPatient, EngineConfig, Environment, LoggingConfig,
    PulsegridConfig, ReconnectConfig, StreamConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
