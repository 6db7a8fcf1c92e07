//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PulsegridConfig;
use crate::config::secret::secret_string;
use crate::domain::errors::PulsegridError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`PulsegridConfig`]
/// 4. Applies environment variable overrides (`PULSEGRID_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use pulsegrid::config::load_config;
///
/// let config = load_config("pulsegrid.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PulsegridConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PulsegridError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PulsegridError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: PulsegridConfig = toml::from_str(&contents)
        .map_err(|e| PulsegridError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        PulsegridError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched so documentation examples don't fail
/// the load.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex is valid");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PulsegridError::Configuration(format!(
            "Missing environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies `PULSEGRID_*` environment variable overrides on top of the file
fn apply_env_overrides(config: &mut PulsegridConfig) {
    if let Ok(level) = std::env::var("PULSEGRID_LOG_LEVEL") {
        config.application.log_level = level;
    }
    if let Ok(base_url) = std::env::var("PULSEGRID_API_BASE_URL") {
        config.api.base_url = base_url;
    }
    if let Ok(token) = std::env::var("PULSEGRID_API_TOKEN") {
        config.api.token = Some(secret_string(token));
    }
    if let Ok(secs) = std::env::var("PULSEGRID_STREAM_IDLE_TIMEOUT_SECS") {
        if let Ok(secs) = secs.parse() {
            config.stream.idle_timeout_secs = secs;
        }
    }
    if let Ok(interval) = std::env::var("PULSEGRID_ENGINE_TICK_INTERVAL_MS") {
        if let Ok(interval) = interval.parse() {
            config.engine.tick_interval_ms = interval;
        }
    }
}
