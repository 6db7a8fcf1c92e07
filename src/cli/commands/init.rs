//! Init command - write a starter configuration file

use clap::Args;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Output path for the configuration file
    #[arg(short, long, default_value = "pulsegrid.toml")]
    pub output: String,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

const CONFIG_TEMPLATE: &str = r#"# Pulsegrid configuration

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

# Runtime environment: development, staging, production
environment = "development"

[api]
# Base URL of the monitoring backend
base_url = "http://localhost:8080"
# Bearer credential; prefer an environment reference over a literal
# token = "${PULSEGRID_API_TOKEN}"
# Snapshot request timeout in seconds
timeout_seconds = 30

[stream]
# Treat the connection as dead after this many seconds without any event
idle_timeout_secs = 60

[stream.reconnect]
max_retries = 10
initial_delay_ms = 500
max_delay_ms = 30000
backoff_multiplier = 2.0

[engine]
# Samples retained per patient
window_capacity = 120
# Demo feed tick interval in milliseconds
tick_interval_ms = 200
# Random-walk history each demo patient starts with
seed_history = 40

[[engine.demo_patients]]
id = "PAC001"
name = "João Silva"
age = 65

[[engine.demo_patients]]
id = "PAC002"
name = "Maria Santos"
age = 59

[[engine.demo_patients]]
id = "PAC003"
name = "Pedro Oliveira"
age = 71

[logging]
# Write JSON logs to rotating files in addition to the console
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#;

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let path = Path::new(&self.output);
        if path.exists() && !self.force {
            eprintln!(
                "Refusing to overwrite existing file {} (use --force)",
                path.display()
            );
            return Ok(2);
        }

        std::fs::write(path, CONFIG_TEMPLATE)?;
        println!("Wrote starter configuration to {}", path.display());
        Ok(0)
    }
}
