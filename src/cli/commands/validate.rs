//! Validate-config command

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Exit code 0 when the configuration loads and validates, 2 otherwise.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match load_config(config_path) {
            Ok(config) => {
                println!("Configuration is valid: {config_path}");
                println!("  environment:      {:?}", config.environment);
                println!("  api.base_url:     {}", config.api.base_url);
                println!("  window capacity:  {}", config.engine.window_capacity);
                println!("  idle timeout:     {}s", config.stream.idle_timeout_secs);
                println!(
                    "  reconnect:        {} retries, {}ms initial delay",
                    config.stream.reconnect.max_retries,
                    config.stream.reconnect.initial_delay_ms
                );
                Ok(0)
            }
            Err(e) => {
                eprintln!("Configuration is invalid: {e}");
                Ok(2)
            }
        }
    }
}
