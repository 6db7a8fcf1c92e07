//! Demo command - offline synthetic feed

use super::monitor::spawn_alert_logger;
use crate::config::load_config;
use crate::core::MonitorSession;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the demo command
#[derive(Args, Debug, Default)]
pub struct DemoArgs {}

impl DemoArgs {
    /// Execute the demo command
    ///
    /// Seeds the configured demo patients and ticks the generator until the
    /// shutdown signal fires.
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = load_config(config_path)?;
        let session = MonitorSession::new(config, shutdown_signal);

        let alert_logger = spawn_alert_logger(&session);
        session.run_demo().await?;
        alert_logger.abort();

        println!(
            "Demo stopped ({} patients simulated)",
            session.store().len()
        );
        Ok(0)
    }
}
