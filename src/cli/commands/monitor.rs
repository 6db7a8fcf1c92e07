//! Monitor command - live snapshot + stream pipeline

use crate::config::load_config;
use crate::core::MonitorSession;
use crate::domain::{PulsegridError, StreamError};
use crate::log_alert_change;
use clap::Args;
use std::collections::HashMap;
use tokio::sync::watch;

/// Arguments for the monitor command
#[derive(Args, Debug, Default)]
pub struct MonitorArgs {}

impl MonitorArgs {
    /// Execute the monitor command
    ///
    /// Runs until the shutdown signal fires or the stream becomes
    /// unavailable past the reconnect ceiling.
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = load_config(config_path)?;
        let session = MonitorSession::new(config, shutdown_signal);

        let alert_logger = spawn_alert_logger(&session);
        let result = session.run_live().await;
        alert_logger.abort();

        match result {
            Ok(()) => {
                println!("Monitoring stopped ({} patients tracked)", session.store().len());
                Ok(0)
            }
            Err(PulsegridError::Stream(StreamError::Unavailable { attempts })) => {
                eprintln!("Stream unavailable after {attempts} reconnect attempts");
                Ok(4)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Logs alert flag transitions as updates arrive
///
/// This is the reference consumer of the store's subscription API; the
/// dashboard frontend does the same thing with widgets instead of logs.
pub(crate) fn spawn_alert_logger(session: &MonitorSession) -> tokio::task::JoinHandle<()> {
    let store = session.store();
    let mut updates = store.subscribe();
    tokio::spawn(async move {
        let mut last_alert: HashMap<String, bool> = HashMap::new();
        loop {
            match updates.recv().await {
                Ok(update) => {
                    let previous = last_alert.insert(update.patient_id.to_string(), update.alert);
                    if previous != Some(update.alert) {
                        log_alert_change!(update.patient_id, update.alert);
                    }
                }
                // Lagging only skips intermediate updates; latest state wins
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
