//! Monitor session - owns the store and drives the sample producers
//!
//! The session is the imperative shell around the functional core: it wires
//! generator ticks (demo mode) or the snapshot + stream pipeline (live mode)
//! into the [`PatientStore`], and tears everything down when the shutdown
//! signal fires. The store and clients are lifetime-scoped to the session;
//! nothing global survives it.

use crate::adapters::api::{HttpSnapshotClient, SnapshotSource};
use crate::adapters::stream::StreamClient;
use crate::config::PulsegridConfig;
use crate::core::generator;
use crate::core::store::PatientStore;
use crate::domain::{PatientId, PatientSeed, PulsegridError, Result, VitalsUpdate};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// One monitoring session: an owned store plus the producer loops
pub struct MonitorSession {
    config: PulsegridConfig,
    store: Arc<PatientStore>,
    shutdown: watch::Receiver<bool>,
}

impl MonitorSession {
    /// Creates a session with an empty store
    ///
    /// `shutdown` is the caller-owned cancellation signal; sending `true`
    /// stops all producer loops. Signalling twice is safe and has no
    /// additional effect.
    pub fn new(config: PulsegridConfig, shutdown: watch::Receiver<bool>) -> Self {
        let store = Arc::new(PatientStore::new(config.engine.window_capacity));
        Self {
            config,
            store,
            shutdown,
        }
    }

    /// The session's store, shareable with consumers
    pub fn store(&self) -> Arc<PatientStore> {
        Arc::clone(&self.store)
    }

    /// Runs the offline demo feed until shutdown
    ///
    /// Seeds each configured demo patient with a short random-walk history,
    /// then advances every patient by one generated sample per tick. Returns
    /// once the shutdown signal fires.
    pub async fn run_demo(&self) -> Result<()> {
        let engine = &self.config.engine;
        let seeds = self.demo_seeds()?;
        self.store.merge_snapshot(seeds);

        tracing::info!(
            patients = self.store.len(),
            tick_interval_ms = engine.tick_interval_ms,
            "Demo feed started"
        );

        let mut shutdown = self.shutdown.clone();
        let mut ticker = tokio::time::interval(Duration::from_millis(engine.tick_interval_ms));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick_all_patients()?;
                }
                changed = shutdown.changed() => {
                    // A dropped sender counts as shutdown
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Demo feed stopped");
        Ok(())
    }

    /// Runs the live pipeline until shutdown or stream exhaustion
    ///
    /// Fetches the authoritative snapshot, seeds the store, then hands
    /// control to the stream client. A snapshot failure at session start is
    /// fatal; once streaming, only a retry-exhausted connection escalates.
    pub async fn run_live(&self) -> Result<()> {
        let api = HttpSnapshotClient::new(&self.config.api)?;
        let seeds = api.fetch().await?;
        self.store.merge_snapshot(seeds);

        let client = StreamClient::new(
            &self.config.api,
            &self.config.stream,
            self.store(),
            self.shutdown.clone(),
        )?;
        client.run().await
    }

    /// Advances every tracked patient by one generated sample
    fn tick_all_patients(&self) -> Result<()> {
        let mut rng = rand::thread_rng();
        for record in self.store.list_patients() {
            let prev = record
                .latest()
                .copied()
                .unwrap_or_else(|| generator::baseline_sample(0));
            let next = generator::next_sample(&mut rng, &prev);
            self.store
                .merge_sample(VitalsUpdate::from_sample(record.id().clone(), &next))?;
        }
        Ok(())
    }

    fn demo_seeds(&self) -> Result<Vec<PatientSeed>> {
        let engine = &self.config.engine;
        let mut rng = rand::thread_rng();
        engine
            .demo_patients
            .iter()
            .map(|patient| {
                let id =
                    PatientId::new(patient.id.clone()).map_err(PulsegridError::Validation)?;
                Ok(PatientSeed {
                    id,
                    display_name: Some(patient.name.clone()),
                    age: Some(patient.age),
                    history: generator::seed_series(&mut rng, engine.seed_history),
                })
            })
            .collect()
    }
}
