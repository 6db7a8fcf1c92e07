// Pulsegrid - Real-time vitals monitoring engine
// Copyright (c) 2025 Pulsegrid Contributors
// Licensed under the MIT License

//! # Pulsegrid - Real-time Vitals Ingestion Engine
//!
//! Pulsegrid is the ingestion and windowing engine behind a clinical
//! monitoring dashboard. It accepts incremental vital-sign samples from a
//! server-push stream (or generates synthetic ones offline), maintains a
//! bounded per-patient sample window, derives alert conditions, and keeps
//! the stream connection alive across network interruptions.
//!
//! ## Architecture
//!
//! Pulsegrid follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Engine logic (alert evaluation, generation, store, session)
//! - [`adapters`] - External integrations (snapshot REST endpoint, SSE stream)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pulsegrid::config::PulsegridConfig;
//! use pulsegrid::core::MonitorSession;
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PulsegridConfig::from_file("pulsegrid.toml")?;
//!     let (shutdown_tx, shutdown_rx) = watch::channel(false);
//!
//!     let session = MonitorSession::new(config, shutdown_rx);
//!     let store = session.store();
//!
//!     // Consumers read immutable snapshots and subscribe to changes
//!     let mut updates = store.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(update) = updates.recv().await {
//!             println!("{} alert={}", update.patient_id, update.alert);
//!         }
//!     });
//!
//!     session.run_live().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## State Model
//!
//! Each patient owns a bounded FIFO window of the most recent samples
//! (capacity 120 by default). Partial updates merge onto the previous
//! latest sample: present fields override, missing fields inherit, and a
//! missing field never resets a previously observed value. The alert flag
//! is recomputed from every appended sample, so it is never stale relative
//! to the last mutation.
//!
//! ## Stream Resilience
//!
//! The stream client is an explicit state machine
//! (`Connecting → Open → Reconnecting → Open | Closed`) with exponential
//! backoff and an idle timeout. Reconnection is transport-level only: the
//! patient windows are never reset by it. Undecodable events are counted
//! and dropped without disturbing the connection.
//!
//! ## Error Handling
//!
//! Pulsegrid uses the [`domain::PulsegridError`] type for all errors:
//!
//! ```rust,no_run
//! use pulsegrid::domain::PulsegridError;
//!
//! fn example() -> Result<(), PulsegridError> {
//!     let config = pulsegrid::config::PulsegridConfig::from_file("pulsegrid.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Pulsegrid uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Session started");
//! warn!(patient_id = "PAC002", "Alert raised");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
