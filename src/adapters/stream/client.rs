//! Server-push stream client
//!
//! Maintains the long-lived SSE connection that feeds remote vitals updates
//! into the store. The reconnect behavior is an explicit state machine
//! (`Connecting → Open → Reconnecting → Open | Closed`) observable through a
//! watch channel, with exponential backoff between attempts and an idle
//! timeout that treats a silent connection as dead.
//!
//! Error policy: decode failures and rejected updates are counted, logged
//! and dropped without touching the connection; transport failures drive
//! reconnection; only an exhausted retry ceiling escalates to the caller as
//! [`StreamError::Unavailable`].

use super::backoff::ReconnectPolicy;
use super::decoder::{SseDecoder, SseFrame};
use super::event::{parse_event, StreamEvent};
use crate::config::{ApiConfig, SecretString, StreamConfig};
use crate::core::store::PatientStore;
use crate::domain::{PulsegridError, Result, StreamError};
use crate::log_retry_attempt;
use futures::StreamExt;
use reqwest::{header, Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Observable connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Establishing the initial connection
    Connecting,
    /// Connected; receiving events or idling between them
    Open,
    /// Connection lost; re-establishment in progress
    Reconnecting,
    /// Terminal: explicit shutdown or retry ceiling exhausted
    Closed,
}

/// How a listening connection ended
enum Disconnect {
    /// Caller-initiated shutdown
    Shutdown,
    /// Idle timeout expired with no event, not even a heartbeat
    Idle,
    /// Transport ended or failed mid-stream
    Lost(String),
}

/// Long-lived SSE client feeding the patient store
pub struct StreamClient {
    http: Client,
    endpoint: String,
    token: Option<SecretString>,
    idle_timeout: Duration,
    policy: ReconnectPolicy,
    store: Arc<PatientStore>,
    shutdown: watch::Receiver<bool>,
    state_tx: watch::Sender<StreamState>,
    decode_errors: AtomicU64,
    rejected_updates: AtomicU64,
}

impl StreamClient {
    /// Creates a client bound to a store and a shutdown signal
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(
        api: &ApiConfig,
        stream: &StreamConfig,
        store: Arc<PatientStore>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        // No overall request timeout: the stream body is expected to live
        // for the whole session. Liveness is the idle timer's job.
        let mut builder = ClientBuilder::new().connect_timeout(Duration::from_secs(30));
        if !api.tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder
            .build()
            .map_err(|e| PulsegridError::Configuration(format!("HTTP client: {e}")))?;

        let (state_tx, _) = watch::channel(StreamState::Connecting);
        Ok(Self {
            http,
            endpoint: format!(
                "{}{}",
                api.base_url.trim_end_matches('/'),
                stream.endpoint_path
            ),
            token: api.token.clone(),
            idle_timeout: Duration::from_secs(stream.idle_timeout_secs),
            policy: ReconnectPolicy::from_config(&stream.reconnect),
            store,
            shutdown,
            state_tx,
            decode_errors: AtomicU64::new(0),
            rejected_updates: AtomicU64::new(0),
        })
    }

    /// Subscribes to connection state transitions
    pub fn state(&self) -> watch::Receiver<StreamState> {
        self.state_tx.subscribe()
    }

    /// Number of undecodable events dropped so far
    pub fn decode_error_count(&self) -> u64 {
        self.decode_errors.load(Ordering::Relaxed)
    }

    /// Number of updates rejected by validation so far
    pub fn rejected_update_count(&self) -> u64 {
        self.rejected_updates.load(Ordering::Relaxed)
    }

    /// Runs the connection loop until shutdown or retry exhaustion
    ///
    /// Returns `Ok(())` after a caller-initiated shutdown. The store is
    /// never reset by this loop: reconnection is a transport-level event,
    /// so recovered connections append onto the existing windows.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Unavailable`] once the reconnect ceiling is
    /// exhausted; no other stream error escapes this method.
    pub async fn run(&self) -> Result<()> {
        let mut shutdown = self.shutdown.clone();
        let mut attempt: u32 = 0;

        loop {
            if *shutdown.borrow() {
                self.set_state(StreamState::Closed);
                return Ok(());
            }

            self.set_state(if attempt == 0 {
                StreamState::Connecting
            } else {
                StreamState::Reconnecting
            });

            match self.connect_and_listen(&mut shutdown, &mut attempt).await {
                Ok(Disconnect::Shutdown) => {
                    tracing::info!("Stream client shut down");
                    self.set_state(StreamState::Closed);
                    return Ok(());
                }
                Ok(Disconnect::Idle) => {
                    tracing::warn!(
                        idle_timeout_secs = self.idle_timeout.as_secs(),
                        "No event within idle window, reconnecting"
                    );
                }
                Ok(Disconnect::Lost(reason)) => {
                    tracing::warn!(reason = %reason, "Stream connection lost, reconnecting");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Stream connection attempt failed");
                }
            }

            attempt += 1;
            if self.policy.exhausted(attempt) {
                self.set_state(StreamState::Closed);
                return Err(StreamError::Unavailable { attempts: attempt }.into());
            }

            let delay = self.policy.delay_for(attempt);
            log_retry_attempt!(attempt, self.policy.max_retries(), delay.as_millis() as u64);
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.set_state(StreamState::Closed);
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Opens the connection and pumps events until it ends
    ///
    /// Resets the caller's attempt counter once the server accepts the
    /// connection, so backoff starts fresh after every healthy period.
    async fn connect_and_listen(
        &self,
        shutdown: &mut watch::Receiver<bool>,
        attempt: &mut u32,
    ) -> std::result::Result<Disconnect, StreamError> {
        let mut request = self
            .http
            .get(&self.endpoint)
            .header(header::ACCEPT, "text/event-stream");
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| StreamError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StreamError::AuthenticationFailed(format!(
                "server returned {status}"
            )));
        }
        if !status.is_success() {
            return Err(StreamError::InvalidResponse(format!(
                "unexpected status {status}"
            )));
        }

        *attempt = 0;
        self.set_state(StreamState::Open);
        tracing::info!(endpoint = %self.endpoint, "Stream connected");

        let mut body = response.bytes_stream();
        let mut decoder = SseDecoder::new();

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return Ok(Disconnect::Shutdown);
                    }
                }
                next = tokio::time::timeout(self.idle_timeout, body.next()) => {
                    match next {
                        Err(_) => return Ok(Disconnect::Idle),
                        Ok(None) => return Ok(Disconnect::Lost("server closed the stream".to_string())),
                        Ok(Some(Err(e))) => return Ok(Disconnect::Lost(e.to_string())),
                        Ok(Some(Ok(chunk))) => {
                            for frame in decoder.feed(&chunk) {
                                self.handle_frame(&frame);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Applies one frame; never fails the connection
    fn handle_frame(&self, frame: &SseFrame) {
        match parse_event(frame) {
            Ok(Some(StreamEvent::PatientUpdate(update))) => {
                let patient_id = update.patient_id.clone();
                if let Err(e) = self.store.merge_sample(update) {
                    self.rejected_updates.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        patient_id = %patient_id,
                        error = %e,
                        "Rejected patient update"
                    );
                }
            }
            Ok(Some(StreamEvent::Heartbeat)) => {
                tracing::debug!("heartbeat");
            }
            Ok(None) => {}
            Err(e) => {
                self.decode_errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %e, "Dropped undecodable stream event");
            }
        }
    }

    fn set_state(&self, state: StreamState) {
        let changed = self.state_tx.send_replace(state) != state;
        if changed {
            tracing::debug!(state = ?state, "Stream state transition");
        }
    }
}
