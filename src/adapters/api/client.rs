//! Snapshot endpoint client
//!
//! Fetches the authoritative patient list used to seed the store at session
//! start. The trait seam exists so the session can be driven by a test
//! double without a network.

use super::models::SnapshotRow;
use crate::config::{ApiConfig, SecretString};
use crate::domain::{PatientSeed, PulsegridError, Result, SnapshotError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Source of authoritative patient snapshots
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetches the full patient list
    async fn fetch(&self) -> Result<Vec<PatientSeed>>;
}

/// HTTP implementation of [`SnapshotSource`]
pub struct HttpSnapshotClient {
    http: Client,
    endpoint: String,
    token: Option<SecretString>,
}

impl HttpSnapshotClient {
    /// Creates a client from API configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));
        if !config.tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder
            .build()
            .map_err(|e| PulsegridError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}{}",
                config.base_url.trim_end_matches('/'),
                config.snapshot_path
            ),
            token: config.token.clone(),
        })
    }

    /// The resolved snapshot endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotClient {
    async fn fetch(&self) -> Result<Vec<PatientSeed>> {
        let mut request = self.http.get(&self.endpoint);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SnapshotError::Timeout(e.to_string())
            } else {
                SnapshotError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SnapshotError::AuthenticationFailed(format!(
                "server returned {status}"
            ))
            .into());
        }
        if status.is_server_error() {
            return Err(SnapshotError::ServerError {
                status: status.as_u16(),
                message: status.to_string(),
            }
            .into());
        }
        if !status.is_success() {
            return Err(SnapshotError::ClientError {
                status: status.as_u16(),
                message: status.to_string(),
            }
            .into());
        }

        let rows: Vec<SnapshotRow> = response
            .json()
            .await
            .map_err(|e| SnapshotError::InvalidPayload(e.to_string()))?;

        tracing::info!(patients = rows.len(), "Snapshot fetched");
        rows.into_iter().map(SnapshotRow::into_seed).collect()
    }
}
