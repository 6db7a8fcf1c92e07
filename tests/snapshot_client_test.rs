//! Integration tests for the snapshot endpoint client

use pulsegrid::adapters::api::{HttpSnapshotClient, SnapshotSource};
use pulsegrid::config::{secret_string, ApiConfig};
use pulsegrid::domain::{PulsegridError, SnapshotError};

fn config_for(server: &mockito::Server) -> ApiConfig {
    ApiConfig {
        base_url: server.url(),
        token: Some(secret_string("test-token".to_string())),
        ..ApiConfig::default()
    }
}

#[tokio::test]
async fn test_fetch_parses_patient_rows() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/patients")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"patientId":"PAC001","displayName":"João Silva","age":65,
                 "hr":78,"spo2":98,"sys":121,"dia":79,"temp":36.6,"lastUpdate":1000},
                {"patientId":"PAC002","displayName":"Maria Santos","age":59,
                 "hr":120,"temp":37.2}
            ]"#,
        )
        .create_async()
        .await;

    let client = HttpSnapshotClient::new(&config_for(&server)).unwrap();
    let seeds = client.fetch().await.unwrap();
    mock.assert_async().await;

    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[0].id.as_str(), "PAC001");
    assert_eq!(seeds[0].display_name.as_deref(), Some("João Silva"));
    assert_eq!(seeds[0].history.len(), 1);
    assert_eq!(seeds[0].history[0].hr, Some(78));
    assert_eq!(seeds[0].history[0].timestamp_ms, 1000);

    assert_eq!(seeds[1].history[0].hr, Some(120));
    assert_eq!(seeds[1].history[0].spo2, None);
}

#[tokio::test]
async fn test_fetch_maps_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v1/patients")
        .with_status(401)
        .create_async()
        .await;

    let client = HttpSnapshotClient::new(&config_for(&server)).unwrap();
    let err = client.fetch().await.unwrap_err();
    assert!(matches!(
        err,
        PulsegridError::Snapshot(SnapshotError::AuthenticationFailed(_))
    ));
}

#[tokio::test]
async fn test_fetch_maps_server_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v1/patients")
        .with_status(503)
        .create_async()
        .await;

    let client = HttpSnapshotClient::new(&config_for(&server)).unwrap();
    let err = client.fetch().await.unwrap_err();
    assert!(matches!(
        err,
        PulsegridError::Snapshot(SnapshotError::ServerError { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_fetch_rejects_malformed_payload() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v1/patients")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"unexpected":"shape"}"#)
        .create_async()
        .await;

    let client = HttpSnapshotClient::new(&config_for(&server)).unwrap();
    let err = client.fetch().await.unwrap_err();
    assert!(matches!(
        err,
        PulsegridError::Snapshot(SnapshotError::InvalidPayload(_))
    ));
}

#[tokio::test]
async fn test_endpoint_joins_base_url_and_path() {
    let config = ApiConfig {
        base_url: "http://monitor.example.com/".to_string(),
        ..ApiConfig::default()
    };
    let client = HttpSnapshotClient::new(&config).unwrap();
    assert_eq!(
        client.endpoint(),
        "http://monitor.example.com/api/v1/patients"
    );
}
