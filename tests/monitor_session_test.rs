//! End-to-end tests for the monitor session
//!
//! The live test runs the full pipeline against a scripted backend: the
//! snapshot endpoint seeds the store, then the stream delivers an update
//! that flips one patient's alert. The demo test runs the generator loop
//! and verifies bounded windows and clean shutdown.

use pulsegrid::config::{secret_string, PulsegridConfig};
use pulsegrid::core::MonitorSession;
use pulsegrid::domain::PatientId;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::watch;

const SNAPSHOT_BODY: &str = r#"[
    {"patientId":"P1","displayName":"João Silva","age":65,"hr":78,"lastUpdate":1000},
    {"patientId":"P2","displayName":"Maria Santos","age":59,"hr":120,"temp":37.2,"lastUpdate":1000}
]"#;

/// Minimal backend: JSON snapshot on one path, SSE stream on the other
async fn spawn_backend() -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 2048];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).into_owned();

                if request.starts_with("GET /api/v1/patients/stream") {
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\nconnection: close\r\n\r\n",
                        )
                        .await;
                    let _ = socket
                        .write_all(b"event: heartbeat\ndata:\n\n")
                        .await;
                    let _ = socket
                        .write_all(
                            b"event: patient-update\ndata: {\"patientId\":\"P1\",\"hr\":105}\n\n",
                        )
                        .await;
                    let _ = socket.flush().await;
                    tokio::time::sleep(Duration::from_secs(30)).await;
                } else {
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        SNAPSHOT_BODY.len(),
                        SNAPSHOT_BODY
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                }
            });
        }
    });
    addr
}

fn live_config(addr: std::net::SocketAddr) -> PulsegridConfig {
    let mut config = PulsegridConfig::default();
    config.api.base_url = format!("http://{addr}");
    config.api.token = Some(secret_string("test-token".to_string()));
    config.stream.idle_timeout_secs = 10;
    config.stream.reconnect.initial_delay_ms = 50;
    config
}

#[tokio::test]
async fn test_live_pipeline_snapshot_then_stream_update() {
    let addr = spawn_backend().await;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let session = MonitorSession::new(live_config(addr), shutdown_rx);
    let store = session.store();

    let runner = tokio::spawn(async move { session.run_live().await });

    let p1 = PatientId::from_str("P1").unwrap();
    let p2 = PatientId::from_str("P2").unwrap();

    // Wait for the stream update to land on top of the snapshot
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(record) = store.get_patient(&p1) {
            if record.alert {
                break;
            }
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "P1 never flipped to alert"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let p1_record = store.get_patient(&p1).unwrap();
    let p2_record = store.get_patient(&p2).unwrap();

    // Snapshot seeded both patients; the update flipped only P1
    assert_eq!(p1_record.display_name.as_deref(), Some("João Silva"));
    assert_eq!(p1_record.window().len(), 2);
    assert_eq!(p1_record.latest().unwrap().hr, Some(105));
    assert!(p1_record.alert);

    assert!(p2_record.alert, "P2 alerted from the snapshot itself");
    assert_eq!(p2_record.window().len(), 1, "P2 untouched by the update");

    shutdown_tx.send(true).unwrap();
    assert!(runner.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_demo_session_windows_stay_bounded() {
    let mut config = PulsegridConfig::default();
    config.engine.tick_interval_ms = 5;
    config.engine.seed_history = 3;
    config.engine.window_capacity = 10;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let session = MonitorSession::new(config, shutdown_rx);
    let store = session.store();

    let runner = tokio::spawn(async move { session.run_demo().await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown_tx.send(true).unwrap();
    runner.await.unwrap().unwrap();

    let patients = store.list_patients();
    assert_eq!(patients.len(), 3);
    for record in &patients {
        assert_eq!(record.window().len(), 10, "window capped at capacity");
        let latest = record.latest().unwrap();
        let hr = latest.hr.unwrap();
        assert!((60..=120).contains(&hr), "generated hr in bounds: {hr}");
    }
}

#[tokio::test]
async fn test_demo_iteration_order_matches_configuration() {
    let mut config = PulsegridConfig::default();
    config.engine.tick_interval_ms = 5;
    config.engine.seed_history = 2;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let session = MonitorSession::new(config, shutdown_rx);
    let store = session.store();

    let runner = tokio::spawn(async move { session.run_demo().await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown_tx.send(true).unwrap();
    runner.await.unwrap().unwrap();

    let order: Vec<String> = store
        .list_patients()
        .iter()
        .map(|r| r.id().to_string())
        .collect();
    assert_eq!(order, vec!["PAC001", "PAC002", "PAC003"]);
}
