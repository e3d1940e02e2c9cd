//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use cicd_lab_app::config::AppConfig;

/// Start a programmable mock flag provider on an ephemeral port.
///
/// Every connection gets the (status, body) produced by the closure.
pub async fn start_programmable_provider<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 2048];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a provider that always serves the same feature listing.
#[allow(dead_code)]
pub async fn start_static_provider(features: Vec<(&'static str, bool)>) -> SocketAddr {
    let body = features_json(&features);
    start_programmable_provider(move || {
        let body = body.clone();
        async move { (200, body) }
    })
    .await
}

/// Build a `client/features` response body.
pub fn features_json(features: &[(&str, bool)]) -> String {
    let features: Vec<_> = features
        .iter()
        .map(|(name, enabled)| {
            serde_json::json!({
                "name": name,
                "enabled": enabled,
                "strategies": [{"name": "default", "parameters": {}}],
            })
        })
        .collect();
    serde_json::json!({ "version": 2, "features": features }).to_string()
}

/// Service config pointed at the given provider address, tuned for fast tests.
pub fn test_config(provider: SocketAddr) -> AppConfig {
    let mut config = AppConfig::default();
    config.provider.url = format!("http://{}/api/", provider);
    config.provider.refresh_interval_secs = 1;
    config.provider.fetch_timeout_secs = 2;
    config.provider.max_backoff_secs = 1;
    config
}
