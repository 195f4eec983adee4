//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use http_balancer::config::{validate_config, BalancerConfig};
use http_balancer::http::HttpServer;
use http_balancer::lifecycle::Shutdown;
use http_balancer::load_balancer::pool::ServerPool;

/// Start a simple mock backend on an OS-assigned port, returning its
/// address. Every request gets a fixed 200 response.
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    serve_mock(listener, response);
    addr
}

/// Start a fixed-response mock backend on a specific address. Used to
/// revive a backend on a port that was previously closed.
#[allow(dead_code)]
pub async fn start_mock_backend_at(addr: SocketAddr, response: &'static str) {
    let listener = TcpListener::bind(addr).await.unwrap();
    serve_mock(listener, response);
}

fn serve_mock(listener: TcpListener, response: &'static str) {
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            response.len(),
                            response
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a programmable mock backend with async support.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
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
                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
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

/// Reserve an address that nothing is listening on. Connections to it are
/// refused until a test deliberately binds it again.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Start a balancer on an OS-assigned port.
///
/// Returns the proxy address, a handle to its server pool for inspecting
/// liveness, and the shutdown coordinator.
pub async fn start_balancer(mut config: BalancerConfig) -> (SocketAddr, Arc<ServerPool>, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let backends = validate_config(&config).unwrap();
    let server = HttpServer::new(config, backends);
    let pool = server.pool();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, &server_shutdown).await;
    });

    (addr, pool, shutdown)
}

/// A reqwest client that never reuses connections and ignores proxy env.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Backend config with health checks off, for deterministic failover tests.
#[allow(dead_code)]
pub fn config_without_health(backends: Vec<SocketAddr>) -> BalancerConfig {
    let mut config = BalancerConfig::default();
    config.backends = backends
        .into_iter()
        .map(|a| format!("http://{}", a))
        .collect();
    config.health_check.enabled = false;
    config
}
