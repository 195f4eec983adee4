//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe backends
//! - Update backend liveness flags based on results

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::load_balancer::pool::ServerPool;

pub struct HealthMonitor {
    pool: Arc<ServerPool>,
    config: HealthCheckConfig,
}

impl HealthMonitor {
    pub fn new(pool: Arc<ServerPool>, config: HealthCheckConfig) -> Self {
        Self { pool, config }
    }

    /// Run the probe loop until the shutdown signal fires.
    ///
    /// Probes block only this task; request handling never waits on a
    /// health cycle.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Active health checks disabled");
            return;
        }

        tracing::info!(
            interval = self.config.interval_secs,
            timeout = self.config.timeout_secs,
            "Health monitor starting"
        );

        let interval = Duration::from_secs(self.config.interval_secs);
        let mut ticker = time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Probe every backend once and write the results back.
    ///
    /// Each flag write is atomic; a request selecting a peer mid-cycle sees
    /// the latest completed probe for each backend, never a torn update.
    async fn check_all(&self) {
        tracing::debug!("Starting health check pass");
        let timeout = Duration::from_secs(self.config.timeout_secs);

        for backend in self.pool.backends() {
            let alive = probe(&backend.authority, timeout).await;
            self.pool.mark_status(&backend.url, alive);
            tracing::debug!(
                addr = %backend.url,
                status = if alive { "up" } else { "down" },
                "Health check result"
            );
        }

        tracing::debug!(
            live = self.pool.live_count(),
            total = self.pool.len(),
            "Health check pass completed"
        );
    }
}

/// Reachability probe: a bounded-timeout TCP connect.
///
/// Reaching the backend's port at all is taken as "usable"; this is not a
/// deep health signal.
async fn probe(authority: &str, timeout: Duration) -> bool {
    match time::timeout(timeout, TcpStream::connect(authority)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            tracing::warn!(addr = %authority, error = %e, "Backend unreachable");
            false
        }
        Err(_) => {
            tracing::warn!(addr = %authority, "Backend probe timed out");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn probe_reports_listening_socket_alive() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(probe(&addr.to_string(), Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn probe_reports_closed_port_dead() {
        // Bind then drop to get a port that is very likely closed.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        assert!(!probe(&addr.to_string(), Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn check_all_flips_flags_both_ways() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let live_addr = listener.local_addr().unwrap();
        let dead_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead_addr = dead_listener.local_addr().unwrap();
        drop(dead_listener);

        let pool = Arc::new(ServerPool::new(vec![
            format!("http://{}", live_addr).parse().unwrap(),
            format!("http://{}", dead_addr).parse().unwrap(),
        ]));
        // Start from the wrong belief for both backends.
        pool.backends()[0].set_alive(false);
        assert!(pool.backends()[1].is_alive());

        let monitor = HealthMonitor::new(
            pool.clone(),
            HealthCheckConfig {
                enabled: true,
                interval_secs: 60,
                timeout_secs: 1,
            },
        );
        monitor.check_all().await;

        assert!(pool.backends()[0].is_alive());
        assert!(!pool.backends()[1].is_alive());
    }
}
