//! HTTP server setup and request routing.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Select a live backend per request and forward to it
//! - On transport failure, mark the backend dead and fail over
//! - Spawn the health monitor alongside the server

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::config::{BalancerConfig, ProxySettings};
use crate::health::HealthMonitor;
use crate::http::forward::{forward, ProxyClient};
use crate::lifecycle::Shutdown;
use crate::load_balancer::pool::ServerPool;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<ServerPool>,
    pub client: ProxyClient,
    pub proxy: ProxySettings,
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    router: Router,
    config: BalancerConfig,
    pool: Arc<ServerPool>,
}

impl HttpServer {
    /// Create a new HTTP server from validated configuration.
    ///
    /// `backends` is the validated URL list produced by config validation;
    /// the pool is seeded from it with every backend initially alive.
    pub fn new(config: BalancerConfig, backends: Vec<Url>) -> Self {
        let pool = Arc::new(ServerPool::new(backends));

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(
            config.proxy.connect_timeout_secs,
        )));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState {
            pool: pool.clone(),
            client,
            proxy: config.proxy.clone(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            pool,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &BalancerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.proxy.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Spawns the health monitor as the single background task; both it and
    /// the server itself stop when `shutdown` triggers.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = self.pool.len(),
            "HTTP server starting"
        );

        if self.config.health_check.enabled {
            let monitor = HealthMonitor::new(self.pool.clone(), self.config.health_check.clone());
            let monitor_shutdown = shutdown.subscribe();
            tokio::spawn(async move {
                monitor.run(monitor_shutdown).await;
            });
        }

        let mut server_shutdown = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = server_shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a handle to the server pool.
    pub fn pool(&self) -> Arc<ServerPool> {
        self.pool.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BalancerConfig {
        &self.config
    }
}

/// Main proxy handler.
///
/// Selects a live backend and forwards the request, failing over to a
/// different backend on transport errors until the attempt budget runs out.
/// Attempts count total tries including the first; the default budget of 5
/// means at most 5 backends are contacted for one inbound request.
async fn proxy_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // Buffer the body up front so it can be replayed on failover.
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.proxy.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!(request_id = %request_id, path = %path, "Request body over limit");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let attempt_timeout = Duration::from_secs(state.proxy.upstream_timeout_secs);

    for attempt in 1..=state.proxy.max_attempts {
        // A request only sees backends believed live at selection time; an
        // empty live set is terminal for this request, not retried.
        let peer = match state.pool.next_live_peer() {
            Some(peer) => peer,
            None => {
                tracing::warn!(request_id = %request_id, path = %path, "No live backends");
                return service_unavailable();
            }
        };

        tracing::debug!(
            request_id = %request_id,
            attempt,
            backend = %peer.url,
            method = %method,
            path = %path,
            "Forwarding request"
        );

        match forward(&state.client, &peer, &parts, body.clone(), attempt_timeout).await {
            Ok(response) => {
                // Relay the backend response unmodified. HTTP error statuses
                // are a normal outcome here; only connectivity failures fail
                // over. Once the response head is on its way to the caller,
                // a mid-body error aborts this response instead of retrying.
                let (parts, body) = response.into_parts();
                return Response::from_parts(parts, Body::new(body));
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    attempt,
                    backend = %peer.url,
                    error = %e,
                    "Transport failure, marking backend dead"
                );
                state.pool.mark_status(&peer.url, false);
            }
        }
    }

    tracing::warn!(request_id = %request_id, path = %path, "Attempt budget exhausted");
    service_unavailable()
}

fn service_unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "Service not available").into_response()
}
