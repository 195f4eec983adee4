//! Request forwarding primitive.
//!
//! # Responsibilities
//! - Rewrite a buffered inbound request to target a chosen backend
//! - Issue it and hand back the backend's response or a transport error
//!
//! This is a pure forwarding step with no state of its own; peer selection
//! and failover live in the server module.

use std::str::FromStr;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::request::Parts;
use axum::http::uri::{Authority, Scheme, Uri};
use axum::http::{Request, Response};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use tokio::time;

use crate::load_balancer::backend::Backend;

/// Shared upstream HTTP client.
pub type ProxyClient = Client<HttpConnector, Body>;

/// A connectivity-level failure while talking to a backend.
///
/// An HTTP error status from the backend is not a `ForwardError`; it is a
/// normal response and is relayed to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

/// Forward one request to `backend`, preserving method, version, headers,
/// and body. The destination scheme and authority are rewritten; path and
/// query pass through untouched.
pub async fn forward(
    client: &ProxyClient,
    backend: &Backend,
    parts: &Parts,
    body: Bytes,
    timeout: Duration,
) -> Result<Response<Incoming>, ForwardError> {
    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    if let Ok(authority) = Authority::from_str(&backend.authority) {
        uri_parts.authority = Some(authority);
    }
    let uri = Uri::from_parts(uri_parts).unwrap_or_else(|_| parts.uri.clone());

    let mut builder = Request::builder()
        .method(parts.method.clone())
        .uri(uri)
        .version(parts.version);
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
    }
    let request = builder.body(Body::from(body))?;

    match time::timeout(timeout, client.request(request)).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(e)) => Err(ForwardError::Upstream(e)),
        Err(_) => Err(ForwardError::Timeout(timeout)),
    }
}
