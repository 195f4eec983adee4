//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream server
//! - Track liveness (alive/dead) for load balancing

use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

/// A single upstream server.
///
/// The address is fixed at construction; only the liveness flag changes at
/// runtime. Flag writes come from the health monitor and from the request
/// handler's failure path, both going through the owning pool.
#[derive(Debug)]
pub struct Backend {
    /// Full address of the backend (scheme + host + port).
    pub url: Url,
    /// Pre-rendered `host:port` for URI rewriting and TCP probes.
    pub authority: String,
    /// Whether the backend is currently believed reachable.
    alive: AtomicBool,
}

impl Backend {
    /// Create a new backend, initially alive.
    ///
    /// The URL must have a host; config validation guarantees this before
    /// any `Backend` is constructed.
    pub fn new(url: Url) -> Self {
        let host = url.host_str().unwrap_or_default();
        let authority = match url.port_or_known_default() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        Self {
            url,
            authority,
            alive: AtomicBool::new(true),
        }
    }

    /// Return the current liveness flag.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Overwrite the liveness flag.
    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_backend_starts_alive() {
        let backend = Backend::new("http://127.0.0.1:8080".parse().unwrap());
        assert!(backend.is_alive());
        assert_eq!(backend.authority, "127.0.0.1:8080");
    }

    #[test]
    fn authority_falls_back_to_default_port() {
        let backend = Backend::new("http://example.com".parse().unwrap());
        assert_eq!(backend.authority, "example.com:80");
    }
}
