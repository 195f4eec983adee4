//! Server pool management.
//!
//! # Responsibilities
//! - Own the fixed set of backends and their liveness flags
//! - Rotate through live backends (skip-dead round robin)
//! - Apply liveness updates from the health monitor and request path

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

use crate::load_balancer::backend::Backend;

/// The set of candidate upstreams plus the rotation cursor.
///
/// Membership is fixed at startup; at runtime only the per-backend liveness
/// flags and the cursor move. The flags and the cursor are the only shared
/// mutable state in the proxy, and every access goes through this type.
#[derive(Debug, Default)]
pub struct ServerPool {
    /// Backends in configuration order. The cursor is a position in this
    /// order, so the order never changes after construction.
    backends: Vec<Arc<Backend>>,
    /// Last position handed out, interpreted modulo `backends.len()`.
    cursor: AtomicUsize,
}

impl ServerPool {
    /// Build a pool from the configured backend URLs, all initially alive.
    ///
    /// Duplicate addresses are dropped; adding the same backend twice yields
    /// one record (first occurrence wins).
    pub fn new(urls: Vec<Url>) -> Self {
        let mut backends: Vec<Arc<Backend>> = Vec::with_capacity(urls.len());
        for url in urls {
            if backends.iter().any(|b| b.url == url) {
                tracing::warn!(addr = %url, "Duplicate backend address ignored");
                continue;
            }
            backends.push(Arc::new(Backend::new(url)));
        }
        Self {
            backends,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of configured backends.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// True if no backends are configured.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// All backends, for the health monitor to probe.
    pub fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    /// Advance the rotation cursor one position and return the new value.
    ///
    /// `fetch_add` makes concurrent callers observe distinct counter values,
    /// so within one rotation no two callers are handed the same index.
    /// Returns 0 on an empty pool; callers handle that case separately.
    pub fn next_index(&self) -> usize {
        if self.backends.is_empty() {
            return 0;
        }
        self.cursor
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_add(1)
            % self.backends.len()
    }

    /// Return the next live backend in rotation order, or `None` if every
    /// backend is currently marked dead.
    ///
    /// Scans forward from the advanced cursor, wrapping past the end, for at
    /// most one full rotation. The found position is stored back into the
    /// cursor so the next caller starts scanning just past it, keeping the
    /// rotation fair across the live subset rather than the full list.
    pub fn next_live_peer(&self) -> Option<Arc<Backend>> {
        let len = self.backends.len();
        if len == 0 {
            return None;
        }
        let start = self.next_index();
        for step in 0..len {
            let idx = (start + step) % len;
            let backend = &self.backends[idx];
            if backend.is_alive() {
                self.cursor.store(idx, Ordering::Relaxed);
                return Some(backend.clone());
            }
        }
        None
    }

    /// Set the liveness flag of the backend with the given address.
    ///
    /// The flag is only written when it differs from the current value;
    /// repeating the same call is a no-op, not an error. Unknown addresses
    /// are ignored.
    pub fn mark_status(&self, url: &Url, alive: bool) {
        for backend in &self.backends {
            if backend.url == *url {
                if backend.is_alive() != alive {
                    backend.set_alive(alive);
                    tracing::info!(
                        addr = %backend.url,
                        alive,
                        "Backend status changed"
                    );
                }
                return;
            }
        }
        tracing::debug!(addr = %url, "Status update for unknown backend ignored");
    }

    /// Count of backends currently marked alive.
    pub fn live_count(&self) -> usize {
        self.backends.iter().filter(|b| b.is_alive()).count()
    }
}
