//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! balancer. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

/// Root configuration for the load balancer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BalancerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream server addresses, in rotation order.
    pub backends: Vec<String>,

    /// Health check settings.
    pub health_check: HealthCheckConfig,

    /// Forwarding and failover settings.
    pub proxy: ProxySettings,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3030").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3030".to_string(),
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Enable active health checks.
    pub enabled: bool,

    /// Probe interval in seconds.
    pub interval_secs: u64,

    /// Per-probe timeout in seconds. Bounded so one unreachable backend
    /// cannot stall a whole cycle.
    pub timeout_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60,
            timeout_secs: 2,
        }
    }
}

/// Forwarding and failover configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Maximum backend attempts per request, counting the first try.
    pub max_attempts: u32,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Per-attempt response timeout in seconds. A backend that exceeds it
    /// counts as a transport failure and triggers failover.
    pub upstream_timeout_secs: u64,

    /// Total per-request timeout in seconds, covering all attempts.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes. Bodies are buffered so they can
    /// be replayed on failover; larger requests are rejected with 413.
    pub max_body_bytes: usize,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            connect_timeout_secs: 5,
            upstream_timeout_secs: 10,
            request_timeout_secs: 60,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}
