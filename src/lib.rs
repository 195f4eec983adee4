//! Round-Robin HTTP Load Balancer Library

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;

pub use config::{BalancerConfig, ConfigError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
