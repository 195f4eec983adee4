//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, proxy handler)
//!     → [load balancer picks a live backend]
//!     → forward.rs (rewrite destination, issue request)
//!     → backend response relayed to client unchanged
//!     → on transport failure: mark dead, fail over, bounded retries
//! ```

pub mod forward;
pub mod server;

pub use forward::{forward, ForwardError, ProxyClient};
pub use server::HttpServer;
