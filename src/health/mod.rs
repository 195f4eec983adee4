//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     Periodic timer
//!     → TCP probe each backend
//!     → Write liveness flag into the pool
//!
//! Passive failure detection lives in the request path: a transport error
//! while forwarding marks that backend dead immediately.
//! ```
//!
//! # Design Decisions
//! - Active and passive checks are complementary
//! - Each cycle reflects the latest probe; no hysteresis, flapping tolerated
//! - The monitor only flips flags, it never adds or removes backends

pub mod active;

pub use active::HealthMonitor;
