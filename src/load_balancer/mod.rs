//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Request arrives
//!     → pool.rs (advance rotation cursor, skip dead backends)
//!     → backend.rs (selected upstream)
//!     → forwarded by the http subsystem
//!
//! Liveness updates flow the other way:
//!     health monitor / request failure path → pool.rs → backend flag
//! ```
//!
//! # Design Decisions
//! - Membership is static; backends are flagged dead, never removed
//! - The cursor advances per request and is written back to the position
//!   actually handed out, so rotation stays fair across the live subset
//! - Dead backends are excluded from selection

pub mod backend;
pub mod pool;
