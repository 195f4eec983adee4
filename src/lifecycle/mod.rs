//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse flags → Load config → Validate → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C received → broadcast signal
//!     → server stops accepting and drains
//!     → health monitor exits its loop
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
