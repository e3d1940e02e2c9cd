//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init observability → Start flag client → Serve
//!
//! Shutdown:
//!     SIGTERM/SIGINT (signals.rs) → broadcast (shutdown.rs)
//!         → HTTP server drains, refresh loop exits
//!         → flag client join, bounded by the grace period
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then subsystems, listener last
//! - Shutdown fan-out is a broadcast; tasks stop independently
//! - The refresh-task join has a timeout: teardown never hangs

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
