//! Feature flag subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     FlagClient::initialize → spawn refresh loop → return handle (Uninitialized)
//!
//! Refresh (refresh.rs):
//!     fetch toggles (provider.rs) → build snapshot (snapshot.rs)
//!         → atomic swap into store (store.rs) → state machine (state.rs)
//!
//! Request path:
//!     is_ready? → evaluate against current snapshot → bool
//! ```
//!
//! # Design Decisions
//! - Readers get the last committed snapshot; they never wait on a refresh
//! - Readiness is an explicit query plus a one-shot signal, never inferred
//! - Provider failures are absorbed here; callers only see booleans

pub mod client;
pub mod provider;
pub mod refresh;
pub mod snapshot;
pub mod state;
pub mod store;

pub use client::FlagClient;
pub use provider::ProviderError;
pub use snapshot::EvaluationContext;
pub use state::FlagState;
pub use store::RefreshError;
