//! Flag client state machine.
//!
//! # States
//! - Uninitialized: no fetch has succeeded yet
//! - Ready: at least the latest fetch succeeded, a snapshot is installed
//! - Error: the latest fetch failed
//!
//! # State Transitions
//! ```text
//! Uninitialized → Ready: first successful fetch
//! Uninitialized → Error: initial fetch failed
//! Ready → Error: refresh failed (last snapshot stays in effect)
//! Error → Ready: a later refresh succeeded
//! ```
//!
//! # Design Decisions
//! - State changes logged for observability
//! - Error keeps the last-known-good snapshot; it only describes the fetch path

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of the flag client.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagState {
    Uninitialized = 0,
    Ready = 1,
    Error = 2,
}

impl From<u8> for FlagState {
    fn from(val: u8) -> Self {
        match val {
            1 => FlagState::Ready,
            2 => FlagState::Error,
            _ => FlagState::Uninitialized,
        }
    }
}

impl FlagState {
    /// Stable label for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagState::Uninitialized => "uninitialized",
            FlagState::Ready => "ready",
            FlagState::Error => "error",
        }
    }
}

/// Atomic cell holding the current [`FlagState`].
#[derive(Debug)]
pub(crate) struct StateCell {
    state: AtomicU8,
}

impl StateCell {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(FlagState::Uninitialized as u8),
        }
    }

    pub fn get(&self) -> FlagState {
        FlagState::from(self.state.load(Ordering::Relaxed))
    }

    /// Record a successful fetch. Returns the previous state.
    pub fn mark_ready(&self) -> FlagState {
        let prev = FlagState::from(self.state.swap(FlagState::Ready as u8, Ordering::Relaxed));
        match prev {
            FlagState::Uninitialized => tracing::info!("flag client ready"),
            FlagState::Error => tracing::info!("flag client recovered"),
            FlagState::Ready => {}
        }
        prev
    }

    /// Record a failed fetch. Returns the previous state.
    pub fn mark_error(&self) -> FlagState {
        let prev = FlagState::from(self.state.swap(FlagState::Error as u8, Ordering::Relaxed));
        match prev {
            FlagState::Uninitialized => {
                tracing::warn!("initial flag fetch failed, serving defaults until recovery")
            }
            FlagState::Ready => {
                tracing::warn!("flag refresh failing, keeping last-known-good snapshot")
            }
            FlagState::Error => {}
        }
        prev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized() {
        assert_eq!(StateCell::new().get(), FlagState::Uninitialized);
    }

    #[test]
    fn success_and_failure_transitions() {
        let cell = StateCell::new();

        assert_eq!(cell.mark_error(), FlagState::Uninitialized);
        assert_eq!(cell.get(), FlagState::Error);

        assert_eq!(cell.mark_ready(), FlagState::Error);
        assert_eq!(cell.get(), FlagState::Ready);

        assert_eq!(cell.mark_error(), FlagState::Ready);
        assert_eq!(cell.get(), FlagState::Error);
    }

    #[test]
    fn unknown_discriminant_folds_to_uninitialized() {
        assert_eq!(FlagState::from(7), FlagState::Uninitialized);
    }
}
