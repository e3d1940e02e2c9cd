//! Shared flag state between the refresh task and request handlers.
//!
//! The snapshot is published with an atomic pointer swap, so readers always
//! see one complete toggle set and never wait on a refresh in progress.

use std::sync::Arc;

use arc_swap::ArcSwap;
use thiserror::Error;
use tokio::sync::{broadcast, watch};

use crate::flags::provider::ProviderError;
use crate::flags::snapshot::{EvaluationContext, FlagSnapshot};
use crate::flags::state::{FlagState, StateCell};
use crate::observability::metrics;

/// A non-fatal refresh failure, as delivered to error subscribers.
#[derive(Debug, Clone, Error)]
#[error("flag refresh failed: {message}")]
pub struct RefreshError {
    pub message: String,
}

impl From<&ProviderError> for RefreshError {
    fn from(err: &ProviderError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

pub(crate) struct FlagStore {
    snapshot: ArcSwap<FlagSnapshot>,
    state: StateCell,
    ready_tx: watch::Sender<bool>,
    errors_tx: broadcast::Sender<RefreshError>,
}

impl FlagStore {
    pub fn new() -> Self {
        let (ready_tx, _) = watch::channel(false);
        let (errors_tx, _) = broadcast::channel(16);
        Self {
            snapshot: ArcSwap::from_pointee(FlagSnapshot::empty()),
            state: StateCell::new(),
            ready_tx,
            errors_tx,
        }
    }

    /// Publish a freshly fetched snapshot and flip the ready signal if this
    /// was the first success.
    pub fn install(&self, snapshot: FlagSnapshot) {
        let count = snapshot.len();
        let version = snapshot.version();
        self.snapshot.store(Arc::new(snapshot));
        self.state.mark_ready();
        metrics::record_flag_state(FlagState::Ready);

        // The ready signal is one-shot: false → true exactly once.
        if !*self.ready_tx.borrow() {
            let _ = self.ready_tx.send(true);
        }

        tracing::debug!(flags = count, version, "toggle snapshot installed");
    }

    /// Record a failed fetch. The current snapshot, if any, stays in effect.
    pub fn record_failure(&self, error: &ProviderError) {
        self.state.mark_error();
        metrics::record_flag_state(FlagState::Error);
        let _ = self.errors_tx.send(RefreshError::from(error));
    }

    pub fn state(&self) -> FlagState {
        self.state.get()
    }

    /// True once any fetch has succeeded. Stays true through later Error
    /// states, where the last-known-good snapshot keeps serving.
    pub fn has_snapshot(&self) -> bool {
        *self.ready_tx.borrow()
    }

    pub fn evaluate(&self, flag: &str, ctx: &EvaluationContext) -> Option<bool> {
        self.snapshot.load().evaluate(flag, ctx)
    }

    pub fn subscribe_ready(&self) -> watch::Receiver<bool> {
        self.ready_tx.subscribe()
    }

    pub fn subscribe_errors(&self) -> broadcast::Receiver<RefreshError> {
        self.errors_tx.subscribe()
    }
}
