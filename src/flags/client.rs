//! The flag client handle.
//!
//! One `FlagClient` is constructed at startup and injected into the router;
//! clones share the same store and refresh task. All provider errors are
//! absorbed here, so callers only ever see booleans and state queries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use crate::config::ProviderConfig;
use crate::flags::provider::{ProviderClient, ProviderError};
use crate::flags::refresh::RefreshLoop;
use crate::flags::snapshot::EvaluationContext;
use crate::flags::store::{FlagStore, RefreshError};
use crate::flags::state::FlagState;
use crate::lifecycle::Shutdown;

/// Handle to the flag subsystem. Cheap to clone.
#[derive(Clone)]
pub struct FlagClient {
    store: Arc<FlagStore>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl FlagClient {
    /// Start background initialization and return immediately.
    ///
    /// The handle starts in `Uninitialized`; the spawned refresh loop fetches
    /// on its own schedule and also listens on the shutdown broadcast. Only
    /// malformed configuration fails here; an unreachable provider does not.
    pub fn initialize(config: &ProviderConfig, shutdown: &Shutdown) -> Result<Self, ProviderError> {
        let provider = ProviderClient::new(config)?;
        let store = Arc::new(FlagStore::new());

        let refresh = RefreshLoop::new(provider, store.clone(), config);
        let task = tokio::spawn(refresh.run(shutdown.subscribe()));

        Ok(Self {
            store,
            task: Arc::new(Mutex::new(Some(task))),
        })
    }

    /// Current lifecycle state of the client.
    pub fn state(&self) -> FlagState {
        self.store.state()
    }

    /// True once the first fetch has succeeded. Stays true afterwards, even
    /// while refreshes fail and the last-known-good snapshot keeps serving.
    pub fn is_ready(&self) -> bool {
        self.store.has_snapshot()
    }

    /// Resolve once the client first becomes ready.
    ///
    /// Any number of waiters may await this, before or after the fact; the
    /// signal fires exactly once and late subscribers resolve immediately.
    /// If the client never becomes ready the future never resolves.
    pub async fn ready(&self) {
        let mut rx = self.store.subscribe_ready();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // Store dropped without ever becoming ready.
                std::future::pending::<()>().await;
            }
        }
    }

    /// Subscribe to non-fatal refresh failures, one event per failed fetch.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<RefreshError> {
        self.store.subscribe_errors()
    }

    /// Evaluate a flag against the current snapshot.
    ///
    /// Never faults: before the first successful fetch, and for unknown
    /// flags, this resolves to `false`.
    pub fn is_enabled(&self, flag: &str, ctx: &EvaluationContext) -> bool {
        if !self.is_ready() {
            return false;
        }
        match self.store.evaluate(flag, ctx) {
            Some(enabled) => enabled,
            None => {
                tracing::debug!(flag, "flag not present in snapshot, defaulting to disabled");
                false
            }
        }
    }

    /// Wait for the refresh task to finish, bounded by `grace`.
    ///
    /// The shutdown broadcast must already have been triggered. Idempotent;
    /// the task handle is taken by the first caller. On timeout the task is
    /// aborted so it cannot outlive the process teardown.
    pub async fn shutdown(&self, grace: Duration) {
        let task = self.task.lock().await.take();
        let Some(task) = task else {
            return;
        };

        let abort = task.abort_handle();
        match tokio::time::timeout(grace, task).await {
            Ok(_) => tracing::info!("flag refresh task stopped"),
            Err(_) => {
                abort.abort();
                tracing::warn!(
                    grace_secs = grace.as_secs(),
                    "flag refresh task did not stop within grace period, aborted"
                );
            }
        }
    }
}
