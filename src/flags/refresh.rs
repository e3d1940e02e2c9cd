//! Background toggle refresh.
//!
//! # Responsibilities
//! - Periodically fetch the toggle listing from the provider
//! - Publish successful fetches as new snapshots
//! - Absorb failures, backing off until the provider recovers

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::time;

use crate::config::ProviderConfig;
use crate::flags::provider::ProviderClient;
use crate::flags::store::FlagStore;
use crate::observability::metrics;
use crate::resilience::backoff::refresh_backoff;

pub(crate) struct RefreshLoop {
    provider: ProviderClient,
    store: Arc<FlagStore>,
    interval: Duration,
    max_backoff: Duration,
}

impl RefreshLoop {
    pub fn new(provider: ProviderClient, store: Arc<FlagStore>, config: &ProviderConfig) -> Self {
        Self {
            provider,
            store,
            interval: Duration::from_secs(config.refresh_interval_secs),
            max_backoff: Duration::from_secs(config.max_backoff_secs),
        }
    }

    /// Run until the shutdown signal fires. The first fetch happens
    /// immediately so the client becomes ready as soon as the provider
    /// answers.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            endpoint = %self.provider.endpoint(),
            interval_secs = self.interval.as_secs(),
            "flag refresh loop starting"
        );

        let mut consecutive_failures: u32 = 0;

        loop {
            let start = Instant::now();
            match self.provider.fetch_features().await {
                Ok(snapshot) => {
                    self.store.install(snapshot);
                    consecutive_failures = 0;
                    metrics::record_refresh(true, start);
                }
                Err(e) => {
                    consecutive_failures = consecutive_failures.saturating_add(1);
                    self.store.record_failure(&e);
                    metrics::record_refresh(false, start);
                    tracing::warn!(
                        error = %e,
                        consecutive_failures,
                        "flag fetch failed"
                    );
                }
            }

            let delay = if consecutive_failures > 0 {
                refresh_backoff(consecutive_failures, self.interval, self.max_backoff)
            } else {
                self.interval
            };

            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = shutdown.recv() => {
                    tracing::info!("flag refresh loop received shutdown signal, exiting");
                    break;
                }
            }
        }
    }
}
