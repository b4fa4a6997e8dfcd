//! The config observer controller.
//!
//! One worker drains the work queue. Each dequeued item waits for a token
//! from the pass rate limiter, then runs a reconciliation pass:
//! observe, compare with the stored copy, write only on divergence.

mod watched;
pub use watched::*;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tokio::time::Instant;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::cache::CacheSynced;
use crate::client::OperatorConfigClient;
use crate::flowcontrol::TokenBucketRateLimiter;
use crate::metrics::register_custom_metrics;
use crate::metrics::OBSERVED_CONFIG_WRITES;
use crate::metrics::SYNC_DURATION_METRIC;
use crate::metrics::SYNC_FAILURES;
use crate::observe::default_observers;
use crate::observe::run_chain;
use crate::observe::Listers;
use crate::observe::ObserveConfigFn;
use crate::queue::default_controller_rate_limiter;
use crate::queue::RateLimitingQueue;
use crate::queue::WorkQueue;
use crate::reporter::ErrorReporter;
use crate::Error;
use crate::ObservedConfig;
use crate::ObserverConfig;
use crate::RawExtension;
use crate::Result;

pub struct ConfigObserver {
    client: Arc<dyn OperatorConfigClient>,
    queue: WorkQueue,
    listers: Listers,
    synced: Vec<Arc<dyn CacheSynced>>,
    rate_limiter: TokenBucketRateLimiter,
    observers: Vec<ObserveConfigFn>,
    reporter: Arc<dyn ErrorReporter>,
    operator_config_name: String,
    cache_sync_poll_interval: Duration,
}

impl ConfigObserver {
    /// Builds the controller, registers its metrics and subscribes it to
    /// every store in `watched`.
    ///
    /// `config` is expected to be validated already.
    pub fn new(
        config: &ObserverConfig,
        client: Arc<dyn OperatorConfigClient>,
        watched: &WatchedSources,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        register_custom_metrics();
        let queue = RateLimitingQueue::new(
            config.controller.queue_name.clone(),
            Box::new(default_controller_rate_limiter(&config.retry)),
        );
        watched.register_handlers(&queue, &config.sources.target_namespace, reporter.clone());

        Self {
            client,
            queue,
            listers: watched.listers(&config.sources),
            synced: watched.synced(),
            rate_limiter: TokenBucketRateLimiter::from_config(&config.rate_limit),
            observers: default_observers(),
            reporter,
            operator_config_name: config.controller.operator_config_name.clone(),
            cache_sync_poll_interval: config.controller.cache_sync_poll_interval(),
        }
    }

    /// Replaces the observer chain.
    pub fn with_observers(
        mut self,
        observers: Vec<ObserveConfigFn>,
    ) -> Self {
        self.observers = observers;
        self
    }

    pub fn queue(&self) -> &WorkQueue {
        &self.queue
    }

    /// Waits for every cache to sync, then processes work items with a
    /// single worker until `shutdown_signal` fires.
    ///
    /// `workers` is accepted for compatibility only: the queue never holds
    /// more than one key, so exactly one worker runs. On shutdown the queue
    /// stops handing out items and the in-flight pass is allowed to finish.
    pub async fn run(
        self: Arc<Self>,
        workers: usize,
        mut shutdown_signal: watch::Receiver<()>,
    ) -> Result<()> {
        info!("Starting ConfigObserver");
        if workers != 1 {
            debug!(requested = workers, "only one worker is started");
        }

        if !wait_for_cache_sync(&mut shutdown_signal, &self.synced, self.cache_sync_poll_interval).await {
            warn!("shutdown signal received before caches synced");
            self.queue.shut_down();
            info!("Shutting down ConfigObserver");
            return Ok(());
        }

        let worker = {
            let this = self.clone();
            tokio::spawn(async move { this.run_worker().await })
        };

        let _ = shutdown_signal.changed().await;
        self.queue.shut_down();
        info!("Shutting down ConfigObserver");

        worker
            .await
            .map_err(|e| Error::Fatal(format!("config observer worker failed: {e}")))
    }

    async fn run_worker(&self) {
        while self.process_next_work_item().await {}
    }

    /// Handles one work item. Returns `false` once the queue is shut down.
    pub async fn process_next_work_item(&self) -> bool {
        let Some(key) = self.queue.get().await else {
            return false;
        };

        // Bound how often passes run, however often we are triggered.
        self.rate_limiter.accept().await;

        let start = Instant::now();
        let result = self.sync().await;
        SYNC_DURATION_METRIC
            .with_label_values(&[self.queue.name()])
            .observe(start.elapsed().as_secs_f64() * 1000.0);

        match result {
            Ok(()) => self.queue.forget(&key),
            Err(e) => {
                SYNC_FAILURES
                    .with_label_values(&[self.queue.name(), e.kind()])
                    .inc();
                self.reporter.report(key, &e);
                self.queue.add_rate_limited(key);
            }
        }
        self.queue.done(&key);
        true
    }

    /// One reconciliation pass.
    ///
    /// The stored document is replaced only when it differs structurally
    /// from the freshly observed one, and at most one update is issued.
    pub async fn sync(&self) -> Result<()> {
        let observed = run_chain(&self.observers, &self.listers)?;

        let mut operator_config = self.client.get(&self.operator_config_name).await?;

        let previous = match ObservedConfig::from_raw(&operator_config.spec.observed_config.raw) {
            Ok(previous) => previous,
            Err(e) => {
                warn!("treating undecodable observed config as empty: {}", e);
                ObservedConfig::new()
            }
        };

        if previous == observed {
            debug!("observed config unchanged");
            return Ok(());
        }

        info!(
            name = %self.operator_config_name,
            changed = ?previous.diff(&observed),
            "writing updated observed config"
        );
        operator_config.spec.observed_config = RawExtension::from_document(&observed)?;
        self.client.update(operator_config).await?;
        OBSERVED_CONFIG_WRITES
            .with_label_values(&[self.queue.name()])
            .inc();
        Ok(())
    }
}

/// Polls `synced` every `interval` until all report ready.
///
/// Returns `false` if `shutdown_signal` fires first.
pub async fn wait_for_cache_sync(
    shutdown_signal: &mut watch::Receiver<()>,
    synced: &[Arc<dyn CacheSynced>],
    interval: Duration,
) -> bool {
    loop {
        if synced.iter().all(|s| s.has_synced()) {
            debug!("caches synced");
            return true;
        }
        tokio::select! {
            _ = sleep(interval) => {}
            _ = shutdown_signal.changed() => return false,
        }
    }
}
