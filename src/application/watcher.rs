//! Watcher Orchestrator
//!
//! Drives the poll loop: fetch the catalogue across all shards, filter
//! and join against the rarity index, diff against the previous snapshot,
//! and hand changes to the reporter. A cycle error is logged and the loop
//! continues after the standard delay; the inter-cycle delay is fixed
//! regardless of how long the fetch phase took.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::adapters::marketplace::{
    refresh_once, spawn_refresh, CatalogueFetcher, CursorStore, RefreshConfig,
};
use crate::adapters::Reporter;
use crate::domain::{
    FilterEngine, MatchedListing, RarityIndex, SnapshotDiff, SnapshotDiffer, SortKey,
    LAMPORTS_PER_SOL,
};
use crate::ports::{MarketError, MarketplacePort};

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("marketplace error: {0}")]
    Market(#[from] MarketError),
}

/// Watcher tuning parameters
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Per-shard request timeout
    pub request_timeout: Duration,
    /// Fixed delay between poll cycles
    pub poll_interval: Duration,
    /// Snapshot sort key
    pub sort_key: SortKey,
    /// Background cursor refresh scheduling
    pub refresh: RefreshConfig,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(100),
            poll_interval: Duration::from_secs(5),
            sort_key: SortKey::default(),
            refresh: RefreshConfig::default(),
        }
    }
}

/// Result of one poll cycle
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// Offers aggregated across all successful shards
    pub total_offers: usize,
    /// Minimum reported price floor, in lamports
    pub price_floor: u64,
    /// The sorted snapshot after this cycle
    pub snapshot: Vec<MatchedListing>,
    /// `None` when the snapshot was identical to the previous cycle
    pub diff: Option<SnapshotDiff>,
}

/// Poll-loop orchestrator
pub struct Watcher<P: MarketplacePort + 'static> {
    port: Arc<P>,
    cursors: Arc<CursorStore>,
    fetcher: CatalogueFetcher<P>,
    rarity: RarityIndex,
    filter: FilterEngine,
    differ: RwLock<SnapshotDiffer>,
    reporter: Reporter,
    config: WatcherConfig,
    is_running: Arc<RwLock<bool>>,
}

impl<P: MarketplacePort + 'static> Watcher<P> {
    pub fn new(
        port: Arc<P>,
        cursors: Arc<CursorStore>,
        rarity: RarityIndex,
        filter: FilterEngine,
        config: WatcherConfig,
    ) -> Self {
        let fetcher = CatalogueFetcher::new(
            Arc::clone(&port),
            Arc::clone(&cursors),
            config.request_timeout,
        );

        Self {
            port,
            cursors,
            fetcher,
            rarity,
            filter,
            differ: RwLock::new(SnapshotDiffer::new(config.sort_key)),
            reporter: Reporter::new(),
            config,
            is_running: Arc::new(RwLock::new(false)),
        }
    }

    /// Walk the feed once to build the initial cursor list
    pub async fn prime(&self) -> Result<usize, WatcherError> {
        let retrieved = refresh_once(self.cursors.as_ref(), self.port.as_ref()).await?;
        Ok(retrieved)
    }

    /// Run the poll loop until `stop` is called
    pub async fn run(&self) -> Result<(), WatcherError> {
        *self.is_running.write().await = true;

        info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "starting watcher"
        );

        if let Err(e) = self.prime().await {
            warn!(error = %e, "initial cursor refresh failed, starting from seed list");
        }

        let refresh_task = spawn_refresh(
            Arc::clone(&self.cursors),
            Arc::clone(&self.port),
            self.config.refresh.clone(),
        );

        while *self.is_running.read().await {
            match self.run_cycle().await {
                Ok(outcome) => {
                    if let Some(diff) = &outcome.diff {
                        self.reporter.report_cycle(&outcome.snapshot, diff);
                    }
                }
                Err(e) => error!(error = %e, "poll cycle failed"),
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }

        refresh_task.abort();
        info!("watcher stopped");
        Ok(())
    }

    /// Execute one poll cycle: fetch, filter, diff
    pub async fn run_cycle(&self) -> Result<CycleOutcome, WatcherError> {
        debug!("fetching catalogue");
        let catalogue = self.fetcher.fetch_catalogue().await;

        info!(
            offers = catalogue.offers.len(),
            floor_sol = catalogue.price_floor as f64 / LAMPORTS_PER_SOL as f64,
            "catalogue fetched"
        );

        let matched = self.filter.filter_offers(&catalogue.offers, &self.rarity);

        let mut differ = self.differ.write().await;
        let diff = differ.diff(matched);

        Ok(CycleOutcome {
            total_offers: catalogue.offers.len(),
            price_floor: catalogue.price_floor,
            snapshot: differ.previous().to_vec(),
            diff,
        })
    }

    /// Stop the poll loop
    pub async fn stop(&self) {
        *self.is_running.write().await = false;
        info!("stop signal sent to watcher");
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }
}
