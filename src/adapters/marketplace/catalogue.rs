//! Catalogue Fetcher
//!
//! Fetches the full catalogue by issuing one bounded-timeout page request
//! per known cursor concurrently, then aggregating the results in cursor
//! order. A failed or timed-out shard contributes nothing; a shard whose
//! body carried no `offers` field is an end-of-data signal that stops
//! aggregation at that point. The price floor is the minimum reported
//! floor across successful shards, seeded at a large sentinel.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use super::cursors::CursorStore;
use crate::domain::{Offer, LAMPORTS_PER_SOL};
use crate::ports::MarketplacePort;

/// Price floor seed: 10,000 SOL in lamports. With zero successful shards
/// the aggregate floor is exactly this sentinel, never a plausible
/// false-low value.
pub const PRICE_FLOOR_SENTINEL: u64 = 10_000 * LAMPORTS_PER_SOL;

/// Aggregated result of one fetch pass
#[derive(Debug, Clone)]
pub struct Catalogue {
    pub offers: Vec<Offer>,
    /// Minimum reported price floor across successful shards, in lamports
    pub price_floor: u64,
}

/// Concurrent per-cursor catalogue fetcher
pub struct CatalogueFetcher<P: MarketplacePort> {
    port: Arc<P>,
    cursors: Arc<CursorStore>,
    request_timeout: Duration,
}

impl<P: MarketplacePort> CatalogueFetcher<P> {
    pub fn new(port: Arc<P>, cursors: Arc<CursorStore>, request_timeout: Duration) -> Self {
        Self {
            port,
            cursors,
            request_timeout,
        }
    }

    /// Fetch every shard concurrently and aggregate.
    ///
    /// Never fails: per-shard errors are logged and their contribution is
    /// omitted from the aggregate.
    pub async fn fetch_catalogue(&self) -> Catalogue {
        let cursors = self.cursors.snapshot().await;
        let timeout = self.request_timeout;

        let fetches = cursors.iter().map(|cursor| {
            let port = Arc::clone(&self.port);
            let cursor = cursor.clone();
            async move { tokio::time::timeout(timeout, port.fetch_page(&cursor)).await }
        });
        let results = join_all(fetches).await;

        let mut offers = Vec::new();
        let mut price_floor = PRICE_FLOOR_SENTINEL;

        for (shard, result) in results.into_iter().enumerate() {
            let page = match result {
                Err(_) => {
                    warn!(
                        shard,
                        timeout_secs = timeout.as_secs(),
                        "shard fetch timed out"
                    );
                    continue;
                }
                Ok(Err(e)) => {
                    warn!(shard, error = %e, "shard fetch failed");
                    continue;
                }
                Ok(Ok(page)) => page,
            };

            let Some(shard_offers) = page.offers else {
                debug!(shard, "shard reported end of data");
                break;
            };

            offers.extend(shard_offers);
            if let Some(floor) = page.price_floor {
                price_floor = price_floor.min(floor);
            }
        }

        Catalogue {
            offers,
            price_floor,
        }
    }
}
