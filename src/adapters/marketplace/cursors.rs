//! Cursor Store
//!
//! Holds the set of pagination cursors that shard the catalogue. The list
//! is an immutable snapshot swapped atomically by a single writer (the
//! background refresh task); readers clone the `Arc` and may observe a
//! stale-but-consistent list.
//!
//! The refresh walks the feed from the first page, collecting each
//! `next_cursor` until a page has no offers or no continuation, and
//! replaces the store only when at least one continuation cursor was
//! retrieved so an empty fetch never wipes a valid list.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::ports::{MarketError, MarketplacePort};

/// Cursor of the first page
pub const FIRST_PAGE_CURSOR: &str = "";

/// Upper bound on pages walked per refresh; a feed that always returns a
/// continuation must not block the refresher
const MAX_WALK_PAGES: usize = 256;

/// Refresh backoff base delay
const BACKOFF_BASE_MS: u64 = 1_000;
/// Maximum refresh backoff delay
const BACKOFF_MAX_MS: u64 = 30_000;

/// Atomically swapped list of pagination cursors
#[derive(Debug)]
pub struct CursorStore {
    cursors: RwLock<Arc<Vec<String>>>,
}

impl Default for CursorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorStore {
    /// Store seeded with the first-page cursor only
    pub fn new() -> Self {
        Self::with_seed(Vec::new())
    }

    /// Store seeded with the first-page cursor followed by `seed`
    pub fn with_seed(seed: Vec<String>) -> Self {
        let mut cursors = vec![FIRST_PAGE_CURSOR.to_string()];
        cursors.extend(seed.into_iter().filter(|c| !c.is_empty()));
        Self {
            cursors: RwLock::new(Arc::new(cursors)),
        }
    }

    /// Current cursor list; cheap clone of the inner `Arc`
    pub async fn snapshot(&self) -> Arc<Vec<String>> {
        Arc::clone(&*self.cursors.read().await)
    }

    /// Atomically replace the entire cursor list
    pub async fn replace(&self, cursors: Vec<String>) {
        *self.cursors.write().await = Arc::new(cursors);
    }

    pub async fn len(&self) -> usize {
        self.cursors.read().await.len()
    }
}

/// Background refresh scheduling parameters
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Delay between successful refresh passes
    pub interval: Duration,
    /// Random extra delay added to each interval
    pub max_jitter: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_jitter: Duration::from_secs(5),
        }
    }
}

/// Walk the feed from the first page and rebuild the cursor list.
///
/// Returns the number of continuation cursors retrieved. The store is
/// replaced only when that number is positive.
pub async fn refresh_once<P>(store: &CursorStore, port: &P) -> Result<usize, MarketError>
where
    P: MarketplacePort + ?Sized,
{
    let mut collected = vec![FIRST_PAGE_CURSOR.to_string()];
    let mut cursor = FIRST_PAGE_CURSOR.to_string();

    while collected.len() < MAX_WALK_PAGES {
        let page = port.fetch_page(&cursor).await?;
        if !page.has_offers() {
            break;
        }
        match page.next_cursor {
            Some(next) if !next.is_empty() => {
                collected.push(next.clone());
                cursor = next;
            }
            _ => break,
        }
    }

    if collected.len() >= MAX_WALK_PAGES {
        warn!(pages = MAX_WALK_PAGES, "cursor walk hit page cap");
    }

    let retrieved = collected.len() - 1;
    if retrieved > 0 {
        store.replace(collected).await;
    }
    Ok(retrieved)
}

/// Spawn the periodic cursor refresh task.
///
/// Successful passes sleep for the configured interval plus jitter; failed
/// passes back off exponentially up to a cap, then retry.
pub fn spawn_refresh<P>(
    store: Arc<CursorStore>,
    port: Arc<P>,
    config: RefreshConfig,
) -> JoinHandle<()>
where
    P: MarketplacePort + 'static,
{
    tokio::spawn(async move {
        let mut failures = 0u32;
        loop {
            match refresh_once(store.as_ref(), port.as_ref()).await {
                Ok(retrieved) => {
                    failures = 0;
                    debug!(cursors = retrieved + 1, "cursor list refreshed");
                    let jitter_ms = config.max_jitter.as_millis() as u64;
                    let jitter = if jitter_ms > 0 {
                        Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
                    } else {
                        Duration::ZERO
                    };
                    tokio::time::sleep(config.interval + jitter).await;
                }
                Err(e) => {
                    failures += 1;
                    let delay_ms = std::cmp::min(
                        BACKOFF_BASE_MS * 2u64.pow(failures.min(10)),
                        BACKOFF_MAX_MS,
                    );
                    warn!(
                        error = %e,
                        attempt = failures,
                        delay_ms,
                        "cursor refresh failed, backing off"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    })
}
