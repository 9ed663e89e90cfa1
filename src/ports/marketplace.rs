//! Marketplace Port
//!
//! Trait abstraction over the marketplace offers feed so the catalogue
//! fetcher, cursor refresher, and watcher can be exercised without a
//! network.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Offer;

/// Marketplace feed error type
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("marketplace returned status {0}")]
    Status(u16),

    #[error("failed to parse offers response: {0}")]
    Parse(String),

    #[error("request timed out after {0} seconds")]
    Timeout(u64),
}

/// One page of the offers feed.
///
/// `offers` is `None` when the response body carried no `offers` field at
/// all; the catalogue fetcher treats that as an end-of-data signal, which
/// is distinct from an empty page.
#[derive(Debug, Clone, Default)]
pub struct OffersPage {
    pub offers: Option<Vec<Offer>>,
    pub next_cursor: Option<String>,
    /// Lowest listed price reported for this shard, in lamports
    pub price_floor: Option<u64>,
}

impl OffersPage {
    /// True when the page carried at least one offer
    pub fn has_offers(&self) -> bool {
        self.offers.as_ref().is_some_and(|o| !o.is_empty())
    }
}

/// Read access to the paginated offers feed
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplacePort: Send + Sync {
    /// Fetch one page of offers starting at `cursor` (empty string = first
    /// page)
    async fn fetch_page(&self, cursor: &str) -> Result<OffersPage, MarketError>;
}
