//! Marketplace HTTP Client
//!
//! reqwest client for the DigitalEyes offers-retriever endpoint. Each page
//! fetch is a single GET with `collection`, `price=asc`, and `cursor`
//! query parameters, bounded by the configured request timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::OffersResponse;
use crate::ports::{MarketError, MarketplacePort, OffersPage};

/// Default offers endpoint for the Solana Souls collection
pub const DEFAULT_BASE_URL: &str =
    "https://us-central1-digitaleyes-prod.cloudfunctions.net/offers-retriever-datastore";

/// Default collection name
pub const DEFAULT_COLLECTION: &str = "Solana Souls";

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 100;

/// Marketplace client configuration
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// Offers endpoint base URL
    pub base_url: String,
    /// Collection name passed as the `collection` query parameter
    pub collection: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// HTTP client for the offers feed
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    config: MarketplaceConfig,
    http: Client,
}

impl MarketplaceClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self, MarketError> {
        Self::with_config(MarketplaceConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: MarketplaceConfig) -> Result<Self, MarketError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &MarketplaceConfig {
        &self.config
    }

    /// Query parameters for a page fetch
    fn page_query<'a>(&'a self, cursor: &'a str) -> [(&'static str, &'a str); 3] {
        [
            ("collection", self.config.collection.as_str()),
            ("price", "asc"),
            ("cursor", cursor),
        ]
    }
}

#[async_trait]
impl MarketplacePort for MarketplaceClient {
    async fn fetch_page(&self, cursor: &str) -> Result<OffersPage, MarketError> {
        let response = self
            .http
            .get(&self.config.base_url)
            .query(&self.page_query(cursor))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Status(status.as_u16()));
        }

        let body: OffersResponse = response
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        Ok(body.into())
    }
}
