//! Marketplace Adapter
//!
//! Everything that talks to the offers endpoint: the HTTP client, the
//! cursor store and its background refresh, and the concurrent catalogue
//! fetcher.

pub mod catalogue;
pub mod client;
pub mod cursors;
pub mod types;

pub use catalogue::{Catalogue, CatalogueFetcher, PRICE_FLOOR_SENTINEL};
pub use client::{MarketplaceClient, MarketplaceConfig};
pub use cursors::{refresh_once, spawn_refresh, CursorStore, RefreshConfig, FIRST_PAGE_CURSOR};
