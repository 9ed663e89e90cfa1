//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must
//! implement. Following hexagonal architecture, the single port here
//! abstracts the marketplace offers feed.

pub mod marketplace;

pub use marketplace::{MarketError, MarketplacePort, OffersPage};

#[cfg(test)]
pub use marketplace::MockMarketplacePort;
