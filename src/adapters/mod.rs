//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits and the other
//! outward-facing pieces:
//! - Marketplace: offers endpoint client, cursor store, catalogue fetcher
//! - Reporter: console output formatting
//! - CLI: command-line interface definitions

pub mod cli;
pub mod marketplace;
pub mod reporter;

pub use cli::CliApp;
pub use marketplace::{CatalogueFetcher, CursorStore, MarketplaceClient};
pub use reporter::Reporter;
