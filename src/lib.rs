#![allow(dead_code)]
//! Souls Watcher - Rarity-Aware NFT Listings Watcher
//!
//! Polls the DigitalEyes offers endpoint for the Solana Souls collection,
//! joins each listing against a local rarity dataset, and reports
//! additions/removals between polls.
//!
//! # Modules
//!
//! - `domain`: Core business logic (RarityIndex, FilterEngine, SnapshotDiffer)
//! - `ports`: Trait abstractions (MarketplacePort)
//! - `adapters`: External implementations (marketplace HTTP client, cursor
//!   store, catalogue fetcher, reporter, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Watcher orchestrator and poll loop

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
