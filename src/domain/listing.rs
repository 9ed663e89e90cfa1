//! Listing Types
//!
//! Core value types shared across the watcher: raw offers as they arrive
//! from the marketplace adapter and the matched listings produced by the
//! filter engine.

use serde::Serialize;

/// Lamports per SOL (prices on the wire are fixed-point with 9 decimals)
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// One named visual attribute of an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitValue {
    /// Attribute category as reported by the marketplace (e.g. "Background")
    pub trait_type: String,
    /// Attribute value (e.g. "Midnight")
    pub value: String,
}

impl TraitValue {
    pub fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }
}

/// A marketplace offer, flattened from the wire shape
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    /// Mint address of the listed item
    pub mint: String,
    /// Asking price in lamports
    pub price: u64,
    /// Item name from the metadata block
    pub name: String,
    /// Visual attributes from the metadata block
    pub attributes: Vec<TraitValue>,
}

/// An offer that survived the filter, joined with its rarity entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedListing {
    pub name: String,
    pub url: String,
    pub rank: u32,
    pub rarity: f64,
    /// Asking price in lamports
    pub price: u64,
}

impl MatchedListing {
    /// Price in SOL for display
    pub fn price_sol(&self) -> f64 {
        self.price as f64 / LAMPORTS_PER_SOL as f64
    }
}

/// Derive the marketplace item page URL for a mint
pub fn item_url(base: &str, mint: &str) -> String {
    format!("{}/item/{}", base.trim_end_matches('/'), mint)
}
