//! Marketplace Wire Types
//!
//! Data types for the offers endpoint response body. The `offers` field is
//! kept optional to distinguish a body with no `offers` key (end-of-data)
//! from an empty page.

use serde::Deserialize;

use crate::domain::{Offer, TraitValue};
use crate::ports::OffersPage;

/// Offers endpoint response body
#[derive(Debug, Clone, Deserialize)]
pub struct OffersResponse {
    #[serde(default)]
    pub offers: Option<Vec<WireOffer>>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    /// Lowest listed price in this shard, in lamports
    #[serde(default)]
    pub price_floor: Option<u64>,
}

/// One offer as serialized by the marketplace
#[derive(Debug, Clone, Deserialize)]
pub struct WireOffer {
    /// Mint address of the listed item
    pub mint: String,
    /// Asking price in lamports (fixed-point, 9 implied decimals)
    pub price: u64,
    /// Item metadata block
    pub metadata: WireMetadata,
}

/// Metadata block attached to an offer
#[derive(Debug, Clone, Deserialize)]
pub struct WireMetadata {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<WireAttribute>,
}

/// One attribute inside a metadata block
#[derive(Debug, Clone, Deserialize)]
pub struct WireAttribute {
    pub trait_type: String,
    pub value: String,
}

impl From<WireOffer> for Offer {
    fn from(wire: WireOffer) -> Self {
        Offer {
            mint: wire.mint,
            price: wire.price,
            name: wire.metadata.name,
            attributes: wire
                .metadata
                .attributes
                .into_iter()
                .map(|a| TraitValue::new(a.trait_type, a.value))
                .collect(),
        }
    }
}

impl From<OffersResponse> for OffersPage {
    fn from(response: OffersResponse) -> Self {
        OffersPage {
            offers: response
                .offers
                .map(|offers| offers.into_iter().map(Offer::from).collect()),
            next_cursor: response.next_cursor,
            price_floor: response.price_floor,
        }
    }
}
