//! Filter/Match Engine
//!
//! Applies price/rarity/rank thresholds and optional trait-inclusion rules
//! to raw offers, joining each survivor with its rarity entry. Pure
//! function of its inputs: the same offers, index, and configuration
//! always produce the same matches.

use std::collections::{HashMap, HashSet};

use super::listing::{item_url, MatchedListing, Offer, TraitValue, LAMPORTS_PER_SOL};
use super::rarity::RarityIndex;

/// Tracked trait categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraitCategory {
    Background,
    Body,
    Eyes,
    Mouth,
    Glasses,
    Hands,
    Hair,
}

impl TraitCategory {
    pub const ALL: [TraitCategory; 7] = [
        TraitCategory::Background,
        TraitCategory::Body,
        TraitCategory::Eyes,
        TraitCategory::Mouth,
        TraitCategory::Glasses,
        TraitCategory::Hands,
        TraitCategory::Hair,
    ];

    /// Map a marketplace `trait_type` string to a tracked category.
    /// Unmapped trait types return `None` and are skipped by the filter.
    pub fn from_trait_type(trait_type: &str) -> Option<Self> {
        match trait_type.to_ascii_lowercase().as_str() {
            "background" => Some(TraitCategory::Background),
            "body" => Some(TraitCategory::Body),
            "eyes" => Some(TraitCategory::Eyes),
            "mouth" => Some(TraitCategory::Mouth),
            "glasses" => Some(TraitCategory::Glasses),
            "hands" => Some(TraitCategory::Hands),
            "hair" => Some(TraitCategory::Hair),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TraitCategory::Background => "background",
            TraitCategory::Body => "body",
            TraitCategory::Eyes => "eyes",
            TraitCategory::Mouth => "mouth",
            TraitCategory::Glasses => "glasses",
            TraitCategory::Hands => "hands",
            TraitCategory::Hair => "hair",
        }
    }
}

/// Trait-inclusion rules: per category, a table of value -> enabled.
///
/// The aggregate flag starts at `combine` (AND starts true, OR starts
/// false). Attributes whose trait type is unmapped or whose value has no
/// table entry are skipped entirely: they contribute nothing in OR mode
/// and do not independently fail AND mode. Only an explicit `false` entry
/// fails the AND aggregate.
#[derive(Debug, Clone, Default)]
pub struct TraitFilter {
    /// Global switch; when false every offer passes
    pub enabled: bool,
    /// true = AND mode (every entry must be enabled), false = OR mode
    pub combine: bool,
    tables: HashMap<TraitCategory, HashMap<String, bool>>,
}

impl TraitFilter {
    pub fn new(enabled: bool, combine: bool) -> Self {
        Self {
            enabled,
            combine,
            tables: HashMap::new(),
        }
    }

    /// Set one value entry in a category table
    pub fn set(&mut self, category: TraitCategory, value: impl Into<String>, on: bool) {
        self.tables
            .entry(category)
            .or_default()
            .insert(value.into(), on);
    }

    /// Evaluate the rules against an offer's attributes
    pub fn matches(&self, attributes: &[TraitValue]) -> bool {
        if !self.enabled {
            return true;
        }

        let mut matched = self.combine;
        for attr in attributes {
            let Some(category) = TraitCategory::from_trait_type(&attr.trait_type) else {
                continue;
            };
            let Some(table) = self.tables.get(&category) else {
                continue;
            };
            let Some(&on) = table.get(&attr.value) else {
                continue;
            };
            matched = if self.combine {
                matched && on
            } else {
                matched || on
            };
        }
        matched
    }
}

/// Threshold filter parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FilterThresholds {
    /// Keep offers strictly below this price (lamports)
    pub price_max: u64,
    /// Keep offers with rarity score strictly above this
    pub rarity_min: f64,
    /// Keep offers with rank strictly below this
    pub rank_min: u32,
}

impl Default for FilterThresholds {
    fn default() -> Self {
        Self {
            price_max: 10 * LAMPORTS_PER_SOL,
            rarity_min: 100.0,
            rank_min: 1000,
        }
    }
}

/// Joins offers against the rarity index and applies all filter rules
#[derive(Debug, Clone)]
pub struct FilterEngine {
    thresholds: FilterThresholds,
    traits: TraitFilter,
    item_url_base: String,
}

impl FilterEngine {
    pub fn new(
        thresholds: FilterThresholds,
        traits: TraitFilter,
        item_url_base: impl Into<String>,
    ) -> Self {
        Self {
            thresholds,
            traits,
            item_url_base: item_url_base.into(),
        }
    }

    pub fn thresholds(&self) -> &FilterThresholds {
        &self.thresholds
    }

    /// Filter offers, producing one matched listing per distinct surviving
    /// name. Offers with no rarity entry are dropped; duplicate names
    /// (overlapping shards) keep the first occurrence.
    pub fn filter_offers(&self, offers: &[Offer], rarity: &RarityIndex) -> Vec<MatchedListing> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut matches = Vec::new();

        for offer in offers {
            let Some(entry) = rarity.get(&offer.name) else {
                continue;
            };

            let passes = offer.price < self.thresholds.price_max
                && entry.rarity_score > self.thresholds.rarity_min
                && entry.rank < self.thresholds.rank_min;
            if !passes {
                continue;
            }

            if !self.traits.matches(&offer.attributes) {
                continue;
            }

            if !seen.insert(offer.name.as_str()) {
                continue;
            }

            matches.push(MatchedListing {
                name: offer.name.clone(),
                url: item_url(&self.item_url_base, &offer.mint),
                rank: entry.rank,
                rarity: entry.rarity_score,
                price: offer.price,
            });
        }

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rarity::RarityEntry;

    const ITEM_BASE: &str = "https://digitaleyes.market";

    fn index() -> RarityIndex {
        RarityIndex::from_entries([
            (
                "Soul #1".to_string(),
                RarityEntry {
                    rarity_score: 400.0,
                    rank: 3,
                },
            ),
            (
                "Soul #2".to_string(),
                RarityEntry {
                    rarity_score: 250.0,
                    rank: 120,
                },
            ),
            (
                "Soul #3".to_string(),
                RarityEntry {
                    rarity_score: 80.0,
                    rank: 1800,
                },
            ),
        ])
    }

    fn offer(name: &str, mint: &str, price: u64) -> Offer {
        Offer {
            mint: mint.to_string(),
            price,
            name: name.to_string(),
            attributes: Vec::new(),
        }
    }

    fn offer_with_attrs(name: &str, price: u64, attrs: Vec<TraitValue>) -> Offer {
        Offer {
            mint: format!("{}-mint", name),
            price,
            name: name.to_string(),
            attributes: attrs,
        }
    }

    fn engine() -> FilterEngine {
        FilterEngine::new(FilterThresholds::default(), TraitFilter::default(), ITEM_BASE)
    }

    #[test]
    fn test_offer_without_rarity_entry_excluded() {
        let offers = vec![offer("Unknown Soul", "m0", 1_000_000_000)];
        let matches = engine().filter_offers(&offers, &index());
        assert!(matches.is_empty());
    }

    #[test]
    fn test_thresholds_all_strict() {
        let thresholds = FilterThresholds::default();
        let engine = FilterEngine::new(thresholds, TraitFilter::default(), ITEM_BASE);
        let rarity = index();

        // Soul #1: passes everything
        // Soul #2: price at the cap is excluded (strict <)
        // Soul #3: rarity 80 <= 100 and rank 1800 >= 1000, excluded
        let offers = vec![
            offer("Soul #1", "m1", 9_999_999_999),
            offer("Soul #2", "m2", 10 * LAMPORTS_PER_SOL),
            offer("Soul #3", "m3", 1_000_000_000),
        ];

        let matches = engine.filter_offers(&offers, &rarity);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Soul #1");
        assert_eq!(matches[0].rank, 3);
        assert_eq!(matches[0].url, "https://digitaleyes.market/item/m1");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let offers = vec![
            offer("Soul #1", "m1", 1_000_000_000),
            offer("Soul #2", "m2", 2_000_000_000),
        ];
        let engine = engine();
        let rarity = index();

        let first = engine.filter_offers(&offers, &rarity);
        let second = engine.filter_offers(&offers, &rarity);
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_names_deduplicated() {
        // Overlapping shards can return the same item twice
        let offers = vec![
            offer("Soul #1", "m1", 1_000_000_000),
            offer("Soul #1", "m1", 1_000_000_000),
        ];
        let matches = engine().filter_offers(&offers, &index());
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_trait_filter_disabled_passes_through() {
        let filter = TraitFilter::new(false, false);
        assert!(filter.matches(&[TraitValue::new("Background", "Anything")]));
        assert!(filter.matches(&[]));
    }

    #[test]
    fn test_trait_filter_or_mode_one_enabled_suffices() {
        let mut filter = TraitFilter::new(true, false);
        filter.set(TraitCategory::Background, "Midnight", true);
        filter.set(TraitCategory::Hair, "Mohawk", false);

        // One enabled attribute and one disabled attribute: OR passes
        let attrs = vec![
            TraitValue::new("Background", "Midnight"),
            TraitValue::new("Hair", "Mohawk"),
        ];
        assert!(filter.matches(&attrs));
    }

    #[test]
    fn test_trait_filter_and_mode_requires_all_enabled() {
        let mut filter = TraitFilter::new(true, true);
        filter.set(TraitCategory::Background, "Midnight", true);
        filter.set(TraitCategory::Hair, "Mohawk", false);

        // Same listing rejected in AND mode: Hair/Mohawk is explicitly off
        let attrs = vec![
            TraitValue::new("Background", "Midnight"),
            TraitValue::new("Hair", "Mohawk"),
        ];
        assert!(!filter.matches(&attrs));

        filter.set(TraitCategory::Hair, "Mohawk", true);
        assert!(filter.matches(&attrs));
    }

    #[test]
    fn test_trait_filter_unmapped_type_skipped() {
        let mut filter = TraitFilter::new(true, false);
        filter.set(TraitCategory::Background, "Midnight", true);

        // "Aura" is not a tracked category: contributes nothing to OR
        let attrs = vec![TraitValue::new("Aura", "Golden")];
        assert!(!filter.matches(&attrs));

        // ...and does not disqualify AND on its own
        let mut and_filter = TraitFilter::new(true, true);
        and_filter.set(TraitCategory::Background, "Midnight", true);
        let attrs = vec![
            TraitValue::new("Background", "Midnight"),
            TraitValue::new("Aura", "Golden"),
        ];
        assert!(and_filter.matches(&attrs));
    }

    #[test]
    fn test_trait_filter_missing_value_entry_skipped() {
        let mut or_filter = TraitFilter::new(true, false);
        or_filter.set(TraitCategory::Background, "Midnight", true);

        // Tracked category, but no entry for this value: skipped, OR fails
        assert!(!or_filter.matches(&[TraitValue::new("Background", "Dawn")]));

        // In AND mode the missing entry does not fail the aggregate
        let mut and_filter = TraitFilter::new(true, true);
        and_filter.set(TraitCategory::Background, "Midnight", true);
        assert!(and_filter.matches(&[TraitValue::new("Background", "Dawn")]));
    }

    #[test]
    fn test_trait_filter_and_mode_no_entries_passes() {
        // Aggregate starts true and nothing folds into it
        let filter = TraitFilter::new(true, true);
        assert!(filter.matches(&[TraitValue::new("Background", "Dawn")]));
    }

    #[test]
    fn test_trait_filter_or_mode_no_entries_fails() {
        // Aggregate starts false and nothing folds into it
        let filter = TraitFilter::new(true, false);
        assert!(!filter.matches(&[TraitValue::new("Background", "Dawn")]));
    }

    #[test]
    fn test_trait_filter_applied_by_engine() {
        let mut traits = TraitFilter::new(true, false);
        traits.set(TraitCategory::Eyes, "Laser", true);

        let engine = FilterEngine::new(FilterThresholds::default(), traits, ITEM_BASE);
        let offers = vec![
            offer_with_attrs(
                "Soul #1",
                1_000_000_000,
                vec![TraitValue::new("Eyes", "Laser")],
            ),
            offer_with_attrs(
                "Soul #2",
                1_000_000_000,
                vec![TraitValue::new("Eyes", "Plain")],
            ),
        ];

        let matches = engine.filter_offers(&offers, &index());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Soul #1");
    }

    #[test]
    fn test_category_mapping_case_insensitive() {
        assert_eq!(
            TraitCategory::from_trait_type("BACKGROUND"),
            Some(TraitCategory::Background)
        );
        assert_eq!(
            TraitCategory::from_trait_type("hair"),
            Some(TraitCategory::Hair)
        );
        assert_eq!(TraitCategory::from_trait_type("Aura"), None);
    }
}
