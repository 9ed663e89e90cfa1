//! Snapshot Differ
//!
//! Sorts each poll cycle's filtered result set and compares it against the
//! previous cycle's set. Equality is an explicit structural check over the
//! sorted vectors (same length, same order, every field equal); the
//! added/removed sets are a name-presence diff only.

use std::collections::HashSet;

use serde::Deserialize;

use super::listing::MatchedListing;

/// Sort key for the snapshot ordering (always descending)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Price,
    Rank,
    Rarity,
    Name,
    Url,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Rank
    }
}

/// Sort listings by the key, descending. Stable: ties keep arrival order.
pub fn sort_descending(listings: &mut [MatchedListing], key: SortKey) {
    match key {
        SortKey::Price => listings.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Rank => listings.sort_by(|a, b| b.rank.cmp(&a.rank)),
        SortKey::Rarity => listings.sort_by(|a, b| b.rarity.total_cmp(&a.rarity)),
        SortKey::Name => listings.sort_by(|a, b| b.name.cmp(&a.name)),
        SortKey::Url => listings.sort_by(|a, b| b.url.cmp(&a.url)),
    }
}

/// Listings that appeared and disappeared between two snapshots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotDiff {
    pub added: Vec<MatchedListing>,
    pub removed: Vec<MatchedListing>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Holds the previous cycle's snapshot and produces diffs against it
#[derive(Debug, Default)]
pub struct SnapshotDiffer {
    sort_key: SortKey,
    previous: Vec<MatchedListing>,
}

impl SnapshotDiffer {
    pub fn new(sort_key: SortKey) -> Self {
        Self {
            sort_key,
            previous: Vec::new(),
        }
    }

    /// The snapshot recorded by the last non-identical cycle
    pub fn previous(&self) -> &[MatchedListing] {
        &self.previous
    }

    /// Sort `current` and diff it against the previous snapshot.
    ///
    /// Returns `None` when the sorted set is structurally identical to the
    /// previous one (nothing should be emitted this cycle). Otherwise
    /// returns the name-presence diff and replaces the previous snapshot;
    /// a snapshot that changed only in listing fields yields `Some` with
    /// empty added/removed sets.
    pub fn diff(&mut self, mut current: Vec<MatchedListing>) -> Option<SnapshotDiff> {
        sort_descending(&mut current, self.sort_key);

        if current == self.previous {
            return None;
        }

        let previous_names: HashSet<&str> =
            self.previous.iter().map(|l| l.name.as_str()).collect();
        let current_names: HashSet<&str> = current.iter().map(|l| l.name.as_str()).collect();

        let added = current
            .iter()
            .filter(|l| !previous_names.contains(l.name.as_str()))
            .cloned()
            .collect();
        let removed = self
            .previous
            .iter()
            .filter(|l| !current_names.contains(l.name.as_str()))
            .cloned()
            .collect();

        self.previous = current;
        Some(SnapshotDiff { added, removed })
    }
}
