//! Console Reporter
//!
//! Formats matched listings and snapshot changes for the console. Status
//! lines go through `tracing`; the listing lines themselves are plain
//! stdout so they survive any log filter.

use crate::domain::{MatchedListing, SnapshotDiff};

/// Console output formatter for poll results
#[derive(Debug, Clone, Default)]
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// One listing line: `RANK: 0042  PRICE: 1.50 SOL  NAME: ...  URL: ...`
    pub fn listing_line(listing: &MatchedListing) -> String {
        format!(
            "RANK: {:04}  PRICE: {:.2} SOL  NAME: {}  URL: {}",
            listing.rank,
            listing.price_sol(),
            listing.name,
            listing.url
        )
    }

    /// Print a changed snapshot: the full sorted set, then what came and
    /// went since the previous cycle
    pub fn report_cycle(&self, snapshot: &[MatchedListing], diff: &SnapshotDiff) {
        for listing in snapshot {
            println!("{}", Self::listing_line(listing));
        }
        for listing in &diff.added {
            println!("+ ADDED    {}", listing.name);
        }
        for listing in &diff.removed {
            println!("- REMOVED  {}", listing.name);
        }
    }

    /// Print a one-shot snapshot without diff markers
    pub fn report_snapshot(&self, snapshot: &[MatchedListing]) {
        if snapshot.is_empty() {
            println!("No listings matched the current filters.");
            return;
        }
        for listing in snapshot {
            println!("{}", Self::listing_line(listing));
        }
    }
}
