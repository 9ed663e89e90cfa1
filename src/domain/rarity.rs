//! Rarity Index
//!
//! Loads the static rarity dataset mapping item name to rarity score and
//! rank. The dataset is a JSON array of objects in the shape the ranking
//! site exports: `{"Soul Name": "...", "Rarity Score": 123.4, "Rank": "#56"}`.
//!
//! A missing or malformed dataset is a startup precondition failure, not a
//! per-cycle error: callers abort rather than recover.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Rarity dataset errors
#[derive(Debug, Error)]
pub enum RarityError {
    #[error("failed to read rarity dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rarity dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("malformed rank '{rank}' for '{name}': expected \"#<integer>\"")]
    BadRank { name: String, rank: String },
}

/// Rarity score and rank of a single item, immutable after load
#[derive(Debug, Clone, PartialEq)]
pub struct RarityEntry {
    pub rarity_score: f64,
    /// Collection rank, 1 = rarest
    pub rank: u32,
}

/// Raw dataset row as exported by the ranking site
#[derive(Debug, Deserialize)]
struct RarityRow {
    #[serde(rename = "Soul Name")]
    name: String,
    #[serde(rename = "Rarity Score")]
    rarity_score: f64,
    #[serde(rename = "Rank")]
    rank: String,
}

/// In-memory map from item name to rarity entry
#[derive(Debug, Clone, Default)]
pub struct RarityIndex {
    entries: HashMap<String, RarityEntry>,
}

impl RarityIndex {
    /// Load the dataset from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RarityError> {
        let raw = std::fs::read_to_string(path)?;
        let rows: Vec<RarityRow> = serde_json::from_str(&raw)?;
        Self::from_rows(rows)
    }

    fn from_rows(rows: Vec<RarityRow>) -> Result<Self, RarityError> {
        let mut entries = HashMap::with_capacity(rows.len());
        for row in rows {
            let rank = parse_rank(&row.rank).ok_or_else(|| RarityError::BadRank {
                name: row.name.clone(),
                rank: row.rank.clone(),
            })?;
            entries.insert(
                row.name,
                RarityEntry {
                    rarity_score: row.rarity_score,
                    rank,
                },
            );
        }
        Ok(Self { entries })
    }

    /// Build an index from already-parsed entries
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, RarityEntry)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Look up an item by its metadata name
    pub fn get(&self, name: &str) -> Option<&RarityEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a rank of the form "#123" into 123
fn parse_rank(rank: &str) -> Option<u32> {
    rank.strip_prefix('#')?.parse().ok()
}
