//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching the
//! config/souls.toml structure. The trait-enable tables live here as
//! data: per category, a map of trait value to enabled flag.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::adapters::marketplace::{MarketplaceConfig, RefreshConfig};
use crate::domain::{
    FilterEngine, FilterThresholds, SortKey, TraitCategory, TraitFilter, LAMPORTS_PER_SOL,
};

/// Main configuration structure matching config/souls.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub marketplace: MarketplaceSection,
    pub rarity: RaritySection,
    #[serde(default)]
    pub filters: FiltersSection,
    #[serde(default)]
    pub traits: TraitsSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Marketplace endpoint and polling cadence
#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceSection {
    /// Offers endpoint base URL
    pub base_url: String,
    /// Collection name passed as the `collection` query parameter
    pub collection: String,
    /// Base URL for derived item page links
    #[serde(default = "default_item_url_base")]
    pub item_url_base: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Delay between poll cycles in seconds
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Delay between successful cursor refresh passes in seconds
    #[serde(default = "default_refresh_interval_secs")]
    pub cursor_refresh_interval_secs: u64,
    /// Extra shard cursors to seed the store with before the first refresh
    #[serde(default)]
    pub seed_cursors: Vec<String>,
}

fn default_item_url_base() -> String {
    "https://digitaleyes.market".to_string()
}

fn default_request_timeout_secs() -> u64 {
    100
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_refresh_interval_secs() -> u64 {
    60
}

/// Rarity dataset location
#[derive(Debug, Clone, Deserialize)]
pub struct RaritySection {
    /// Path to the JSON rarity dataset
    pub dataset_path: String,
}

/// Threshold filters and snapshot ordering
#[derive(Debug, Clone, Deserialize)]
pub struct FiltersSection {
    /// Keep offers strictly below this price, in SOL
    #[serde(default = "default_price_max_sol")]
    pub price_max_sol: f64,
    /// Keep offers with rarity score strictly above this
    #[serde(default = "default_rarity_min")]
    pub rarity_min: f64,
    /// Keep offers with rank strictly below this
    #[serde(default = "default_rank_min")]
    pub rank_min: u32,
    /// Snapshot sort key: price, rank, rarity, name, or url
    #[serde(default)]
    pub sort_key: SortKey,
}

fn default_price_max_sol() -> f64 {
    10.0
}

fn default_rarity_min() -> f64 {
    100.0
}

fn default_rank_min() -> u32 {
    1000
}

impl Default for FiltersSection {
    fn default() -> Self {
        Self {
            price_max_sol: default_price_max_sol(),
            rarity_min: default_rarity_min(),
            rank_min: default_rank_min(),
            sort_key: SortKey::default(),
        }
    }
}

impl FiltersSection {
    /// Price cap in lamports
    pub fn price_max_lamports(&self) -> u64 {
        (self.price_max_sol * LAMPORTS_PER_SOL as f64) as u64
    }
}

/// Trait-inclusion rules
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TraitsSection {
    /// Global switch; when false every offer passes
    #[serde(default)]
    pub enabled: bool,
    /// true = AND mode, false = OR mode
    #[serde(default)]
    pub combine: bool,
    /// Per category, trait value -> enabled flag
    #[serde(default)]
    pub values: HashMap<String, HashMap<String, bool>>,
}

impl TraitsSection {
    /// Build the domain trait filter from the configured tables
    pub fn to_trait_filter(&self) -> TraitFilter {
        let mut filter = TraitFilter::new(self.enabled, self.combine);
        for (category_name, table) in &self.values {
            let Some(category) = TraitCategory::from_trait_type(category_name) else {
                continue;
            };
            for (value, &on) in table {
                filter.set(category, value.clone(), on);
            }
        }
        filter
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.marketplace.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "marketplace.base_url cannot be empty".to_string(),
            ));
        }

        if self.marketplace.collection.is_empty() {
            return Err(ConfigError::Validation(
                "marketplace.collection cannot be empty".to_string(),
            ));
        }

        if self.marketplace.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "marketplace.request_timeout_secs must be > 0".to_string(),
            ));
        }

        if self.marketplace.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "marketplace.poll_interval_secs must be > 0".to_string(),
            ));
        }

        if self.marketplace.cursor_refresh_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "marketplace.cursor_refresh_interval_secs must be > 0".to_string(),
            ));
        }

        if self.rarity.dataset_path.is_empty() {
            return Err(ConfigError::Validation(
                "rarity.dataset_path cannot be empty".to_string(),
            ));
        }

        if self.filters.price_max_sol <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "filters.price_max_sol must be > 0, got {}",
                self.filters.price_max_sol
            )));
        }

        if self.filters.rank_min == 0 {
            return Err(ConfigError::Validation(
                "filters.rank_min must be > 0".to_string(),
            ));
        }

        for category_name in self.traits.values.keys() {
            if TraitCategory::from_trait_type(category_name).is_none() {
                return Err(ConfigError::Validation(format!(
                    "traits.values has unknown category '{}'",
                    category_name
                )));
            }
        }

        Ok(())
    }

    /// Delay between poll cycles
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.marketplace.poll_interval_secs)
    }

    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.marketplace.request_timeout_secs)
    }

    /// Background cursor refresh scheduling
    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig {
            interval: Duration::from_secs(self.marketplace.cursor_refresh_interval_secs),
            ..RefreshConfig::default()
        }
    }
}

impl From<&Config> for MarketplaceConfig {
    fn from(config: &Config) -> Self {
        MarketplaceConfig {
            base_url: config.marketplace.base_url.clone(),
            collection: config.marketplace.collection.clone(),
            request_timeout: config.request_timeout(),
        }
    }
}

impl From<&Config> for FilterEngine {
    fn from(config: &Config) -> Self {
        FilterEngine::new(
            FilterThresholds {
                price_max: config.filters.price_max_lamports(),
                rarity_min: config.filters.rarity_min,
                rank_min: config.filters.rank_min,
            },
            config.traits.to_trait_filter(),
            config.marketplace.item_url_base.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TraitValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_valid_config() -> String {
        r#"
[marketplace]
base_url = "https://us-central1-digitaleyes-prod.cloudfunctions.net/offers-retriever-datastore"
collection = "Solana Souls"
item_url_base = "https://digitaleyes.market"
request_timeout_secs = 100
poll_interval_secs = 5
cursor_refresh_interval_secs = 60
seed_cursors = ["CURSOR_A", "CURSOR_B"]

[rarity]
dataset_path = "./soul_top2500.json"

[filters]
price_max_sol = 10.0
rarity_min = 100.0
rank_min = 1000
sort_key = "rank"

[traits]
enabled = true
combine = false

[traits.values.background]
"Midnight" = true
"Dawn" = false

[traits.values.hair]
"Mohawk" = true

[logging]
level = "info"
"#
        .to_string()
    }

    fn load_str(contents: &str) -> Result<Config, ConfigError> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        load_config(file.path())
    }

    #[test]
    fn test_load_valid_config() {
        let config = load_str(&create_valid_config()).unwrap();

        assert_eq!(config.marketplace.collection, "Solana Souls");
        assert_eq!(config.marketplace.seed_cursors.len(), 2);
        assert_eq!(config.filters.rank_min, 1000);
        assert_eq!(config.filters.sort_key, SortKey::Rank);
        assert!(config.traits.enabled);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.request_timeout(), Duration::from_secs(100));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/path/souls.toml");
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load_str(
            r#"
[marketplace]
base_url = "https://example.com/offers"
collection = "Solana Souls"

[rarity]
dataset_path = "./soul_top2500.json"
"#,
        )
        .unwrap();

        assert_eq!(config.marketplace.request_timeout_secs, 100);
        assert_eq!(config.marketplace.poll_interval_secs, 5);
        assert_eq!(
            config.marketplace.item_url_base,
            "https://digitaleyes.market"
        );
        assert_eq!(config.filters.price_max_sol, 10.0);
        assert_eq!(config.filters.rarity_min, 100.0);
        assert_eq!(config.filters.rank_min, 1000);
        assert!(!config.traits.enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_price_max_lamports() {
        let filters = FiltersSection::default();
        assert_eq!(filters.price_max_lamports(), 10_000_000_000);
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let result = load_str(
            r#"
[marketplace]
base_url = ""
collection = "Solana Souls"

[rarity]
dataset_path = "./soul_top2500.json"
"#,
        );
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let result = load_str(
            r#"
[marketplace]
base_url = "https://example.com/offers"
collection = "Solana Souls"
poll_interval_secs = 0

[rarity]
dataset_path = "./soul_top2500.json"
"#,
        );
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_negative_price_cap_rejected() {
        let result = load_str(
            r#"
[marketplace]
base_url = "https://example.com/offers"
collection = "Solana Souls"

[rarity]
dataset_path = "./soul_top2500.json"

[filters]
price_max_sol = -1.0
"#,
        );
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_unknown_trait_category_rejected() {
        let result = load_str(
            r#"
[marketplace]
base_url = "https://example.com/offers"
collection = "Solana Souls"

[rarity]
dataset_path = "./soul_top2500.json"

[traits]
enabled = true

[traits.values.aura]
"Golden" = true
"#,
        );
        match result.unwrap_err() {
            ConfigError::Validation(msg) => assert!(msg.contains("aura")),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_sort_key_rejected_by_serde() {
        let result = load_str(
            r#"
[marketplace]
base_url = "https://example.com/offers"
collection = "Solana Souls"

[rarity]
dataset_path = "./soul_top2500.json"

[filters]
sort_key = "volume"
"#,
        );
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_trait_tables_reach_domain_filter() {
        let config = load_str(&create_valid_config()).unwrap();
        let filter = config.traits.to_trait_filter();

        assert!(filter.enabled);
        assert!(!filter.combine);
        // Midnight enabled, Dawn explicitly disabled
        assert!(filter.matches(&[TraitValue::new("Background", "Midnight")]));
        assert!(!filter.matches(&[TraitValue::new("Background", "Dawn")]));
    }

    #[test]
    fn test_config_to_filter_engine() {
        let config = load_str(&create_valid_config()).unwrap();
        let engine = FilterEngine::from(&config);

        assert_eq!(engine.thresholds().price_max, 10_000_000_000);
        assert_eq!(engine.thresholds().rank_min, 1000);
    }
}
