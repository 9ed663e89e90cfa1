//! Souls Watcher - Rarity-Aware NFT Listings Watcher
//!
//! Polls the DigitalEyes offers endpoint for the Solana Souls collection
//! and reports rare listings as they appear and disappear.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use souls_watcher::adapters::cli::{CliApp, Command, RarityCmd, RunCmd, SnapshotCmd};
use souls_watcher::adapters::marketplace::{refresh_once, CatalogueFetcher, CursorStore, MarketplaceClient};
use souls_watcher::adapters::Reporter;
use souls_watcher::application::{Watcher, WatcherConfig};
use souls_watcher::config::{load_config, Config};
use souls_watcher::domain::{sort_descending, FilterEngine, RarityIndex, LAMPORTS_PER_SOL};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug);

    match app.command {
        Command::Run(cmd) => run_command(cmd).await,
        Command::Snapshot(cmd) => snapshot_command(cmd).await,
        Command::Rarity(cmd) => rarity_command(cmd).await,
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Load the rarity dataset named by the config; fatal if missing or corrupt
fn load_rarity(config: &Config) -> Result<RarityIndex> {
    let path = shellexpand::tilde(&config.rarity.dataset_path).to_string();
    let rarity = RarityIndex::load(&path)
        .with_context(|| format!("Failed to load rarity dataset from '{}'", path))?;
    tracing::info!(entries = rarity.len(), "rarity index loaded");
    Ok(rarity)
}

async fn run_command(cmd: RunCmd) -> Result<()> {
    tracing::info!("Starting souls watcher...");

    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let rarity = load_rarity(&config)?;

    let client = Arc::new(
        MarketplaceClient::with_config((&config).into())
            .context("Failed to create marketplace client")?,
    );
    let cursors = Arc::new(CursorStore::with_seed(
        config.marketplace.seed_cursors.clone(),
    ));

    let watcher_config = WatcherConfig {
        request_timeout: config.request_timeout(),
        poll_interval: config.poll_interval(),
        sort_key: config.filters.sort_key,
        refresh: config.refresh_config(),
    };
    let watcher = Arc::new(Watcher::new(
        client,
        cursors,
        rarity,
        FilterEngine::from(&config),
        watcher_config,
    ));

    // Ctrl+C stops the loop after the current cycle
    let w = Arc::clone(&watcher);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutdown signal received");
        w.stop().await;
    });

    watcher.run().await?;
    tracing::info!("Souls watcher stopped");
    Ok(())
}

async fn snapshot_command(cmd: SnapshotCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let rarity = load_rarity(&config)?;

    let client = Arc::new(
        MarketplaceClient::with_config((&config).into())
            .context("Failed to create marketplace client")?,
    );
    let cursors = Arc::new(CursorStore::with_seed(
        config.marketplace.seed_cursors.clone(),
    ));

    if let Err(e) = refresh_once(cursors.as_ref(), client.as_ref()).await {
        tracing::warn!(error = %e, "cursor refresh failed, using seed list");
    }

    let fetcher = CatalogueFetcher::new(
        Arc::clone(&client),
        Arc::clone(&cursors),
        config.request_timeout(),
    );
    let catalogue = fetcher.fetch_catalogue().await;

    let filter = FilterEngine::from(&config);
    let mut matches = filter.filter_offers(&catalogue.offers, &rarity);
    sort_descending(&mut matches, config.filters.sort_key);

    println!(
        "Offers: {}   Price floor: {:.2} SOL   Matches: {}",
        catalogue.offers.len(),
        catalogue.price_floor as f64 / LAMPORTS_PER_SOL as f64,
        matches.len()
    );

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else {
        Reporter::new().report_snapshot(&matches);
    }

    Ok(())
}

async fn rarity_command(cmd: RarityCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let rarity = load_rarity(&config)?;

    match rarity.get(&cmd.name) {
        Some(entry) => {
            println!("{}", cmd.name);
            println!("  Rank:   #{}", entry.rank);
            println!("  Rarity: {:.2}", entry.rarity_score);
        }
        None => {
            println!(
                "'{}' not found in the rarity dataset ({} entries)",
                cmd.name,
                rarity.len()
            );
        }
    }

    Ok(())
}
