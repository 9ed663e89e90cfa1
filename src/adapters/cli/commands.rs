//! CLI Command Definitions
//!
//! Argument structures for the souls-watcher binary. The handlers live in
//! `main.rs`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Souls Watcher - rarity-aware listings watcher for Solana Souls
#[derive(Parser, Debug)]
#[command(
    name = "souls-watcher",
    version = env!("CARGO_PKG_VERSION"),
    about = "Rarity-aware listings watcher for the Solana Souls collection",
    long_about = "Polls the DigitalEyes offers endpoint across all known pagination \
                  cursors, joins listings against a local rarity dataset, and reports \
                  additions and removals between polls."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the poll loop
    Run(RunCmd),

    /// Fetch, filter, and print one snapshot, then exit
    Snapshot(SnapshotCmd),

    /// Look up one item in the rarity dataset
    Rarity(RarityCmd),
}

/// Start the poll loop
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/souls.toml")]
    pub config: PathBuf,
}

/// One-shot snapshot
#[derive(Parser, Debug)]
pub struct SnapshotCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/souls.toml")]
    pub config: PathBuf,

    /// Print the snapshot as JSON instead of listing lines
    #[arg(long)]
    pub json: bool,
}

/// Rarity dataset lookup
#[derive(Parser, Debug)]
pub struct RarityCmd {
    /// Item name, e.g. "Soul #42"
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/souls.toml")]
    pub config: PathBuf,
}
