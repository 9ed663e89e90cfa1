//! CLI Adapter
//!
//! clap argument definitions for the souls-watcher binary.

pub mod commands;

pub use commands::{CliApp, Command, RarityCmd, RunCmd, SnapshotCmd};
