pub mod watcher;

pub use watcher::{CycleOutcome, Watcher, WatcherConfig, WatcherError};
