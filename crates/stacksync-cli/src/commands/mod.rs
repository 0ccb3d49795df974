//! Subcommand implementations.

pub mod check;
pub mod entries;
pub mod entry;
pub mod render;
pub mod sync;
pub mod watch;

use anyhow::Result;
use std::sync::Arc;

use stacksync::{SyncConfig, SyncRuntime};

use crate::sink::ConsoleSink;

/// Build a runtime that prints regions to the terminal.
fn console_runtime(config: SyncConfig, json: bool) -> Result<SyncRuntime> {
    Ok(SyncRuntime::connect(config, Arc::new(ConsoleSink::new(json)))?)
}
