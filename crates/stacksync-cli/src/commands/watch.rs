//! Watch command implementation.

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use stacksync::SyncConfig;

use super::console_runtime;
use crate::output;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Milliseconds between change checks
    #[arg(long, default_value_t = 5_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_ms: u64,

    /// Milliseconds before the first change check
    #[arg(long, default_value_t = 2_000)]
    pub initial_delay_ms: u64,

    /// Milliseconds between forced re-renders
    #[arg(long, default_value_t = 15_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub render_interval_ms: u64,

    /// Only re-render when changes are detected
    #[arg(long)]
    pub no_periodic_render: bool,

    /// Print each region as a JSON object
    #[arg(long)]
    pub json: bool,
}

pub async fn run(mut config: SyncConfig, args: WatchArgs) -> Result<()> {
    config.auto_refresh_enabled = true;
    config.poll_interval_ms = args.poll_interval_ms;
    config.initial_check_delay_ms = args.initial_delay_ms;
    config.render_interval_ms = args.render_interval_ms;
    config.periodic_render_enabled = !args.no_periodic_render;
    config.validate().context("Invalid watch settings")?;
    debug!(
        poll_interval_ms = config.poll_interval_ms,
        render_interval_ms = config.render_interval_ms,
        periodic_render = config.periodic_render_enabled,
        "Watch settings"
    );

    let mut runtime = console_runtime(config, args.json)?;

    if !args.json {
        output::note("Watching for content changes. Press Ctrl+C to stop.");
    }
    runtime.start().await;
    info!(tasks = ?runtime.running_tasks(), "Watching");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    info!("Interrupted, stopping background tasks");
    runtime.stop().await;
    if !args.json {
        output::success("Stopped");
    }
    Ok(())
}
