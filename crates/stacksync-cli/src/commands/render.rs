//! Render command implementation.

use anyhow::{Result, bail};
use clap::Args;

use stacksync::SyncConfig;

use super::console_runtime;
use crate::output;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Clear the cache and fingerprints before rendering
    #[arg(long)]
    pub force: bool,

    /// Print each region as a JSON object
    #[arg(long)]
    pub json: bool,
}

pub async fn run(config: SyncConfig, args: RenderArgs) -> Result<()> {
    let runtime = console_runtime(config, args.json)?;

    let report = if args.force {
        runtime.force_refresh().await
    } else {
        runtime.render_all(false).await
    };

    for (region, message) in &report.failed {
        output::error(&format!("{region}: {message}"));
    }
    if !report.is_complete() {
        bail!("{} region(s) failed to render", report.failed.len());
    }

    if !args.json {
        output::success(&format!("Rendered {} regions", report.committed.len()));
    }
    Ok(())
}
