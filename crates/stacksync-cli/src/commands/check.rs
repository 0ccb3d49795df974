//! Check command implementation.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::{debug, warn};

use stacksync::poller::CheckReport;
use stacksync::SyncConfig;

use super::console_runtime;
use crate::output;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Seconds between the baseline cycle and the comparison cycle
    #[arg(long, default_value_t = 5)]
    pub wait: u64,

    /// Output the comparison report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Fingerprints live only as long as the process, so a check records a
/// baseline first and compares against it after `--wait` seconds.
pub async fn run(config: SyncConfig, args: CheckArgs) -> Result<()> {
    let runtime = console_runtime(config, args.json)?;

    let baseline = runtime.check_cycle().await;
    if !args.json {
        output::note(&format!(
            "Baseline recorded for {} content types; checking again in {}s...",
            baseline.seeded.len(),
            args.wait
        ));
    }

    debug!(seeded = ?baseline.seeded, wait_secs = args.wait, "Baseline cycle finished");
    if !baseline.unavailable.is_empty() {
        warn!(
            unavailable = ?baseline.unavailable,
            "Baseline incomplete; these types cannot report changes"
        );
    }

    tokio::time::sleep(Duration::from_secs(args.wait)).await;
    let report = runtime.check_cycle().await;
    debug!(changed = ?report.changed, "Comparison cycle finished");

    if args.json {
        return output::json(&serde_json::json!({
            "changed": names(&report.changed),
            "unavailable": names(&report.unavailable),
        }));
    }

    print_report(&report);
    Ok(())
}

fn names(kinds: &[stacksync::ContentKind]) -> Vec<&'static str> {
    kinds.iter().map(|k| k.uid_str()).collect()
}

fn print_report(report: &CheckReport) {
    for kind in &report.unavailable {
        output::warning(&format!("{} could not be checked", kind));
    }
    if report.has_changes() {
        for kind in &report.changed {
            println!("{} {}", "CHANGED".yellow(), kind);
        }
    } else {
        output::success("No changes detected");
    }
}
