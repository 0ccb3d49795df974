//! Sync command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use stacksync::{ContentKind, DeliveryClient, Gateway, SiteContent, SyncConfig, TtlCache};

use crate::output;
use crate::sink::title_of;

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct TypeSummary {
    content_type: &'static str,
    count: usize,
    sample_title: Option<String>,
    updated_at: Option<String>,
}

#[derive(Debug, Serialize)]
struct SyncSummary {
    environment: String,
    synced_at: DateTime<Utc>,
    types: Vec<TypeSummary>,
    total: usize,
}

pub async fn run(config: SyncConfig, args: SyncArgs) -> Result<()> {
    let client = DeliveryClient::from_config(&config).context("Failed to create client")?;
    let content = SiteContent::new(Gateway::new(Arc::new(client), TtlCache::new()));

    if !args.json {
        output::note(&format!(
            "Syncing content from environment '{}'...",
            config.environment
        ));
    }

    let mut types = Vec::with_capacity(ContentKind::ALL.len());
    for kind in ContentKind::ALL {
        let entries = content.list(kind, true).await;
        let sample = entries.first();
        types.push(TypeSummary {
            content_type: kind.uid_str(),
            count: entries.len(),
            sample_title: sample.map(title_of),
            updated_at: sample.and_then(|e| e.updated_at()).map(str::to_string),
        });
    }
    let total = types.iter().map(|t| t.count).sum();

    let summary = SyncSummary {
        environment: config.environment,
        synced_at: Utc::now(),
        types,
        total,
    };

    if args.json {
        return output::json_pretty(&summary);
    }

    for t in &summary.types {
        let count = if t.count == 0 {
            "0".yellow()
        } else {
            t.count.to_string().green()
        };
        println!("{:<18} {}", t.content_type.bold(), count);
        if let Some(title) = &t.sample_title {
            output::field("  sample", title);
        }
        if let Some(updated) = &t.updated_at {
            output::field("  updated", updated);
        }
    }
    println!();
    output::success(&format!(
        "Synced {} entries at {}",
        summary.total,
        summary.synced_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    Ok(())
}
