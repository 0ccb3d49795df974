//! Entries command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use stacksync::{
    ContentKind, ContentTypeQuery, ContentTypeUid, DeliveryClient, Gateway, SiteContent,
    SyncConfig, TtlCache,
};

use crate::output;

#[derive(Args, Debug)]
pub struct EntriesArgs {
    /// Content type UID (e.g. blog_post)
    pub content_type: String,

    /// Maximum number of entries to request
    #[arg(long)]
    pub limit: Option<u32>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(config: SyncConfig, args: EntriesArgs) -> Result<()> {
    let content_type = ContentTypeUid::new(&args.content_type).context("Invalid content type")?;
    let client = DeliveryClient::from_config(&config).context("Failed to create client")?;
    let content = SiteContent::new(Gateway::new(Arc::new(client), TtlCache::new()));

    // Known types are normalized; anything else is listed as delivered.
    let entries = match ContentKind::from_uid(content_type.as_str()) {
        Some(kind) => content.list_with_limit(kind, args.limit, true).await,
        None => {
            let mut query = ContentTypeQuery::new(content_type);
            if let Some(limit) = args.limit {
                query = query.limit(limit);
            }
            content
                .gateway()
                .fetch(&query, true)
                .await
                .unwrap_or_default()
        }
    };

    if entries.is_empty() {
        eprintln!("{}", "No entries found.".dimmed());
        return Ok(());
    }

    for entry in &entries {
        if args.pretty {
            output::json_pretty(entry)?;
        } else {
            output::json(entry)?;
        }
    }

    Ok(())
}
