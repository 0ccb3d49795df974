//! Entry command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use stacksync::{ContentTypeUid, DeliveryClient, EntryUid, SyncConfig};

use crate::output;

#[derive(Args, Debug)]
pub struct EntryArgs {
    /// Content type UID (e.g. hero_section)
    pub content_type: String,

    /// Entry UID
    pub uid: String,
}

pub async fn run(config: SyncConfig, args: EntryArgs) -> Result<()> {
    let content_type = ContentTypeUid::new(&args.content_type).context("Invalid content type")?;
    let uid = EntryUid::new(&args.uid).context("Invalid entry UID")?;
    let client = DeliveryClient::from_config(&config).context("Failed to create client")?;

    let response = client
        .get_entry(&content_type, &uid)
        .await
        .context("Failed to fetch entry")?;

    let Some(entry) = response.entry else {
        bail!("Entry {uid} not found in {content_type}");
    };

    output::json_pretty(&entry)
}
