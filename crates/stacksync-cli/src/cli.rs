//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{check, entries, entry, render, sync, watch};
use crate::connection::ConnectionArgs;

/// Contentstack content sync and cache operator tool.
#[derive(Parser, Debug)]
#[command(name = "stacksync")]
#[command(author, version = env!("STACKSYNC_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every content type once and print a summary
    Sync(sync::SyncArgs),

    /// List the normalized entries of a content type
    Entries(entries::EntriesArgs),

    /// Fetch a single entry by UID
    Entry(entry::EntryArgs),

    /// Render every region once
    Render(render::RenderArgs),

    /// Run the change detector and report what changed
    Check(check::CheckArgs),

    /// Render, then keep polling for changes until interrupted
    Watch(watch::WatchArgs),
}
