//! stacksync - operator CLI for the Contentstack sync core.
//!
//! A thin wrapper over the `stacksync` library for inspecting content,
//! forcing refreshes and running the change poller by hand.

mod cli;
mod commands;
mod connection;
mod output;
mod sink;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    let config = cli.connection.config()?;
    match cli.command {
        Commands::Sync(args) => commands::sync::run(config, args).await,
        Commands::Entries(args) => commands::entries::run(config, args).await,
        Commands::Entry(args) => commands::entry::run(config, args).await,
        Commands::Render(args) => commands::render::run(config, args).await,
        Commands::Check(args) => commands::check::run(config, args).await,
        Commands::Watch(args) => commands::watch::run(config, args).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
