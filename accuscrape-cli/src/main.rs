//! Binary crate for the `accuscrape` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive location setup
//! - Human-friendly snapshot output and the polling watch loop

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
