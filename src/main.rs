//! Hotel scraper
//!
//! Searches a travel site for each place in a list, visits every hotel
//! listing and stores the extracted records as documents.

mod cli;
mod config;
mod pipeline;
mod places;
mod retry;
mod scraper;
mod storage;
mod types;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "hotel_scraper=trace"
    } else {
        "hotel_scraper=debug"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run_scrape(cli).await
}
