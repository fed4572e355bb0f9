//! CLI for hotel-scraper.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::pipeline::PlacePipeline;
use crate::places::read_places;
use crate::retry::RetryPolicy;
use crate::scraper::{Browser, HttpImageFetcher, ProxyConfig, ProxyPool};
use crate::storage::HotelRepository;

#[derive(Parser, Debug)]
#[command(name = "hotel-scraper")]
#[command(version, about = "Scrape hotel listings for a list of places", long_about = None)]
pub struct Cli {
    /// File with one place name per line
    #[arg(short, long, value_name = "FILE", default_value = "places.txt")]
    pub places: PathBuf,

    /// Proxy file (host:port[:username:password] per line); the first entry is used
    #[arg(long, value_name = "FILE")]
    pub proxies: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Maximum photos stored per hotel (at most 5)
    #[arg(long)]
    pub max_images: Option<usize>,

    /// Document store path override
    #[arg(long, value_name = "PATH")]
    pub database: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Scrape every place in the input file.
pub async fn run_scrape(cli: Cli) -> Result<()> {
    // Load configuration
    let mut config = AppConfig::load()?;
    apply_overrides(&mut config, &cli)?;

    let places = read_places(&cli.places)?;
    info!("Found {} places in file provided.", places.len());
    if places.is_empty() {
        warn!("Nothing to scrape");
        return Ok(());
    }

    let proxy = match &cli.proxies {
        Some(path) => ProxyPool::from_file(path)?.next(),
        None => None,
    };

    let repository = HotelRepository::new(Path::new(&config.database.uri))?;
    info!("Storing records in {} ({})", config.database.uri, config.database.name);

    let fetcher = HttpImageFetcher::new(Duration::from_secs(config.scrape.image_timeout_secs))?;

    let mut browser = Browser::launch(&config.browser).await?;
    let result = scrape_places(&mut browser, proxy, &fetcher, &repository, &config, &places).await;
    browser.close().await?;

    result
}

/// Override configuration with CLI args
fn apply_overrides(config: &mut AppConfig, cli: &Cli) -> Result<()> {
    if cli.headed {
        config.browser.headless = false;
    }
    if let Some(max_images) = cli.max_images {
        config.scrape.max_images = max_images;
    }
    if let Some(database) = &cli.database {
        config.database.uri = database.clone();
    }
    config.validate()
}

async fn scrape_places(
    browser: &mut Browser,
    proxy: Option<ProxyConfig>,
    fetcher: &HttpImageFetcher,
    repository: &HotelRepository,
    config: &AppConfig,
    places: &[String],
) -> Result<()> {
    let page = browser
        .new_page(proxy)
        .await
        .context("Failed to open a browser page")?;

    let pipeline = PlacePipeline::new(
        &page,
        fetcher,
        repository,
        &config.scrape,
        RetryPolicy::from(&config.retry),
        &config.database.name,
    );

    let mut total = 0;
    for place in places {
        info!("Scraping hotels for {:?}", place);
        let report = pipeline.run(place).await?;
        info!(
            "{}: {} listings, {} stored in {}, {} skipped",
            report.place, report.listings, report.persisted, report.collection, report.skipped
        );
        total += report.persisted;
    }

    info!("Done: {} records stored for {} places", total, places.len());

    if let Err(e) = page.close().await {
        warn!("{}", e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let cli = Cli::parse_from(["hotel-scraper"]);
        assert_eq!(cli.places, PathBuf::from("places.txt"));
        assert!(cli.proxies.is_none());
        assert!(!cli.headed);
        assert!(cli.max_images.is_none());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "hotel-scraper",
            "--places",
            "states.txt",
            "--proxies",
            "proxies.txt",
            "--headed",
            "--max-images",
            "3",
            "--database",
            "/tmp/h.sqlite",
            "-v",
        ]);
        assert_eq!(cli.places, PathBuf::from("states.txt"));
        assert_eq!(cli.proxies, Some(PathBuf::from("proxies.txt")));
        assert!(cli.headed);
        assert_eq!(cli.max_images, Some(3));
        assert_eq!(cli.database.as_deref(), Some("/tmp/h.sqlite"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_apply_overrides() {
        let cli = Cli::parse_from(["hotel-scraper", "--headed", "--max-images", "2", "--database", "h.sqlite"]);
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &cli).unwrap();

        assert!(!config.browser.headless);
        assert_eq!(config.scrape.max_images, 2);
        assert_eq!(config.database.uri, "h.sqlite");
    }

    #[test]
    fn test_max_images_above_five_rejected() {
        let cli = Cli::parse_from(["hotel-scraper", "--max-images", "8"]);
        let mut config = AppConfig::default();
        assert!(apply_overrides(&mut config, &cli).is_err());
    }
}
