//! Per-place scraping pipeline.
//!
//! search → first suggestion → listing page → every detail page → store.
//! Everything runs sequentially on a single page.

use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;

use crate::config::ScrapeSettings;
use crate::retry::RetryPolicy;
use crate::scraper::images::{download_images, ImageFetcher};
use crate::scraper::navigation::navigate;
use crate::scraper::page::{LoadState, PageDriver};
use crate::scraper::parsers::{HotelParser, ListingParser, SuggestionParser};
use crate::scraper::selectors::{SEARCH_FORM, SEARCH_INPUT};
use crate::scraper::{resolve_url, search_query};
use crate::storage::{collection_name, RecordSink};
use crate::types::{HotelRecord, ListingRef};

/// Pipeline progress for one place
enum Stage {
    SearchEntry,
    SuggestionChosen(Url),
    ListingsCollected(Vec<ListingRef>),
    Extracting(std::vec::IntoIter<ListingRef>),
    Done,
}

/// Outcome of one place
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceReport {
    pub place: String,
    pub collection: String,
    /// Listings found on the listing page
    pub listings: usize,
    /// Records handed to the store
    pub persisted: usize,
    /// Listings that produced no record
    pub skipped: usize,
}

/// Drives the search → listings → records flow for one place at a time
pub struct PlacePipeline<'a, P: ?Sized, F: ?Sized, S: ?Sized> {
    page: &'a P,
    fetcher: &'a F,
    sink: &'a S,
    settings: &'a ScrapeSettings,
    retry: RetryPolicy,
    database: &'a str,
}

impl<'a, P, F, S> PlacePipeline<'a, P, F, S>
where
    P: PageDriver + ?Sized,
    F: ImageFetcher + ?Sized,
    S: RecordSink + ?Sized,
{
    pub fn new(
        page: &'a P,
        fetcher: &'a F,
        sink: &'a S,
        settings: &'a ScrapeSettings,
        retry: RetryPolicy,
        database: &'a str,
    ) -> Self {
        Self {
            page,
            fetcher,
            sink,
            settings,
            retry,
            database,
        }
    }

    /// Scrape one place and store every hotel found.
    ///
    /// Only a store failure is an error; everything else degrades to fewer
    /// records.
    pub async fn run(&self, place: &str) -> Result<PlaceReport> {
        let mut report = PlaceReport {
            place: place.to_string(),
            collection: collection_name(self.database, place),
            ..Default::default()
        };

        let mut stage = Stage::SearchEntry;
        loop {
            stage = match stage {
                Stage::SearchEntry => match self.search(place).await {
                    Some(url) => Stage::SuggestionChosen(url),
                    None => {
                        info!("No search suggestion for {:?}", place);
                        Stage::Done
                    }
                },
                Stage::SuggestionChosen(url) => {
                    navigate(self.page, url.as_str(), LoadState::Load, &self.retry).await;
                    Stage::ListingsCollected(self.collect_listings().await)
                }
                Stage::ListingsCollected(listings) => {
                    info!("Found {} listings for {:?}", listings.len(), place);
                    report.listings = listings.len();
                    Stage::Extracting(listings.into_iter())
                }
                Stage::Extracting(mut remaining) => match remaining.next() {
                    Some(listing) => {
                        match self.extract(&listing).await {
                            Some(record) => {
                                self.sink.insert_one(&report.collection, &record)?;
                                report.persisted += 1;
                            }
                            None => report.skipped += 1,
                        }
                        Stage::Extracting(remaining)
                    }
                    None => Stage::Done,
                },
                Stage::Done => break,
            };
        }

        Ok(report)
    }

    /// Type the place into the home page search box and read the first suggestion
    async fn search(&self, place: &str) -> Option<Url> {
        navigate(
            self.page,
            &self.settings.base_url,
            LoadState::DomContentLoaded,
            &self.retry,
        )
        .await;
        sleep(Duration::from_millis(self.settings.settle_delay_ms)).await;

        if let Err(e) = self.page.scroll_into_view(SEARCH_FORM).await {
            warn!("Could not scroll to the search form: {}", e);
        }
        if let Err(e) = self.page.fill(SEARCH_INPUT, &search_query(place)).await {
            warn!("Could not fill the search box for {:?}: {}", place, e);
            return None;
        }
        sleep(Duration::from_millis(self.settings.typeahead_delay_ms)).await;

        match self.page.content().await {
            Ok(html) => SuggestionParser::first_link(&html, &self.settings.base_url),
            Err(e) => {
                warn!("Could not read search suggestions: {}", e);
                None
            }
        }
    }

    async fn collect_listings(&self) -> Vec<ListingRef> {
        match self.page.content().await {
            Ok(html) => ListingParser::collect(&html),
            Err(e) => {
                warn!("Could not read the listing page: {}", e);
                Vec::new()
            }
        }
    }

    /// Visit one detail page and assemble its record
    async fn extract(&self, listing: &ListingRef) -> Option<HotelRecord> {
        let Some(url) = resolve_url(&self.settings.base_url, listing.as_str()) else {
            warn!("Skipping listing with unusable link {:?}", listing.to_string());
            return None;
        };

        if navigate(self.page, url.as_str(), LoadState::DomContentLoaded, &self.retry)
            .await
            .is_none()
        {
            warn!("Skipping {} after failed navigation", url);
            return None;
        }

        let html = match self.page.content().await {
            Ok(html) => html,
            Err(e) => {
                warn!("Could not read {}: {}", url, e);
                return None;
            }
        };

        let Some(hotel) = HotelParser::parse(&html, url.as_str(), self.settings.max_images) else {
            warn!("Skipping {}: no hotel name", url);
            return None;
        };

        let mut record = hotel.record;
        record.images = download_images(
            self.fetcher,
            &hotel.photo_sources,
            self.settings.max_images,
            &self.retry,
        )
        .await;

        info!(
            "Scraped {:?} ({} images)",
            record.name,
            record.images.len()
        );
        Some(record)
    }
}
