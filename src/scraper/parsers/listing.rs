//! Listing page parser.
//!
//! Collects links to hotel detail pages from a search result page.

use scraper::{ElementRef, Html, Selector};

use crate::scraper::selectors::{LISTING, LISTING_ANCHOR};
use crate::types::ListingRef;

/// Parser for listing (search result) pages
pub struct ListingParser;

impl ListingParser {
    /// Collect listing references.
    ///
    /// Listings are popped off the end of the matched set, so the result is
    /// in reverse document order. Listings without a link are dropped.
    pub fn collect(html: &str) -> Vec<ListingRef> {
        let document = Html::parse_document(html);
        let listing_selector = Selector::parse(LISTING).unwrap();
        let anchor_selector = Selector::parse(LISTING_ANCHOR).unwrap();

        let mut listings: Vec<ElementRef> = document.select(&listing_selector).collect();
        let mut refs = Vec::with_capacity(listings.len());

        while let Some(listing) = listings.pop() {
            if let Some(href) = Self::listing_href(listing, &anchor_selector) {
                refs.push(ListingRef(href));
            }
        }

        refs
    }

    fn listing_href(listing: ElementRef, anchor_selector: &Selector) -> Option<String> {
        let href = if listing.value().name() == "a" {
            listing.value().attr("href")
        } else {
            listing
                .select(anchor_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
        }?;

        let href = href.trim();
        if href.is_empty() {
            None
        } else {
            Some(href.to_string())
        }
    }
}
