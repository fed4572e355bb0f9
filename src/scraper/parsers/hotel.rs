//! Hotel detail page parser.
//!
//! Every field has its own extractor. An extractor whose selector matches
//! nothing leaves an empty string (`None` for the website) instead of
//! failing; only a missing name rejects the page.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::scraper::resolve_url;
use crate::scraper::selectors::{
    ADDRESS, LOCATION, NAME, PHONE, PHOTO, PHOTO_CONTAINER, REVIEWS, WEBSITE,
};
use crate::types::{HotelField, HotelRecord, MAX_IMAGES};

/// Writes one field of the record from the page
pub type FieldExtractor = fn(&Html, &mut HotelRecord);

/// Extractors for every text field, keyed by the field they fill.
///
/// Images are not listed: they need the network and are handled by
/// [`HotelParser::photo_sources`].
pub const FIELD_EXTRACTORS: [(HotelField, FieldExtractor); 6] = [
    (HotelField::Name, extract_name),
    (HotelField::Reviews, extract_reviews),
    (HotelField::Address, extract_address),
    (HotelField::Website, extract_website),
    (HotelField::Phone, extract_phone),
    (HotelField::Location, extract_location),
];

/// Everything read from a detail page before images are downloaded
#[derive(Debug, Clone)]
pub struct HotelPage {
    /// Record with every field but `images` filled
    pub record: HotelRecord,
    /// Resolvable photo addresses, at most `max_images`
    pub photo_sources: Vec<Url>,
}

/// Parser for hotel detail pages
pub struct HotelParser;

impl HotelParser {
    /// Run all field extractors against a detail page.
    ///
    /// Returns `None` when the page has no hotel name.
    pub fn parse(html: &str, page_url: &str, max_images: usize) -> Option<HotelPage> {
        let document = Html::parse_document(html);
        let mut record = HotelRecord {
            url: page_url.to_string(),
            ..Default::default()
        };

        for (field, extract) in FIELD_EXTRACTORS {
            extract(&document, &mut record);
            debug!("{}: {:?}", field, Self::field_preview(&record, field));
        }

        if record.name.is_empty() {
            debug!("No hotel name on {}", page_url);
            return None;
        }

        let photo_sources = Self::photo_sources(&document, page_url, max_images);
        debug!("{}: {} sources", HotelField::Images, photo_sources.len());
        Some(HotelPage {
            record,
            photo_sources,
        })
    }

    /// Photo addresses from the photo container.
    ///
    /// Looks at the first `max_images` images only, never more than
    /// `MAX_IMAGES`; images without a resolvable source are skipped rather
    /// than fetched.
    pub fn photo_sources(document: &Html, page_url: &str, max_images: usize) -> Vec<Url> {
        let container_selector = Selector::parse(PHOTO_CONTAINER).unwrap();
        let photo_selector = Selector::parse(PHOTO).unwrap();

        let Some(container) = document.select(&container_selector).next() else {
            return Vec::new();
        };

        container
            .select(&photo_selector)
            .take(max_images.min(MAX_IMAGES))
            .filter_map(|img| {
                let source = Self::image_source(img, page_url);
                if source.is_none() {
                    debug!("Skipping photo without a usable source");
                }
                source
            })
            .collect()
    }

    fn image_source(img: ElementRef, page_url: &str) -> Option<Url> {
        let elem = img.value();
        let srcset_first = elem
            .attr("srcset")
            .and_then(|srcset| srcset.split(',').next())
            .and_then(|candidate| candidate.split_whitespace().next());

        [elem.attr("src"), elem.attr("data-src"), srcset_first]
            .into_iter()
            .flatten()
            .find_map(|candidate| resolve_url(page_url, candidate))
    }

    fn field_preview(record: &HotelRecord, field: HotelField) -> Option<&str> {
        match field {
            HotelField::Name => Some(&record.name),
            HotelField::Reviews => Some(&record.reviews),
            HotelField::Address => Some(&record.address),
            HotelField::Website => record.website.as_deref(),
            HotelField::Phone => Some(&record.phone),
            HotelField::Location => Some(&record.location),
            HotelField::Images => None,
        }
    }
}

/// Trimmed text of the first element matching `selector`, or an empty string
fn select_text(document: &Html, selector: &str) -> String {
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .next()
        .map(|elem| elem.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Trimmed attribute of the first element matching `selector`
fn select_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|elem| elem.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn extract_name(document: &Html, record: &mut HotelRecord) {
    record.name = select_text(document, NAME);
}

pub fn extract_reviews(document: &Html, record: &mut HotelRecord) {
    record.reviews = select_text(document, REVIEWS);
}

pub fn extract_address(document: &Html, record: &mut HotelRecord) {
    record.address = select_text(document, ADDRESS);
}

pub fn extract_website(document: &Html, record: &mut HotelRecord) {
    record.website = select_attr(document, WEBSITE, "href");
}

pub fn extract_phone(document: &Html, record: &mut HotelRecord) {
    record.phone = select_text(document, PHONE);
}

pub fn extract_location(document: &Html, record: &mut HotelRecord) {
    record.location = select_text(document, LOCATION);
}
