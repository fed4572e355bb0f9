//! Type-ahead suggestion parser for the home page search box.

use scraper::{Html, Selector};
use url::Url;

use crate::scraper::resolve_url;
use crate::scraper::selectors::TYPEAHEAD_LINK;

/// Parser for the search box suggestions
pub struct SuggestionParser;

impl SuggestionParser {
    /// Link of the first suggestion that resolves to a usable URL
    pub fn first_link(html: &str, base_url: &str) -> Option<Url> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(TYPEAHEAD_LINK).unwrap();

        document
            .select(&selector)
            .filter_map(|elem| elem.value().attr("href"))
            .find_map(|href| resolve_url(base_url, href))
    }
}
