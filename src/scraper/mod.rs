//! Hotel scraper for tripadvisor.com
//!
//! Provides browser automation, navigation, HTML extraction and image download.

pub mod browser;
pub mod images;
pub mod navigation;
pub mod page;
pub mod parsers;
pub mod proxy;
pub mod selectors;

pub use browser::Browser;
pub use images::HttpImageFetcher;
pub use proxy::{ProxyConfig, ProxyPool};

use url::Url;

/// Home page of the site
pub const BASE_URL: &str = "https://www.tripadvisor.com";

/// Text typed into the search box for a place
pub fn search_query(place: &str) -> String {
    format!("{} hotels", place.trim())
}

/// Resolve a possibly relative link against `base`.
///
/// Returns `None` for empty links, fragments and anything that is not http(s).
pub fn resolve_url(base: &str, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let base = Url::parse(base).ok()?;
    let url = base.join(href).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query() {
        assert_eq!(search_query("ohio"), "ohio hotels");
        assert_eq!(search_query("  new york "), "new york hotels");
    }

    #[test]
    fn test_resolve_relative_listing() {
        let url = resolve_url(BASE_URL, "/Hotel_Review-g1-d2-Reviews-Grand.html").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.tripadvisor.com/Hotel_Review-g1-d2-Reviews-Grand.html"
        );
    }

    #[test]
    fn test_resolve_absolute_and_protocol_relative() {
        let url = resolve_url(BASE_URL, "https://media.example.com/a.jpg").unwrap();
        assert_eq!(url.host_str(), Some("media.example.com"));

        let url = resolve_url(BASE_URL, "//media.example.com/b.jpg").unwrap();
        assert_eq!(url.as_str(), "https://media.example.com/b.jpg");
    }

    #[test]
    fn test_resolve_rejects_unusable_links() {
        assert!(resolve_url(BASE_URL, "").is_none());
        assert!(resolve_url(BASE_URL, "   ").is_none());
        assert!(resolve_url(BASE_URL, "#REVIEWS").is_none());
        assert!(resolve_url(BASE_URL, "data:image/gif;base64,R0lGOD").is_none());
        assert!(resolve_url(BASE_URL, "javascript:void(0)").is_none());
        assert!(resolve_url("not a url", "/relative").is_none());
    }
}
