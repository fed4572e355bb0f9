//! CSS selectors for tripadvisor.com pages.

// Home page search
pub const SEARCH_FORM: &str = "form[role='search']";
pub const SEARCH_INPUT: &str = "form[role='search'] input[type='search']";
pub const TYPEAHEAD_LINK: &str = "#typeahead_results a[href], [role='listbox'] a[href]";

// Listing page
pub const LISTING: &str = "div[class*='listing_title'], div[data-automation='hotel-card-title']";
pub const LISTING_ANCHOR: &str = "a[href]";

// Detail page
pub const NAME: &str = "h1#HEADING";
pub const REVIEWS: &str = "a[href='#REVIEWS']";
pub const ADDRESS: &str = "[data-test-target='address'], span.map-pin-fill + span";
pub const WEBSITE: &str = "a[data-test-target='website']";
pub const PHONE: &str = "a[href^='tel:']";
pub const LOCATION: &str = "[data-test-target='location'], .breadcrumbs li:last-child";
pub const PHOTO_CONTAINER: &str = "[data-test-target='photo-viewer'], .photo_viewer";
pub const PHOTO: &str = "img";
