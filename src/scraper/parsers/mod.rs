//! HTML parsers for tripadvisor.com pages.

pub mod hotel;
pub mod listing;
pub mod search;

pub use hotel::HotelParser;
pub use listing::ListingParser;
pub use search::SuggestionParser;
