//! SQLite document store for scraped hotels
//!
//! Records are stored as JSON documents grouped into named collections,
//! one collection per place.

pub mod repository;
pub mod schema;

pub use repository::{collection_name, HotelRepository, RecordSink};
