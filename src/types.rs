//! Record types shared by the extractors, the pipeline and storage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on the photos a record carries
pub const MAX_IMAGES: usize = 5;

/// Logical hotel fields and their display labels.
///
/// The labels double as the keys of the persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotelField {
    Name,
    Reviews,
    Address,
    Website,
    Phone,
    Location,
    Images,
}

impl HotelField {
    #[cfg(test)]
    pub const ALL: [HotelField; 7] = [
        HotelField::Name,
        HotelField::Reviews,
        HotelField::Address,
        HotelField::Website,
        HotelField::Phone,
        HotelField::Location,
        HotelField::Images,
    ];

    /// Human-readable label
    pub const fn label(&self) -> &'static str {
        match self {
            HotelField::Name => "Name",
            HotelField::Reviews => "Reviews",
            HotelField::Address => "Address",
            HotelField::Website => "Website",
            HotelField::Phone => "Phone",
            HotelField::Location => "Location",
            HotelField::Images => "Images",
        }
    }
}

impl fmt::Display for HotelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scraped hotel, persisted as a single document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotelRecord {
    #[serde(rename = "Name")]
    pub name: String,
    /// Review count as displayed, e.g. "1,024 reviews"
    #[serde(rename = "Reviews")]
    pub reviews: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Website")]
    pub website: Option<String>,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Location")]
    pub location: String,
    /// Base64-encoded photo bytes, at most `MAX_IMAGES`
    #[serde(rename = "Images")]
    pub images: Vec<String>,
    /// Detail page the record was taken from
    #[serde(rename = "Url", default)]
    pub url: String,
}

/// Relative link to a hotel detail page, as found on a listing page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingRef(pub String);

impl ListingRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
