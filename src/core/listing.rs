use crate::core::geo::LatLng;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable unique identifier for a listing.
pub type ListingId = String;

/// Lifecycle status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Active,
    Pending,
    Sold,
}

/// A property listing as returned by the listing backend.
///
/// Treated as immutable once fetched; an update is modeled as replacement by
/// identifier. Field names on the wire are camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub price: f64,
    pub status: ListingStatus,
    #[serde(default)]
    pub is_assumable: bool,
    #[serde(default)]
    pub listed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub square_feet: Option<u32>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

impl Listing {
    /// The geographic position of the listing.
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Days since the listing was listed. A missing `listed_at` is treated
    /// as age zero.
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        match self.listed_at {
            Some(listed_at) => (now - listed_at).num_days().max(0),
            None => 0,
        }
    }
}

/// Pagination metadata returned alongside a page of listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub pages: u32,
    pub current_page: u32,
    pub limit: u32,
}

/// One page of listings from the viewport query endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingPage {
    pub listings: Vec<Listing>,
    pub pagination: Pagination,
}
