use crate::core::geo::{haversine_km, rounded_km, LatLng, ViewportBounds};
use crate::core::listing::{Listing, ListingPage};
use crate::{Result, SyncError};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Shared HTTP client with a custom User-Agent. Building the client once
/// avoids the cost of TLS and connection pool setup for every fetch.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("nestmap/0.1 (+https://github.com/example/nestmap)")
        .build()
        .expect("failed to build reqwest client")
});

/// Parameters of a single viewport page query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportQuery {
    pub bounds: ViewportBounds,
    pub page: u32,
    pub limit: u32,
}

/// A listing annotated with its distance from a query origin, in kilometers
/// rounded to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub distance: f64,
}

/// Backend interface for listing queries.
///
/// Implemented over HTTP in production and by in-memory fakes in tests.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetches one page of listings within the given viewport.
    async fn query(&self, query: &ViewportQuery) -> Result<ListingPage>;

    /// Fetches listings near a point, annotated with distance and sorted
    /// ascending.
    async fn nearby(&self, origin: LatLng, radius_km: f64, limit: u32)
        -> Result<Vec<NearbyListing>>;
}

/// `ListingSource` implementation over the listing HTTP API.
#[derive(Debug, Clone)]
pub struct HttpListingSource {
    base_url: String,
    client: Client,
}

impl HttpListingSource {
    /// Creates a source for the given API base URL, e.g.
    /// `https://example.com/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: HTTP_CLIENT.clone(),
        }
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn query(&self, query: &ViewportQuery) -> Result<ListingPage> {
        let viewport = serde_json::to_string(&query.bounds).map_err(SyncError::Serialization)?;
        let url = format!("{}/listings", self.base_url);

        log::debug!(
            "fetch listings page={} limit={} viewport={}",
            query.page,
            query.limit,
            viewport
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("viewport", viewport.as_str()),
                ("page", &query.page.to_string()),
                ("limit", &query.limit.to_string()),
            ])
            .send()
            .await
            .map_err(SyncError::Network)?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()).into());
        }

        let page: ListingPage = response.json().await.map_err(SyncError::Network)?;
        log::info!(
            "received {} listings (total {})",
            page.listings.len(),
            page.pagination.total
        );
        Ok(page)
    }

    async fn nearby(
        &self,
        origin: LatLng,
        radius_km: f64,
        limit: u32,
    ) -> Result<Vec<NearbyListing>> {
        if !origin.is_valid() {
            return Err(SyncError::InvalidCoordinates(format!(
                "lat={} lng={}",
                origin.lat, origin.lng
            ))
            .into());
        }

        let url = format!("{}/listings/nearby", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", origin.lat.to_string()),
                ("lng", origin.lng.to_string()),
                ("radius", radius_km.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(SyncError::Network)?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()).into());
        }

        let listings: Vec<NearbyListing> = response.json().await.map_err(SyncError::Network)?;
        Ok(listings)
    }
}

/// Annotates listings with their great-circle distance from `origin` and
/// sorts ascending. Rejects invalid origins at the boundary so malformed
/// coordinates never reach distance math.
pub fn annotate_nearby(origin: LatLng, listings: Vec<Listing>) -> Result<Vec<NearbyListing>> {
    if !origin.is_valid() {
        return Err(SyncError::InvalidCoordinates(format!(
            "lat={} lng={}",
            origin.lat, origin.lng
        ))
        .into());
    }

    let mut annotated: Vec<NearbyListing> = listings
        .into_iter()
        .map(|listing| {
            let distance = rounded_km(haversine_km(&origin, &listing.position()));
            NearbyListing { listing, distance }
        })
        .collect();

    annotated.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    Ok(annotated)
}
