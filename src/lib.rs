//! # nestmap
//!
//! A viewport-driven synchronization engine for property-listing maps.
//!
//! The engine observes viewport changes, coalesces them through a quiescence
//! window, fetches listings only for regions it has not covered before,
//! merges results into a deduplicated working set, filters that set with
//! user predicates, and reconciles the filtered view against a registry of
//! owned map-marker handles. The rendering surface and the backing store are
//! external collaborators reached through traits.

pub mod core;
pub mod engine;
pub mod events;
pub mod favorites;
pub mod filter;
pub mod markers;
pub mod prelude;
pub mod sync;

// Re-export public API
pub use crate::core::{
    config::SyncOptions,
    geo::{haversine_km, rounded_km, LatLng, ViewportBounds},
    listing::{Listing, ListingId, ListingPage, ListingStatus, Pagination},
};

pub use crate::sync::{
    cache::RegionCache,
    coordinator::{FetchCoordinator, FetchRequest, MergeOutcome},
    debounce::SettleDebouncer,
    source::{annotate_nearby, HttpListingSource, ListingSource, NearbyListing, ViewportQuery},
};

pub use crate::filter::{FilterCriteria, FilteredView, StatusFilter};

pub use crate::markers::{MarkerRegistry, MarkerStyle, MarkerSurface, UiState};

pub use crate::favorites::{FavoriteStore, KeyValueStore, MemoryStore};

pub use crate::engine::SyncEngine;

pub use crate::events::{EngineEvent, EngineNotice};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("map surface failed to initialize: {0}")]
    SurfaceInit(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("marker error: {0}")]
    Marker(String),
}

/// Error type alias for convenience
pub type Error = SyncError;

/// Initializes env_logger for local debugging. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_debug_logging() {
    let _ = env_logger::builder().try_init();
}
