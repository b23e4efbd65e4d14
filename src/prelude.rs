//! Prelude module for common nestmap types and traits
//!
//! Re-exports the most commonly used types, traits, and functions for easy
//! importing with `use nestmap::prelude::*;`

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

pub use crate::markers::{
    style::{MarkerEmphasis, MarkerTint},
    MarkerRegistry, MarkerStyle, MarkerSurface, UiState,
};

pub use crate::favorites::{FavoriteStore, KeyValueStore, MemoryStore, FAVORITES_STORAGE_KEY};

pub use crate::engine::SyncEngine;

pub use crate::events::{EngineEvent, EngineNotice};

pub use crate::{Error as SyncError, Result};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
