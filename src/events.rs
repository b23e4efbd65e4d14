//! Message types for the engine's event loop.
//!
//! Marker click/hover handlers and the map surface push [`EngineEvent`]s
//! over a channel instead of holding inline callbacks into engine state;
//! the engine answers with [`EngineNotice`]s for the presentation layer.

use crate::core::listing::{ListingId, ListingPage};
use crate::core::geo::ViewportBounds;
use crate::filter::FilterCriteria;
use crate::sync::coordinator::FetchRequest;

/// Inbound events delivered to the engine, one at a time.
#[derive(Debug)]
pub enum EngineEvent {
    /// A pan/zoom gesture started.
    MoveStart,
    /// The gesture ended.
    MoveEnd,
    /// The visible region changed (possibly mid-gesture; coalesced).
    ViewportChanged(ViewportBounds),
    /// A previously issued fetch resolved.
    FetchResolved {
        request: FetchRequest,
        result: crate::Result<ListingPage>,
    },
    /// The user changed the filter predicates.
    FiltersChanged(FilterCriteria),
    /// The user toggled a favorite.
    FavoriteToggled(ListingId),
    /// A marker was clicked.
    MarkerClicked(ListingId),
    /// The pointer entered a marker.
    MarkerHoverEnter(ListingId),
    /// The pointer left a marker.
    MarkerHoverLeave(ListingId),
    /// Clear the current selection (detail panel closed).
    SelectionCleared,
}

/// Outbound notifications for the embedding/presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineNotice {
    /// The engine wants this fetch performed; resolve it with
    /// [`EngineEvent::FetchResolved`].
    FetchNeeded(FetchRequest),
    /// A viewport fetch failed. Recoverable; surfaced as a dismissible
    /// notification, and the region stays retryable.
    FetchFailed { message: String },
    /// New listings were merged into the working set.
    WorkingSetChanged { size: usize },
    /// The filtered view changed and was republished.
    ViewRepublished { visible: usize },
    /// A fetch returned no unseen listings.
    Exhausted,
    /// Selection changed (marker click or panel close).
    SelectionChanged { selected: Option<ListingId> },
    /// Favorite membership changed for an identifier.
    FavoriteChanged { id: ListingId, favorited: bool },
}
