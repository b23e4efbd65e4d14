pub mod registry;
pub mod style;

pub use registry::{MarkerRegistry, MarkerSurface};
pub use style::{MarkerEmphasis, MarkerStyle, MarkerTint};

use crate::core::listing::ListingId;

/// Orthogonal UI state that drives marker visual recomputation without any
/// data change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub selected: Option<ListingId>,
    pub hovered: Option<ListingId>,
}

impl UiState {
    /// Selecting a listing clears the hover, matching the click behavior of
    /// the map surface.
    pub fn select(&mut self, id: Option<ListingId>) {
        self.selected = id;
        self.hovered = None;
    }

    pub fn hover(&mut self, id: Option<ListingId>) {
        self.hovered = id;
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered.as_deref() == Some(id)
    }
}
