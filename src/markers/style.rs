//! Derivation of marker visual state from listing data, favorites, and
//! selection/hover state.

use crate::core::listing::{Listing, ListingStatus};
use crate::markers::UiState;

/// Background tint of a marker. Precedence: favorite over assumable over
/// status color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerTint {
    Favorite,
    Assumable,
    Pending,
    Sold,
    Active,
}

/// Ring/scale emphasis from selection and hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerEmphasis {
    Selected,
    Hovered,
    Normal,
}

/// The full derived visual state handed to the marker surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub tint: MarkerTint,
    pub emphasis: MarkerEmphasis,
    /// Marker label, the estimated monthly payment (`"$N/mo"`).
    pub label: String,
}

impl MarkerStyle {
    /// Derives the style for a listing given the current UI state and its
    /// favorite membership.
    pub fn derive(listing: &Listing, ui: &UiState, is_favorite: bool) -> Self {
        let tint = if is_favorite {
            MarkerTint::Favorite
        } else if listing.is_assumable {
            MarkerTint::Assumable
        } else {
            match listing.status {
                ListingStatus::Pending => MarkerTint::Pending,
                ListingStatus::Sold => MarkerTint::Sold,
                ListingStatus::Active => MarkerTint::Active,
            }
        };

        let emphasis = if ui.is_selected(&listing.id) {
            MarkerEmphasis::Selected
        } else if ui.is_hovered(&listing.id) {
            MarkerEmphasis::Hovered
        } else {
            MarkerEmphasis::Normal
        };

        MarkerStyle {
            tint,
            emphasis,
            label: monthly_label(listing.price),
        }
    }
}

/// Formats a price as an estimated monthly payment over 360 payments.
pub fn monthly_label(price: f64) -> String {
    format!("${}/mo", (price / 360.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str) -> Listing {
        Listing {
            id: id.to_string(),
            latitude: 37.5,
            longitude: -122.5,
            price: 720_000.0,
            status: ListingStatus::Active,
            is_assumable: false,
            listed_at: None,
            created_at: None,
            address: None,
            city: None,
            state: None,
            bedrooms: None,
            bathrooms: None,
            square_feet: None,
            property_type: None,
            photo_urls: Vec::new(),
        }
    }

    #[test]
    fn test_monthly_label() {
        assert_eq!(monthly_label(720_000.0), "$2000/mo");
        assert_eq!(monthly_label(0.0), "$0/mo");
    }

    #[test]
    fn test_tint_precedence() {
        let mut l = listing("a");
        l.is_assumable = true;
        l.status = ListingStatus::Pending;
        let ui = UiState::default();

        // Favorite wins over everything.
        assert_eq!(MarkerStyle::derive(&l, &ui, true).tint, MarkerTint::Favorite);
        // Assumable wins over status.
        assert_eq!(
            MarkerStyle::derive(&l, &ui, false).tint,
            MarkerTint::Assumable
        );

        l.is_assumable = false;
        assert_eq!(MarkerStyle::derive(&l, &ui, false).tint, MarkerTint::Pending);
        l.status = ListingStatus::Sold;
        assert_eq!(MarkerStyle::derive(&l, &ui, false).tint, MarkerTint::Sold);
        l.status = ListingStatus::Active;
        assert_eq!(MarkerStyle::derive(&l, &ui, false).tint, MarkerTint::Active);
    }

    #[test]
    fn test_emphasis_selected_beats_hovered() {
        let l = listing("a");
        let mut ui = UiState::default();

        ui.hover(Some("a".to_string()));
        assert_eq!(
            MarkerStyle::derive(&l, &ui, false).emphasis,
            MarkerEmphasis::Hovered
        );

        ui.select(Some("a".to_string()));
        assert_eq!(
            MarkerStyle::derive(&l, &ui, false).emphasis,
            MarkerEmphasis::Selected
        );
    }
}
