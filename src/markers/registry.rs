use crate::core::listing::{Listing, ListingId};
use crate::markers::style::MarkerStyle;
use crate::Result;
use fxhash::FxHashMap;
use std::collections::BTreeSet;

/// The rendering surface that owns the actual visual marker objects.
///
/// Handles are owned resources: the surface does not garbage-collect them,
/// so every placed handle must eventually be passed back to [`release`].
///
/// [`release`]: MarkerSurface::release
pub trait MarkerSurface {
    type Handle;

    /// Creates a marker for a listing at its coordinates with the given
    /// visual state.
    fn place(&mut self, listing: &Listing, style: &MarkerStyle) -> Result<Self::Handle>;

    /// Recomputes an existing marker's visual state.
    fn restyle(&mut self, handle: &mut Self::Handle, style: &MarkerStyle) -> Result<()>;

    /// Releases a marker handle.
    fn release(&mut self, handle: Self::Handle);
}

/// Maps listing identifiers to owned marker handles.
///
/// Invariant: after [`reconcile`](MarkerRegistry::reconcile) returns, a
/// handle exists for identifier X iff X is in the target visible set.
#[derive(Debug, Default)]
pub struct MarkerRegistry<H> {
    markers: FxHashMap<ListingId, H>,
}

impl<H> MarkerRegistry<H> {
    pub fn new() -> Self {
        Self {
            markers: FxHashMap::default(),
        }
    }

    /// Reconciles the registry against the target visible set.
    ///
    /// Missing markers are placed, markers for absent listings are released,
    /// and markers present in both are restyled so selection, hover, and
    /// favorite changes take effect without any data change.
    pub fn reconcile<S, F>(
        &mut self,
        surface: &mut S,
        visible: &[Listing],
        style_of: F,
    ) -> Result<()>
    where
        S: MarkerSurface<Handle = H>,
        F: Fn(&Listing) -> MarkerStyle,
    {
        let target: BTreeSet<&str> = visible.iter().map(|l| l.id.as_str()).collect();

        // Release markers whose listings left the visible set.
        let stale: Vec<ListingId> = self
            .markers
            .keys()
            .filter(|id| !target.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            if let Some(handle) = self.markers.remove(&id) {
                surface.release(handle);
            }
        }

        for listing in visible {
            let style = style_of(listing);
            match self.markers.get_mut(&listing.id) {
                Some(handle) => surface.restyle(handle, &style)?,
                None => {
                    let handle = surface.place(listing, &style)?;
                    self.markers.insert(listing.id.clone(), handle);
                }
            }
        }

        log::debug!("reconciled markers: {} on surface", self.markers.len());
        Ok(())
    }

    /// Releases every marker handle (teardown / full reset).
    pub fn clear<S>(&mut self, surface: &mut S)
    where
        S: MarkerSurface<Handle = H>,
    {
        for (_, handle) in self.markers.drain() {
            surface.release(handle);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.markers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Identifiers with a registered marker, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.markers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::listing::ListingStatus;
    use crate::markers::style::{MarkerEmphasis, MarkerTint};
    use crate::markers::UiState;

    fn listing(id: &str) -> Listing {
        Listing {
            id: id.to_string(),
            latitude: 37.5,
            longitude: -122.5,
            price: 500_000.0,
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

    /// Test surface that tracks live handles and last applied styles.
    #[derive(Default)]
    struct RecordingSurface {
        next_handle: u64,
        live: BTreeSet<u64>,
        styles: FxHashMap<u64, MarkerStyle>,
    }

    impl MarkerSurface for RecordingSurface {
        type Handle = u64;

        fn place(&mut self, _listing: &Listing, style: &MarkerStyle) -> Result<u64> {
            self.next_handle += 1;
            self.live.insert(self.next_handle);
            self.styles.insert(self.next_handle, style.clone());
            Ok(self.next_handle)
        }

        fn restyle(&mut self, handle: &mut u64, style: &MarkerStyle) -> Result<()> {
            self.styles.insert(*handle, style.clone());
            Ok(())
        }

        fn release(&mut self, handle: u64) {
            self.live.remove(&handle);
            self.styles.remove(&handle);
        }
    }

    fn plain_style(listing: &Listing) -> MarkerStyle {
        MarkerStyle::derive(listing, &UiState::default(), false)
    }

    #[test]
    fn test_reconcile_matches_target_exactly() {
        let mut surface = RecordingSurface::default();
        let mut registry = MarkerRegistry::new();

        let first = vec![listing("a"), listing("b"), listing("c")];
        registry.reconcile(&mut surface, &first, plain_style).unwrap();
        assert_eq!(registry.ids(), vec!["a", "b", "c"]);
        assert_eq!(surface.live.len(), 3);

        // "b" leaves, "d" enters.
        let second = vec![listing("a"), listing("c"), listing("d")];
        registry.reconcile(&mut surface, &second, plain_style).unwrap();
        assert_eq!(registry.ids(), vec!["a", "c", "d"]);
        assert_eq!(surface.live.len(), 3);
        assert!(!registry.contains("b"));
    }

    #[test]
    fn test_restyle_without_data_change() {
        let mut surface = RecordingSurface::default();
        let mut registry = MarkerRegistry::new();
        let visible = vec![listing("a")];

        registry.reconcile(&mut surface, &visible, plain_style).unwrap();

        let mut ui = UiState::default();
        ui.select(Some("a".to_string()));
        registry
            .reconcile(&mut surface, &visible, |l| MarkerStyle::derive(l, &ui, true))
            .unwrap();

        assert_eq!(registry.len(), 1);
        let style = surface.styles.values().next().unwrap();
        assert_eq!(style.emphasis, MarkerEmphasis::Selected);
        assert_eq!(style.tint, MarkerTint::Favorite);
    }

    #[test]
    fn test_clear_releases_every_handle() {
        let mut surface = RecordingSurface::default();
        let mut registry = MarkerRegistry::new();

        let visible = vec![listing("a"), listing("b")];
        registry.reconcile(&mut surface, &visible, plain_style).unwrap();
        assert_eq!(surface.live.len(), 2);

        registry.clear(&mut surface);
        assert!(registry.is_empty());
        assert!(surface.live.is_empty());
    }
}
