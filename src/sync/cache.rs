use crate::core::geo::ViewportBounds;
use crate::core::listing::ListingId;
use fxhash::FxHashSet;

/// Tracks which regions of the map have already been queried and which
/// listing identifiers have already been merged into the working set.
///
/// Fetched regions are append-only and consulted only through the
/// approximate-equivalence membership test; redundant near-equivalent
/// entries are permitted. Coverage is monotonic until an explicit reset.
#[derive(Debug, Default)]
pub struct RegionCache {
    fetched: Vec<ViewportBounds>,
    seen: FxHashSet<ListingId>,
    tolerance: f64,
}

impl RegionCache {
    /// Creates a cache with the given edge tolerance in degrees.
    pub fn new(tolerance: f64) -> Self {
        Self {
            fetched: Vec::new(),
            seen: FxHashSet::default(),
            tolerance,
        }
    }

    /// True if any previously recorded region is equivalent to `bounds`.
    pub fn has_covered_region(&self, bounds: &ViewportBounds) -> bool {
        self.fetched
            .iter()
            .any(|region| region.nearly_matches(bounds, self.tolerance))
    }

    /// Appends `bounds` to the fetched-region list.
    pub fn record_region(&mut self, bounds: ViewportBounds) {
        self.fetched.push(bounds);
    }

    /// True if `id` has already been merged into the working set.
    pub fn has_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Marks a listing identifier as merged.
    pub fn mark_seen(&mut self, id: ListingId) {
        self.seen.insert(id);
    }

    /// Number of recorded regions.
    pub fn region_count(&self) -> usize {
        self.fetched.len()
    }

    /// Number of identifiers marked as seen.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Clears all recorded regions and seen identifiers.
    pub fn reset(&mut self) {
        self.fetched.clear();
        self.seen.clear();
    }
}
