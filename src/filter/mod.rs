//! Local filter layer: pure predicates over the working set.
//!
//! Filtering is independent of network fetch state. The [`FilteredView`]
//! recomputes whenever the working set or the criteria change, and skips
//! republishing when the newly computed set is element-for-element identical
//! to the previous one, so downstream marker reconciliation only runs on
//! real changes.

use crate::core::listing::{Listing, ListingId, ListingStatus};
use chrono::{DateTime, Utc};
use fxhash::FxHashMap;
use std::collections::BTreeSet;

/// Which statuses the status predicate accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Any,
    Only(ListingStatus),
}

impl StatusFilter {
    pub fn accepts(&self, status: ListingStatus) -> bool {
        match self {
            StatusFilter::Any => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

/// User-chosen predicates applied to the working set.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Inclusive price bounds; an absent bound is unbounded.
    pub price_range: (Option<f64>, Option<f64>),
    /// Maximum listing age in days; `None` disables the age predicate.
    pub max_listing_age_days: Option<i64>,
    /// When set, only assumable listings pass.
    pub assumable_only: bool,
    pub status: StatusFilter,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            price_range: (None, None),
            max_listing_age_days: None,
            assumable_only: false,
            status: StatusFilter::Any,
        }
    }
}

impl FilterCriteria {
    /// Pure predicate: does `listing` pass every criterion at time `now`?
    pub fn matches(&self, listing: &Listing, now: DateTime<Utc>) -> bool {
        let (min_price, max_price) = self.price_range;
        if let Some(min) = min_price {
            if listing.price < min {
                return false;
            }
        }
        if let Some(max) = max_price {
            if listing.price > max {
                return false;
            }
        }
        if let Some(max_age) = self.max_listing_age_days {
            if listing.age_days(now) > max_age {
                return false;
            }
        }
        if self.assumable_only && !listing.is_assumable {
            return false;
        }
        self.status.accepts(listing.status)
    }
}

/// The filtered, published view of the working set.
#[derive(Debug, Default)]
pub struct FilteredView {
    visible: Vec<Listing>,
    visible_ids: BTreeSet<ListingId>,
}

impl FilteredView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the filtered set and republishes it. Returns `false` when
    /// the result is element-for-element identical to the previous
    /// publication (full set equality, not just size).
    pub fn refresh(
        &mut self,
        working_set: &FxHashMap<ListingId, Listing>,
        criteria: &FilterCriteria,
        now: DateTime<Utc>,
    ) -> bool {
        let mut visible: Vec<Listing> = working_set
            .values()
            .filter(|listing| criteria.matches(listing, now))
            .cloned()
            .collect();
        // Deterministic publication order regardless of map iteration.
        visible.sort_by(|a, b| a.id.cmp(&b.id));

        let ids: BTreeSet<ListingId> = visible.iter().map(|l| l.id.clone()).collect();
        if ids == self.visible_ids {
            return false;
        }

        log::debug!("republishing filtered view: {} listings", visible.len());
        self.visible = visible;
        self.visible_ids = ids;
        true
    }

    /// The currently published listings, sorted by identifier.
    pub fn visible(&self) -> &[Listing] {
        &self.visible
    }

    /// Identifiers of the currently published listings.
    pub fn visible_ids(&self) -> &BTreeSet<ListingId> {
        &self.visible_ids
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// The `n` lowest-priced listings for the constrained card panel.
    /// Stable sort, so price ties keep their relative order.
    pub fn top_by_price(&self, n: usize) -> Vec<&Listing> {
        let mut sorted: Vec<&Listing> = self.visible.iter().collect();
        sorted.sort_by(|a, b| a.price.total_cmp(&b.price));
        sorted.truncate(n);
        sorted
    }

    /// Drops the published view (full reset).
    pub fn clear(&mut self) {
        self.visible.clear();
        self.visible_ids.clear();
    }
}
