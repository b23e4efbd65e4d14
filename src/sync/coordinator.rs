use crate::core::config::SyncOptions;
use crate::core::geo::ViewportBounds;
use crate::core::listing::{Listing, ListingId, ListingPage};
use crate::sync::cache::RegionCache;
use crate::sync::debounce::SettleDebouncer;
use crate::Result;
use fxhash::FxHashMap;
use instant::Instant;

#[cfg(feature = "tokio-runtime")]
use crate::sync::source::ListingSource;
use crate::sync::source::ViewportQuery;

/// A fetch the coordinator has decided to issue.
///
/// The embedding layer performs the actual query (the only suspension point)
/// and hands the result back through [`FetchCoordinator::complete`]. The
/// epoch ties the request to the coordinator lifetime so results that
/// resolve after a reset or teardown are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchRequest {
    pub bounds: ViewportBounds,
    pub page: u32,
    pub limit: u32,
    epoch: u64,
}

impl FetchRequest {
    /// The wire-level query for this request.
    pub fn query(&self) -> ViewportQuery {
        ViewportQuery {
            bounds: self.bounds,
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Result of resolving a fetch against the working set.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// New listings were merged into the working set.
    Merged { added: usize },
    /// The page contained no unseen listings; the exhausted flag is now set.
    Exhausted,
    /// The fetch failed; the region stays uncovered so a later equivalent
    /// viewport can retry. Recoverable.
    Failed(String),
    /// The coordinator was reset or torn down while the fetch was in flight;
    /// the result was discarded without touching any state.
    Stale,
}

/// Translates viewport-change events into at most one fetch per quiescent
/// period, merges results, and detects exhaustion.
///
/// The coordinator exclusively owns the region cache and the working set;
/// all mutation goes through the operations below. State transitions are
/// single-threaded: events are delivered one at a time and the fetch itself
/// runs outside the coordinator.
pub struct FetchCoordinator {
    options: SyncOptions,
    cache: RegionCache,
    working_set: FxHashMap<ListingId, Listing>,
    debouncer: SettleDebouncer,
    moving: bool,
    exhausted: bool,
    in_flight: Option<ViewportBounds>,
    deferred: Option<ViewportBounds>,
    epoch: u64,
}

impl FetchCoordinator {
    pub fn new(options: SyncOptions) -> Self {
        let cache = RegionCache::new(options.coverage_tolerance_deg);
        let debouncer = SettleDebouncer::new(options.quiescence_window);
        Self {
            options,
            cache,
            working_set: FxHashMap::default(),
            debouncer,
            moving: false,
            exhausted: false,
            in_flight: None,
            deferred: None,
            epoch: 0,
        }
    }

    /// The viewport entered a gesture (drag/zoom in progress).
    pub fn on_move_start(&mut self) {
        self.moving = true;
    }

    /// The gesture ended; the next settled viewport may fetch again.
    pub fn on_move_end(&mut self) {
        self.moving = false;
    }

    /// Records a viewport-change event. Rapid events are coalesced; only the
    /// latest bounds within the quiescence window will settle.
    pub fn on_viewport_changed(&mut self, bounds: ViewportBounds, now: Instant) {
        self.debouncer.schedule(bounds, now);
    }

    /// Fires the pending debounced settle if its quiescence window has
    /// elapsed, possibly yielding a fetch to perform.
    pub fn poll(&mut self, now: Instant) -> Option<FetchRequest> {
        let bounds = self.debouncer.due(now)?;
        self.on_viewport_settled(bounds)
    }

    /// Evaluates a settled viewport and decides whether a fetch is needed.
    ///
    /// Gate order: exhaustion, mid-gesture, equivalent fetch in flight,
    /// region already covered. A settle on non-equivalent bounds while a
    /// fetch is outstanding is deferred and re-evaluated when that fetch
    /// resolves, never dropped silently.
    pub fn on_viewport_settled(&mut self, bounds: ViewportBounds) -> Option<FetchRequest> {
        if !bounds.is_valid() {
            log::warn!("rejecting settle with malformed bounds: {:?}", bounds);
            return None;
        }

        if self.exhausted {
            if self.options.reset_exhaustion_on_new_region && !self.cache.has_covered_region(&bounds)
            {
                log::debug!("uncovered region after exhaustion, clearing exhausted flag");
                self.exhausted = false;
            } else {
                log::debug!("exhausted, skipping fetch for {:?}", bounds);
                return None;
            }
        }

        if self.moving {
            log::debug!("viewport mid-gesture, skipping fetch");
            return None;
        }

        if let Some(current) = self.in_flight {
            if current.nearly_matches(&bounds, self.options.coverage_tolerance_deg) {
                log::debug!("equivalent fetch already in flight");
            } else {
                log::debug!("fetch outstanding, deferring settle for {:?}", bounds);
                self.deferred = Some(bounds);
            }
            return None;
        }

        if self.cache.has_covered_region(&bounds) {
            log::debug!("region already covered: {:?}", bounds);
            return None;
        }

        self.in_flight = Some(bounds);
        Some(FetchRequest {
            bounds,
            page: 1,
            limit: self.options.page_limit,
            epoch: self.epoch,
        })
    }

    /// Resolves a previously issued fetch.
    ///
    /// On success, listings never seen before are merged into the working
    /// set and the region is recorded as covered; an all-seen (or empty)
    /// page sets the exhausted flag instead. On failure nothing is recorded,
    /// leaving the region retryable. Also returns a follow-up request when a
    /// settle was deferred behind this fetch.
    pub fn complete(
        &mut self,
        request: &FetchRequest,
        result: Result<ListingPage>,
    ) -> (MergeOutcome, Option<FetchRequest>) {
        if request.epoch != self.epoch {
            log::debug!("discarding stale fetch result for {:?}", request.bounds);
            return (MergeOutcome::Stale, None);
        }

        if self.in_flight == Some(request.bounds) {
            self.in_flight = None;
        }

        let outcome = match result {
            Err(err) => {
                log::warn!("viewport fetch failed for {:?}: {}", request.bounds, err);
                MergeOutcome::Failed(err.to_string())
            }
            Ok(page) => {
                let new: Vec<Listing> = page
                    .listings
                    .into_iter()
                    .filter(|listing| !self.cache.has_seen(&listing.id))
                    .collect();

                if new.is_empty() {
                    log::info!("no unseen listings in {:?}, marking exhausted", request.bounds);
                    self.exhausted = true;
                    MergeOutcome::Exhausted
                } else {
                    self.cache.record_region(request.bounds);
                    let added = new.len();
                    for listing in new {
                        self.cache.mark_seen(listing.id.clone());
                        self.working_set.insert(listing.id.clone(), listing);
                    }
                    log::info!(
                        "merged {} listings, working set now {}",
                        added,
                        self.working_set.len()
                    );
                    MergeOutcome::Merged { added }
                }
            }
        };

        // Re-evaluate any settle that arrived while this fetch was out.
        let follow_up = self
            .deferred
            .take()
            .and_then(|bounds| self.on_viewport_settled(bounds));

        (outcome, follow_up)
    }

    /// Runs the full settle-and-fetch cycle inline against a source. Returns
    /// `None` when the gates decided no fetch was needed.
    pub async fn settle_with<S>(
        &mut self,
        source: &S,
        bounds: ViewportBounds,
    ) -> Option<MergeOutcome>
    where
        S: crate::sync::source::ListingSource,
    {
        let request = self.on_viewport_settled(bounds)?;
        let result = source.query(&request.query()).await;
        let (outcome, _follow_up) = self.complete(&request, result);
        Some(outcome)
    }

    /// Waits out the quiescence window, then settles and fetches inline.
    #[cfg(feature = "tokio-runtime")]
    pub async fn settle_after_quiescence<S>(
        &mut self,
        source: &S,
        bounds: ViewportBounds,
    ) -> Option<MergeOutcome>
    where
        S: ListingSource,
    {
        tokio::time::sleep(self.options.quiescence_window).await;
        self.settle_with(source, bounds).await
    }

    /// Full reset: bumps the epoch so in-flight results are discarded,
    /// cancels the pending settle, and clears the cache, working set and
    /// flags.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.debouncer.cancel();
        self.cache.reset();
        self.working_set.clear();
        self.moving = false;
        self.exhausted = false;
        self.in_flight = None;
        self.deferred = None;
    }

    /// The accumulated, deduplicated working set.
    pub fn working_set(&self) -> &FxHashMap<ListingId, Listing> {
        &self.working_set
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn has_pending_settle(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn region_count(&self) -> usize {
        self.cache.region_count()
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }
}
