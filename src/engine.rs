//! The long-lived controller that ties the sync pipeline together.
//!
//! `SyncEngine` owns every mutable cross-render cell: the fetch
//! coordinator (region cache + working set), the filter criteria and
//! published view, the marker registry, favorites, and selection/hover
//! state. It consumes [`EngineEvent`]s from a channel and answers with
//! [`EngineNotice`]s; the fetch itself runs outside the engine and is the
//! only suspension point.

use crate::core::config::SyncOptions;
use crate::core::listing::{Listing, ListingId};
use crate::events::{EngineEvent, EngineNotice};
use crate::favorites::{FavoriteStore, KeyValueStore};
use crate::filter::{FilterCriteria, FilteredView};
use crate::markers::{MarkerRegistry, MarkerStyle, MarkerSurface, UiState};
use crate::sync::coordinator::{FetchCoordinator, FetchRequest, MergeOutcome};
use crate::sync::source::ListingSource;
use crate::Result;
use chrono::Utc;
use crossbeam_channel::{unbounded, Receiver, Sender};
use instant::Instant;

pub struct SyncEngine<M: MarkerSurface, K: KeyValueStore> {
    options: SyncOptions,
    coordinator: FetchCoordinator,
    criteria: FilterCriteria,
    view: FilteredView,
    registry: MarkerRegistry<M::Handle>,
    surface: M,
    favorites: FavoriteStore<K>,
    ui: UiState,
    tx: Sender<EngineEvent>,
    rx: Receiver<EngineEvent>,
    live: bool,
}

impl<M: MarkerSurface, K: KeyValueStore> SyncEngine<M, K> {
    /// Creates an engine over a marker surface and a favorite storage
    /// backend. Fails if the stored favorite set cannot be loaded.
    pub fn new(options: SyncOptions, surface: M, store: K) -> Result<Self> {
        let favorites = FavoriteStore::load(store)?;
        let coordinator = FetchCoordinator::new(options.clone());
        let (tx, rx) = unbounded();
        Ok(Self {
            options,
            coordinator,
            criteria: FilterCriteria::default(),
            view: FilteredView::new(),
            registry: MarkerRegistry::new(),
            surface,
            favorites,
            ui: UiState::default(),
            tx,
            rx,
            live: true,
        })
    }

    /// A sender for surface bindings (marker click/hover handlers, gesture
    /// callbacks) to push events without holding a reference to the engine.
    pub fn sender(&self) -> Sender<EngineEvent> {
        self.tx.clone()
    }

    /// Drains queued events, then fires the debounced settle if its
    /// quiescence window has elapsed.
    pub fn pump(&mut self, now: Instant) -> Vec<EngineNotice> {
        let mut notices = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            notices.extend(self.handle(event, now));
        }
        if self.live {
            if let Some(request) = self.coordinator.poll(now) {
                notices.push(EngineNotice::FetchNeeded(request));
            }
        }
        notices
    }

    /// Processes one event. Events arriving after teardown are dropped.
    pub fn handle(&mut self, event: EngineEvent, now: Instant) -> Vec<EngineNotice> {
        if !self.live {
            log::debug!("engine torn down, dropping event: {:?}", event);
            return Vec::new();
        }

        let mut notices = Vec::new();
        match event {
            EngineEvent::MoveStart => self.coordinator.on_move_start(),
            EngineEvent::MoveEnd => self.coordinator.on_move_end(),
            EngineEvent::ViewportChanged(bounds) => {
                self.coordinator.on_viewport_changed(bounds, now);
            }
            EngineEvent::FetchResolved { request, result } => {
                let (outcome, follow_up) = self.coordinator.complete(&request, result);
                match outcome {
                    MergeOutcome::Merged { .. } => {
                        notices.push(EngineNotice::WorkingSetChanged {
                            size: self.coordinator.working_set().len(),
                        });
                        notices.extend(self.republish());
                    }
                    MergeOutcome::Exhausted => notices.push(EngineNotice::Exhausted),
                    MergeOutcome::Failed(message) => {
                        notices.push(EngineNotice::FetchFailed { message });
                    }
                    MergeOutcome::Stale => {}
                }
                if let Some(request) = follow_up {
                    notices.push(EngineNotice::FetchNeeded(request));
                }
            }
            EngineEvent::FiltersChanged(criteria) => {
                self.criteria = criteria;
                notices.extend(self.republish());
            }
            EngineEvent::FavoriteToggled(id) => {
                let favorited = self.favorites.toggle(&id);
                self.sync_markers();
                notices.push(EngineNotice::FavoriteChanged { id, favorited });
            }
            EngineEvent::MarkerClicked(id) => {
                self.ui.select(Some(id.clone()));
                self.sync_markers();
                notices.push(EngineNotice::SelectionChanged { selected: Some(id) });
            }
            EngineEvent::MarkerHoverEnter(id) => {
                self.ui.hover(Some(id));
                self.sync_markers();
            }
            EngineEvent::MarkerHoverLeave(_) => {
                self.ui.hover(None);
                self.sync_markers();
            }
            EngineEvent::SelectionCleared => {
                self.ui.select(None);
                self.sync_markers();
                notices.push(EngineNotice::SelectionChanged { selected: None });
            }
        }
        notices
    }

    /// Performs a fetch against a source and feeds the result back through
    /// the normal event path.
    pub async fn fetch_and_resolve<S: ListingSource>(
        &mut self,
        source: &S,
        request: FetchRequest,
        now: Instant,
    ) -> Vec<EngineNotice> {
        let result = source.query(&request.query()).await;
        self.handle(EngineEvent::FetchResolved { request, result }, now)
    }

    /// Tears the engine down: cancels the pending debounced settle (it must
    /// never fire afterwards), invalidates in-flight fetches, and releases
    /// every marker handle. Subsequent events are ignored.
    pub fn teardown(&mut self) {
        log::info!("tearing down sync engine");
        self.coordinator.reset();
        self.view.clear();
        self.registry.clear(&mut self.surface);
        self.ui = UiState::default();
        self.live = false;
    }

    /// Re-runs the filter and, when the published set changed, reconciles
    /// markers.
    fn republish(&mut self) -> Vec<EngineNotice> {
        let changed = self
            .view
            .refresh(self.coordinator.working_set(), &self.criteria, Utc::now());
        if !changed {
            return Vec::new();
        }
        self.sync_markers();
        vec![EngineNotice::ViewRepublished {
            visible: self.view.len(),
        }]
    }

    /// Reconciles the marker registry against the published view, deriving
    /// fresh visual state for every marker.
    fn sync_markers(&mut self) {
        let ui = &self.ui;
        let favorites = &self.favorites;
        let result = self.registry.reconcile(&mut self.surface, self.view.visible(), |listing| {
            MarkerStyle::derive(listing, ui, favorites.contains(&listing.id))
        });
        if let Err(err) = result {
            log::error!("marker reconciliation failed: {}", err);
        }
    }

    /// The published filtered listings, sorted by identifier.
    pub fn visible(&self) -> &[Listing] {
        self.view.visible()
    }

    /// Lowest-priced prefix of the published view for the card panel.
    pub fn top_cards(&self) -> Vec<&Listing> {
        self.view.top_by_price(self.options.card_panel_size)
    }

    pub fn selected(&self) -> Option<&ListingId> {
        self.ui.selected.as_ref()
    }

    pub fn hovered(&self) -> Option<&ListingId> {
        self.ui.hovered.as_ref()
    }

    pub fn working_set_len(&self) -> usize {
        self.coordinator.working_set().len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.coordinator.is_exhausted()
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn favorites(&self) -> &FavoriteStore<K> {
        &self.favorites
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn marker_count(&self) -> usize {
        self.registry.len()
    }

    /// Identifiers with a registered marker, sorted.
    pub fn marker_ids(&self) -> Vec<&str> {
        self.registry.ids()
    }
}
