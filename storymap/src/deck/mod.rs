//! Slide decks: the state of one map and the slides that drive it.
//!
//! A [`SlideDeck`] owns the map of one page section. Whenever the active slide changes the deck
//! starts a sync, which goes through three steps:
//!
//! 1. [`SlideDeck::set_active_slide`] (or one of the navigation methods) updates the index and
//!    returns a [`SyncRequest`]. Starting a sync supersedes every sync started before it.
//! 2. [`SyncRequest::load`] loads the slide data without access to the deck.
//! 3. [`SlideDeck::apply`] replaces the layers and moves the camera, unless the request was
//!    superseded while it was loading.
//!
//! [`DeckHandle`] ties the steps together for decks shared with event handlers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, error, warn};
use storymap_types::LatLngBounds;

use crate::config::DeckConfig;
use crate::error::StorymapError;
use crate::layer::{LayerGroup, Tooltip};
use crate::map::MapSurface;
use crate::scroll::{active_slide_index, ScrollMetrics};
use crate::style::StyleMode;

mod handle;
mod sync;

pub use handle::DeckHandle;
use sync::SettleAction;
pub use sync::{LoadedSlide, SyncOutcome, SyncRequest, SyncToken};

/// One block of the narrative, paired with one data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    id: String,
    hidden: bool,
    show_popups: bool,
}

impl Slide {
    /// Creates a visible slide that does not open popups.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hidden: false,
            show_popups: false,
        }
    }

    /// Sets whether labels of the slide features are opened when the camera stops.
    pub fn with_popups(mut self, show_popups: bool) -> Self {
        self.show_popups = show_popups;
        self
    }

    /// Id of the slide. It is also the name of the data file.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns true if the slide was hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Returns true if labels are opened when the camera stops.
    pub fn show_popups(&self) -> bool {
        self.show_popups
    }
}

/// State of one map and its slides.
pub struct SlideDeck<M: MapSurface> {
    slides: Vec<Slide>,
    map: M,
    config: DeckConfig,
    style_mode: u8,
    current_index: usize,
    group: LayerGroup,
    generation: Arc<AtomicU64>,
    pending_settle: Option<SettleAction>,
}

impl<M: MapSurface> SlideDeck<M> {
    /// Creates a deck. The style mode is the raw configured value, it is checked on every sync.
    pub fn new(slides: Vec<Slide>, map: M, config: DeckConfig, style_mode: u8) -> Self {
        Self {
            slides,
            map,
            config,
            style_mode,
            current_index: 0,
            group: LayerGroup::new(),
            generation: Arc::new(AtomicU64::new(0)),
            pending_settle: None,
        }
    }

    /// Slides of the deck in document order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// The map of the deck.
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Mutable access to the map of the deck.
    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    /// Configuration of the deck.
    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Raw style mode of the deck.
    pub fn style_mode(&self) -> u8 {
        self.style_mode
    }

    /// Layers currently shown on the map.
    pub fn group(&self) -> &LayerGroup {
        &self.group
    }

    /// Index of the active slide.
    pub fn current_slide_index(&self) -> usize {
        self.current_index
    }

    /// Returns true if a camera stop will run the action of the last sync.
    pub fn has_pending_settle(&self) -> bool {
        self.pending_settle.is_some()
    }

    /// Marks every slide hidden.
    pub fn hide_all_slides(&mut self) {
        for slide in &mut self.slides {
            slide.hidden = true;
        }
    }

    /// Updates the active slide from the scroll position.
    ///
    /// Returns a sync request only if the active slide changed. If the trigger line is below
    /// the last slide the index is not changed.
    pub fn calc_current_slide_index(
        &mut self,
        metrics: &ScrollMetrics,
        slide_offsets: &[f64],
    ) -> Option<SyncRequest> {
        let index = active_slide_index(metrics, slide_offsets, self.config.trigger_ratio())?;
        if index == self.current_index {
            return None;
        }

        self.set_active_slide(index)
    }

    /// Makes the slide at `index` active and starts its sync. Returns `None` if there is no such
    /// slide.
    pub fn set_active_slide(&mut self, index: usize) -> Option<SyncRequest> {
        if index >= self.slides.len() {
            debug!("Ignoring slide index {index} out of {}", self.slides.len());
            return None;
        }

        self.current_index = index;
        self.begin_sync(index)
    }

    /// Activates the next slide, wrapping from the last one to the first.
    pub fn go_next_slide(&mut self) -> Option<SyncRequest> {
        let count = self.slides.len();
        if count == 0 {
            return None;
        }

        self.set_active_slide((self.current_index + 1) % count)
    }

    /// Activates the previous slide, wrapping from the first one to the last.
    pub fn go_prev_slide(&mut self) -> Option<SyncRequest> {
        let count = self.slides.len();
        if count == 0 {
            return None;
        }

        self.set_active_slide((self.current_index + count - 1) % count)
    }

    /// Starts the sync of the active slide.
    pub fn sync_to_current_slide(&mut self) -> Option<SyncRequest> {
        self.begin_sync(self.current_index)
    }

    /// Starts the sync of the slide at `index` without changing the active slide.
    pub fn begin_sync(&mut self, index: usize) -> Option<SyncRequest> {
        let slide = self.slides.get(index)?.clone();
        let token = SyncToken::issue(&self.generation);

        let auxiliary = match StyleMode::try_from(self.style_mode) {
            Ok(mode) => mode
                .auxiliary_datasets()
                .iter()
                .map(|dataset| (*dataset, self.config.dataset_path(*dataset)))
                .collect(),
            Err(_) => vec![],
        };

        debug!(
            "Starting sync of slide {} (generation {})",
            slide.id(),
            token.generation()
        );

        Some(SyncRequest {
            slide_path: self.config.slide_path(slide.id()),
            token,
            slide_index: index,
            slide,
            auxiliary,
        })
    }

    /// Paths of all collections the deck can show: the data of every slide and the auxiliary
    /// datasets of its style mode.
    pub fn preload_paths(&self) -> Vec<String> {
        let auxiliary = StyleMode::try_from(self.style_mode)
            .map(|mode| mode.auxiliary_datasets())
            .unwrap_or_default();

        self.slides
            .iter()
            .map(|slide| self.config.slide_path(slide.id()))
            .chain(
                auxiliary
                    .iter()
                    .map(|dataset| self.config.dataset_path(*dataset)),
            )
            .collect()
    }

    /// Renders the loaded data of a sync.
    ///
    /// Superseded syncs are discarded. Otherwise all layers are removed first. If the style mode
    /// of the deck is unknown the sync stops there. Then the slide data and the auxiliary
    /// datasets are drawn and the camera starts moving to the bounds of the data: the `bbox` of
    /// the collection if present, the extent of the features otherwise.
    pub fn apply(&mut self, loaded: LoadedSlide) -> Result<SyncOutcome, StorymapError> {
        if !loaded.token.is_current() {
            warn!(
                "Discarding superseded sync of slide {} (generation {})",
                loaded.slide.id(),
                loaded.token.generation()
            );
            return Ok(SyncOutcome::Superseded);
        }

        self.clear();

        let mode = match StyleMode::try_from(self.style_mode) {
            Ok(mode) => mode,
            Err(err) => {
                error!("Cannot show slide {}: {err}", loaded.slide.id());
                return Ok(SyncOutcome::Aborted);
            }
        };

        let primary = mode.style_slide(&loaded.collection, &self.config);
        let extent = primary.extent();
        self.map.add_layer(&primary);
        self.group.push(primary);

        for (dataset, collection) in &loaded.auxiliary {
            let layer = mode.style_auxiliary(*dataset, collection);
            self.map.add_layer(&layer);
            self.group.push(layer);
        }

        let bounds = match loaded.collection.bbox.as_deref() {
            Some(bbox) => match LatLngBounds::from_bbox(bbox) {
                Ok(bounds) => Some(bounds),
                Err(err) => {
                    warn!("Ignoring bbox of slide {}: {err}", loaded.slide.id());
                    extent
                }
            },
            None => extent,
        };

        let Some(bounds) = bounds else {
            warn!(
                "Slide {} has no data to move the camera to",
                loaded.slide.id()
            );
            return Ok(SyncOutcome::Rendered);
        };

        self.map.fly_to_bounds(bounds, self.config.fly());
        self.pending_settle = Some(SettleAction {
            generation: loaded.token.generation(),
            show_popups: loaded.slide.show_popups(),
        });

        debug!(
            "Slide {} rendered with {} features",
            loaded.slide.id(),
            self.group.feature_count()
        );

        Ok(SyncOutcome::Animating { bounds })
    }

    /// Handles the end of the camera movement.
    ///
    /// Runs the action registered by the last sync once: if the slide asks for popups, every
    /// feature of the slide data with a `label` gets an opened permanent tooltip. Returns the
    /// number of opened tooltips.
    pub fn on_move_end(&mut self) -> usize {
        let Some(action) = self.pending_settle.take() else {
            return 0;
        };

        if action.generation != self.generation.load(Ordering::SeqCst) {
            debug!("Camera stopped after a superseded sync");
            return 0;
        }

        if !action.show_popups {
            return 0;
        }

        let Some(layer_index) = self.group.primary_index() else {
            return 0;
        };
        let Some(layer) = self.group.get_mut(layer_index) else {
            return 0;
        };

        let mut opened = 0;
        for (feature_index, feature) in layer.features_mut().iter_mut().enumerate() {
            if let Some(label) = feature.property_text("label") {
                let tooltip = Tooltip::permanent(label).opened();
                self.map.bind_tooltip(layer_index, feature_index, &tooltip);
                feature.bind_tooltip(tooltip);
                opened += 1;
            }
        }

        opened
    }

    fn clear(&mut self) {
        self.group.clear();
        self.map.clear_layers();
        self.pending_settle = None;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    use super::*;
    use crate::map::{AnimationState, HeadlessMap};
    use crate::provider::{FeatureProvider, MemoryFeatureProvider};
    use crate::symbol::Symbol;

    const AKSU: &str = r#"{"type":"FeatureCollection","features":[{"geometry":{"type":"Point","coordinates":[87,37]},"properties":{"label":"Aksu"}}]}"#;

    const BOXED: &str = r#"{"type":"FeatureCollection","bbox":[-10,-5,10,5],"features":[
        {"type":"Feature","properties":{"label":"Kashgar"},"geometry":{"type":"Point","coordinates":[75.99,39.47]}}
    ]}"#;

    const EMPTY: &str = r#"{"type":"FeatureCollection","features":[]}"#;

    fn provider() -> MemoryFeatureProvider {
        MemoryFeatureProvider::new()
            .with_document("data/city-1.geojson", AKSU)
            .and_then(|p| p.with_document("data/boxed.geojson", BOXED))
            .and_then(|p| p.with_document("data/empty.geojson", EMPTY))
            .and_then(|p| p.with_document("data/silkroad route.geojson", EMPTY))
            .expect("valid documents")
    }

    fn deck(style_mode: u8) -> SlideDeck<HeadlessMap> {
        let slides = vec![
            Slide::new("city-1").with_popups(true),
            Slide::new("boxed"),
            Slide::new("empty"),
        ];
        SlideDeck::new(slides, HeadlessMap::new(), DeckConfig::default(), style_mode)
    }

    fn run(
        deck: &mut SlideDeck<HeadlessMap>,
        provider: &impl FeatureProvider,
        request: Option<SyncRequest>,
    ) -> SyncOutcome {
        let request = request.expect("sync started");
        let loaded = tokio_test::block_on(request.load(provider)).expect("data loaded");
        deck.apply(loaded).expect("sync applied")
    }

    #[test]
    fn navigation_wraps() {
        let mut deck = deck(1);
        assert_eq!(deck.current_slide_index(), 0);

        let request = deck.go_prev_slide().expect("sync started");
        assert_eq!(request.slide_index(), 2);
        assert_eq!(deck.current_slide_index(), 2);

        let request = deck.go_next_slide().expect("sync started");
        assert_eq!(request.slide_index(), 0);
        assert_eq!(request.slide_path(), "data/city-1.geojson");

        deck.go_next_slide();
        assert_eq!(deck.current_slide_index(), 1);

        assert!(deck.set_active_slide(3).is_none());
        assert_eq!(deck.current_slide_index(), 1);

        let mut empty = SlideDeck::new(vec![], HeadlessMap::new(), DeckConfig::default(), 1);
        assert!(empty.go_next_slide().is_none());
        assert!(empty.go_prev_slide().is_none());
        assert!(empty.sync_to_current_slide().is_none());
    }

    #[test]
    fn scroll_changes_active_slide() {
        let mut deck = deck(1);
        let offsets = [0.0, 800.0, 1600.0];
        let metrics = |scroll_y| ScrollMetrics {
            scroll_y,
            container_offset_top: 0.0,
            viewport_height: 1000.0,
        };

        assert!(deck.calc_current_slide_index(&metrics(100.0), &offsets).is_none());

        let request = deck
            .calc_current_slide_index(&metrics(1000.0), &offsets)
            .expect("slide changed");
        assert_eq!(request.slide_index(), 1);
        assert!(deck.calc_current_slide_index(&metrics(1100.0), &offsets).is_none());

        assert!(deck.calc_current_slide_index(&metrics(5000.0), &offsets).is_none());
        assert_eq!(deck.current_slide_index(), 1);
    }

    #[test]
    fn labeled_slide_end_to_end() {
        let provider = provider();
        let mut deck = deck(1);

        let request = deck.sync_to_current_slide();
        let outcome = run(&mut deck, &provider, request);
        assert_matches!(outcome, SyncOutcome::Animating { .. });

        let primary = deck.group().primary().expect("slide layer");
        assert_eq!(primary.len(), 1);
        let aksu = &primary.features()[0];
        assert_matches!(aksu.symbol(), Symbol::CircleMarker(_));
        assert_eq!(aksu.tooltips(), &[Tooltip::label("Aksu")]);
        assert_eq!(deck.group().len(), 2);
        assert_eq!(deck.map().layers().len(), 2);
        assert!(deck.map().is_animating());

        assert_eq!(deck.map_mut().finish_animation(), AnimationState::MoveEnded);
        assert_eq!(deck.on_move_end(), 1);

        let aksu = &deck.group().primary().expect("slide layer").features()[0];
        assert_eq!(
            aksu.tooltips(),
            &[Tooltip::label("Aksu"), Tooltip::permanent("Aksu").opened()]
        );
        assert_eq!(deck.map().layers()[0].features()[0].tooltips(), aksu.tooltips());

        // the action runs once
        assert_eq!(deck.on_move_end(), 0);
        assert_eq!(deck.group().primary().expect("slide layer").features()[0].tooltips().len(), 2);
    }

    #[test]
    fn bbox_sets_camera_target() {
        let provider = provider();
        let mut deck = deck(1);

        let request = deck.set_active_slide(1);
        let outcome = run(&mut deck, &provider, request);
        let SyncOutcome::Animating { bounds } = outcome else {
            panic!("camera did not move: {outcome:?}");
        };

        assert_relative_eq!(bounds.south(), -5.0);
        assert_relative_eq!(bounds.west(), -10.0);
        assert_relative_eq!(bounds.north(), 5.0);
        assert_relative_eq!(bounds.east(), 10.0);
        assert_eq!(deck.map().target_view(), Some(bounds));

        // popups were not requested
        deck.map_mut().finish_animation();
        assert_eq!(deck.on_move_end(), 0);
    }

    #[test]
    fn extent_sets_camera_target_without_bbox() {
        let provider = provider();
        let mut deck = deck(1);

        let request = deck.sync_to_current_slide();
        let SyncOutcome::Animating { bounds } = run(&mut deck, &provider, request) else {
            panic!("camera did not move");
        };

        assert_relative_eq!(bounds.south(), 37.0);
        assert_relative_eq!(bounds.west(), 87.0);
        assert_relative_eq!(bounds.north(), 37.0);
        assert_relative_eq!(bounds.east(), 87.0);
    }

    #[test]
    fn empty_slide_keeps_camera() {
        let provider = provider();
        let mut deck = deck(1);

        let request = deck.set_active_slide(2);
        assert_eq!(run(&mut deck, &provider, request), SyncOutcome::Rendered);
        assert!(deck.group().primary().expect("slide layer").is_empty());
        assert!(!deck.map().is_animating());
        assert!(!deck.has_pending_settle());
    }

    #[test]
    fn same_slide_twice_gives_same_features() {
        let provider = provider();
        let mut deck = deck(2);

        let request = deck.sync_to_current_slide();
        run(&mut deck, &provider, request);
        let first = deck.group().feature_count();

        let request = deck.sync_to_current_slide();
        run(&mut deck, &provider, request);
        assert_eq!(deck.group().feature_count(), first);
        assert_eq!(deck.map().layers().len(), deck.group().len());
        assert_eq!(deck.map().flights(), 2);
    }

    #[test]
    fn unknown_style_mode_aborts_after_clear() {
        let provider = provider();
        let mut deck = deck(1);
        let request = deck.sync_to_current_slide();
        run(&mut deck, &provider, request);
        deck.map_mut().finish_animation();

        deck.style_mode = 3;
        let request = deck.set_active_slide(1).expect("sync started");
        assert!(request.auxiliary().is_empty());

        let loaded = tokio_test::block_on(request.load(&provider)).expect("data loaded");
        assert_eq!(deck.apply(loaded).expect("applied"), SyncOutcome::Aborted);

        assert!(deck.group().is_empty());
        assert!(deck.map().layers().is_empty());
        assert!(!deck.map().is_animating());
        assert_eq!(deck.map().flights(), 1);
        assert!(!deck.has_pending_settle());
        assert_eq!(deck.on_move_end(), 0);
    }

    #[test]
    fn superseded_sync_is_discarded() {
        let provider = provider();
        let mut deck = deck(1);

        let stale = deck.sync_to_current_slide().expect("sync started");
        let fresh = deck.set_active_slide(1).expect("sync started");
        assert!(!stale.token().is_current());

        let stale = tokio_test::block_on(stale.load(&provider)).expect("data loaded");
        assert_eq!(deck.apply(stale).expect("applied"), SyncOutcome::Superseded);
        assert!(deck.group().is_empty());
        assert_eq!(deck.map().flights(), 0);

        let fresh = tokio_test::block_on(fresh.load(&provider)).expect("data loaded");
        assert_matches!(deck.apply(fresh), Ok(SyncOutcome::Animating { .. }));
        assert_eq!(
            deck.group().primary().expect("slide layer").features()[0].property_text("label"),
            Some("Kashgar".to_string())
        );
    }

    #[test]
    fn superseded_settle_action_never_fires() {
        let provider = provider();
        let mut deck = deck(1);

        let request = deck.sync_to_current_slide();
        run(&mut deck, &provider, request);
        assert!(deck.has_pending_settle());

        // a newer sync is still loading when the camera stops
        let _loading = deck.go_next_slide().expect("sync started");
        deck.map_mut().finish_animation();
        assert_eq!(deck.on_move_end(), 0);

        let aksu = &deck.group().primary().expect("slide layer").features()[0];
        assert_eq!(aksu.tooltips().len(), 1);
    }

    #[test]
    fn fetch_failure_keeps_previous_state() {
        let provider = provider();
        let mut deck = SlideDeck::new(
            vec![Slide::new("city-1"), Slide::new("missing")],
            HeadlessMap::new(),
            DeckConfig::default(),
            1,
        );

        let request = deck.sync_to_current_slide();
        run(&mut deck, &provider, request);
        let shown = deck.group().clone();

        let request = deck.go_next_slide().expect("sync started");
        assert_matches!(
            tokio_test::block_on(request.load(&provider)),
            Err(StorymapError::NotFound)
        );
        assert_eq!(deck.group(), &shown);
        assert_eq!(deck.current_slide_index(), 1);
    }

    #[test]
    fn hide_and_preload() {
        let mut deck = deck(2);
        deck.hide_all_slides();
        assert!(deck.slides().iter().all(Slide::is_hidden));

        assert_eq!(
            deck.preload_paths(),
            vec![
                "data/city-1.geojson",
                "data/boxed.geojson",
                "data/empty.geojson",
                "data/silkroad route.geojson",
                "data/silkroad city.geojson",
            ]
        );
    }
}
