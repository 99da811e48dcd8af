use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use futures::future::join_all;
use log::{error, info, warn};

use crate::deck::{SlideDeck, SyncOutcome, SyncRequest};
use crate::error::StorymapError;
use crate::map::MapSurface;
use crate::provider::FeatureProvider;
use crate::scroll::ScrollMetrics;

/// Shared handle to a deck and the provider it loads data with.
///
/// Event handlers of the page keep clones of the handle. The deck is borrowed only for the
/// synchronous steps of a sync, never while data is loading, so scroll events can start newer
/// syncs at any time.
pub struct DeckHandle<M: MapSurface, P: FeatureProvider> {
    deck: Rc<RefCell<SlideDeck<M>>>,
    provider: Rc<P>,
}

impl<M: MapSurface, P: FeatureProvider> Clone for DeckHandle<M, P> {
    fn clone(&self) -> Self {
        Self {
            deck: self.deck.clone(),
            provider: self.provider.clone(),
        }
    }
}

impl<M: MapSurface, P: FeatureProvider> DeckHandle<M, P> {
    /// Creates a new handle.
    pub fn new(deck: SlideDeck<M>, provider: P) -> Self {
        Self {
            deck: Rc::new(RefCell::new(deck)),
            provider: Rc::new(provider),
        }
    }

    /// Borrows the deck.
    ///
    /// # Panics
    ///
    /// Panics if the deck is mutably borrowed.
    pub fn deck(&self) -> Ref<'_, SlideDeck<M>> {
        self.deck.borrow()
    }

    /// Mutably borrows the deck.
    ///
    /// # Panics
    ///
    /// Panics if the deck is borrowed.
    pub fn deck_mut(&self) -> RefMut<'_, SlideDeck<M>> {
        self.deck.borrow_mut()
    }

    /// The provider of the deck data.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Loads and renders the slide at `index` without changing the active slide.
    ///
    /// Returns `None` if there is no such slide.
    pub async fn sync_to_slide(&self, index: usize) -> Result<Option<SyncOutcome>, StorymapError> {
        let request = self.deck.borrow_mut().begin_sync(index);
        match request {
            Some(request) => self.run(request).await.map(Some),
            None => Ok(None),
        }
    }

    /// Loads and renders the active slide.
    pub async fn sync_to_current_slide(&self) -> Result<Option<SyncOutcome>, StorymapError> {
        let request = self.deck.borrow_mut().sync_to_current_slide();
        match request {
            Some(request) => self.run(request).await.map(Some),
            None => Ok(None),
        }
    }

    /// Loads the data of the request and renders it.
    pub async fn run(&self, request: SyncRequest) -> Result<SyncOutcome, StorymapError> {
        if !request.token().is_current() {
            return Ok(SyncOutcome::Superseded);
        }

        let loaded = request.load(self.provider.as_ref()).await?;
        self.deck.borrow_mut().apply(loaded)
    }

    /// Loads every collection the deck can show, so that later syncs do not wait for the data.
    ///
    /// Returns the number of successfully loaded collections.
    pub async fn preload_feature_collections(&self) -> usize {
        let paths = self.deck.borrow().preload_paths();
        let results = join_all(paths.iter().map(|path| async move {
            (path, self.provider.load_collection(path).await)
        }))
        .await;

        let mut loaded = 0;
        for (path, result) in results {
            match result {
                Ok(_) => loaded += 1,
                Err(err) => warn!("Failed to preload {path}: {err}"),
            }
        }

        info!("Preloaded {loaded} of {} collections", paths.len());
        loaded
    }

    /// Handles the end of the camera movement. Returns the number of opened tooltips.
    pub fn on_move_end(&self) -> usize {
        self.deck.borrow_mut().on_move_end()
    }
}

impl<M, P> DeckHandle<M, P>
where
    M: MapSurface + 'static,
    P: FeatureProvider + 'static,
{
    /// Handles a scroll event of the page.
    pub fn on_scroll(&self, metrics: &ScrollMetrics, slide_offsets: &[f64]) {
        let request = self
            .deck
            .borrow_mut()
            .calc_current_slide_index(metrics, slide_offsets);
        self.spawn(request);
    }

    /// Activates the next slide and starts its sync in background.
    pub fn go_next_slide(&self) {
        let request = self.deck.borrow_mut().go_next_slide();
        self.spawn(request);
    }

    /// Activates the previous slide and starts its sync in background.
    pub fn go_prev_slide(&self) {
        let request = self.deck.borrow_mut().go_prev_slide();
        self.spawn(request);
    }

    /// Starts the sync of the active slide in background.
    pub fn spawn_sync_to_current_slide(&self) {
        let request = self.deck.borrow_mut().sync_to_current_slide();
        self.spawn(request);
    }

    /// Starts preloading of the deck data in background.
    pub fn spawn_preload(&self) {
        let handle = self.clone();
        crate::async_runtime::spawn_local(async move {
            handle.preload_feature_collections().await;
        });
    }

    /// Runs the sync in background. Errors are logged.
    pub fn spawn(&self, request: Option<SyncRequest>) {
        let Some(request) = request else {
            return;
        };

        let handle = self.clone();
        crate::async_runtime::spawn_local(async move {
            let slide_id = request.slide().id().to_string();
            if let Err(err) = handle.run(request).await {
                error!("Failed to show slide {slide_id}: {err}");
            }
        });
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use assert_matches::assert_matches;
    use tokio::task::LocalSet;

    use super::*;
    use crate::config::DeckConfig;
    use crate::deck::Slide;
    use crate::map::HeadlessMap;
    use crate::provider::MemoryFeatureProvider;

    const POINT: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"label":"Aksu","country":"China","city":"Aksu"},"geometry":{"type":"Point","coordinates":[87,37]}}
    ]}"#;

    fn handle(style_mode: u8) -> DeckHandle<HeadlessMap, MemoryFeatureProvider> {
        let provider = MemoryFeatureProvider::new()
            .with_document("data/city-1.geojson", POINT)
            .and_then(|p| p.with_document("data/city-2.geojson", POINT))
            .and_then(|p| {
                p.with_document(
                    "data/shoppingRoutes.geojson",
                    r#"{"type":"LineString","coordinates":[[87,37],[116,40]]}"#,
                )
            })
            .expect("valid documents");

        let slides = vec![
            Slide::new("city-1").with_popups(true),
            Slide::new("city-2"),
            Slide::new("missing"),
        ];
        let deck = SlideDeck::new(slides, HeadlessMap::new(), DeckConfig::default(), style_mode);
        DeckHandle::new(deck, provider)
    }

    fn run_local(future: impl std::future::Future<Output = ()>) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let local = LocalSet::new();
        local.block_on(&runtime, future);
        runtime.block_on(local);
    }

    #[test]
    fn sync_and_settle() {
        let _ = env_logger::builder().is_test(true).try_init();
        let handle = handle(0);

        let outcome = tokio_test::block_on(handle.sync_to_current_slide()).expect("synced");
        assert_matches!(outcome, Some(SyncOutcome::Animating { .. }));
        assert_eq!(handle.deck().group().len(), 2);
        assert_eq!(handle.deck().group().feature_count(), 2);

        handle.deck_mut().map_mut().finish_animation();
        assert_eq!(handle.on_move_end(), 1);
        assert_eq!(handle.on_move_end(), 0);
    }

    #[test]
    fn sync_errors_propagate() {
        let handle = handle(1);

        assert_matches!(
            tokio_test::block_on(handle.sync_to_slide(2)),
            Err(StorymapError::NotFound)
        );
        assert_matches!(tokio_test::block_on(handle.sync_to_slide(3)), Ok(None));
        assert_eq!(handle.deck().current_slide_index(), 0);
    }

    #[test]
    fn preload_counts_loaded_collections() {
        let handle = handle(0);
        assert_eq!(tokio_test::block_on(handle.preload_feature_collections()), 3);
        // slides and the shopping routes
        assert_eq!(handle.provider().request_count(), 4);
    }

    #[test]
    fn background_navigation() {
        let handle = handle(1);

        let navigation = handle.clone();
        run_local(async move {
            navigation.go_next_slide();
        });

        let deck = handle.deck();
        assert_eq!(deck.current_slide_index(), 1);
        assert_eq!(deck.group().feature_count(), 1);
        assert!(deck.map().is_animating());
    }

    #[test]
    fn only_latest_background_sync_renders() {
        let handle = handle(1);

        let navigation = handle.clone();
        run_local(async move {
            navigation.go_next_slide();
            navigation.go_prev_slide();
        });

        let deck = handle.deck();
        assert_eq!(deck.current_slide_index(), 0);
        assert_eq!(deck.map().flights(), 1);
        assert!(deck.has_pending_settle());
    }
}
