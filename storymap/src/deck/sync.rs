use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use geojson::FeatureCollection;
use log::{debug, warn};
use storymap_types::LatLngBounds;

use crate::deck::Slide;
use crate::error::StorymapError;
use crate::provider::FeatureProvider;
use crate::style::AuxiliaryDataset;

/// Identifies the sync a request belongs to.
///
/// Every started sync bumps the generation of its deck, so only the token of the most recent one
/// is current.
#[derive(Debug, Clone)]
pub struct SyncToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl SyncToken {
    pub(crate) fn issue(current: &Arc<AtomicU64>) -> Self {
        let generation = current.fetch_add(1, Ordering::SeqCst) + 1;
        Self {
            generation,
            current: current.clone(),
        }
    }

    /// Generation the token was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns false once a newer sync was started on the deck.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

/// A started sync that has not loaded its data yet.
///
/// The request does not borrow the deck, so it can be loaded while the deck handles other
/// events. The loaded data is rendered with [`SlideDeck::apply`](crate::deck::SlideDeck::apply).
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub(crate) token: SyncToken,
    pub(crate) slide_index: usize,
    pub(crate) slide: Slide,
    pub(crate) slide_path: String,
    pub(crate) auxiliary: Vec<(AuxiliaryDataset, String)>,
}

impl SyncRequest {
    /// Token of the sync.
    pub fn token(&self) -> &SyncToken {
        &self.token
    }

    /// Index of the synced slide.
    pub fn slide_index(&self) -> usize {
        self.slide_index
    }

    /// The synced slide.
    pub fn slide(&self) -> &Slide {
        &self.slide
    }

    /// Path of the slide data.
    pub fn slide_path(&self) -> &str {
        &self.slide_path
    }

    /// Auxiliary datasets drawn with the slide and their paths.
    pub fn auxiliary(&self) -> &[(AuxiliaryDataset, String)] {
        &self.auxiliary
    }

    /// Loads the slide data and the auxiliary datasets.
    ///
    /// Fails if the slide data cannot be loaded. Auxiliary datasets that fail to load are
    /// skipped with a warning.
    pub async fn load<P>(self, provider: &P) -> Result<LoadedSlide, StorymapError>
    where
        P: FeatureProvider + ?Sized,
    {
        debug!(
            "Loading slide {} (generation {})",
            self.slide.id(),
            self.token.generation
        );

        let (collection, auxiliary) = futures::join!(
            provider.load_collection(&self.slide_path),
            join_all(self.auxiliary.iter().map(|(dataset, path)| async move {
                (*dataset, path, provider.load_collection(path).await)
            }))
        );

        let collection = collection?;
        let auxiliary = auxiliary
            .into_iter()
            .filter_map(|(dataset, path, result)| match result {
                Ok(collection) => Some((dataset, collection)),
                Err(err) => {
                    warn!("Failed to load {path}, the slide is shown without it: {err}");
                    None
                }
            })
            .collect();

        Ok(LoadedSlide {
            token: self.token,
            slide_index: self.slide_index,
            slide: self.slide,
            collection,
            auxiliary,
        })
    }
}

/// Data of a sync, ready to be rendered.
#[derive(Debug, Clone)]
pub struct LoadedSlide {
    pub(crate) token: SyncToken,
    pub(crate) slide_index: usize,
    pub(crate) slide: Slide,
    pub(crate) collection: Arc<FeatureCollection>,
    pub(crate) auxiliary: Vec<(AuxiliaryDataset, Arc<FeatureCollection>)>,
}

impl LoadedSlide {
    /// Token of the sync.
    pub fn token(&self) -> &SyncToken {
        &self.token
    }

    /// Index of the synced slide.
    pub fn slide_index(&self) -> usize {
        self.slide_index
    }

    /// Slide data.
    pub fn collection(&self) -> &FeatureCollection {
        &self.collection
    }

    /// Successfully loaded auxiliary datasets.
    pub fn auxiliary(&self) -> &[(AuxiliaryDataset, Arc<FeatureCollection>)] {
        &self.auxiliary
    }
}

/// Result of rendering a sync.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    /// A newer sync was started before this one was rendered. Nothing was changed.
    Superseded,
    /// The deck has no rendering strategy for its style mode. The layers were cleared and the
    /// camera did not move.
    Aborted,
    /// The layers were replaced, but the data has no extent to move the camera to.
    Rendered,
    /// The layers were replaced and the camera is moving to the bounds.
    Animating {
        /// Target bounds of the camera.
        bounds: LatLngBounds,
    },
}

/// Action run when the camera stops after a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SettleAction {
    pub(crate) generation: u64,
    pub(crate) show_popups: bool,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::provider::MemoryFeatureProvider;

    fn request(current: &Arc<AtomicU64>, auxiliary: Vec<(AuxiliaryDataset, String)>) -> SyncRequest {
        SyncRequest {
            token: SyncToken::issue(current),
            slide_index: 0,
            slide: Slide::new("intro"),
            slide_path: "data/intro.geojson".to_string(),
            auxiliary,
        }
    }

    #[test]
    fn newer_token_supersedes_older() {
        let current = Arc::new(AtomicU64::new(0));
        let first = SyncToken::issue(&current);
        assert!(first.is_current());

        let second = SyncToken::issue(&current);
        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn missing_auxiliary_dataset_is_skipped() {
        let provider = MemoryFeatureProvider::new()
            .with_document(
                "data/intro.geojson",
                r#"{"type":"FeatureCollection","features":[]}"#,
            )
            .expect("valid document")
            .with_document(
                "data/silkroad route.geojson",
                r#"{"type":"FeatureCollection","features":[]}"#,
            )
            .expect("valid document");

        let current = Arc::new(AtomicU64::new(0));
        let request = request(
            &current,
            vec![
                (
                    AuxiliaryDataset::SilkRoadRoute,
                    "data/silkroad route.geojson".to_string(),
                ),
                (
                    AuxiliaryDataset::SilkRoadCities,
                    "data/silkroad city.geojson".to_string(),
                ),
            ],
        );

        let loaded = tokio_test::block_on(request.load(&provider)).expect("slide data loaded");
        assert_eq!(loaded.auxiliary().len(), 1);
        assert_eq!(loaded.auxiliary()[0].0, AuxiliaryDataset::SilkRoadRoute);
        assert_eq!(provider.request_count(), 3);
    }

    #[test]
    fn missing_slide_data_fails() {
        let provider = MemoryFeatureProvider::new();
        let current = Arc::new(AtomicU64::new(0));

        assert_matches!(
            tokio_test::block_on(request(&current, vec![]).load(&provider)),
            Err(StorymapError::NotFound)
        );
    }
}
