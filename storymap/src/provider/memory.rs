use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use geojson::FeatureCollection;

use crate::error::StorymapError;
use crate::provider::{decode_collection, FeatureProvider};

/// Provider serving collections stored in memory.
///
/// Unknown paths are reported as [`StorymapError::NotFound`].
#[derive(Debug, Default)]
pub struct MemoryFeatureProvider {
    collections: HashMap<String, Arc<FeatureCollection>>,
    requests: AtomicUsize,
}

impl MemoryFeatureProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the collection under the given path.
    pub fn insert(&mut self, path: impl Into<String>, collection: FeatureCollection) {
        self.collections.insert(path.into(), Arc::new(collection));
    }

    /// Stores the GeoJSON document under the given path.
    pub fn with_document(mut self, path: impl Into<String>, json: &str) -> Result<Self, StorymapError> {
        let collection = decode_collection(json.as_bytes())?;
        self.insert(path, collection);
        Ok(self)
    }

    /// Number of load requests received so far, including failed ones.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FeatureProvider for MemoryFeatureProvider {
    async fn load_collection(&self, path: &str) -> Result<Arc<FeatureCollection>, StorymapError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.collections
            .get(path)
            .cloned()
            .ok_or(StorymapError::NotFound)
    }
}
