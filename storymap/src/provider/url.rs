use std::sync::Arc;

use async_trait::async_trait;
use geojson::FeatureCollection;
use log::debug;
use quick_cache::sync::Cache;

use crate::error::StorymapError;
use crate::platform::{PlatformService, PlatformServiceImpl};
use crate::provider::{decode_collection, FeatureProvider};

const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Loads collections with the platform service and keeps the decoded ones in memory.
///
/// Paths are urls on the web. On native targets they can also be local file paths.
pub struct UrlFeatureProvider {
    platform_service: &'static PlatformServiceImpl,
    cache: Cache<String, Arc<FeatureCollection>>,
}

impl Default for UrlFeatureProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlFeatureProvider {
    /// Creates a provider with the default cache capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a provider that caches up to `capacity` collections.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            platform_service: crate::platform::instance(),
            cache: Cache::new(capacity),
        }
    }

    /// Returns true if the collection at `path` is loaded and cached.
    pub fn is_cached(&self, path: &str) -> bool {
        self.cache.get(path).is_some()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FeatureProvider for UrlFeatureProvider {
    async fn load_collection(&self, path: &str) -> Result<Arc<FeatureCollection>, StorymapError> {
        if let Some(collection) = self.cache.get(path) {
            debug!("Using cached collection {path}");
            return Ok(collection);
        }

        let bytes = self.platform_service.load_bytes_from_url(path).await?;
        let collection = Arc::new(decode_collection(&bytes)?);
        debug!(
            "Loaded {path} with {} features",
            collection.features.len()
        );

        self.cache.insert(path.to_string(), collection.clone());
        Ok(collection)
    }
}
