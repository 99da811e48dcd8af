//! Platform specific stuff for native targets.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info};

use crate::error::StorymapError;
use crate::platform::PlatformService;

/// Platform service for native targets.
///
/// Urls with `http` or `https` scheme are loaded with `reqwest`. Anything else is treated as a
/// path on the local file system, with an optional `file://` prefix.
#[derive(Debug, Clone)]
pub struct NativePlatformService {
    http_client: reqwest::Client,
}

#[async_trait]
impl PlatformService for NativePlatformService {
    fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent("storymap/0.1")
            .build()
            .unwrap_or_default();

        Self { http_client }
    }

    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, StorymapError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            self.load_from_web(url).await
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            Self::load_from_file(Path::new(path))
        }
    }
}

impl NativePlatformService {
    fn load_from_file(path: &Path) -> Result<Bytes, StorymapError> {
        debug!("Reading {path:?}");
        match std::fs::read(path) {
            Ok(bytes) => Ok(bytes.into()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(StorymapError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    async fn load_from_web(&self, url: &str) -> Result<Bytes, StorymapError> {
        let response = self.http_client.get(url).send().await?;
        if !response.status().is_success() {
            info!(
                "Failed to load {url}: {}, {:?}",
                response.status(),
                response.text().await
            );
            return Err(StorymapError::IO);
        }

        Ok(response.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn reads_local_files() {
        let dir = std::env::temp_dir().join(format!("storymap-native-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let file = dir.join("slide.geojson");
        std::fs::write(&file, b"{}").expect("write file");

        let service = NativePlatformService::new();
        let path = file.to_string_lossy().to_string();
        let bytes = tokio_test::block_on(service.load_bytes_from_url(&path)).expect("loaded");
        assert_eq!(&bytes[..], b"{}");

        let prefixed = format!("file://{path}");
        let bytes = tokio_test::block_on(service.load_bytes_from_url(&prefixed)).expect("loaded");
        assert_eq!(&bytes[..], b"{}");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_not_found() {
        let service = NativePlatformService::new();
        let result = tokio_test::block_on(
            service.load_bytes_from_url("/definitely/not/here/storymap.geojson"),
        );
        assert_matches!(result, Err(StorymapError::NotFound));
    }
}
