//! Error types used by the crate.

use storymap_types::error::StorymapTypesError;
use thiserror::Error;

/// Storymap error type.
#[derive(Debug, Error)]
pub enum StorymapError {
    /// I/O error (network or file).
    #[error("failed to load data")]
    IO,
    /// Loaded data is not a valid GeoJSON document.
    #[error("failed to decode data: {0}")]
    Decoding(String),
    /// Error interacting with WASM runtime.
    #[error("wasm error: {0:?}")]
    Wasm(Option<String>),
    /// Item not found.
    #[error("item not found")]
    NotFound,
    /// The deck was configured with a layer style mode that has no rendering strategy.
    #[error("invalid layer style mode: {0}")]
    UnknownStyleMode(u8),
    /// Invalid geographic value.
    #[error(transparent)]
    Geometry(#[from] StorymapTypesError),
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
    /// Error reading data from the FS.
    #[error("failed to read file")]
    FsIo(#[from] std::io::Error),
}

impl From<serde_json::Error> for StorymapError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decoding(value.to_string())
    }
}

impl From<geojson::Error> for StorymapError {
    fn from(value: geojson::Error) -> Self {
        Self::Decoding(value.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for StorymapError {
    fn from(_value: reqwest::Error) -> Self {
        Self::IO
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for StorymapError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        StorymapError::Wasm(Some(format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<js_sys::Object> for StorymapError {
    fn from(value: js_sys::Object) -> Self {
        StorymapError::Wasm(Some(format!("Failed to cast {value:?} into target type")))
    }
}
