//! Loading of the GeoJSON documents shown by decks.

use std::sync::Arc;

use async_trait::async_trait;
use geojson::{Feature, FeatureCollection, GeoJson, JsonValue};

use crate::error::StorymapError;

mod memory;
mod url;

pub use memory::MemoryFeatureProvider;
pub use url::UrlFeatureProvider;

/// Source of feature collections, addressed by path or url.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FeatureProvider {
    /// Loads the collection stored at the given path.
    async fn load_collection(&self, path: &str) -> Result<Arc<FeatureCollection>, StorymapError>;
}

/// Decodes a GeoJSON document.
///
/// A document containing a single feature or a bare geometry is returned as a collection with
/// one feature. Members of the `features` array that lack the `type` member are read as
/// features, the way browser mapping libraries read them.
pub fn decode_collection(bytes: &[u8]) -> Result<FeatureCollection, StorymapError> {
    let mut value: JsonValue = serde_json::from_slice(bytes)?;
    if let Some(features) = value.get_mut("features").and_then(JsonValue::as_array_mut) {
        for feature in features.iter_mut().filter_map(JsonValue::as_object_mut) {
            feature
                .entry("type")
                .or_insert_with(|| JsonValue::from("Feature"));
        }
    }

    let collection = match GeoJson::from_json_value(value)? {
        GeoJson::FeatureCollection(collection) => collection,
        GeoJson::Feature(feature) => single(feature),
        GeoJson::Geometry(geometry) => single(Feature::from(geometry)),
    };

    Ok(collection)
}

fn single(feature: Feature) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: vec![feature],
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn decode_documents() {
        let collection = decode_collection(
            br#"{"type":"FeatureCollection","bbox":[-10,-5,10,5],"features":[]}"#,
        )
        .expect("valid collection");
        assert_eq!(collection.bbox, Some(vec![-10.0, -5.0, 10.0, 5.0]));
        assert!(collection.features.is_empty());

        let collection = decode_collection(
            br#"{"type":"Feature","properties":{"label":"Aksu"},"geometry":{"type":"Point","coordinates":[80.26,41.17]}}"#,
        )
        .expect("valid feature");
        assert_eq!(collection.features.len(), 1);

        let collection = decode_collection(br#"{"type":"Point","coordinates":[80.26,41.17]}"#)
            .expect("valid geometry");
        assert_eq!(collection.features.len(), 1);
        assert!(collection.features[0].geometry.is_some());
    }

    #[test]
    fn features_without_type() {
        let collection = decode_collection(
            br#"{"type":"FeatureCollection","features":[{"geometry":{"type":"Point","coordinates":[87,37]},"properties":{"label":"Aksu"}}]}"#,
        )
        .expect("valid collection");
        assert_eq!(collection.features.len(), 1);
        assert_eq!(
            collection.features[0].property("label"),
            Some(&JsonValue::from("Aksu"))
        );
    }

    #[test]
    fn decode_invalid_documents() {
        assert_matches!(
            decode_collection(b"not json"),
            Err(StorymapError::Decoding(_))
        );
        assert_matches!(
            decode_collection(br#"{"type":"Nothing"}"#),
            Err(StorymapError::Decoding(_))
        );
    }
}
