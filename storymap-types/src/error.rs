//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error)]
pub enum StorymapTypesError {
    /// Geometry or coordinate conversion error.
    #[error("invalid input geometry: {0}")]
    Conversion(String),
    /// A GeoJSON bounding box has the wrong number of values.
    #[error("bounding box must contain 4 or 6 values, got {0}")]
    InvalidBbox(usize),
}
