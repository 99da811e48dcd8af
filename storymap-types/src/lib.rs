//! Geographic value types shared by the storymap crates.
//!
//! The mapping library on the other side of the deck works with latitude/longitude pairs and
//! south-west/north-east bounds, while GeoJSON stores positions as `[lon, lat]` and boxes as
//! `[west, south, east, north]`. This crate owns the conversion between the two conventions:
//!
//! * [`LatLng`] is a point in degrees, created with the [`latlng!`] macro or from a GeoJSON position.
//! * [`LatLngBounds`] is a rectangle given by its south-west and north-east corners.
//! * [`GeoExtent`] calculates bounds of GeoJSON geometries, features and collections.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

mod bounds;
pub mod error;
mod extent;
mod latlng;

pub use bounds::LatLngBounds;
pub use extent::GeoExtent;
pub use latlng::LatLng;
