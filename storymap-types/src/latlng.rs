use approx::{AbsDiffEq, RelativeEq};
use geojson::Position;
use serde::{Deserialize, Serialize};

use crate::error::StorymapTypesError;

/// A point on the Earth surface given in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct LatLng {
    lat: f64,
    lon: f64,
}

impl LatLng {
    /// Creates a new point from latitude and longitude.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Returns `[lat, lon]` pair, the order Leaflet expects its coordinates in.
    pub fn to_array(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }

    /// Returns true if both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl TryFrom<&[f64]> for LatLng {
    type Error = StorymapTypesError;

    /// Converts a GeoJSON position (`[lon, lat, ...]`) into a point.
    fn try_from(value: &[f64]) -> Result<Self, Self::Error> {
        if value.len() < 2 {
            Err(StorymapTypesError::Conversion(
                "point must contain at least 2 dimensions".to_string(),
            ))
        } else {
            Ok(Self::new(value[1], value[0]))
        }
    }
}

impl TryFrom<&Position> for LatLng {
    type Error = StorymapTypesError;

    fn try_from(value: &Position) -> Result<Self, Self::Error> {
        Self::try_from(value.as_slice())
    }
}

impl From<LatLng> for Position {
    fn from(value: LatLng) -> Self {
        vec![value.lon, value.lat]
    }
}

#[cfg(feature = "geo-types")]
impl From<geo_types::Coord<f64>> for LatLng {
    fn from(value: geo_types::Coord<f64>) -> Self {
        Self::new(value.y, value.x)
    }
}

#[cfg(feature = "geo-types")]
impl From<LatLng> for geo_types::Coord<f64> {
    fn from(value: LatLng) -> Self {
        geo_types::coord! { x: value.lon, y: value.lat }
    }
}

impl AbsDiffEq for LatLng {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lon.abs_diff_eq(&other.lon, epsilon)
    }
}

impl RelativeEq for LatLng {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.lat.relative_eq(&other.lat, epsilon, max_relative)
            && self.lon.relative_eq(&other.lon, epsilon, max_relative)
    }
}

/// Creates a new [`LatLng`] from latitude and longitude values (in degrees).
///
/// ```
/// use storymap_types::latlng;
///
/// let point = latlng!(37.0, 87.0);
/// assert_eq!(point.lat(), 37.0);
/// assert_eq!(point.lon(), 87.0);
/// ```
#[macro_export]
macro_rules! latlng {
    ($lat:expr, $lon:expr) => {
        $crate::LatLng::new($lat, $lon)
    };
}
