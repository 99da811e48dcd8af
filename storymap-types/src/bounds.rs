use serde::{Deserialize, Serialize};

use crate::error::StorymapTypesError;
use crate::LatLng;

/// Rectangular geographic area given by its south-west and north-east corners.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    south_west: LatLng,
    north_east: LatLng,
}

impl LatLngBounds {
    /// Creates bounds from two corners.
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from a GeoJSON `bbox` member.
    ///
    /// A 2d box is `[west, south, east, north]`, a 3d one is
    /// `[west, south, min_z, east, north, max_z]`. Elevation values are ignored.
    ///
    /// ```
    /// use storymap_types::{latlng, LatLngBounds};
    ///
    /// let bounds = LatLngBounds::from_bbox(&[-10.0, -5.0, 10.0, 5.0]).unwrap();
    /// assert_eq!(bounds.south_west(), latlng!(-5.0, -10.0));
    /// assert_eq!(bounds.north_east(), latlng!(5.0, 10.0));
    /// ```
    pub fn from_bbox(bbox: &[f64]) -> Result<Self, StorymapTypesError> {
        let (west, south, east, north) = match *bbox {
            [west, south, east, north] => (west, south, east, north),
            [west, south, _, east, north, _] => (west, south, east, north),
            _ => return Err(StorymapTypesError::InvalidBbox(bbox.len())),
        };

        Ok(Self::new(LatLng::new(south, west), LatLng::new(north, east)))
    }

    /// Creates the smallest bounds containing a single point.
    pub fn from_point(point: LatLng) -> Self {
        Self::new(point, point)
    }

    /// Creates the smallest bounds containing all the given points. Returns `None` if the
    /// iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bounds = Self::from_point(points.next()?);
        for p in points {
            bounds.extend(p);
        }

        Some(bounds)
    }

    /// South-west corner.
    pub fn south_west(&self) -> LatLng {
        self.south_west
    }

    /// North-east corner.
    pub fn north_east(&self) -> LatLng {
        self.north_east
    }

    /// Southern latitude.
    pub fn south(&self) -> f64 {
        self.south_west.lat()
    }

    /// Western longitude.
    pub fn west(&self) -> f64 {
        self.south_west.lon()
    }

    /// Northern latitude.
    pub fn north(&self) -> f64 {
        self.north_east.lat()
    }

    /// Eastern longitude.
    pub fn east(&self) -> f64 {
        self.north_east.lon()
    }

    /// Center of the bounds.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south() + self.north()) / 2.0,
            (self.west() + self.east()) / 2.0,
        )
    }

    /// Grows the bounds to contain the point.
    pub fn extend(&mut self, point: LatLng) {
        self.south_west = LatLng::new(
            self.south().min(point.lat()),
            self.west().min(point.lon()),
        );
        self.north_east = LatLng::new(
            self.north().max(point.lat()),
            self.east().max(point.lon()),
        );
    }

    /// Returns the smallest bounds containing both `self` and `other`.
    pub fn merge(&self, other: Self) -> Self {
        let mut merged = *self;
        merged.extend(other.south_west);
        merged.extend(other.north_east);
        merged
    }

    /// Returns true if the point is inside the bounds or on their edge.
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat() >= self.south()
            && point.lat() <= self.north()
            && point.lon() >= self.west()
            && point.lon() <= self.east()
    }

    /// Returns true if the corners are finite and ordered.
    pub fn is_valid(&self) -> bool {
        self.south_west.is_finite()
            && self.north_east.is_finite()
            && self.south() <= self.north()
            && self.west() <= self.east()
    }

    /// Returns a point between two bounds. `k == 0` gives `self`, `k == 1` gives `target`.
    pub fn interpolate(&self, target: &Self, k: f64) -> Self {
        let lerp = |a: f64, b: f64| a + (b - a) * k;
        Self::new(
            LatLng::new(lerp(self.south(), target.south()), lerp(self.west(), target.west())),
            LatLng::new(lerp(self.north(), target.north()), lerp(self.east(), target.east())),
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::latlng;

    #[test]
    fn bbox_3d_ignores_elevation() {
        let bounds = LatLngBounds::from_bbox(&[70.0, 30.0, -100.0, 90.0, 45.0, 5000.0])
            .expect("valid bbox");
        assert_eq!(bounds.south_west(), latlng!(30.0, 70.0));
        assert_eq!(bounds.north_east(), latlng!(45.0, 90.0));
    }

    #[test]
    fn bbox_of_wrong_length_is_rejected() {
        assert!(LatLngBounds::from_bbox(&[1.0, 2.0, 3.0]).is_err());
        assert!(LatLngBounds::from_bbox(&[]).is_err());
    }

    #[test]
    fn from_points() {
        assert!(LatLngBounds::from_points(vec![]).is_none());

        let bounds = LatLngBounds::from_points([
            latlng!(37.0, 87.0),
            latlng!(40.0, 75.0),
            latlng!(34.0, 108.9),
        ])
        .expect("non empty");
        assert_eq!(bounds.south_west(), latlng!(34.0, 75.0));
        assert_eq!(bounds.north_east(), latlng!(40.0, 108.9));
        assert!(bounds.contains(latlng!(37.0, 87.0)));
        assert!(!bounds.contains(latlng!(50.0, 87.0)));
    }

    #[test]
    fn merge_and_center() {
        let a = LatLngBounds::from_point(latlng!(0.0, 0.0));
        let b = LatLngBounds::from_point(latlng!(10.0, 20.0));
        let merged = a.merge(b);
        assert_eq!(merged.center(), latlng!(5.0, 10.0));
        assert!(merged.is_valid());
    }

    #[test]
    fn interpolate() {
        let a = LatLngBounds::new(latlng!(0.0, 0.0), latlng!(10.0, 10.0));
        let b = LatLngBounds::new(latlng!(10.0, 20.0), latlng!(20.0, 40.0));

        let half = a.interpolate(&b, 0.5);
        assert_relative_eq!(half.south(), 5.0);
        assert_relative_eq!(half.west(), 10.0);
        assert_relative_eq!(half.north(), 15.0);
        assert_relative_eq!(half.east(), 25.0);
        assert_eq!(a.interpolate(&b, 1.0), b);
    }
}
