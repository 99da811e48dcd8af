use geojson::{Feature, FeatureCollection, Geometry, Position, Value};

use crate::{LatLng, LatLngBounds};

/// Geographic extent of a GeoJSON object.
///
/// The extent is calculated from the coordinates, the `bbox` members are not used. Positions with
/// fewer than two values are skipped. Objects without any valid position have no extent.
pub trait GeoExtent {
    /// Returns bounds containing every position of the object.
    fn extent(&self) -> Option<LatLngBounds>;
}

impl GeoExtent for Value {
    fn extent(&self) -> Option<LatLngBounds> {
        match self {
            Value::Point(p) => positions_extent(std::iter::once(p)),
            Value::MultiPoint(points) | Value::LineString(points) => positions_extent(points.iter()),
            Value::MultiLineString(lines) | Value::Polygon(lines) => {
                positions_extent(lines.iter().flatten())
            }
            Value::MultiPolygon(polygons) => {
                positions_extent(polygons.iter().flatten().flatten())
            }
            Value::GeometryCollection(geometries) => merge_all(geometries.iter()),
        }
    }
}

impl GeoExtent for Geometry {
    fn extent(&self) -> Option<LatLngBounds> {
        self.value.extent()
    }
}

impl GeoExtent for Feature {
    fn extent(&self) -> Option<LatLngBounds> {
        self.geometry.as_ref()?.extent()
    }
}

impl GeoExtent for FeatureCollection {
    fn extent(&self) -> Option<LatLngBounds> {
        merge_all(self.features.iter())
    }
}

impl<T: GeoExtent> GeoExtent for [T] {
    fn extent(&self) -> Option<LatLngBounds> {
        merge_all(self.iter())
    }
}

fn positions_extent<'a>(positions: impl Iterator<Item = &'a Position>) -> Option<LatLngBounds> {
    LatLngBounds::from_points(positions.filter_map(|p| LatLng::try_from(p).ok()))
}

fn merge_all<'a, T: GeoExtent + 'a>(items: impl Iterator<Item = &'a T>) -> Option<LatLngBounds> {
    items
        .filter_map(|item| item.extent())
        .reduce(|acc, bounds| acc.merge(bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlng;

    fn collection(json: &str) -> FeatureCollection {
        serde_json::from_str(json).expect("valid collection")
    }

    #[test]
    fn point_extent_is_degenerate() {
        let geometry = Geometry::new(Value::Point(vec![87.0, 37.0]));
        let extent = geometry.extent().expect("has extent");
        assert_eq!(extent.south_west(), latlng!(37.0, 87.0));
        assert_eq!(extent.north_east(), latlng!(37.0, 87.0));
    }

    #[test]
    fn collection_extent_covers_all_features() {
        let collection = collection(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[87,37]}},
                {"type":"Feature","properties":{},"geometry":{"type":"MultiLineString","coordinates":[[[75,39],[80,41]],[[100,36],[108,34]]]}},
                {"type":"Feature","properties":{},"geometry":null}
            ]}"#,
        );

        let extent = collection.extent().expect("has extent");
        assert_eq!(extent.south_west(), latlng!(34.0, 75.0));
        assert_eq!(extent.north_east(), latlng!(41.0, 108.0));
    }

    #[test]
    fn multipolygon_extent() {
        let value = Value::MultiPolygon(vec![
            vec![vec![
                vec![0.0, 0.0],
                vec![10.0, 0.0],
                vec![10.0, 5.0],
                vec![0.0, 0.0],
            ]],
            vec![vec![
                vec![-20.0, -3.0],
                vec![-18.0, -3.0],
                vec![-18.0, -1.0],
                vec![-20.0, -3.0],
            ]],
        ]);

        let extent = value.extent().expect("has extent");
        assert_eq!(extent.south_west(), latlng!(-3.0, -20.0));
        assert_eq!(extent.north_east(), latlng!(5.0, 10.0));
    }

    #[test]
    fn empty_collection_has_no_extent() {
        let collection = collection(r#"{"type":"FeatureCollection","features":[]}"#);
        assert!(collection.extent().is_none());
    }
}
