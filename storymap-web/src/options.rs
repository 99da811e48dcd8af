//! Option objects passed to Leaflet, and conversion of GeoJSON geometries into Leaflet
//! coordinates.
//!
//! Everything here is plain Rust data serialized into JS objects, so it can be checked without a
//! browser.

use geojson::{Position, Value};
use log::warn;
use serde::Serialize;
use storymap::config::{FlyOptions, PageConfig, TileLayerConfig};
use storymap::layer::Tooltip;
use storymap::symbol::{CircleMarkerSymbol, IconSymbol, PathSymbol, Symbol};
use storymap_types::{LatLng, LatLngBounds};

/// Leaflet `[lat, lng]` pair.
pub type LeafletLatLng = [f64; 2];

/// Options of `L.map`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    pub center: LeafletLatLng,
    pub zoom: f64,
    pub scroll_wheel_zoom: bool,
}

impl From<&PageConfig> for MapOptions {
    fn from(page: &PageConfig) -> Self {
        Self {
            center: page.center.to_array(),
            zoom: page.zoom,
            scroll_wheel_zoom: page.scroll_wheel_zoom,
        }
    }
}

/// Options of `L.tileLayer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileOptions {
    pub id: String,
    pub access_token: String,
    pub attribution: String,
    pub max_zoom: u8,
    pub tile_size: u32,
    pub zoom_offset: i8,
    pub detect_retina: bool,
}

impl From<&TileLayerConfig> for TileOptions {
    fn from(tiles: &TileLayerConfig) -> Self {
        Self {
            id: tiles.style_id.clone(),
            access_token: tiles.access_token.clone(),
            attribution: tiles.attribution.clone(),
            max_zoom: tiles.max_zoom,
            tile_size: tiles.tile_size,
            zoom_offset: tiles.zoom_offset,
            detect_retina: tiles.detect_retina,
        }
    }
}

/// Options of `flyToBounds`. Leaflet expects the duration in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlyToOptions {
    pub duration: f64,
    pub ease_linearity: f64,
}

impl From<&FlyOptions> for FlyToOptions {
    fn from(fly: &FlyOptions) -> Self {
        Self {
            duration: fly.duration.as_secs_f64(),
            ease_linearity: fly.ease_linearity,
        }
    }
}

/// Leaflet bounds: `[[south, west], [north, east]]`.
pub fn leaflet_bounds(bounds: &LatLngBounds) -> [LeafletLatLng; 2] {
    [bounds.south_west().to_array(), bounds.north_east().to_array()]
}

/// Options of `bindTooltip`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipOptions {
    pub permanent: bool,
    pub direction: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl From<&Tooltip> for TooltipOptions {
    fn from(tooltip: &Tooltip) -> Self {
        Self {
            permanent: tooltip.permanent,
            direction: tooltip.direction.as_str(),
            class_name: tooltip.class_name.clone(),
        }
    }
}

/// Options of `L.icon`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconOptions {
    pub icon_url: String,
    pub icon_size: [u32; 2],
    pub icon_anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
}

impl From<&IconSymbol> for IconOptions {
    fn from(icon: &IconSymbol) -> Self {
        Self {
            icon_url: icon.url.clone(),
            icon_size: icon.size,
            icon_anchor: icon.anchor,
            popup_anchor: icon.popup_anchor,
        }
    }
}

/// Options of paths and circle markers. Unset values keep the Leaflet defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
}

impl From<&PathSymbol> for PathOptions {
    fn from(symbol: &PathSymbol) -> Self {
        let mut options = Self::default();
        if let Some(stroke) = &symbol.stroke {
            options.color = Some(stroke.color.to_css());
            options.weight = Some(stroke.weight);
            options.opacity = Some(stroke.opacity);
        }
        if let Some(fill) = &symbol.fill {
            options.fill_color = Some(fill.color.to_css());
            options.fill_opacity = Some(fill.opacity);
        }

        options
    }
}

impl From<&CircleMarkerSymbol> for PathOptions {
    fn from(symbol: &CircleMarkerSymbol) -> Self {
        Self {
            radius: Some(symbol.radius),
            color: Some(symbol.stroke.color.to_css()),
            weight: Some(symbol.stroke.weight),
            opacity: Some(symbol.stroke.opacity),
            fill_color: Some(symbol.fill.color.to_css()),
            fill_opacity: Some(symbol.fill.opacity),
        }
    }
}

impl From<&Symbol> for PathOptions {
    fn from(symbol: &Symbol) -> Self {
        match symbol {
            Symbol::Path(path) => path.into(),
            Symbol::CircleMarker(circle) => circle.into(),
            Symbol::Marker | Symbol::Icon(_) => Self::default(),
        }
    }
}

/// Part of a geometry drawn with one Leaflet layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Single point.
    Point(LeafletLatLng),
    /// One or more line strings, drawn with `L.polyline`.
    Line(Vec<Vec<LeafletLatLng>>),
    /// One or more polygons, each a list of rings, drawn with `L.polygon`.
    Area(Vec<Vec<Vec<LeafletLatLng>>>),
}

/// Splits the geometry into shapes Leaflet can draw.
pub fn shapes(value: &Value) -> Vec<Shape> {
    match value {
        Value::Point(position) => to_latlng(position)
            .map(Shape::Point)
            .into_iter()
            .collect(),
        Value::MultiPoint(positions) => positions
            .iter()
            .filter_map(to_latlng)
            .map(Shape::Point)
            .collect(),
        Value::LineString(line) => vec![Shape::Line(vec![path(line)])],
        Value::MultiLineString(lines) => vec![Shape::Line(lines.iter().map(|l| path(l)).collect())],
        Value::Polygon(rings) => vec![Shape::Area(vec![polygon(rings)])],
        Value::MultiPolygon(polygons) => {
            vec![Shape::Area(polygons.iter().map(|p| polygon(p)).collect())]
        }
        Value::GeometryCollection(geometries) => geometries
            .iter()
            .flat_map(|geometry| shapes(&geometry.value))
            .collect(),
    }
}

fn to_latlng(position: &Position) -> Option<LeafletLatLng> {
    match LatLng::try_from(position) {
        Ok(latlng) => Some(latlng.to_array()),
        Err(err) => {
            warn!("Skipping position {position:?}: {err}");
            None
        }
    }
}

fn path(positions: &[Position]) -> Vec<LeafletLatLng> {
    positions.iter().filter_map(to_latlng).collect()
}

fn polygon(rings: &[Vec<Position>]) -> Vec<Vec<LeafletLatLng>> {
    rings.iter().map(|ring| path(ring)).collect()
}
