//! Symbols describe how a single feature is drawn on the map.
//!
//! The drawing itself is done by the [`MapSurface`](crate::map::MapSurface): a symbol is only a
//! description with the parameters the surface needs. Point symbols ([`Symbol::Marker`],
//! [`Symbol::Icon`] and [`Symbol::CircleMarker`]) are used for point geometries,
//! [`Symbol::Path`] for lines and polygons.

use crate::color::Color;

/// Line parameters of a path or a circle marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Line color.
    pub color: Color,
    /// Line width in pixels.
    pub weight: f64,
    /// Line opacity, from `0` to `1`.
    pub opacity: f64,
}

impl Stroke {
    /// Creates a fully opaque stroke.
    pub fn new(color: Color, weight: f64) -> Self {
        Self {
            color,
            weight,
            opacity: 1.0,
        }
    }
}

/// Fill parameters of a polygon or a circle marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    /// Fill color.
    pub color: Color,
    /// Fill opacity, from `0` to `1`.
    pub opacity: f64,
}

/// Marker drawn with an image.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSymbol {
    /// Url of the image.
    pub url: String,
    /// Size of the image in pixels.
    pub size: [u32; 2],
    /// Pixel of the image that is placed at the point position.
    pub anchor: [i32; 2],
    /// Offset of popups and tooltips relative to the anchor.
    pub popup_anchor: [i32; 2],
}

impl IconSymbol {
    /// Square icon of the given size anchored at the middle of its bottom edge.
    pub fn pin(url: impl Into<String>, size: u32) -> Self {
        let half = (size / 2) as i32;
        let size_px = size as i32;
        Self {
            url: url.into(),
            size: [size, size],
            anchor: [half, size_px],
            popup_anchor: [0, -size_px],
        }
    }
}

/// Circle with the radius given in pixels, so it does not scale with the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleMarkerSymbol {
    /// Radius in pixels.
    pub radius: f64,
    /// Outline.
    pub stroke: Stroke,
    /// Fill.
    pub fill: Fill,
}

/// Style of a line or polygon.
///
/// `None` values mean that the map library defaults are used.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathSymbol {
    /// Outline.
    pub stroke: Option<Stroke>,
    /// Fill, only used for polygons.
    pub fill: Option<Fill>,
}

/// How a feature is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    /// Default marker of the map library.
    Marker,
    /// Image marker.
    Icon(IconSymbol),
    /// Fixed size circle.
    CircleMarker(CircleMarkerSymbol),
    /// Line or polygon.
    Path(PathSymbol),
}

impl Symbol {
    /// Path drawn with the library defaults.
    pub fn default_path() -> Self {
        Self::Path(PathSymbol::default())
    }

    /// Returns true if the symbol draws points.
    pub fn is_point_symbol(&self) -> bool {
        matches!(self, Self::Marker | Self::Icon(_) | Self::CircleMarker(_))
    }
}
