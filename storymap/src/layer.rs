//! Layers shown by a deck: the slide data and the fixed auxiliary datasets.
//!
//! A [`LayerGroup`] is the model of what the deck has put on the map. It is cleared and filled
//! again on every sync, and the [`MapSurface`](crate::map::MapSurface) receives the same
//! operations, so the group and the map always show the same set of layers.

use geojson::{Geometry, JsonObject, JsonValue};
use storymap_types::{GeoExtent, LatLngBounds};

use crate::style::AuxiliaryDataset;
use crate::symbol::Symbol;

/// Preferred position of a tooltip relative to its feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TooltipDirection {
    /// Let the map library choose.
    #[default]
    Auto,
    /// Above the feature.
    Top,
}

impl TooltipDirection {
    /// Name of the direction as used by the map library.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Top => "top",
        }
    }
}

/// Tooltip bound to a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Text of the tooltip.
    pub content: String,
    /// Permanent tooltips are always shown, others only on hover.
    pub permanent: bool,
    /// Position relative to the feature.
    pub direction: TooltipDirection,
    /// Additional CSS class of the tooltip element.
    pub class_name: Option<String>,
    /// The tooltip is opened right after binding.
    pub open: bool,
}

impl Tooltip {
    /// Tooltip shown when the pointer is over the feature.
    pub fn hover(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            permanent: false,
            direction: TooltipDirection::Auto,
            class_name: None,
            open: false,
        }
    }

    /// Tooltip that is always shown.
    pub fn permanent(content: impl Into<String>) -> Self {
        Self {
            permanent: true,
            ..Self::hover(content)
        }
    }

    /// Permanent label placed above a point, styled with the `label-tooltip` class.
    pub fn label(content: impl Into<String>) -> Self {
        Self {
            direction: TooltipDirection::Top,
            class_name: Some("label-tooltip".to_string()),
            ..Self::permanent(content)
        }
    }

    /// Returns the same tooltip, opened immediately after binding.
    pub fn opened(self) -> Self {
        Self { open: true, ..self }
    }
}

/// A feature together with the way it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledFeature {
    geometry: Geometry,
    properties: Option<JsonObject>,
    symbol: Symbol,
    tooltips: Vec<Tooltip>,
}

impl StyledFeature {
    /// Creates a new feature without tooltips.
    pub fn new(geometry: Geometry, properties: Option<JsonObject>, symbol: Symbol) -> Self {
        Self {
            geometry,
            properties,
            symbol,
            tooltips: vec![],
        }
    }

    /// Adds the tooltip to the feature.
    pub fn with_tooltip(mut self, tooltip: Tooltip) -> Self {
        self.tooltips.push(tooltip);
        self
    }

    /// Geometry of the feature.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Properties of the feature.
    pub fn properties(&self) -> Option<&JsonObject> {
        self.properties.as_ref()
    }

    /// Symbol used to draw the feature.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Tooltips bound to the feature, in the order of binding.
    pub fn tooltips(&self) -> &[Tooltip] {
        &self.tooltips
    }

    /// Binds one more tooltip.
    pub fn bind_tooltip(&mut self, tooltip: Tooltip) {
        self.tooltips.push(tooltip);
    }

    /// Returns the property value as text. Strings are returned as is, numbers and booleans are
    /// formatted. Missing, `null` and structured values give `None`.
    pub fn property_text(&self, name: &str) -> Option<String> {
        property_text(self.properties.as_ref(), name)
    }
}

/// Returns the property value as text, see [`StyledFeature::property_text`].
pub fn property_text(properties: Option<&JsonObject>, name: &str) -> Option<String> {
    match properties?.get(name)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// What data a layer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRole {
    /// Features of the active slide.
    Primary,
    /// One of the fixed datasets shown together with the slide data.
    Auxiliary(AuxiliaryDataset),
}

/// Features of one GeoJSON document drawn with one style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledLayer {
    role: LayerRole,
    features: Vec<StyledFeature>,
}

impl StyledLayer {
    /// Creates a new layer.
    pub fn new(role: LayerRole, features: Vec<StyledFeature>) -> Self {
        Self { role, features }
    }

    /// Role of the layer.
    pub fn role(&self) -> LayerRole {
        self.role
    }

    /// Features of the layer.
    pub fn features(&self) -> &[StyledFeature] {
        &self.features
    }

    /// Mutable access to the features of the layer.
    pub fn features_mut(&mut self) -> &mut [StyledFeature] {
        &mut self.features
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if the layer has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Bounds of all geometries of the layer.
    pub fn extent(&self) -> Option<LatLngBounds> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.extent())
            .reduce(|acc, bounds| acc.merge(bounds))
    }
}

/// Layers currently shown by a deck. Index `0` holds the slide data once a sync is rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerGroup {
    layers: Vec<StyledLayer>,
}

impl LayerGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all layers.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Adds a layer on top of the others and returns its index.
    pub fn push(&mut self, layer: StyledLayer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// All layers, bottom first.
    pub fn layers(&self) -> &[StyledLayer] {
        &self.layers
    }

    /// Layer at the given index.
    pub fn get(&self, index: usize) -> Option<&StyledLayer> {
        self.layers.get(index)
    }

    /// Mutable layer at the given index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut StyledLayer> {
        self.layers.get_mut(index)
    }

    /// Index of the layer with the slide data.
    pub fn primary_index(&self) -> Option<usize> {
        self.layers
            .iter()
            .position(|layer| layer.role == LayerRole::Primary)
    }

    /// Layer with the slide data.
    pub fn primary(&self) -> Option<&StyledLayer> {
        self.layers.get(self.primary_index()?)
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if no layers are shown.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Total number of features in all layers.
    pub fn feature_count(&self) -> usize {
        self.layers.iter().map(StyledLayer::len).sum()
    }
}
