//! Rendering strategies of a deck.
//!
//! Every deck is created with one [`StyleMode`] that decides how the slide data is drawn and which
//! [`AuxiliaryDataset`]s are shown with it. The mode is chosen per map, not by the content of the
//! data.

use geojson::{Feature, FeatureCollection, Value};

use crate::color::Color;
use crate::config::DeckConfig;
use crate::error::StorymapError;
use crate::layer::{property_text, LayerRole, StyledFeature, StyledLayer, Tooltip};
use crate::symbol::{CircleMarkerSymbol, Fill, IconSymbol, PathSymbol, Stroke, Symbol};

const ICON_SIZE: u32 = 48;
const CITY_MARKER_RADIUS: f64 = 1.5;
const REGION_FILL_OPACITY: f64 = 0.4;

/// Fixed GeoJSON datasets drawn on top of the slide data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxiliaryDataset {
    /// Modern shopping routes, shown with the country icons.
    ShoppingRoutes,
    /// Lines of the historical route.
    SilkRoadRoute,
    /// Cities along the historical route.
    SilkRoadCities,
}

impl AuxiliaryDataset {
    /// Name of the data file, relative to the data root.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::ShoppingRoutes => "shoppingRoutes.geojson",
            Self::SilkRoadRoute => "silkroad route.geojson",
            Self::SilkRoadCities => "silkroad city.geojson",
        }
    }
}

/// How a deck draws its layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleMode {
    /// Points are drawn as icons named by the `country` property with a `city` hover tooltip.
    /// Shopping routes are drawn on top.
    CountryIcons,
    /// Points are drawn as small circles with a permanent `label`. Route lines are drawn on top.
    LabeledPoints,
    /// Multipolygons are filled. Route lines and labeled route cities are drawn on top.
    RegionPolygons,
}

impl TryFrom<u8> for StyleMode {
    type Error = StorymapError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::CountryIcons),
            1 => Ok(Self::LabeledPoints),
            2 => Ok(Self::RegionPolygons),
            other => Err(StorymapError::UnknownStyleMode(other)),
        }
    }
}

impl From<StyleMode> for u8 {
    fn from(value: StyleMode) -> Self {
        match value {
            StyleMode::CountryIcons => 0,
            StyleMode::LabeledPoints => 1,
            StyleMode::RegionPolygons => 2,
        }
    }
}

impl StyleMode {
    /// Datasets shown together with the slide data, bottom first.
    pub fn auxiliary_datasets(&self) -> &'static [AuxiliaryDataset] {
        match self {
            Self::CountryIcons => &[AuxiliaryDataset::ShoppingRoutes],
            Self::LabeledPoints => &[AuxiliaryDataset::SilkRoadRoute],
            Self::RegionPolygons => &[
                AuxiliaryDataset::SilkRoadRoute,
                AuxiliaryDataset::SilkRoadCities,
            ],
        }
    }

    /// Styles the features of the active slide.
    pub fn style_slide(&self, collection: &FeatureCollection, config: &DeckConfig) -> StyledLayer {
        let features = collection
            .features
            .iter()
            .filter_map(|feature| match self {
                Self::CountryIcons => country_icon(feature, config),
                Self::LabeledPoints => labeled_point(feature),
                Self::RegionPolygons => region(feature),
            })
            .collect();

        StyledLayer::new(LayerRole::Primary, features)
    }

    /// Styles one of the auxiliary datasets of this mode.
    pub fn style_auxiliary(
        &self,
        dataset: AuxiliaryDataset,
        collection: &FeatureCollection,
    ) -> StyledLayer {
        let route_weight = match self {
            Self::CountryIcons => 2.0,
            Self::LabeledPoints | Self::RegionPolygons => 1.0,
        };

        let features = collection
            .features
            .iter()
            .filter_map(|feature| match dataset {
                AuxiliaryDataset::ShoppingRoutes | AuxiliaryDataset::SilkRoadRoute => {
                    route_line(feature, route_weight)
                }
                AuxiliaryDataset::SilkRoadCities => labeled_point(feature),
            })
            .collect();

        StyledLayer::new(LayerRole::Auxiliary(dataset), features)
    }
}

fn is_point(value: &Value) -> bool {
    matches!(value, Value::Point(_) | Value::MultiPoint(_))
}

fn is_line(value: &Value) -> bool {
    matches!(value, Value::LineString(_) | Value::MultiLineString(_))
}

fn city_marker() -> Symbol {
    Symbol::CircleMarker(CircleMarkerSymbol {
        radius: CITY_MARKER_RADIUS,
        stroke: Stroke::new(Color::INK, 1.0),
        fill: Fill {
            color: Color::INK,
            opacity: 1.0,
        },
    })
}

/// Features without geometry cannot be drawn and are skipped by every style.
fn styled(feature: &Feature, symbol: impl FnOnce(&Value) -> Symbol) -> Option<StyledFeature> {
    let geometry = feature.geometry.as_ref()?;
    let symbol = symbol(&geometry.value);
    Some(StyledFeature::new(
        geometry.clone(),
        feature.properties.clone(),
        symbol,
    ))
}

fn country_icon(feature: &Feature, config: &DeckConfig) -> Option<StyledFeature> {
    let country = property_text(feature.properties.as_ref(), "country");
    let styled = styled(feature, |value| {
        if is_point(value) {
            let url = config.icon_url(country.as_deref().unwrap_or_default());
            Symbol::Icon(IconSymbol::pin(url, ICON_SIZE))
        } else {
            Symbol::default_path()
        }
    })?;

    Some(match property_text(feature.properties.as_ref(), "city") {
        Some(city) => styled.with_tooltip(Tooltip::hover(city)),
        None => styled,
    })
}

fn labeled_point(feature: &Feature) -> Option<StyledFeature> {
    let styled = styled(feature, |value| {
        if is_point(value) {
            city_marker()
        } else {
            Symbol::default_path()
        }
    })?;

    Some(match property_text(feature.properties.as_ref(), "label") {
        Some(label) => styled.with_tooltip(Tooltip::label(label)),
        None => styled,
    })
}

fn region(feature: &Feature) -> Option<StyledFeature> {
    styled(feature, |value| match value {
        Value::MultiPolygon(_) => Symbol::Path(PathSymbol {
            stroke: Some(Stroke::new(Color::SAND, 1.0)),
            fill: Some(Fill {
                color: Color::SAND,
                opacity: REGION_FILL_OPACITY,
            }),
        }),
        value if is_point(value) => Symbol::Marker,
        _ => Symbol::default_path(),
    })
}

fn route_line(feature: &Feature, weight: f64) -> Option<StyledFeature> {
    styled(feature, |value| {
        if is_line(value) {
            Symbol::Path(PathSymbol {
                stroke: Some(Stroke::new(Color::ROUTE, weight)),
                fill: None,
            })
        } else if is_point(value) {
            Symbol::Marker
        } else {
            Symbol::default_path()
        }
    })
}
