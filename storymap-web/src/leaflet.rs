//! Bindings to the parts of Leaflet the page uses, and the [`MapSurface`] implemented with them.

use js_sys::{Object, Reflect};
use log::{error, warn};
use serde::Serialize;
use storymap::config::FlyOptions;
use storymap::layer::{StyledFeature, StyledLayer, Tooltip};
use storymap::symbol::Symbol;
use storymap::MapSurface;
use storymap_types::LatLngBounds;
use wasm_bindgen::prelude::*;

use crate::options::{
    leaflet_bounds, shapes, FlyToOptions, IconOptions, PathOptions, Shape, TooltipOptions,
};

#[wasm_bindgen]
extern "C" {
    /// `L.Map`.
    #[wasm_bindgen(js_namespace = L, js_name = Map)]
    pub type LeafletMap;

    /// Creates a map in the element with the given id.
    #[wasm_bindgen(js_namespace = L, js_name = map, catch)]
    pub fn create_map(element_id: &str, options: &JsValue) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, js_name = flyToBounds)]
    pub fn fly_to_bounds(this: &LeafletMap, bounds: &JsValue, options: &JsValue);

    /// Subscribes to a map event.
    #[wasm_bindgen(method)]
    pub fn on(this: &LeafletMap, event: &str, handler: &Closure<dyn FnMut()>);

    #[wasm_bindgen(method, getter, js_name = attributionControl)]
    pub fn attribution_control(this: &LeafletMap) -> AttributionControl;

    /// `L.Control.Attribution`.
    pub type AttributionControl;

    #[wasm_bindgen(method, js_name = addAttribution)]
    pub fn add_attribution(this: &AttributionControl, text: &str);

    /// `L.Layer`.
    #[wasm_bindgen(js_namespace = L, js_name = Layer)]
    pub type Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Layer, map: &LeafletMap);

    #[wasm_bindgen(method, js_name = bindTooltip)]
    pub fn bind_tooltip(this: &Layer, content: &str, options: &JsValue);

    #[wasm_bindgen(method, js_name = openTooltip)]
    pub fn open_tooltip(this: &Layer);

    /// `L.LayerGroup`.
    #[wasm_bindgen(extends = Layer, js_namespace = L, js_name = LayerGroup)]
    pub type LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    pub fn layer_group() -> LayerGroup;

    #[wasm_bindgen(method, js_name = clearLayers)]
    pub fn clear_layers(this: &LayerGroup);

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &LayerGroup, layer: &Layer);

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    pub fn tile_layer(url_template: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(lat_lng: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = circleMarker)]
    fn circle_marker(lat_lng: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = polyline)]
    fn polyline(lat_lngs: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = polygon)]
    fn polygon(lat_lngs: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = icon)]
    fn icon(options: &JsValue) -> JsValue;
}

/// Converts a value into a plain JS object.
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}

/// Deck layers drawn into one Leaflet layer group.
pub struct LeafletSurface {
    map: LeafletMap,
    group: LayerGroup,
    // deck layer -> feature -> Leaflet layers drawing the feature
    layers: Vec<Vec<Vec<Layer>>>,
}

impl LeafletSurface {
    /// Creates a surface with an empty layer group on the map.
    pub fn new(map: LeafletMap) -> Self {
        let group = layer_group();
        group.add_to(&map);

        Self {
            map,
            group,
            layers: vec![],
        }
    }

    /// The Leaflet map.
    pub fn map(&self) -> &LeafletMap {
        &self.map
    }

    fn draw_feature(&self, feature: &StyledFeature) -> Result<Vec<Layer>, JsValue> {
        let mut layers = vec![];
        for shape in shapes(&feature.geometry().value) {
            let layer = match (&shape, feature.symbol()) {
                (Shape::Point(lat_lng), Symbol::Icon(icon_symbol)) => {
                    let options = Object::new();
                    Reflect::set(
                        &options,
                        &JsValue::from_str("icon"),
                        &icon(&to_js(&IconOptions::from(icon_symbol))?),
                    )?;
                    marker(&to_js(lat_lng)?, &options)
                }
                (Shape::Point(lat_lng), Symbol::CircleMarker(circle)) => {
                    circle_marker(&to_js(lat_lng)?, &to_js(&PathOptions::from(circle))?)
                }
                (Shape::Point(lat_lng), _) => marker(&to_js(lat_lng)?, &JsValue::UNDEFINED),
                (Shape::Line(lines), symbol) => {
                    polyline(&to_js(lines)?, &to_js(&PathOptions::from(symbol))?)
                }
                (Shape::Area(polygons), symbol) => {
                    polygon(&to_js(polygons)?, &to_js(&PathOptions::from(symbol))?)
                }
            };

            for tooltip in feature.tooltips() {
                bind(&layer, tooltip)?;
            }

            self.group.add_layer(&layer);
            layers.push(layer);
        }

        Ok(layers)
    }
}

fn bind(layer: &Layer, tooltip: &Tooltip) -> Result<(), JsValue> {
    layer.bind_tooltip(&tooltip.content, &to_js(&TooltipOptions::from(tooltip))?);
    if tooltip.open {
        layer.open_tooltip();
    }

    Ok(())
}

impl MapSurface for LeafletSurface {
    fn clear_layers(&mut self) {
        self.group.clear_layers();
        self.layers.clear();
    }

    fn add_layer(&mut self, layer: &StyledLayer) {
        let features = layer
            .features()
            .iter()
            .map(|feature| {
                self.draw_feature(feature).unwrap_or_else(|err| {
                    error!("Failed to draw a feature: {err:?}");
                    vec![]
                })
            })
            .collect();

        self.layers.push(features);
    }

    fn bind_tooltip(&mut self, layer_index: usize, feature_index: usize, tooltip: &Tooltip) {
        let Some(layers) = self
            .layers
            .get(layer_index)
            .and_then(|features| features.get(feature_index))
        else {
            warn!("No feature {feature_index} in layer {layer_index} to bind a tooltip to");
            return;
        };

        for layer in layers {
            if let Err(err) = bind(layer, tooltip) {
                error!("Failed to bind a tooltip: {err:?}");
            }
        }
    }

    fn fly_to_bounds(&mut self, bounds: LatLngBounds, options: &FlyOptions) {
        match (
            to_js(&leaflet_bounds(&bounds)),
            to_js(&FlyToOptions::from(options)),
        ) {
            (Ok(bounds), Ok(options)) => self.map.fly_to_bounds(&bounds, &options),
            (Err(err), _) | (_, Err(err)) => error!("Failed to move the map: {err:?}"),
        }
    }
}
