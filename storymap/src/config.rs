//! Configuration of decks and of the page they live on.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use storymap_types::LatLng;

use crate::style::AuxiliaryDataset;

const DEFAULT_TRIGGER_RATIO: f64 = 0.7;
const DEFAULT_FLY_DURATION: Duration = Duration::from_secs(2);
const DEFAULT_EASE_LINEARITY: f64 = 2.0;

/// Parameters of the camera animation to the slide data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyOptions {
    /// Duration of the animation.
    pub duration: Duration,
    /// Curvature of the easing; `1` is linear, larger values flatten the curve further.
    pub ease_linearity: f64,
}

impl Default for FlyOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_FLY_DURATION,
            ease_linearity: DEFAULT_EASE_LINEARITY,
        }
    }
}

/// Configuration of a [`SlideDeck`](crate::deck::SlideDeck).
#[derive(Debug, Clone, PartialEq)]
pub struct DeckConfig {
    data_root: String,
    icon_root: String,
    trigger_ratio: f64,
    fly: FlyOptions,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            data_root: "data".to_string(),
            icon_root: "data/icon".to_string(),
            trigger_ratio: DEFAULT_TRIGGER_RATIO,
            fly: FlyOptions::default(),
        }
    }
}

impl DeckConfig {
    /// Folder (or url prefix) the GeoJSON files are loaded from.
    pub fn data_root(&self) -> &str {
        &self.data_root
    }

    /// Sets the folder (or url prefix) the GeoJSON files are loaded from.
    pub fn with_data_root(mut self, data_root: impl Into<String>) -> Self {
        self.data_root = data_root.into();
        self
    }

    /// Folder (or url prefix) of the country icons.
    pub fn icon_root(&self) -> &str {
        &self.icon_root
    }

    /// Sets the folder (or url prefix) of the country icons.
    pub fn with_icon_root(mut self, icon_root: impl Into<String>) -> Self {
        self.icon_root = icon_root.into();
        self
    }

    /// Part of the viewport height, measured from its top, at which the next slide becomes
    /// active.
    pub fn trigger_ratio(&self) -> f64 {
        self.trigger_ratio
    }

    /// Sets the part of the viewport height at which the next slide becomes active.
    pub fn with_trigger_ratio(mut self, ratio: f64) -> Self {
        self.trigger_ratio = ratio;
        self
    }

    /// Camera animation parameters.
    pub fn fly(&self) -> &FlyOptions {
        &self.fly
    }

    /// Sets camera animation parameters.
    pub fn with_fly(mut self, fly: FlyOptions) -> Self {
        self.fly = fly;
        self
    }

    /// Path of the data file of the slide with the given id.
    pub fn slide_path(&self, slide_id: &str) -> String {
        join(&self.data_root, &format!("{slide_id}.geojson"))
    }

    /// Path of the auxiliary dataset.
    pub fn dataset_path(&self, dataset: AuxiliaryDataset) -> String {
        join(&self.data_root, dataset.file_name())
    }

    /// Url of the icon of the given country.
    pub fn icon_url(&self, country: &str) -> String {
        join(&self.icon_root, &format!("{country}.png"))
    }
}

fn join(root: &str, name: &str) -> String {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        name.to_string()
    } else {
        format!("{root}/{name}")
    }
}

/// Base tile layer shared by all maps of the page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct TileLayerConfig {
    /// Url template with `{id}`, `{z}`, `{x}`, `{y}` and `{accessToken}` placeholders.
    pub url_template: String,
    /// Style identifier substituted for `{id}`.
    pub style_id: String,
    /// Access token of the tile service.
    pub access_token: String,
    /// Attribution shown in the map corner.
    pub attribution: String,
    /// Maximum zoom level.
    pub max_zoom: u8,
    /// Size of tiles in pixels.
    pub tile_size: u32,
    /// Offset added to the zoom level when requesting tiles.
    pub zoom_offset: i8,
    /// Request higher resolution tiles on HiDPI screens.
    pub detect_retina: bool,
}

impl Default for TileLayerConfig {
    fn default() -> Self {
        Self {
            url_template:
                "https://api.mapbox.com/styles/v1/{id}/tiles/{z}/{x}/{y}?access_token={accessToken}"
                    .to_string(),
            style_id: "jasmine404/cm2ppvdzm002j01nth06gdv4y".to_string(),
            access_token: String::new(),
            attribution:
                "&copy; <a href=\"https://www.mapbox.com/about/maps/\">Mapbox</a> contributors"
                    .to_string(),
            max_zoom: 18,
            tile_size: 512,
            zoom_offset: -1,
            detect_retina: true,
        }
    }
}

/// One map with its slides.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SectionConfig {
    /// Id of the element the map is created in.
    pub map_id: String,
    /// Id of the page section containing the slides.
    pub section_id: String,
    /// Raw [`StyleMode`](crate::style::StyleMode) value of the section deck.
    pub style_mode: u8,
    /// Additional attribution strings (HTML) added to the map.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributions: Vec<String>,
}

impl SectionConfig {
    /// Creates a section without additional attributions.
    pub fn new(map_id: impl Into<String>, section_id: impl Into<String>, style_mode: u8) -> Self {
        Self {
            map_id: map_id.into(),
            section_id: section_id.into(),
            style_mode,
            attributions: vec![],
        }
    }

    /// Adds an attribution string.
    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attributions.push(attribution.into());
        self
    }
}

/// Configuration of the whole page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct PageConfig {
    /// Folder (or url prefix) the GeoJSON files are loaded from.
    pub data_root: String,
    /// Folder (or url prefix) of the country icons.
    pub icon_root: String,
    /// Initial center of every map.
    pub center: LatLng,
    /// Initial zoom level of every map.
    pub zoom: f64,
    /// Zoom the map with the mouse wheel. Disabled by default, the wheel scrolls the story.
    pub scroll_wheel_zoom: bool,
    /// Part of the viewport height at which the next slide becomes active.
    pub trigger_ratio: f64,
    /// Base tile layer.
    pub tiles: TileLayerConfig,
    /// Map sections of the page.
    pub sections: Vec<SectionConfig>,
}

impl Default for PageConfig {
    fn default() -> Self {
        let deck = DeckConfig::default();
        Self {
            data_root: deck.data_root,
            icon_root: deck.icon_root,
            center: LatLng::new(37.0, 87.0),
            zoom: 8.0,
            scroll_wheel_zoom: false,
            trigger_ratio: deck.trigger_ratio,
            tiles: TileLayerConfig::default(),
            sections: default_sections(),
        }
    }
}

impl PageConfig {
    /// Deck configuration for the sections of the page.
    pub fn deck_config(&self) -> DeckConfig {
        DeckConfig::default()
            .with_data_root(self.data_root.clone())
            .with_icon_root(self.icon_root.clone())
            .with_trigger_ratio(self.trigger_ratio)
    }
}

fn default_sections() -> Vec<SectionConfig> {
    const ICON_CREDITS: [(&str, &str); 6] = [
        ("london-eye", "London eye icons by Smashicons - Flaticon"),
        ("statue-of-liberty", "Statue of liberty icons created by shmai - Flaticon"),
        ("beijing", "Beijing icons created by Freepik - Flaticon"),
        ("australia", "Australia icons created by Freepik - Flaticon"),
        ("vietnam", "Vietnam icons created by justicon - Flaticon"),
        ("victoria-day", "Victoria day icons created by Freepik - Flaticon"),
    ];

    let icons = ICON_CREDITS.iter().fold(
        SectionConfig::new("map-0", "map-section-0", 0),
        |section, (slug, text)| {
            section.with_attribution(format!(
                "<a href=\"https://www.flaticon.com/free-icons/{slug}\">{text}</a>"
            ))
        },
    );

    vec![
        icons,
        SectionConfig::new("map-1", "map-section-1", 1).with_attribution(
            "<a href=\"https://hub.arcgis.com/maps/Education::the-silk-roadsthen-and-now/about\">Silk Road route and cities</a>",
        ),
        SectionConfig::new("map-2", "map-section-2", 2).with_attribution(
            "<a href=\"https://www.naturalearthdata.com/downloads/10m-cultural-vectors/\">Country Boundary</a>",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_paths() {
        let config = DeckConfig::default();
        assert_eq!(config.slide_path("city-1"), "data/city-1.geojson");
        assert_eq!(
            config.dataset_path(AuxiliaryDataset::SilkRoadCities),
            "data/silkroad city.geojson"
        );
        assert_eq!(config.icon_url("China"), "data/icon/China.png");

        let config = config.with_data_root("https://example.com/story/");
        assert_eq!(
            config.slide_path("intro"),
            "https://example.com/story/intro.geojson"
        );

        let config = config.with_data_root("");
        assert_eq!(config.slide_path("intro"), "intro.geojson");
    }

    #[test]
    fn default_page_has_three_sections() {
        let page = PageConfig::default();
        let modes: Vec<u8> = page.sections.iter().map(|s| s.style_mode).collect();
        assert_eq!(modes, vec![0, 1, 2]);
        assert_eq!(page.sections[0].attributions.len(), 6);
        assert_eq!(page.deck_config(), DeckConfig::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn page_config_from_json() {
        let page: PageConfig = serde_json::from_str(
            r#"{
                "dataRoot": "story-data",
                "tiles": {"accessToken": "pk.test"},
                "sections": [{"mapId": "map", "sectionId": "story", "styleMode": 1}]
            }"#,
        )
        .expect("valid config");

        assert_eq!(page.data_root, "story-data");
        assert_eq!(page.tiles.access_token, "pk.test");
        assert_eq!(page.tiles.tile_size, 512);
        assert_eq!(page.sections, vec![SectionConfig::new("map", "story", 1)]);
        assert_eq!(page.zoom, 8.0);
        assert_eq!(page.deck_config().slide_path("a"), "story-data/a.geojson");
    }
}
