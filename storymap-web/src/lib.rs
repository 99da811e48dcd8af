//! Browser front end of storymap.
//!
//! The page loads Leaflet, then calls [`init`] with its configuration (or `undefined` for the
//! defaults). Every configured section gets a Leaflet map, a deck built from the slides found in
//! the section, and listeners that keep the two in sync while the reader scrolls.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

use std::rc::Rc;

use log::{info, warn};
use storymap::config::{PageConfig, SectionConfig};
use storymap::deck::{DeckHandle, SlideDeck};
use storymap::provider::UrlFeatureProvider;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

mod dom;
mod leaflet;
mod options;

use dom::DomSlides;
use leaflet::{create_map, tile_layer, to_js, LeafletSurface};
use options::{MapOptions, TileOptions};

type WebDeck = DeckHandle<LeafletSurface, UrlFeatureProvider>;

/// Sets up all map sections of the page and starts showing their first slides.
#[wasm_bindgen]
pub fn init(config: JsValue) -> Result<Vec<StoryDeck>, JsValue> {
    console_error_panic_hook::set_once();
    // the page may have installed a logger already
    let _ = console_log::init_with_level(log::Level::Info);

    let page: PageConfig = if config.is_undefined() || config.is_null() {
        PageConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };

    if page.tiles.access_token.is_empty() {
        warn!("No tile service access token configured, the base map will not load");
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    page.sections
        .iter()
        .map(|section| mount_section(&window, &document, &page, section))
        .collect()
}

/// Default page configuration as a JS object, for pages that only change a few values.
#[wasm_bindgen(js_name = defaultPageConfig)]
pub fn default_page_config() -> Result<JsValue, JsValue> {
    to_js(&PageConfig::default())
}

fn mount_section(
    window: &Window,
    document: &Document,
    page: &PageConfig,
    section: &SectionConfig,
) -> Result<StoryDeck, JsValue> {
    let map = create_map(&section.map_id, &to_js(&MapOptions::from(page))?)?;
    tile_layer(
        &page.tiles.url_template,
        &to_js(&TileOptions::from(&page.tiles))?,
    )
    .add_to(&map);
    for attribution in &section.attributions {
        map.attribution_control().add_attribution(attribution);
    }

    let dom = Rc::new(DomSlides::query(
        window.clone(),
        document,
        &section.section_id,
    )?);
    let deck = SlideDeck::new(
        dom.slides(),
        LeafletSurface::new(map),
        page.deck_config(),
        section.style_mode,
    );
    let handle = DeckHandle::new(deck, UrlFeatureProvider::new());

    let scroll_handle = handle.clone();
    let scroll_dom = dom.clone();
    let on_scroll = Closure::<dyn FnMut()>::new(move || match scroll_dom.metrics() {
        Ok(metrics) => scroll_handle.on_scroll(&metrics, &scroll_dom.offsets()),
        Err(err) => warn!("Failed to read the scroll position: {err:?}"),
    });
    document.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    on_scroll.forget();

    // Leaflet may fire moveend while the deck is still applying a sync
    let settle_handle = handle.clone();
    let on_move_end = Closure::<dyn FnMut()>::new(move || {
        let handle = settle_handle.clone();
        storymap::async_runtime::spawn_local(async move {
            handle.on_move_end();
        });
    });
    handle.deck().map().map().on("moveend", &on_move_end);
    on_move_end.forget();

    handle.spawn_preload();
    handle.spawn_sync_to_current_slide();

    info!(
        "Section {} mounted with {} slides",
        section.section_id,
        handle.deck().slides().len()
    );

    Ok(StoryDeck { handle, dom })
}

/// Deck of one page section, exposed to the page scripts.
#[wasm_bindgen]
pub struct StoryDeck {
    handle: WebDeck,
    dom: Rc<DomSlides>,
}

#[wasm_bindgen]
impl StoryDeck {
    /// Shows the next slide, wrapping from the last one to the first.
    #[wasm_bindgen(js_name = nextSlide)]
    pub fn next_slide(&self) {
        self.handle.go_next_slide();
    }

    /// Shows the previous slide, wrapping from the first one to the last.
    #[wasm_bindgen(js_name = prevSlide)]
    pub fn prev_slide(&self) {
        self.handle.go_prev_slide();
    }

    /// Shows the data of the active slide again.
    #[wasm_bindgen(js_name = syncToCurrentSlide)]
    pub fn sync_to_current_slide(&self) {
        self.handle.spawn_sync_to_current_slide();
    }

    /// Hides every slide of the section.
    #[wasm_bindgen(js_name = hideAllSlides)]
    pub fn hide_all_slides(&self) -> Result<(), JsValue> {
        self.handle.deck_mut().hide_all_slides();
        self.dom.apply_visibility(self.handle.deck().slides())
    }

    /// Index of the active slide.
    #[wasm_bindgen(js_name = currentSlideIndex)]
    pub fn current_slide_index(&self) -> usize {
        self.handle.deck().current_slide_index()
    }

    /// Number of slides in the section.
    #[wasm_bindgen(js_name = slideCount)]
    pub fn slide_count(&self) -> usize {
        self.handle.deck().slides().len()
    }
}
