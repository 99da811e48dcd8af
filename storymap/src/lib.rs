//! Storymap keeps a map in sync with the narrative text next to it. The reader scrolls through
//! slides, and the map shows the geographic data of the active one.
//!
//! # Quick start
//!
//! ```no_run
//! use storymap::config::DeckConfig;
//! use storymap::deck::{DeckHandle, Slide, SlideDeck};
//! use storymap::map::HeadlessMap;
//! use storymap::provider::UrlFeatureProvider;
//!
//! # tokio_test::block_on(async {
//! let slides = vec![Slide::new("city-1").with_popups(true), Slide::new("city-2")];
//! let deck = SlideDeck::new(slides, HeadlessMap::new(), DeckConfig::default(), 1);
//! let handle = DeckHandle::new(deck, UrlFeatureProvider::new());
//!
//! handle.sync_to_current_slide().await.expect("slide data is available");
//! # });
//! ```
//!
//! # Main components
//!
//! * [`SlideDeck`](deck::SlideDeck) holds the slides of one page section, the index of the
//!   active slide and the layers currently shown on its map.
//! * [`MapSurface`](map::MapSurface) is the map the deck draws on. The web front end implements
//!   it over the page's mapping library, [`HeadlessMap`](map::HeadlessMap) keeps everything in
//!   memory.
//! * [`FeatureProvider`](provider::FeatureProvider) loads the GeoJSON data of slides.
//! * [`StyleMode`](style::StyleMode) decides how a deck draws its data.
//!
//! Scroll events are converted into the active slide index by
//! [`SlideDeck::calc_current_slide_index`](deck::SlideDeck::calc_current_slide_index). Every change
//! of the active slide starts a sync: the slide data is loaded, the previous layers are replaced
//! and the camera flies to the new data. When the camera stops, labels of the slide features can
//! be opened.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod async_runtime;
mod color;
pub mod config;
pub mod deck;
pub mod error;
pub mod layer;
pub mod map;
pub mod platform;
pub mod provider;
pub mod scroll;
pub mod style;
pub mod symbol;

pub use color::Color;
pub use config::{DeckConfig, PageConfig};
pub use deck::{DeckHandle, Slide, SlideDeck};
pub use error::StorymapError;
pub use map::MapSurface;
pub use style::StyleMode;

// Reexport storymap_types
pub use storymap_types;
