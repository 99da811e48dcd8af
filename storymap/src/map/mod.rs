//! The map a deck draws on.
//!
//! The deck does not render anything itself. It describes its layers with
//! [`StyledLayer`](crate::layer::StyledLayer)s and hands them to a [`MapSurface`], which is
//! implemented over the actual mapping library. [`HeadlessMap`] is an implementation without any
//! rendering that keeps the state in memory, for tests and tools.

use storymap_types::LatLngBounds;

use crate::config::FlyOptions;
use crate::layer::{StyledLayer, Tooltip};

mod headless;

pub use headless::{AnimationState, HeadlessMap};

/// A map owned by one deck.
///
/// All layers added through the surface belong to the deck's layer group: [`MapSurface::clear_layers`]
/// must remove every one of them and nothing else. Layers are addressed by the order they were
/// added since the last clear, features by their index within the layer.
///
/// The surface does not report the end of the camera animation through this trait. The code that
/// owns the map must call [`DeckHandle::on_move_end`](crate::deck::DeckHandle::on_move_end)
/// (or [`SlideDeck::on_move_end`](crate::deck::SlideDeck::on_move_end)) when the map signals it.
pub trait MapSurface {
    /// Removes all layers of the deck's layer group from the map.
    fn clear_layers(&mut self);

    /// Draws the layer on top of the previously added ones.
    fn add_layer(&mut self, layer: &StyledLayer);

    /// Binds an additional tooltip to a feature that is already on the map.
    fn bind_tooltip(&mut self, layer_index: usize, feature_index: usize, tooltip: &Tooltip);

    /// Starts animated movement of the viewport so that it contains the bounds.
    fn fly_to_bounds(&mut self, bounds: LatLngBounds, options: &FlyOptions);
}
