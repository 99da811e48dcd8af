use std::time::Duration;

use log::warn;
use storymap_types::LatLngBounds;
use web_time::SystemTime;

use crate::config::FlyOptions;
use crate::layer::{StyledLayer, Tooltip};
use crate::map::MapSurface;

/// Result of advancing the camera animation of a [`HeadlessMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// No animation is running.
    Idle,
    /// The camera is still moving.
    Moving,
    /// The animation has just finished. This is the moment the map fires its "move end" signal.
    MoveEnded,
}

struct AnimationParameters {
    start_view: LatLngBounds,
    end_view: LatLngBounds,
    start_time: SystemTime,
    duration: Duration,
}

/// Map surface that keeps its layers and viewport in memory.
///
/// The camera animation is linear and advanced by [`HeadlessMap::animate`] (using the current
/// time) or [`HeadlessMap::animate_at`]. [`HeadlessMap::finish_animation`] jumps to the end.
#[derive(Default)]
pub struct HeadlessMap {
    view: Option<LatLngBounds>,
    layers: Vec<StyledLayer>,
    animation: Option<AnimationParameters>,
    flights: usize,
}

impl HeadlessMap {
    /// Creates a map without a viewport and layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map showing the given area.
    pub fn with_view(view: LatLngBounds) -> Self {
        Self {
            view: Some(view),
            ..Default::default()
        }
    }

    /// Currently shown area.
    pub fn view(&self) -> Option<LatLngBounds> {
        self.view
    }

    /// Target view of the current animation, or the current view if there is no animation.
    pub fn target_view(&self) -> Option<LatLngBounds> {
        self.animation
            .as_ref()
            .map(|animation| animation.end_view)
            .or(self.view)
    }

    /// Layers on the map, bottom first.
    pub fn layers(&self) -> &[StyledLayer] {
        &self.layers
    }

    /// Returns true while the camera is moving.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Number of camera animations started so far.
    pub fn flights(&self) -> usize {
        self.flights
    }

    /// Updates the view according to the current time.
    pub fn animate(&mut self) -> AnimationState {
        self.animate_at(SystemTime::now())
    }

    /// Updates the view as it should be at the given moment.
    pub fn animate_at(&mut self, now: SystemTime) -> AnimationState {
        let Some(animation) = &self.animation else {
            return AnimationState::Idle;
        };

        let elapsed = now
            .duration_since(animation.start_time)
            .unwrap_or_default()
            .as_secs_f64();
        let total = animation.duration.as_secs_f64();
        let k = if total > 0.0 { elapsed / total } else { 1.0 };

        if k >= 1.0 {
            self.finish_animation()
        } else {
            self.view = Some(animation.start_view.interpolate(&animation.end_view, k));
            AnimationState::Moving
        }
    }

    /// Stops the animation, moving the view to its target.
    pub fn finish_animation(&mut self) -> AnimationState {
        match self.animation.take() {
            Some(animation) => {
                self.view = Some(animation.end_view);
                AnimationState::MoveEnded
            }
            None => AnimationState::Idle,
        }
    }
}

impl MapSurface for HeadlessMap {
    fn clear_layers(&mut self) {
        self.layers.clear();
    }

    fn add_layer(&mut self, layer: &StyledLayer) {
        self.layers.push(layer.clone());
    }

    fn bind_tooltip(&mut self, layer_index: usize, feature_index: usize, tooltip: &Tooltip) {
        match self
            .layers
            .get_mut(layer_index)
            .and_then(|layer| layer.features_mut().get_mut(feature_index))
        {
            Some(feature) => feature.bind_tooltip(tooltip.clone()),
            None => warn!("No feature {feature_index} in layer {layer_index} to bind a tooltip to"),
        }
    }

    fn fly_to_bounds(&mut self, bounds: LatLngBounds, options: &FlyOptions) {
        let start_view = self.view.unwrap_or(bounds);
        self.animation = Some(AnimationParameters {
            start_view,
            end_view: bounds,
            start_time: SystemTime::now(),
            duration: options.duration,
        });
        self.flights += 1;
    }
}
