//! Mapping the scroll position of the page to the active slide.

/// Scroll state of the page at the moment of a scroll event. All values are in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Vertical scroll offset of the window.
    pub scroll_y: f64,
    /// Offset of the slide container from the top of the document.
    pub container_offset_top: f64,
    /// Height of the viewport.
    pub viewport_height: f64,
}

impl ScrollMetrics {
    /// Scroll offset relative to the top of the slide container.
    pub fn scroll_position(&self) -> f64 {
        self.scroll_y - self.container_offset_top
    }
}

/// Returns the index of the active slide.
///
/// `slide_offsets` are the offsets of the slides from the top of their container, in document
/// order. The active slide is the first one whose top is not above the trigger line, placed at
/// `trigger_ratio` of the viewport height. Returns `None` if every slide is above the line.
pub fn active_slide_index(
    metrics: &ScrollMetrics,
    slide_offsets: &[f64],
    trigger_ratio: f64,
) -> Option<usize> {
    let scroll_pos = metrics.scroll_position();
    let trigger = metrics.viewport_height * trigger_ratio;

    slide_offsets
        .iter()
        .position(|offset| offset - scroll_pos + trigger >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFSETS: [f64; 4] = [0.0, 800.0, 1600.0, 2400.0];

    fn metrics(scroll_y: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_y,
            container_offset_top: 200.0,
            viewport_height: 1000.0,
        }
    }

    #[test]
    fn first_slide_at_top() {
        assert_eq!(active_slide_index(&metrics(0.0), &OFFSETS, 0.7), Some(0));
        // slide 0 stays active until its top passes 700px above the viewport top
        assert_eq!(active_slide_index(&metrics(900.0), &OFFSETS, 0.7), Some(0));
        assert_eq!(active_slide_index(&metrics(901.0), &OFFSETS, 0.7), Some(1));
    }

    #[test]
    fn past_the_last_slide() {
        assert_eq!(active_slide_index(&metrics(3300.0), &OFFSETS, 0.7), Some(3));
        assert_eq!(active_slide_index(&metrics(3301.0), &OFFSETS, 0.7), None);
        assert_eq!(active_slide_index(&metrics(0.0), &[], 0.7), None);
    }

    #[test]
    fn index_does_not_decrease_when_scrolling_down() {
        let mut previous = 0;
        for step in 0..400 {
            let scroll_y = step as f64 * 10.0;
            if let Some(index) = active_slide_index(&metrics(scroll_y), &OFFSETS, 0.7) {
                assert!(
                    index >= previous,
                    "index went from {previous} to {index} at {scroll_y}"
                );
                previous = index;
            }
        }

        assert_eq!(previous, OFFSETS.len() - 1);
    }
}
