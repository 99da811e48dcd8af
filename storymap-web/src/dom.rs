//! Slides of a page section read from the document.
//!
//! A section with id `section` is expected to contain an element with the `slide-section` class
//! holding the slides, and elements with the `slide` class. The id of a slide element is the name
//! of its data file; `data-showpopups="true"` asks for labels once the camera stops.

use storymap::deck::Slide;
use storymap::scroll::ScrollMetrics;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, Window};

const HIDDEN_CLASS: &str = "hidden";

/// Elements of one section.
pub struct DomSlides {
    window: Window,
    container: HtmlElement,
    elements: Vec<HtmlElement>,
}

impl DomSlides {
    /// Finds the container and the slides of the section.
    pub fn query(window: Window, document: &Document, section_id: &str) -> Result<Self, JsValue> {
        let container = document
            .query_selector(&format!("#{section_id} .slide-section"))?
            .ok_or_else(|| JsValue::from_str(&format!("no slide container in #{section_id}")))?
            .dyn_into::<HtmlElement>()
            .map_err(JsValue::from)?;

        let nodes = document.query_selector_all(&format!("#{section_id} .slide"))?;
        let mut elements = Vec::with_capacity(nodes.length() as usize);
        for index in 0..nodes.length() {
            if let Some(node) = nodes.get(index) {
                elements.push(node.dyn_into::<HtmlElement>().map_err(JsValue::from)?);
            }
        }

        Ok(Self {
            window,
            container,
            elements,
        })
    }

    /// Slides of the section in document order.
    pub fn slides(&self) -> Vec<Slide> {
        self.elements
            .iter()
            .map(|element| {
                Slide::new(element.id())
                    .with_popups(requests_popups(element.get_attribute("data-showpopups")))
            })
            .collect()
    }

    /// Offsets of the slides from the top of their container.
    pub fn offsets(&self) -> Vec<f64> {
        self.elements
            .iter()
            .map(|element| element.offset_top() as f64)
            .collect()
    }

    /// Current scroll state of the page.
    pub fn metrics(&self) -> Result<ScrollMetrics, JsValue> {
        Ok(ScrollMetrics {
            scroll_y: self.window.scroll_y()?,
            container_offset_top: self.container.offset_top() as f64,
            viewport_height: self.window.inner_height()?.as_f64().unwrap_or_default(),
        })
    }

    /// Sets the `hidden` class of the slide elements according to the deck state.
    pub fn apply_visibility(&self, slides: &[Slide]) -> Result<(), JsValue> {
        for (element, slide) in self.elements.iter().zip(slides) {
            if slide.is_hidden() {
                element.class_list().add_1(HIDDEN_CLASS)?;
            } else {
                element.class_list().remove_1(HIDDEN_CLASS)?;
            }
        }

        Ok(())
    }
}

fn requests_popups(attribute: Option<String>) -> bool {
    attribute.as_deref() == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popups_attribute() {
        assert!(requests_popups(Some("true".to_string())));
        assert!(!requests_popups(Some("false".to_string())));
        assert!(!requests_popups(Some("TRUE".to_string())));
        assert!(!requests_popups(None));
    }
}
