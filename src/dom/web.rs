//! Live DOM host backed by `web-sys`
//!
//! Only meaningful inside a browser. Lookups that fail on the JS side are
//! treated as "no element" / zero geometry rather than surfaced as errors.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use super::ElementHost;
use crate::models::{ClientRect, Margins, ScrollOffsets};

/// [`ElementHost`] over the document the module runs in
#[derive(Debug, Clone, Copy, Default)]
pub struct WebDom;

impl WebDom {
    pub fn new() -> Self {
        WebDom
    }

    fn is_document_element(element: &Element) -> bool {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
            .map(|root| root == *element)
            .unwrap_or(false)
    }
}

/// Parse a computed length such as `"12px"`; anything else counts as 0
fn parse_px(value: &str) -> f64 {
    value.trim().trim_end_matches("px").parse::<f64>().unwrap_or(0.0)
}

impl ElementHost for WebDom {
    type Element = Element;

    fn query_selector(&self, scope: &Element, selector: &str) -> Option<Element> {
        match scope.query_selector(selector) {
            Ok(found) => found,
            Err(e) => {
                log::debug!("query_selector({}) failed: {:?}", selector, e);
                None
            }
        }
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn client_rect(&self, element: &Element) -> ClientRect {
        let rect = element.get_bounding_client_rect();
        let (x, y, width, height) = (rect.x(), rect.y(), rect.width(), rect.height());
        ClientRect {
            top: y,
            left: x,
            right: x + width,
            bottom: y + height,
            width,
            height,
        }
    }

    fn margins(&self, element: &Element) -> Margins {
        let style = match web_sys::window().map(|window| window.get_computed_style(element)) {
            Some(Ok(Some(style))) => style,
            _ => return Margins::default(),
        };

        let side = |property: &str| {
            style
                .get_property_value(property)
                .map(|value| parse_px(&value))
                .unwrap_or(0.0)
        };

        Margins {
            top: side("margin-top"),
            right: side("margin-right"),
            bottom: side("margin-bottom"),
            left: side("margin-left"),
        }
    }

    fn node_scroll(&self, element: &Element) -> ScrollOffsets {
        // The root element scrolls with the window
        if Self::is_document_element(element) {
            if let Some(window) = web_sys::window() {
                return ScrollOffsets {
                    scroll_top: window.scroll_y().unwrap_or(0.0),
                    scroll_left: window.scroll_x().unwrap_or(0.0),
                };
            }
        }

        ScrollOffsets {
            scroll_top: element.scroll_top() as f64,
            scroll_left: element.scroll_left() as f64,
        }
    }

    fn offset_parent(&self, element: &Element) -> Option<Element> {
        element.dyn_ref::<HtmlElement>()?.offset_parent()
    }
}
