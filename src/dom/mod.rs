//! Element hosts
//!
//! The positioning code never touches the DOM directly. Everything it needs
//! from the element tree (selector lookup, containment, measurement, scroll
//! positions) goes through [`ElementHost`]. Two hosts ship with the crate:
//!
//! - `tree`: an in-memory snapshot (`ElementTree`) that JavaScript can send
//!   across the boundary, also used by the tests
//! - `web`: the live DOM through `web-sys`

pub mod scroll;
pub mod selector;
pub mod tree;
pub mod web;

use std::fmt::Debug;

use crate::models::{ClientRect, Margins, ScrollOffsets};

pub use scroll::{get_common_total_scroll, get_total_scroll, unwrap_reference};
pub use selector::{ElementAdapter, SelectorList};
pub use tree::{ElementTree, Node, NodeId};
pub use web::WebDom;

/// Read-only access to an element tree
pub trait ElementHost {
    type Element: Clone + PartialEq + Debug;

    /// First descendant of `scope` (document order) matching `selector`
    fn query_selector(&self, scope: &Self::Element, selector: &str) -> Option<Self::Element>;

    /// Whether `node` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: &Self::Element, node: &Self::Element) -> bool;

    fn client_rect(&self, element: &Self::Element) -> ClientRect;

    fn margins(&self, element: &Self::Element) -> Margins;

    /// Scroll position of a single node
    fn node_scroll(&self, element: &Self::Element) -> ScrollOffsets;

    fn offset_parent(&self, element: &Self::Element) -> Option<Self::Element>;
}
