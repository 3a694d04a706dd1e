//! Scroll aggregation across scroll containers
//!
//! Measured rects already include every scroll offset the reference and popper
//! share. What the arrow has to correct for is the scrolling that only moves
//! the reference.

use super::ElementHost;
use crate::models::{Reference, ScrollOffsets};

/// Sum of the scroll positions of `nodes`
pub fn get_total_scroll<H: ElementHost>(host: &H, nodes: &[H::Element]) -> ScrollOffsets {
    nodes.iter().map(|node| host.node_scroll(node)).sum()
}

/// Scroll offset that applies to the reference but not to the popper.
///
/// Scroll parents shared with the popper are dropped since they move both
/// elements together. The remaining reference scroll parents are counted up to
/// (not including) the reference's offset parent.
pub fn get_common_total_scroll<H: ElementHost>(
    host: &H,
    reference: Option<&H::Element>,
    reference_scroll_parents: &[H::Element],
    popper_scroll_parents: &[H::Element],
) -> ScrollOffsets {
    let non_common: Vec<H::Element> = reference_scroll_parents
        .iter()
        .filter(|node| !popper_scroll_parents.contains(*node))
        .cloned()
        .collect();

    let end = reference
        .and_then(|reference| host.offset_parent(reference))
        .and_then(|offset_parent| non_common.iter().position(|node| *node == offset_parent))
        .unwrap_or(non_common.len());

    get_total_scroll(host, &non_common[..end])
}

/// The element whose scroll ancestry a reference lives in.
///
/// Virtual references resolve to their context element, if any.
pub fn unwrap_reference<E>(reference: &Reference<E>) -> Option<&E> {
    match reference {
        Reference::Element(element) => Some(element),
        Reference::Virtual(virtual_element) => virtual_element.context_element.as_ref(),
    }
}
