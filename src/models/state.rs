//! Positioning state threaded through the modifier pipeline
//!
//! One `State` lives for one positioning pass. Upstream steps fill in the
//! measures, placement and scroll parents; modifiers add their results to
//! `modifiers_data`.

use serde::{Deserialize, Serialize};

use super::geometry::{ClientRect, Offsets, Rect};
use super::placement::{Axis, Placement};

/// Complete positioning state for one pass
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct State<E> {
    /// Placement chosen by the placement step
    #[serde(default)]
    pub placement: Placement,

    /// Resolved elements taking part in positioning
    pub elements: Elements<E>,

    /// Measured rectangles of reference and popper
    pub measures: Measures,

    /// Scrollable ancestors of reference and popper, nearest first
    #[serde(default = "ScrollParents::default")]
    pub scroll_parents: ScrollParents<E>,

    /// Per-modifier output slots
    #[serde(default)]
    pub modifiers_data: ModifiersData,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Elements<E> {
    pub reference: Reference<E>,
    pub popper: E,

    /// Set by the arrow modifier once the arrow element is resolved
    #[serde(default = "Option::default")]
    pub arrow: Option<E>,
}

/// Anchor of the popper: a real element or a bare rectangle
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Reference<E> {
    Element(E),
    Virtual(VirtualElement<E>),
}

/// Reference without a backing element (e.g. a text selection or cursor)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualElement<E> {
    pub rect: ClientRect,

    /// Element whose scroll ancestry the virtual reference lives in
    #[serde(default = "Option::default")]
    pub context_element: Option<E>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Measures {
    pub reference: Rect,
    pub popper: Rect,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScrollParents<E> {
    pub reference: Vec<E>,
    pub popper: Vec<E>,
}

impl<E> Default for ScrollParents<E> {
    fn default() -> Self {
        Self {
            reference: Vec::new(),
            popper: Vec::new(),
        }
    }
}

/// Output slots keyed by modifier name
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModifiersData {
    /// Written by `popperOffsets`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popper_offsets: Option<Offsets>,

    /// Written by `arrow`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow: Option<ArrowData>,
}

/// Arrow offset along one axis, serialized as `{ "x": n }` or `{ "y": n }`
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(try_from = "AxisValueRepr", into = "AxisValueRepr")]
pub struct ArrowData {
    pub axis: Axis,
    pub center: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy)]
struct AxisValueRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y: Option<f64>,
}

impl From<ArrowData> for AxisValueRepr {
    fn from(data: ArrowData) -> Self {
        match data.axis {
            Axis::X => AxisValueRepr { x: Some(data.center), y: None },
            Axis::Y => AxisValueRepr { x: None, y: Some(data.center) },
        }
    }
}

impl TryFrom<AxisValueRepr> for ArrowData {
    type Error = String;

    fn try_from(repr: AxisValueRepr) -> Result<Self, Self::Error> {
        match (repr.x, repr.y) {
            (Some(center), None) => Ok(ArrowData { axis: Axis::X, center }),
            (None, Some(center)) => Ok(ArrowData { axis: Axis::Y, center }),
            _ => Err("arrow data must have exactly one of `x` or `y`".to_string()),
        }
    }
}

impl<E> State<E> {
    /// Create a state for a pass with the given measures and no modifier output yet
    pub fn new(reference: Reference<E>, popper: E, measures: Measures, placement: Placement) -> Self {
        Self {
            placement,
            elements: Elements {
                reference,
                popper,
                arrow: None,
            },
            measures,
            scroll_parents: ScrollParents::default(),
            modifiers_data: ModifiersData::default(),
        }
    }

    pub fn with_scroll_parents(mut self, reference: Vec<E>, popper: Vec<E>) -> Self {
        self.scroll_parents = ScrollParents { reference, popper };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_data_serializes_single_key() {
        let data = ArrowData { axis: Axis::X, center: 90.0 };
        assert_eq!(serde_json::to_string(&data).unwrap(), r#"{"x":90.0}"#);

        let data = ArrowData { axis: Axis::Y, center: 4.5 };
        assert_eq!(serde_json::to_string(&data).unwrap(), r#"{"y":4.5}"#);
    }

    #[test]
    fn test_arrow_data_rejects_ambiguous_input() {
        assert!(serde_json::from_str::<ArrowData>(r#"{"x":1.0,"y":2.0}"#).is_err());
        assert!(serde_json::from_str::<ArrowData>("{}").is_err());

        let parsed: ArrowData = serde_json::from_str(r#"{"y":12.0}"#).unwrap();
        assert_eq!(parsed, ArrowData { axis: Axis::Y, center: 12.0 });
    }

    #[test]
    fn test_state_deserializes_from_js_shape() {
        let json = r#"{
            "placement": "left-start",
            "elements": { "reference": 1, "popper": 2 },
            "measures": {
                "reference": { "x": 0, "y": 0, "width": 100, "height": 30 },
                "popper": { "x": -50, "y": 40, "width": 200, "height": 40 }
            },
            "modifiersData": { "popperOffsets": { "x": -50, "y": 40 } }
        }"#;

        let state: State<usize> = serde_json::from_str(json).unwrap();
        assert_eq!(state.placement, Placement::LeftStart);
        assert_eq!(state.elements.reference, Reference::Element(1));
        assert_eq!(state.elements.arrow, None);
        assert_eq!(state.modifiers_data.popper_offsets, Some(Offsets::new(-50.0, 40.0)));
        assert!(state.scroll_parents.reference.is_empty());
    }

    #[test]
    fn test_state_deserializes_with_tree_handles() {
        use crate::dom::NodeId;

        let json = r#"{
            "placement": "top",
            "elements": { "reference": 1, "popper": 2 },
            "measures": {
                "reference": { "x": 0, "y": 0, "width": 100, "height": 30 },
                "popper": { "x": 0, "y": -40, "width": 100, "height": 40 }
            }
        }"#;

        let state: State<NodeId> = serde_json::from_str(json).unwrap();
        assert_eq!(state.elements.popper, NodeId(2));
        assert_eq!(state.scroll_parents, ScrollParents::default());

        let json = r#"{
            "elements": { "reference": 1, "popper": 2 },
            "measures": {
                "reference": { "x": 0, "y": 0, "width": 0, "height": 0 },
                "popper": { "x": 0, "y": 0, "width": 0, "height": 0 }
            },
            "scrollParents": { "reference": [0], "popper": [] }
        }"#;
        let state: State<NodeId> = serde_json::from_str(json).unwrap();
        assert_eq!(state.scroll_parents.reference, vec![NodeId(0)]);
    }

    #[test]
    fn test_virtual_reference_deserializes() {
        let json = r#"{ "rect": { "top": 5, "left": 6, "right": 6, "bottom": 5, "width": 0, "height": 0 }, "contextElement": 3 }"#;
        let reference: Reference<usize> = serde_json::from_str(json).unwrap();
        match reference {
            Reference::Virtual(v) => {
                assert_eq!(v.context_element, Some(3));
                assert_eq!(v.rect.left, 6.0);
            }
            Reference::Element(_) => panic!("expected virtual reference"),
        }
    }
}
