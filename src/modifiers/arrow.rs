//! Arrow alignment
//!
//! Centers the arrow element on the reference along the popper's cross axis,
//! clamped so the arrow never leaves the popper. Runs in the main phase, after
//! `popperOffsets` has written the popper position.

use serde::{Deserialize, Serialize};

use super::{report_skip, Modifier, ModifierOutcome, Phase, SkipReason};
use crate::dom::{get_common_total_scroll, unwrap_reference, ElementHost};
use crate::models::{add_client_rect_margins, within, ArrowData, Offsets, State};

pub const ARROW: &str = "arrow";

/// Selector used when no arrow element is configured
pub const DEFAULT_ARROW_SELECTOR: &str = "[data-popper-arrow]";

/// Where to find the arrow: a selector scoped to the popper, or the element itself
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ArrowElement<E> {
    BySelector(String),
    ByHandle(E),
}

impl<E> Default for ArrowElement<E> {
    fn default() -> Self {
        ArrowElement::BySelector(DEFAULT_ARROW_SELECTOR.to_string())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ArrowOptions<E> {
    #[serde(default = "ArrowElement::default")]
    pub element: ArrowElement<E>,
}

impl<E> Default for ArrowOptions<E> {
    fn default() -> Self {
        Self {
            element: ArrowElement::default(),
        }
    }
}

impl<E> ArrowOptions<E> {
    pub fn selector(selector: impl Into<String>) -> Self {
        Self {
            element: ArrowElement::BySelector(selector.into()),
        }
    }

    pub fn handle(element: E) -> Self {
        Self {
            element: ArrowElement::ByHandle(element),
        }
    }
}

/// What the arrow modifier did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ArrowOutcome {
    /// Offset written to `modifiers_data.arrow`
    Computed(ArrowData),
    /// State left as it was
    Skipped(SkipReason),
}

impl From<ArrowOutcome> for ModifierOutcome {
    fn from(outcome: ArrowOutcome) -> Self {
        match outcome {
            ArrowOutcome::Computed(_) => ModifierOutcome::Applied,
            ArrowOutcome::Skipped(reason) => ModifierOutcome::Skipped(reason),
        }
    }
}

/// Compute the arrow offset for the current pass.
///
/// Reads `elements`, `placement`, `measures`, `scroll_parents` and
/// `modifiers_data.popper_offsets`. Writes `elements.arrow` and
/// `modifiers_data.arrow`, and nothing at all when the arrow cannot be
/// resolved.
pub fn arrow<H: ElementHost>(
    state: &mut State<H::Element>,
    options: &ArrowOptions<H::Element>,
    host: &H,
) -> ArrowOutcome {
    let popper_element = &state.elements.popper;

    let arrow_element = match &options.element {
        ArrowElement::BySelector(selector) => match host.query_selector(popper_element, selector) {
            Some(element) => element,
            None => {
                return skip(SkipReason::NotFound {
                    selector: selector.clone(),
                })
            }
        },
        ArrowElement::ByHandle(element) => element.clone(),
    };

    if !host.contains(popper_element, &arrow_element) {
        return skip(SkipReason::NotContained);
    }

    let arrow_rect = add_client_rect_margins(host.client_rect(&arrow_element), host.margins(&arrow_element));
    state.elements.arrow = Some(arrow_element);

    let popper_offsets = state.modifiers_data.popper_offsets.unwrap_or_else(|| {
        log::warn!("arrow: popper offsets missing, did `popperOffsets` run?");
        Offsets::default()
    });

    let axis = state.placement.base().axis();
    let len = axis.length();

    let common_total_scroll = get_common_total_scroll(
        host,
        unwrap_reference(&state.elements.reference),
        &state.scroll_parents.reference,
        &state.scroll_parents.popper,
    );

    let reference = state.measures.reference;
    let popper = state.measures.popper;

    let end_diff = reference.len(len) + reference.position(axis) - popper_offsets.get(axis) - popper.len(len);
    let start_diff = popper_offsets.get(axis) - reference.position(axis);

    // Only center to the reference when the popper is longer than it along the axis
    let center_to_reference = if popper.len(len) > reference.len(len) {
        end_diff / 2.0 - start_diff / 2.0 - common_total_scroll.along(axis)
    } else {
        0.0
    };

    let center = popper.len(len) / 2.0 - arrow_rect.len(len) / 2.0 + center_to_reference;

    // Keep the arrow inside the popper even when the reference is far off-center
    let center = within(0.0, center, popper.len(len) - arrow_rect.len(len));

    let data = ArrowData { axis, center };
    state.modifiers_data.arrow = Some(data);

    log::debug!("arrow: {} = {}", axis.as_str(), center);
    ArrowOutcome::Computed(data)
}

fn skip(reason: SkipReason) -> ArrowOutcome {
    report_skip(ARROW, &reason);
    ArrowOutcome::Skipped(reason)
}

/// Pipeline entry for [`arrow`]
pub fn arrow_modifier<H: ElementHost + 'static>(options: ArrowOptions<H::Element>) -> Modifier<H> {
    Modifier::new(ARROW, Phase::Main, move |state, host| arrow(state, &options, host).into())
        .requires(&[super::popper_offsets::POPPER_OFFSETS])
        .contract(
            &[
                "elements.popper",
                "elements.reference",
                "placement",
                "measures",
                "scrollParents",
                "modifiersData.popperOffsets",
            ],
            &["elements.arrow", "modifiersData.arrow"],
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementTree, Node, NodeId};
    use crate::models::{Axis, Measures, Placement, Rect, Reference};

    struct Fixture {
        tree: ElementTree,
        popper: NodeId,
        arrow: NodeId,
        reference: NodeId,
    }

    fn create_fixture(arrow_rect: Rect) -> Fixture {
        let mut tree = ElementTree::new();
        let body = tree.append(None, Node::new("body"));
        let reference = tree.append(Some(body), Node::new("button"));
        let popper = tree.append(Some(body), Node::new("div").with_class("tooltip"));
        let arrow = tree.append(
            Some(popper),
            Node::new("div")
                .with_attribute("data-popper-arrow", "")
                .with_rect(arrow_rect),
        );
        Fixture {
            tree,
            popper,
            arrow,
            reference,
        }
    }

    fn create_state(fixture: &Fixture, popper_width: f64, placement: Placement) -> State<NodeId> {
        let measures = Measures {
            reference: Rect::new(0.0, 0.0, 100.0, 30.0),
            popper: Rect::new(-50.0, 40.0, popper_width, 40.0),
        };
        let mut state = State::new(Reference::Element(fixture.reference), fixture.popper, measures, placement);
        state.modifiers_data.popper_offsets = Some(Offsets::new(-50.0, 40.0));
        state
    }

    #[test]
    fn test_bottom_placement_centers_on_reference() {
        let fixture = create_fixture(Rect::new(0.0, 0.0, 20.0, 10.0));
        let mut state = create_state(&fixture, 200.0, Placement::Bottom);

        let outcome = arrow(&mut state, &ArrowOptions::default(), &fixture.tree);

        let expected = ArrowData { axis: Axis::X, center: 90.0 };
        assert_eq!(outcome, ArrowOutcome::Computed(expected));
        assert_eq!(state.modifiers_data.arrow, Some(expected));
        assert_eq!(state.elements.arrow, Some(fixture.arrow));
    }

    #[test]
    fn test_equal_lengths_skip_correction() {
        let fixture = create_fixture(Rect::new(0.0, 0.0, 20.0, 10.0));
        let mut state = create_state(&fixture, 100.0, Placement::Bottom);

        arrow(&mut state, &ArrowOptions::default(), &fixture.tree);
        assert_eq!(state.modifiers_data.arrow, Some(ArrowData { axis: Axis::X, center: 40.0 }));
    }

    #[test]
    fn test_margins_count_toward_arrow_size() {
        let mut fixture = create_fixture(Rect::new(0.0, 0.0, 20.0, 10.0));
        fixture.tree.get_mut(fixture.arrow).unwrap().margins = crate::models::Margins {
            top: 0.0,
            right: 5.0,
            bottom: 0.0,
            left: 5.0,
        };
        let mut state = create_state(&fixture, 100.0, Placement::Bottom);

        arrow(&mut state, &ArrowOptions::default(), &fixture.tree);
        // (100 - 30) / 2
        assert_eq!(state.modifiers_data.arrow.map(|a| a.center), Some(35.0));
    }

    #[test]
    fn test_selector_miss_leaves_state_untouched() {
        let fixture = create_fixture(Rect::new(0.0, 0.0, 20.0, 10.0));
        let mut state = create_state(&fixture, 200.0, Placement::Bottom);
        let before = state.clone();

        let outcome = arrow(&mut state, &ArrowOptions::selector(".caret"), &fixture.tree);

        assert_eq!(
            outcome,
            ArrowOutcome::Skipped(SkipReason::NotFound {
                selector: ".caret".to_string()
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_selector_with_combinators_finds_arrow() {
        let fixture = create_fixture(Rect::new(0.0, 0.0, 20.0, 10.0));

        for selector in [
            ".tooltip > [data-popper-arrow]",
            "div [data-popper-arrow]",
            "body .tooltip > div",
            ".caret, [data-popper-arrow]",
        ] {
            let mut state = create_state(&fixture, 200.0, Placement::Bottom);
            let outcome = arrow(&mut state, &ArrowOptions::selector(selector), &fixture.tree);
            assert_eq!(
                outcome,
                ArrowOutcome::Computed(ArrowData { axis: Axis::X, center: 90.0 }),
                "selector {}",
                selector
            );
            assert_eq!(state.elements.arrow, Some(fixture.arrow));
        }
    }

    #[test]
    fn test_handle_outside_popper_leaves_state_untouched() {
        let fixture = create_fixture(Rect::new(0.0, 0.0, 20.0, 10.0));
        let mut state = create_state(&fixture, 200.0, Placement::Bottom);
        let before = state.clone();

        let outcome = arrow(&mut state, &ArrowOptions::handle(fixture.reference), &fixture.tree);

        assert_eq!(outcome, ArrowOutcome::Skipped(SkipReason::NotContained));
        assert_eq!(state, before);
    }

    #[test]
    fn test_handle_inside_popper() {
        let fixture = create_fixture(Rect::new(0.0, 0.0, 20.0, 10.0));
        let mut state = create_state(&fixture, 200.0, Placement::Top);

        let outcome = arrow(&mut state, &ArrowOptions::handle(fixture.arrow), &fixture.tree);
        assert_eq!(outcome, ArrowOutcome::Computed(ArrowData { axis: Axis::X, center: 90.0 }));
    }

    #[test]
    fn test_left_placement_uses_height() {
        let fixture = create_fixture(Rect::new(0.0, 0.0, 10.0, 8.0));
        let measures = Measures {
            reference: Rect::new(0.0, 0.0, 100.0, 30.0),
            popper: Rect::new(-120.0, -5.0, 120.0, 40.0),
        };
        let mut state = State::new(Reference::Element(fixture.reference), fixture.popper, measures, Placement::Left);
        state.modifiers_data.popper_offsets = Some(Offsets::new(-120.0, -5.0));

        arrow(&mut state, &ArrowOptions::default(), &fixture.tree);

        // end = 30 + 0 + 5 - 40 = -5, start = -5, correction 0, center = 20 - 4
        assert_eq!(state.modifiers_data.arrow, Some(ArrowData { axis: Axis::Y, center: 16.0 }));
    }

    #[test]
    fn test_scroll_correction_applies_on_axis() {
        let mut fixture = create_fixture(Rect::new(0.0, 0.0, 20.0, 10.0));
        let scroller = fixture.tree.append(None, Node::new("div").with_scroll(3.0, 12.0));
        let mut state = create_state(&fixture, 200.0, Placement::Bottom)
            .with_scroll_parents(vec![scroller], vec![]);

        arrow(&mut state, &ArrowOptions::default(), &fixture.tree);
        // scrollLeft is subtracted from the x correction: 90 - 12
        assert_eq!(state.modifiers_data.arrow.map(|a| a.center), Some(78.0));
    }

    #[test]
    fn test_scroll_correction_uses_scroll_top_on_vertical_axis() {
        let mut fixture = create_fixture(Rect::new(0.0, 0.0, 10.0, 10.0));
        let scroller = fixture.tree.append(None, Node::new("div").with_scroll(6.0, 100.0));
        let measures = Measures {
            reference: Rect::new(0.0, 0.0, 100.0, 30.0),
            popper: Rect::new(100.0, -15.0, 120.0, 60.0),
        };
        let mut state = State::new(Reference::Element(fixture.reference), fixture.popper, measures, Placement::Right)
            .with_scroll_parents(vec![scroller], vec![]);
        state.modifiers_data.popper_offsets = Some(Offsets::new(100.0, -15.0));

        arrow(&mut state, &ArrowOptions::default(), &fixture.tree);

        // end = 30 + 0 + 15 - 60 = -15, start = -15, correction = -6 (scrollTop only)
        // center = 30 - 5 - 6
        assert_eq!(state.modifiers_data.arrow, Some(ArrowData { axis: Axis::Y, center: 19.0 }));
    }

    #[test]
    fn test_clamped_to_popper_bounds() {
        let fixture = create_fixture(Rect::new(0.0, 0.0, 20.0, 10.0));
        let mut state = create_state(&fixture, 200.0, Placement::Bottom);
        // Popper pushed far right of the reference
        state.modifiers_data.popper_offsets = Some(Offsets::new(400.0, 40.0));

        arrow(&mut state, &ArrowOptions::default(), &fixture.tree);
        assert_eq!(state.modifiers_data.arrow.map(|a| a.center), Some(0.0));

        state.modifiers_data.popper_offsets = Some(Offsets::new(-400.0, 40.0));
        arrow(&mut state, &ArrowOptions::default(), &fixture.tree);
        assert_eq!(state.modifiers_data.arrow.map(|a| a.center), Some(180.0));
    }

    #[test]
    fn test_zero_sized_geometry() {
        let fixture = create_fixture(Rect::default());
        let mut state = State::new(
            Reference::Element(fixture.reference),
            fixture.popper,
            Measures::default(),
            Placement::Right,
        );
        state.modifiers_data.popper_offsets = Some(Offsets::default());

        let outcome = arrow(&mut state, &ArrowOptions::default(), &fixture.tree);
        assert_eq!(outcome, ArrowOutcome::Computed(ArrowData { axis: Axis::Y, center: 0.0 }));
    }

    #[test]
    fn test_missing_popper_offsets_does_not_panic() {
        let fixture = create_fixture(Rect::new(0.0, 0.0, 20.0, 10.0));
        let mut state = create_state(&fixture, 100.0, Placement::Bottom);
        state.modifiers_data.popper_offsets = None;

        let outcome = arrow(&mut state, &ArrowOptions::default(), &fixture.tree);
        assert!(matches!(outcome, ArrowOutcome::Computed(_)));
    }

    #[test]
    fn test_options_deserialize_selector_or_handle() {
        let options: ArrowOptions<NodeId> = serde_json::from_str(r#"{ "element": ".caret" }"#).unwrap();
        assert_eq!(options, ArrowOptions::selector(".caret"));

        let options: ArrowOptions<NodeId> = serde_json::from_str(r#"{ "element": 3 }"#).unwrap();
        assert_eq!(options, ArrowOptions::handle(NodeId(3)));

        let options: ArrowOptions<NodeId> = serde_json::from_str("{}").unwrap();
        assert_eq!(options.element, ArrowElement::BySelector(DEFAULT_ARROW_SELECTOR.to_string()));
    }
}
