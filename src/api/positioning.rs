//! Positioning entry points
//!
//! `computeArrow` and `runPipeline` work on a serialized state plus an
//! `ElementTree` snapshot. `positionArrow` measures the live DOM instead.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use super::helpers::{deserialize, deserialize_or_default, serialize};
use crate::dom::{ElementHost, ElementTree, NodeId, WebDom};
use crate::models::{ArrowData, Measures, ModifiersData, Placement, Rect, Reference, State};
use crate::modifiers::{arrow, arrow_styles, ArrowOptions, ArrowOutcome, PassReport, Pipeline};
use crate::{wasm_log, wasm_warn};

#[derive(Serialize)]
struct ArrowResult {
    state: State<NodeId>,
    outcome: ArrowOutcome,
}

#[derive(Serialize)]
struct PipelineResult<S> {
    state: S,
    report: PassReport,
}

/// Run only the arrow modifier over a state snapshot.
///
/// `options_js` may be `undefined`, in which case the default
/// `[data-popper-arrow]` selector is used.
#[wasm_bindgen(js_name = computeArrow)]
pub fn compute_arrow(state_js: JsValue, tree_js: JsValue, options_js: JsValue) -> Result<JsValue, JsValue> {
    let mut state: State<NodeId> = deserialize(state_js, "Failed to deserialize state")?;
    let tree: ElementTree = deserialize(tree_js, "Failed to deserialize element tree")?;
    let options: ArrowOptions<NodeId> = deserialize_or_default(options_js, "Failed to deserialize arrow options")?;

    wasm_log!("computeArrow: placement={}, {} nodes", state.placement.as_str(), tree.len());

    let outcome = arrow(&mut state, &options, &tree);
    if let ArrowOutcome::Skipped(reason) = &outcome {
        wasm_log!("  arrow skipped: {}", reason);
    }

    serialize(&ArrowResult { state, outcome }, "Failed to serialize arrow result")
}

/// Run `popperOffsets` then `arrow` over a state snapshot
#[wasm_bindgen(js_name = runPipeline)]
pub fn run_pipeline(state_js: JsValue, tree_js: JsValue, options_js: JsValue) -> Result<JsValue, JsValue> {
    let mut state: State<NodeId> = deserialize(state_js, "Failed to deserialize state")?;
    let tree: ElementTree = deserialize(tree_js, "Failed to deserialize element tree")?;
    let options: ArrowOptions<NodeId> = deserialize_or_default(options_js, "Failed to deserialize arrow options")?;

    let pipeline = Pipeline::with_arrow(options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let report = pipeline.run(&mut state, &tree);

    serialize(&PipelineResult { state, report }, "Failed to serialize pipeline result")
}

/// Measure `reference` and `popper` in the live document and compute the
/// arrow offset for `placement`.
///
/// Returns `{ state, report }` where `state` holds the modifier output slots.
/// Scroll parents are not discovered here; the measured rects are used as-is.
#[wasm_bindgen(js_name = positionArrow)]
pub fn position_arrow(
    reference: Element,
    popper: Element,
    placement_js: JsValue,
    selector: Option<String>,
) -> Result<JsValue, JsValue> {
    let placement: Placement = deserialize_or_default(placement_js, "Failed to deserialize placement")?;
    let host = WebDom::new();

    let measures = Measures {
        reference: Rect::from(host.client_rect(&reference)),
        popper: Rect::from(host.client_rect(&popper)),
    };
    let mut state = State::new(Reference::Element(reference), popper, measures, placement);

    let options = match selector {
        Some(selector) => ArrowOptions::selector(selector),
        None => ArrowOptions::default(),
    };

    let pipeline = Pipeline::with_arrow(options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let report = pipeline.run(&mut state, &host);

    if state.modifiers_data.arrow.is_none() {
        wasm_warn!("positionArrow: no arrow offset computed for placement {}", placement.as_str());
    }

    let modifiers_data: ModifiersData = state.modifiers_data;
    serialize(
        &PipelineResult { state: modifiers_data, report },
        "Failed to serialize arrow position",
    )
}

/// CSS declarations (`left`/`top`) for an arrow slot such as `{ x: 90 }`
#[wasm_bindgen(js_name = arrowStyles)]
pub fn arrow_styles_js(data_js: JsValue) -> Result<JsValue, JsValue> {
    let data: ArrowData = deserialize(data_js, "Failed to deserialize arrow data")?;
    serialize(&arrow_styles(&data), "Failed to serialize arrow styles")
}
