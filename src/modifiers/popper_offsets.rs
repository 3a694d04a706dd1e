//! Base popper offsets
//!
//! Puts the popper flush against its base side of the reference and aligns it
//! along that side according to the placement's variation. Overflow handling
//! and flipping are left to the placement step.

use super::{Modifier, ModifierOutcome, Phase};
use crate::dom::ElementHost;
use crate::models::{BasePlacement, Offsets, Placement, Rect, State, Variation};

pub const POPPER_OFFSETS: &str = "popperOffsets";

/// Popper position for `placement`, before any adjustment
pub fn compute_offsets(reference: Rect, popper: Rect, placement: Placement) -> Offsets {
    let base = placement.base();
    let common_x = reference.x + reference.width / 2.0 - popper.width / 2.0;
    let common_y = reference.y + reference.height / 2.0 - popper.height / 2.0;

    let mut offsets = match base {
        BasePlacement::Top => Offsets::new(common_x, reference.y - popper.height),
        BasePlacement::Bottom => Offsets::new(common_x, reference.y + reference.height),
        BasePlacement::Right => Offsets::new(reference.x + reference.width, common_y),
        BasePlacement::Left => Offsets::new(reference.x - popper.width, common_y),
    };

    let axis = base.axis();
    let len = axis.length();
    let shift = reference.len(len) / 2.0 - popper.len(len) / 2.0;

    match placement.variation() {
        Some(Variation::Start) => offsets.set(axis, offsets.get(axis) - shift),
        Some(Variation::End) => offsets.set(axis, offsets.get(axis) + shift),
        None => {}
    }

    offsets
}

/// Write `modifiers_data.popper_offsets` from the measures and placement
pub fn popper_offsets<E>(state: &mut State<E>) -> ModifierOutcome {
    let offsets = compute_offsets(state.measures.reference, state.measures.popper, state.placement);
    state.modifiers_data.popper_offsets = Some(offsets);
    ModifierOutcome::Applied
}

pub fn popper_offsets_modifier<H: ElementHost + 'static>() -> Modifier<H> {
    Modifier::new(POPPER_OFFSETS, Phase::Read, |state, _host| popper_offsets(state)).contract(
        &["placement", "measures.reference", "measures.popper"],
        &["modifiersData.popperOffsets"],
    )
}
