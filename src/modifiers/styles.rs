//! CSS for the arrow offset
//!
//! The arrow modifier only computes a number. The rendering side positions the
//! arrow with `left` (horizontal arrows) or `top` (vertical arrows).

use std::collections::BTreeMap;

use crate::models::{ArrowData, Axis};

pub fn arrow_styles(data: &ArrowData) -> BTreeMap<&'static str, String> {
    let property = match data.axis {
        Axis::X => "left",
        Axis::Y => "top",
    };

    let mut styles = BTreeMap::new();
    styles.insert(property, format!("{}px", data.center));
    styles
}
