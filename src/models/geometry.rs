//! Geometry primitives shared by the modifiers
//!
//! All values are CSS pixels as `f64`, matching what the DOM reports.

use serde::{Deserialize, Serialize};

use super::placement::{Axis, Length};

/// Measured region in the popper's coordinate space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rectangle as returned by `getBoundingClientRect`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

/// Outer margins of an element (computed style)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Popper position, keyed by axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offsets {
    pub x: f64,
    pub y: f64,
}

/// Scroll position of one node, or a sum over several
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollOffsets {
    pub scroll_top: f64,
    pub scroll_left: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Position along an axis (`x` or `y`)
    pub fn position(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn len(&self, length: Length) -> f64 {
        match length {
            Length::Width => self.width,
            Length::Height => self.height,
        }
    }
}

impl From<ClientRect> for Rect {
    fn from(rect: ClientRect) -> Self {
        Self {
            x: rect.left,
            y: rect.top,
            width: rect.width,
            height: rect.height,
        }
    }
}

impl ClientRect {
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            top: rect.y,
            left: rect.x,
            right: rect.x + rect.width,
            bottom: rect.y + rect.height,
            width: rect.width,
            height: rect.height,
        }
    }

    pub fn len(&self, length: Length) -> f64 {
        match length {
            Length::Width => self.width,
            Length::Height => self.height,
        }
    }
}

impl Offsets {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

impl ScrollOffsets {
    pub fn new(scroll_top: f64, scroll_left: f64) -> Self {
        Self { scroll_top, scroll_left }
    }

    /// Scroll component that shifts content along `axis`
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.scroll_left,
            Axis::Y => self.scroll_top,
        }
    }
}

impl std::ops::Add for ScrollOffsets {
    type Output = ScrollOffsets;

    fn add(self, other: ScrollOffsets) -> ScrollOffsets {
        ScrollOffsets {
            scroll_top: self.scroll_top + other.scroll_top,
            scroll_left: self.scroll_left + other.scroll_left,
        }
    }
}

impl std::iter::Sum for ScrollOffsets {
    fn sum<I: Iterator<Item = ScrollOffsets>>(iter: I) -> Self {
        iter.fold(ScrollOffsets::default(), |acc, s| acc + s)
    }
}

/// Clamp `value` into `[min, max]`.
///
/// The lower bound wins when the range is inverted (arrow larger than the
/// popper), so the result is never negative for a `0` minimum.
pub fn within(min: f64, value: f64, max: f64) -> f64 {
    min.max(value.min(max))
}

/// Grow a client rect so it includes the element's margins
pub fn add_client_rect_margins(rect: ClientRect, margins: Margins) -> ClientRect {
    ClientRect {
        top: rect.top - margins.top,
        left: rect.left - margins.left,
        right: rect.right + margins.right,
        bottom: rect.bottom + margins.bottom,
        width: rect.width + margins.left + margins.right,
        height: rect.height + margins.top + margins.bottom,
    }
}
