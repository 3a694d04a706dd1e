//! Placement tokens and the axis bookkeeping derived from them
//!
//! A placement names the side of the reference the popper sits on, plus an
//! optional alignment along that side. Everything downstream only needs the
//! base side and the axis it implies.

use serde::{Deserialize, Serialize};

/// Full placement token, as written in configuration and state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    Top,
    TopStart,
    TopEnd,
    #[default]
    Bottom,
    BottomStart,
    BottomEnd,
    Left,
    LeftStart,
    LeftEnd,
    Right,
    RightStart,
    RightEnd,
}

/// One of the four cardinal sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasePlacement {
    Top,
    Bottom,
    Left,
    Right,
}

/// Alignment of the popper along its base side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variation {
    Start,
    End,
}

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// Rectangle dimension that runs along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Length {
    Width,
    Height,
}

impl Placement {
    pub const ALL: [Placement; 12] = [
        Placement::Top,
        Placement::TopStart,
        Placement::TopEnd,
        Placement::Bottom,
        Placement::BottomStart,
        Placement::BottomEnd,
        Placement::Left,
        Placement::LeftStart,
        Placement::LeftEnd,
        Placement::Right,
        Placement::RightStart,
        Placement::RightEnd,
    ];

    /// The side of the reference this placement puts the popper on
    pub fn base(self) -> BasePlacement {
        match self {
            Placement::Top | Placement::TopStart | Placement::TopEnd => BasePlacement::Top,
            Placement::Bottom | Placement::BottomStart | Placement::BottomEnd => BasePlacement::Bottom,
            Placement::Left | Placement::LeftStart | Placement::LeftEnd => BasePlacement::Left,
            Placement::Right | Placement::RightStart | Placement::RightEnd => BasePlacement::Right,
        }
    }

    pub fn variation(self) -> Option<Variation> {
        match self {
            Placement::TopStart
            | Placement::BottomStart
            | Placement::LeftStart
            | Placement::RightStart => Some(Variation::Start),
            Placement::TopEnd
            | Placement::BottomEnd
            | Placement::LeftEnd
            | Placement::RightEnd => Some(Variation::End),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Placement::Top => "top",
            Placement::TopStart => "top-start",
            Placement::TopEnd => "top-end",
            Placement::Bottom => "bottom",
            Placement::BottomStart => "bottom-start",
            Placement::BottomEnd => "bottom-end",
            Placement::Left => "left",
            Placement::LeftStart => "left-start",
            Placement::LeftEnd => "left-end",
            Placement::Right => "right",
            Placement::RightStart => "right-start",
            Placement::RightEnd => "right-end",
        }
    }
}

impl BasePlacement {
    /// Axis the popper slides along while staying on this side.
    ///
    /// Top/bottom poppers slide horizontally, so this is `x` for them and `y`
    /// for left/right. It is the cross axis relative to the direction the
    /// popper is pushed away from the reference, and the axis the arrow is
    /// centered on.
    pub fn axis(self) -> Axis {
        match self {
            BasePlacement::Top | BasePlacement::Bottom => Axis::X,
            BasePlacement::Left | BasePlacement::Right => Axis::Y,
        }
    }
}

impl Axis {
    /// Rectangle dimension measured along this axis
    pub fn length(self) -> Length {
        match self {
            Axis::X => Length::Width,
            Axis::Y => Length::Height,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}
