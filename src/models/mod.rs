//! Models module for the positioning engine
//!
//! This module contains the data models shared by the element hosts and
//! the modifier pipeline: placements, geometry and the per-pass state.

pub mod geometry;
pub mod placement;
pub mod state;

// Re-export commonly used types
pub use geometry::*;
pub use placement::*;
pub use state::*;
