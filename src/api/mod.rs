//! Popper positioning WASM API
//!
//! This module provides the JavaScript-facing API. State and element-tree
//! snapshots come in as plain JS objects and are converted with
//! `serde-wasm-bindgen`; results go back the same way.
//!
//! # Module Structure
//!
//! - `helpers`: console logging and serde conversions with error reporting
//! - `positioning`: arrow and pipeline entry points

pub mod helpers;
pub mod positioning;

pub use positioning::{arrow_styles_js, compute_arrow, position_arrow, run_pipeline};
