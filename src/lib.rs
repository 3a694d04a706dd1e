//! Popper Positioning WASM Module
//!
//! Positioning helpers for floating elements (tooltips, popovers). The
//! modifier pipeline takes measured reference/popper geometry and a
//! placement, and the arrow modifier centers the popper's arrow on the
//! reference without letting it leave the popper.

pub mod api;
pub mod dom;
pub mod models;
pub mod modifiers;

// Re-export commonly used types
pub use dom::{ElementHost, ElementTree, Node, NodeId, WebDom};
pub use models::*;
pub use modifiers::{
    arrow, ArrowElement, ArrowOptions, ArrowOutcome, Modifier, ModifierOutcome, PassReport, Phase,
    Pipeline, PipelineError, SkipReason,
};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize logger");

    log::info!("Popper positioning WASM module initialized");
}
