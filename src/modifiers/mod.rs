//! Modifier pipeline
//!
//! A positioning pass is a sequence of modifiers run over one [`State`].
//! Each modifier declares the phase it runs in, the modifiers it needs to run
//! first, and the state fields it reads and writes. [`Pipeline::new`] orders
//! them once; [`Pipeline::run`] executes one pass.
//!
//! # Modules
//!
//! - `popper_offsets`: base popper position from placement and measures
//! - `arrow`: centers the arrow on the reference along the cross axis
//! - `styles`: CSS declarations for the computed arrow offset

pub mod arrow;
pub mod popper_offsets;
pub mod styles;

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::dom::ElementHost;
use crate::models::State;

pub use arrow::{arrow, arrow_modifier, ArrowElement, ArrowOptions, ArrowOutcome, DEFAULT_ARROW_SELECTOR};
pub use popper_offsets::{compute_offsets, popper_offsets, popper_offsets_modifier};
pub use styles::arrow_styles;

/// Pipeline phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    BeforeRead,
    Read,
    AfterRead,
    BeforeMain,
    Main,
    AfterMain,
    BeforeWrite,
    Write,
    AfterWrite,
}

/// Why a modifier left the state untouched
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum SkipReason {
    #[error("no element matches `{selector}` inside the popper")]
    NotFound { selector: String },

    #[error("\"arrow\" modifier's `element` must be a child of the popper element")]
    NotContained,
}

impl SkipReason {
    /// Whether the skip points at a configuration mistake.
    ///
    /// A missing arrow under the default selector is normal: the arrow is
    /// optional. A custom selector that matches nothing, or an element outside
    /// the popper, means the caller asked for something that isn't there.
    pub fn is_misconfiguration(&self) -> bool {
        match self {
            SkipReason::NotFound { selector } => selector != DEFAULT_ARROW_SELECTOR,
            SkipReason::NotContained => true,
        }
    }
}

/// Result of running one modifier
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ModifierOutcome {
    Applied,
    Skipped(SkipReason),
}

/// Problems found while ordering modifiers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("modifier `{modifier}` requires `{requirement}`, which is not enabled")]
    MissingRequirement {
        modifier: &'static str,
        requirement: &'static str,
    },

    #[error("modifier `{modifier}` requires `{requirement}`, which runs in a later phase")]
    PhaseOrder {
        modifier: &'static str,
        requirement: &'static str,
    },

    #[error("dependency cycle through modifier `{0}`")]
    DependencyCycle(&'static str),

    #[error("modifier `{0}` is registered twice")]
    Duplicate(&'static str),
}

type ModifierFn<H> =
    Box<dyn Fn(&mut State<<H as ElementHost>::Element>, &H) -> ModifierOutcome>;

/// A named, phased transformation of the positioning state
pub struct Modifier<H: ElementHost> {
    pub name: &'static str,
    pub enabled: bool,
    pub phase: Phase,
    /// Modifiers that must have run before this one
    pub requires: &'static [&'static str],
    /// State fields read, for auditing the data contract
    pub reads: &'static [&'static str],
    /// State fields written
    pub writes: &'static [&'static str],
    run: ModifierFn<H>,
}

impl<H: ElementHost> Modifier<H> {
    pub fn new(
        name: &'static str,
        phase: Phase,
        run: impl Fn(&mut State<H::Element>, &H) -> ModifierOutcome + 'static,
    ) -> Self {
        Self {
            name,
            enabled: true,
            phase,
            requires: &[],
            reads: &[],
            writes: &[],
            run: Box::new(run),
        }
    }

    pub fn requires(mut self, requires: &'static [&'static str]) -> Self {
        self.requires = requires;
        self
    }

    pub fn contract(mut self, reads: &'static [&'static str], writes: &'static [&'static str]) -> Self {
        self.reads = reads;
        self.writes = writes;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn run(&self, state: &mut State<H::Element>, host: &H) -> ModifierOutcome {
        (self.run)(state, host)
    }
}

impl<H: ElementHost> fmt::Debug for Modifier<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modifier")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("phase", &self.phase)
            .field("requires", &self.requires)
            .finish()
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Sort enabled modifiers by phase, each one after its requirements.
///
/// Disabled modifiers are dropped. Modifiers without a dependency between
/// them keep their registration order.
pub fn order_modifiers<H: ElementHost>(
    modifiers: Vec<Modifier<H>>,
) -> Result<Vec<Modifier<H>>, PipelineError> {
    let mut enabled: Vec<Modifier<H>> = modifiers.into_iter().filter(|m| m.enabled).collect();
    enabled.sort_by_key(|m| m.phase);

    let mut index: HashMap<&'static str, usize> = HashMap::new();
    for (i, modifier) in enabled.iter().enumerate() {
        if index.insert(modifier.name, i).is_some() {
            return Err(PipelineError::Duplicate(modifier.name));
        }
    }

    for modifier in &enabled {
        for &requirement in modifier.requires {
            let Some(&j) = index.get(requirement) else {
                return Err(PipelineError::MissingRequirement {
                    modifier: modifier.name,
                    requirement,
                });
            };
            if enabled[j].phase > modifier.phase {
                return Err(PipelineError::PhaseOrder {
                    modifier: modifier.name,
                    requirement,
                });
            }
        }
    }

    let mut marks = vec![Mark::Unvisited; enabled.len()];
    let mut order = Vec::with_capacity(enabled.len());
    for i in 0..enabled.len() {
        visit(i, &enabled, &index, &mut marks, &mut order)?;
    }

    let mut slots: Vec<Option<Modifier<H>>> = enabled.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

fn visit<H: ElementHost>(
    i: usize,
    modifiers: &[Modifier<H>],
    index: &HashMap<&'static str, usize>,
    marks: &mut [Mark],
    order: &mut Vec<usize>,
) -> Result<(), PipelineError> {
    match marks[i] {
        Mark::Done => return Ok(()),
        Mark::Visiting => return Err(PipelineError::DependencyCycle(modifiers[i].name)),
        Mark::Unvisited => {}
    }

    marks[i] = Mark::Visiting;
    for requirement in modifiers[i].requires {
        // Presence was checked by the caller
        if let Some(&j) = index.get(requirement) {
            visit(j, modifiers, index, marks, order)?;
        }
    }
    marks[i] = Mark::Done;
    order.push(i);
    Ok(())
}

/// Outcome of one modifier within a pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifierRun {
    pub name: &'static str,
    pub outcome: ModifierOutcome,
}

/// Everything that happened during one positioning pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassReport {
    pub runs: Vec<ModifierRun>,
}

impl PassReport {
    pub fn outcome(&self, name: &str) -> Option<&ModifierOutcome> {
        self.runs.iter().find(|run| run.name == name).map(|run| &run.outcome)
    }
}

/// Ordered modifiers, ready to run passes
#[derive(Debug)]
pub struct Pipeline<H: ElementHost> {
    modifiers: Vec<Modifier<H>>,
}

impl<H: ElementHost + 'static> Pipeline<H> {
    pub fn new(modifiers: Vec<Modifier<H>>) -> Result<Self, PipelineError> {
        let modifiers = order_modifiers(modifiers)?;
        log::debug!(
            "pipeline order: {:?}",
            modifiers.iter().map(|m| m.name).collect::<Vec<_>>()
        );
        Ok(Self { modifiers })
    }

    /// `popperOffsets` followed by `arrow` with the given options
    pub fn with_arrow(options: ArrowOptions<H::Element>) -> Result<Self, PipelineError> {
        Self::new(vec![arrow_modifier(options), popper_offsets_modifier()])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.modifiers.iter().map(|m| m.name).collect()
    }

    /// Run every modifier once, in order
    pub fn run(&self, state: &mut State<H::Element>, host: &H) -> PassReport {
        let mut report = PassReport::default();
        for modifier in &self.modifiers {
            log::trace!("running modifier `{}` ({:?})", modifier.name, modifier.phase);
            let outcome = modifier.run(state, host);
            report.runs.push(ModifierRun {
                name: modifier.name,
                outcome,
            });
        }
        report
    }
}

/// Log a skipped modifier according to how suspicious the skip is.
///
/// Configuration mistakes warn in debug builds only; everything else is a
/// debug-level note.
pub(crate) fn report_skip(modifier: &str, reason: &SkipReason) {
    if reason.is_misconfiguration() && cfg!(debug_assertions) {
        log::warn!("Popper: {} ({})", reason, modifier);
    } else {
        log::debug!("modifier `{}` skipped: {}", modifier, reason);
    }
}
