//! The step graph: an ordered vector of boxed [`Step`] trait objects, run
//! straight through. Optional steps are simply absent from the vector
//! rather than represented by a null reference.

use async_trait::async_trait;

use crate::{context::CaseContext, outcome::Outcome};

/// One unit of work in a testcase's step graph.
#[async_trait]
pub trait Step: Send {
    /// Stable name used in log entries and reports.
    fn name(&self) -> &'static str;

    /// Perform this step's work against `ctx`, returning its outcome.
    ///
    /// A step is expected to update `ctx` with whatever downstream steps
    /// need (e.g. the launcher stores the spawned [`watcher::Watcher`]);
    /// it should not itself decide whether that constitutes case failure
    /// beyond its own outcome's severity.
    async fn run(&mut self, ctx: &mut CaseContext) -> Outcome;
}

/// An ordered sequence of steps for one testcase. Built once by
/// [`crate::mould::Mould`], then run straight through by the orchestrator.
#[derive(Default)]
pub struct StepGraph {
    steps: Vec<Box<dyn Step>>,
}

impl StepGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step.
    pub fn push(&mut self, step: Box<dyn Step>) {
        self.steps.push(step);
    }

    /// Append a step only if `include` is true, mirroring the original's
    /// `ConditionalWiring::optionally(bool)`.
    pub fn push_optional(&mut self, include: bool, step: Box<dyn Step>) {
        if include {
            self.push(step);
        }
    }

    /// Number of steps in the graph.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the graph has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Step>> {
        self.steps.iter_mut()
    }
}
