//! Test case construction (Mould), step graph, per-step judgements and
//! suite-wide orchestration for the acceptance testsuite.
//!
//! Layering, grounded on the original's `setup`/`suite` split:
//! [`mould`] turns a resolved [`testspec::TestSpec`] into a [`StepGraph`];
//! [`case`] runs one graph to completion, isolating a panicking step;
//! [`orchestrator`] walks a suite directory, builds and runs every
//! testcase, then judges the suite-wide timing trend.

#![warn(missing_docs)]

mod case;
mod context;
mod error;
mod mould;
mod orchestrator;
mod outcome;
mod step;
mod steps;
mod trend;

pub use case::Case;
pub use context::{CaseContext, SuiteContext};
pub use error::{Error, Result};
pub use mould::materialize;
pub use orchestrator::{run, RunConfig, RunReport};
pub use outcome::{LogEntry, Outcome, ResCode, TestLog};
pub use step::{Step, StepGraph};
pub use trend::observe_and_judge;
