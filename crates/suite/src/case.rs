//! Runs one testcase's [`StepGraph`] start to finish, isolating a panicking
//! step the way the original isolates a panicking worker behind its
//! watchdog (`crates/smoketest/src/suite.rs`'s `run_with_watchdog`): a step
//! that panics doesn't take the whole suite down with it, it just turns
//! into a [`crate::outcome::ResCode::Debacle`] for this one case.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::{
    context::{CaseContext, SuiteContext},
    mould,
    outcome::{Outcome, ResCode, TestLog},
    step::StepGraph,
};
use testspec::TestSpec;

/// One testcase, wired up and ready to run.
pub struct Case {
    graph: StepGraph,
    ctx: CaseContext,
}

impl Case {
    /// Materialize the step graph for `spec` and wrap it with a fresh
    /// [`CaseContext`].
    pub fn new(suite: SuiteContext, spec: TestSpec) -> crate::error::Result<Self> {
        let graph = mould::materialize(&spec)?;
        let ctx = CaseContext::new(suite, spec);
        Ok(Self { graph, ctx })
    }

    /// Run every step in order, recording each outcome into the case's log.
    /// Returns the accumulated log, the worst [`ResCode`] seen, and the
    /// timing delta [`crate::steps::TimingObservation`] computed, if any.
    pub async fn run(mut self) -> (TestLog, ResCode, Option<f64>) {
        for step in self.graph.iter_mut() {
            let name = step.name();
            let outcome = match AssertUnwindSafe(step.run(&mut self.ctx)).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(payload) => Outcome::debacle(format!(
                    "step '{name}' panicked: {}",
                    panic_message(payload.as_ref())
                )),
            };
            self.ctx.record(name, outcome);
        }
        let worst = self.ctx.log.worst();
        (self.ctx.log, worst, self.ctx.delta_ms)
    }
}

/// Best-effort extraction of a human-readable message from a panic payload,
/// grounded on the original's `panic_message` helper.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Step;
    use async_trait::async_trait;
    use std::{sync::Arc, time::Duration};

    struct Panics;

    #[async_trait]
    impl Step for Panics {
        fn name(&self) -> &'static str {
            "panics"
        }

        async fn run(&mut self, _ctx: &mut CaseContext) -> Outcome {
            panic!("boom");
        }
    }

    struct Fine;

    #[async_trait]
    impl Step for Fine {
        fn name(&self) -> &'static str {
            "fine"
        }

        async fn run(&mut self, _ctx: &mut CaseContext) -> Outcome {
            Outcome::green("ok")
        }
    }

    fn suite_ctx() -> SuiteContext {
        SuiteContext {
            progress: Arc::new(progress::Progress::in_memory()),
            timings: Arc::new(timing::Timings::new(200, 50, 5)),
            patterns: Arc::new(testspec::Patterns::default()),
            default_timeout: Duration::from_secs(10),
            baseline_mode: false,
        }
    }

    fn minimal_spec(dir: &std::path::Path) -> TestSpec {
        let subject = dir.join("subject.sh");
        std::fs::write(&subject, "#!/bin/sh\n").unwrap();
        let mut raw = testspec::Spec::default();
        raw.set("Test.type", "CLI");
        raw.set("Test.subject", subject.to_string_lossy());
        TestSpec::load(&dir.join("case.test"), "stub", &raw, Duration::from_secs(10)).unwrap()
    }

    #[tokio::test]
    async fn a_panicking_step_becomes_a_debacle_without_aborting_the_case() {
        let dir = tempfile::tempdir().unwrap();
        let spec = minimal_spec(dir.path());
        let mut graph = StepGraph::new();
        graph.push(Box::new(Fine));
        graph.push(Box::new(Panics));
        graph.push(Box::new(Fine));
        let ctx = CaseContext::new(suite_ctx(), spec);
        let case = Case { graph, ctx };
        let (log, worst, _delta_ms) = case.run().await;
        assert_eq!(worst, ResCode::Debacle);
        assert_eq!(log.entries().len(), 3);
        assert_eq!(log.entries()[1].outcome.code, ResCode::Debacle);
    }
}
