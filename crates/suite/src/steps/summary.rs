//! Finalizes a testcase by logging its worst outcome so far.

use async_trait::async_trait;

use crate::{context::CaseContext, outcome::Outcome, step::Step};

/// Reports the worst [`crate::outcome::ResCode`] recorded for this testcase,
/// grounded on the original's `Conclusion` step.
pub struct Summary;

#[async_trait]
impl Step for Summary {
    fn name(&self) -> &'static str {
        "summary"
    }

    async fn run(&mut self, ctx: &mut CaseContext) -> Outcome {
        let worst = ctx.log.worst();
        ctx.suite
            .progress
            .note(format!("{}: concluded as {worst}", ctx.spec.topic));
        Outcome::green(format!("concluded as {worst}"))
    }
}
