//! Tears down the subject process at the end of a testcase.

use async_trait::async_trait;

use crate::{context::CaseContext, outcome::Outcome, step::Step};

/// Shuts the subject down if it's still running. A `Watcher` left in
/// `ctx.watcher` also cleans up via `Drop`, but shutting it down explicitly
/// here lets a stuck child delay just this step rather than silently
/// blocking whichever later thing drops the context.
pub struct Cleanup;

#[async_trait]
impl Step for Cleanup {
    fn name(&self) -> &'static str {
        "cleanup"
    }

    async fn run(&mut self, ctx: &mut CaseContext) -> Outcome {
        let Some(watcher) = ctx.watcher.take() else {
            return Outcome::green("nothing to clean up");
        };
        match watcher.shutdown().await {
            Ok(()) => Outcome::green("subject shut down"),
            Err(err) => Outcome::warning(format!("error shutting down subject: {err}")),
        }
    }
}
