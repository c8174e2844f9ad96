//! Sends the timed invocation commandline and waits for the subject to
//! report it has finished.

use std::time::Instant;

use async_trait::async_trait;
use watcher::MatchCond;

use crate::{context::CaseContext, outcome::Outcome, step::Step};

/// Feeds [`testspec::TestSpec::invocation`] to the subject and measures the
/// wall-clock time until its `TEST::Complete` marker appears. Grounded on
/// the original's `Invocation`/`ExeLauncher::triggerTest`.
pub struct Invocation;

#[async_trait]
impl Step for Invocation {
    fn name(&self) -> &'static str {
        "invocation"
    }

    async fn run(&mut self, ctx: &mut CaseContext) -> Outcome {
        if ctx.spec.invocation.trim().is_empty() {
            return Outcome::malfunction("testcase has no Invocation commandline");
        }
        let Some(watcher) = ctx.watcher.as_mut() else {
            return Outcome::malfunction("invocation ran before the subject was launched");
        };

        let cond = MatchCond::on_pattern(ctx.suite.patterns.complete.clone())
            .label("test-complete marker")
            .build();

        let started = Instant::now();
        if let Err(err) = watcher.send_line(&ctx.spec.invocation) {
            return Outcome::malfunction(format!("failed to write invocation line: {err}"));
        }
        match watcher.await_match(cond, ctx.spec.timeout).await {
            Ok(_) => {
                ctx.runtime_ns = Some(started.elapsed().as_nanos() as f64);
                Outcome::green("invocation completed")
            }
            Err(err) => {
                if let Ok(code) = watcher.retrieve_exit_code().await {
                    ctx.exit_code = Some(code);
                    return Outcome::malfunction(format!(
                        "invocation did not complete: {err} (subject exited {code})"
                    ));
                }
                Outcome::malfunction(format!("invocation did not complete: {err}"))
            }
        }
    }
}
