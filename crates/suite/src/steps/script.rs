//! Feeds an optional setup script to the subject before the timed
//! invocation, waiting for its prompt after each line.

use async_trait::async_trait;
use watcher::MatchCond;

use crate::{context::CaseContext, outcome::Outcome, step::Step};

/// Drives the subject through the `Script` block of a testcase, if one was
/// given. Grounded on the original's `PrepareTestScript`, wired in only
/// when the testcase has a non-empty setup script.
pub struct PrepareScript;

#[async_trait]
impl Step for PrepareScript {
    fn name(&self) -> &'static str {
        "prepare-script"
    }

    async fn run(&mut self, ctx: &mut CaseContext) -> Outcome {
        let Some(script) = ctx.spec.setup_script.clone() else {
            return Outcome::green("no setup script configured");
        };
        let Some(watcher) = ctx.watcher.as_mut() else {
            return Outcome::malfunction("setup script ran before the subject was launched");
        };

        let prompt = ctx.suite.patterns.prompt.clone();
        let timeout = ctx.spec.timeout;
        for line in script.lines().filter(|l| !l.trim().is_empty()) {
            if let Err(err) = watcher.send_line(line) {
                return Outcome::malfunction(format!("failed to write setup line: {err}"));
            }
            let cond = MatchCond::on_pattern(prompt.clone())
                .label("subject prompt")
                .build();
            if let Err(err) = watcher.await_match(cond, timeout).await {
                return Outcome::malfunction(format!(
                    "subject did not return to its prompt after '{line}': {err}"
                ));
            }
        }
        Outcome::green("setup script completed")
    }
}
