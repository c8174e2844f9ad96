//! Spawns the subject and waits for its startup banner.

use async_trait::async_trait;
use watcher::{MatchCond, ProcessConfig, Watcher};

use crate::{context::CaseContext, outcome::Outcome, step::Step};

/// Launches the subject executable and waits for it to announce it's
/// ready, grounded on the original's `ExeLauncher`.
pub struct Launcher;

#[async_trait]
impl Step for Launcher {
    fn name(&self) -> &'static str {
        "launcher"
    }

    async fn run(&mut self, ctx: &mut CaseContext) -> Outcome {
        let config = ProcessConfig::new(ctx.spec.subject.as_path(), ctx.spec.arguments.clone())
            .with_working_dir(ctx.spec.case_dir.as_path());

        let mut watcher = match Watcher::launch(&config, ctx.suite.progress.clone()) {
            Ok(w) => w,
            Err(err) => return Outcome::malfunction(format!("failed to launch subject: {err}")),
        };

        let cond = MatchCond::on_pattern(ctx.suite.patterns.ready.clone())
            .label("subject ready banner")
            .build();
        if let Err(err) = watcher.await_match(cond, ctx.spec.timeout).await {
            return Outcome::malfunction(format!("subject never became ready: {err}"));
        }

        ctx.watcher = Some(watcher);
        Outcome::green("subject launched and ready")
    }
}
