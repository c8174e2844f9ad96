//! Loads the raw PCM the subject wrote during the timed invocation into a
//! sound probe, when this testcase captures sound at all.

use async_trait::async_trait;
use sound::Probe;

use crate::{context::CaseContext, outcome::Outcome, step::Step};

/// Reads `TestSpec::probe_path` into `ctx.probe`, grounded on the original's
/// `SoundObservation`/`SoundProbe::buildDiff` split (the load half; the diff
/// itself happens in [`crate::steps::SoundJudgement`]).
pub struct SoundObservation;

#[async_trait]
impl Step for SoundObservation {
    fn name(&self) -> &'static str {
        "sound-observation"
    }

    async fn run(&mut self, ctx: &mut CaseContext) -> Outcome {
        match Probe::load_raw(&ctx.spec.probe_path, ctx.spec.sample_rate) {
            Ok(probe) => {
                let level = probe.peak_level_db();
                ctx.probe = Some(probe);
                Outcome::green(format!("captured probe, peak level {level:.1} dBFS"))
            }
            Err(err) => Outcome::malfunction(format!(
                "failed to read probe at {}: {err}",
                ctx.spec.probe_path.display()
            )),
        }
    }
}
