//! Classifies a captured probe against its baseline waveform.

use async_trait::async_trait;
use sound::Probe;

use crate::{context::CaseContext, outcome::Outcome, step::Step};

/// Diffs `ctx.probe` against the testcase's baseline WAV and classifies the
/// residual, grounded on the original's `SoundJudgement`.
pub struct SoundJudgement;

#[async_trait]
impl Step for SoundJudgement {
    fn name(&self) -> &'static str {
        "sound-judgement"
    }

    async fn run(&mut self, ctx: &mut CaseContext) -> Outcome {
        if !ctx.spec.capture_sound {
            return Outcome::green("testcase does not capture sound");
        }
        let Some(probe) = ctx.probe.as_ref() else {
            return Outcome::malfunction("sound judgement ran before a probe was captured");
        };
        let Some(baseline_path) = ctx.spec.baseline.as_ref() else {
            return Outcome::violation("baseline not present");
        };
        if !baseline_path.exists() {
            return Outcome::violation(format!(
                "baseline not present: {}",
                baseline_path.display()
            ));
        }

        let baseline = match Probe::load_wav(baseline_path) {
            Ok(b) => b,
            Err(err) => {
                return Outcome::malfunction(format!(
                    "failed to read baseline {}: {err}",
                    baseline_path.display()
                ))
            }
        };
        let residual = match probe.diff(&baseline) {
            Ok(r) => r,
            Err(err) => return Outcome::violation(format!("probe vs. baseline mismatch: {err}")),
        };

        let tolerance_db = ctx.spec.sound_tolerance_db.unwrap_or(0.0);
        let peak = residual.peak_rms_db;
        ctx.residual = Some(residual);

        let mut outcome = if peak < sound::DIFF_WARN_LEVEL_DB + tolerance_db {
            Outcome::green(format!("residual peak {peak:.1} dB, within numeric noise"))
        } else if peak < sound::DIFF_ERROR_LEVEL_DB + tolerance_db {
            Outcome::warning(format!("residual peak {peak:.1} dB against baseline"))
        } else {
            Outcome::violation(format!("residual peak {peak:.1} dB against baseline"))
        };

        if probe.is_faint() {
            let level = probe.avg_level_db();
            let faint = Outcome::warning(format!("faint probe, average level {level:.1} dBFS"));
            if faint.code > outcome.code {
                outcome = faint;
            }
        }
        outcome
    }
}
