//! Turns a measured runtime into a persisted data point, and contributes it
//! to the suite-wide platform model.

use async_trait::async_trait;
use chrono::Utc;
use timing::TimingTestData;

use crate::{context::CaseContext, outcome::Outcome, step::Step};

/// Loads this testcase's timing history, appends the measurement taken by
/// [`crate::steps::Invocation`]/[`crate::steps::OutputObservation`], persists
/// it, and (in baseline mode) accepts a new expense baseline. Grounded on
/// the original's `TimingObservation`/`TimingTestData`.
pub struct TimingObservation;

#[async_trait]
impl Step for TimingObservation {
    fn name(&self) -> &'static str {
        "timing-observation"
    }

    async fn run(&mut self, ctx: &mut CaseContext) -> Outcome {
        let (Some(runtime_ns), Some(samples)) = (ctx.runtime_ns, ctx.samples) else {
            return Outcome::warning("no runtime/samples observation to record");
        };
        let notes = ctx.notes.unwrap_or(0);

        let mut data =
            match TimingTestData::load(&ctx.spec.runtime_csv, &ctx.spec.expense_csv) {
                Ok(d) => d,
                Err(err) => {
                    return Outcome::malfunction(format!("failed to load timing history: {err}"))
                }
            };

        let prediction_ns = ctx.suite.timings.predict_ns(samples);
        let timestamp = Utc::now().to_rfc3339();
        data.calculate_point(&timestamp, notes, samples, runtime_ns, prediction_ns);
        ctx.delta_ms = data.last_delta_ms();

        if let Err(err) = data.persist_runtime(ctx.suite.timings.timings_keep) {
            return Outcome::malfunction(format!("failed to persist timing history: {err}"));
        }

        let limit = ctx.suite.timings.baseline_avg as usize;
        match data.averaged_data_point(limit) {
            Ok(point) => ctx.suite.timings.attach(point.into()),
            Err(err) => {
                return Outcome::malfunction(format!("failed to average timing history: {err}"))
            }
        }

        if ctx.suite.baseline_mode {
            if let Err(err) = data.store_new_baseline(
                &timestamp,
                ctx.suite.timings.baseline_avg,
                ctx.suite.timings.baseline_keep,
            ) {
                return Outcome::malfunction(format!("failed to store new baseline: {err}"));
            }
            return Outcome::green("runtime recorded, new baseline accepted");
        }

        Outcome::green("runtime recorded")
    }
}
