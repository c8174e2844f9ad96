//! Classifies a testcase's measured runtime against the platform model and
//! its own history.

use async_trait::async_trait;
use timing::TimingTestData;

use crate::{context::CaseContext, outcome::Outcome, step::Step};

const SLIGHTLY_OVER_FACTOR: f64 = 1.1;

/// Judges `ctx.delta_ms` against `overallTolerance = max(local tolerance,
/// model tolerance)`, grounded on the original's `TimingJudgement`.
pub struct TimingJudgement;

#[async_trait]
impl Step for TimingJudgement {
    fn name(&self) -> &'static str {
        "timing-judgement"
    }

    async fn run(&mut self, ctx: &mut CaseContext) -> Outcome {
        let Some(delta_ms) = ctx.delta_ms else {
            return Outcome::warning("no timing observation to judge");
        };

        let Some(model) = ctx.suite.timings.platform_model() else {
            return Outcome::warning("missing calibration");
        };

        let data = match TimingTestData::load(&ctx.spec.runtime_csv, &ctx.spec.expense_csv) {
            Ok(d) => d,
            Err(err) => {
                return Outcome::malfunction(format!("failed to reload timing history: {err}"))
            }
        };
        let local_tolerance = 3.0 * data.delta_stdev();
        let configured_tolerance = ctx.spec.timing_tolerance.unwrap_or(0.0).max(local_tolerance);
        let expense = if data.current_expense() > 0.0 {
            data.current_expense()
        } else {
            1.0
        };

        let overall_tolerance = timing::timing_tolerance(
            configured_tolerance,
            model.stdev_ms,
            model.n,
            expense,
        );

        if delta_ms < -overall_tolerance {
            Outcome::warning(format!("faster than baseline; delta {delta_ms:.2}ms"))
        } else if delta_ms <= overall_tolerance {
            Outcome::green(format!("within tolerance; delta {delta_ms:.2}ms"))
        } else if delta_ms <= SLIGHTLY_OVER_FACTOR * overall_tolerance {
            Outcome::warning(format!("slightly above baseline; delta {delta_ms:.2}ms"))
        } else {
            Outcome::violation(format!("above baseline; delta {delta_ms:.2}ms"))
        }
    }
}
