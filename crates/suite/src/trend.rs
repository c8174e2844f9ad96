//! Suite-wide trend judgement over averaged per-run timing deltas.
//!
//! Unlike the per-testcase steps in [`crate::steps`], this runs once per
//! suite invocation rather than once per testcase, so it doesn't implement
//! [`crate::step::Step`]; the orchestrator calls it directly after every
//! case has reported its `delta_ms`.

use timing::SuiteStatistics;

use crate::outcome::Outcome;

/// Record this run's suite-wide average delta and judge whether a
/// systematic trend is emerging, grounded on the original's
/// `TrendObservation`/`TrendJudgement` (a heuristic the original itself
/// documents as still evolving).
pub fn observe_and_judge(
    stats: &mut SuiteStatistics,
    average_delta_ms: f64,
    configured_tolerance: f64,
    model_tolerance: f64,
) -> Outcome {
    stats.record(average_delta_ms);
    let past_stdev = timing::stdev(&stats.delta_series);
    let tolerance = timing::trend_tolerance(configured_tolerance, past_stdev, model_tolerance);
    let short = stats.short_term_trend();
    let long = stats.long_term_trend();
    let strongest = short.abs().max(long.abs());

    if strongest > tolerance {
        Outcome::warning(format!(
            "suite-wide timing trend detected: short={short:.3} long={long:.3} (tolerance {tolerance:.3})"
        ))
    } else {
        Outcome::green(format!("suite-wide timing stable: short={short:.3} long={long:.3}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_history_stays_green() {
        let mut stats = SuiteStatistics::new(5, 20);
        for _ in 0..10 {
            stats.record(0.0);
        }
        let outcome = observe_and_judge(&mut stats, 0.0, 1.0, 0.0);
        assert_eq!(outcome.code, crate::outcome::ResCode::Green);
    }

    #[test]
    fn a_strong_drift_warns() {
        let mut stats = SuiteStatistics::new(5, 20);
        for i in 0..30 {
            stats.record(i as f64 * 5.0);
        }
        let outcome = observe_and_judge(&mut stats, 150.0, 0.1, 0.0);
        assert_eq!(outcome.code, crate::outcome::ResCode::Warning);
    }
}
