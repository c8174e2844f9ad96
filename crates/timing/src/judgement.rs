//! Tolerance math shared by the timing and trend judgement steps.
//!
//! Kept in this crate (rather than `suite`) because it operates purely on
//! the timing/statistics types defined here; the judgement *steps*
//! themselves, which decide a [`suite`]-level result code from these
//! numbers, live in the `suite` crate.

use crate::stats::{correlation, fit_line};

/// Combine two independent tolerance contributions the way measurement
/// uncertainties combine: in quadrature.
pub fn error_sum(a: f64, b: f64) -> f64 {
    (a * a + b * b).sqrt()
}

/// Tolerance for a single timing measurement: the larger of the testcase's
/// configured tolerance and a model-derived tolerance scaled by the
/// platform model's own spread and this testcase's expense factor.
///
/// `n` is the number of measurements the model stdev was computed over; for
/// small `n` a small-sample correction (`n/(n-1)`) widens the tolerance.
pub fn timing_tolerance(configured_tolerance: f64, model_stdev: f64, n: usize, expense: f64) -> f64 {
    let correction = if n > 2 {
        n as f64 / (n - 1) as f64
    } else {
        1.0
    };
    let model_tolerance = 3.0 * model_stdev * correction * expense;
    configured_tolerance.max(model_tolerance)
}

/// Tolerance for a trend judgement: the larger of the configured tolerance
/// and `3 * stdev` of past deltas, combined in quadrature with the model's
/// own tolerance.
pub fn trend_tolerance(configured_tolerance: f64, past_delta_stdev: f64, model_tolerance: f64) -> f64 {
    let tolerance = (3.0 * past_delta_stdev).max(configured_tolerance);
    error_sum(tolerance, model_tolerance)
}

/// Strength of a trend over a window: `gradient * window * |correlation|`.
/// A trend that doesn't correlate with time (noisy, not drifting) is
/// suppressed by the correlation factor even if the raw gradient is large.
pub fn trend_strength(series: &[f64], window: usize) -> f64 {
    let window = window.min(series.len());
    if window < 2 {
        return 0.0;
    }
    let start = series.len() - window;
    let points: Vec<(f64, f64)> = series[start..]
        .iter()
        .enumerate()
        .map(|(i, &y)| (i as f64, y))
        .collect();
    let (_, gradient) = fit_line(&points);
    let corr = correlation(&points);
    gradient * window as f64 * corr.abs()
}

/// Percent change from `from` to `to`. `0.0` if `from` is zero.
pub fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        (to - from) / from * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_sum_is_pythagorean() {
        assert!((error_sum(3.0, 4.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn timing_tolerance_widens_for_small_sample_counts() {
        let wide = timing_tolerance(1.0, 2.0, 3, 1.0);
        let narrow = timing_tolerance(1.0, 2.0, 100, 1.0);
        assert!(wide > narrow);
    }

    #[test]
    fn timing_tolerance_never_goes_below_configured() {
        assert_eq!(timing_tolerance(5.0, 0.0, 10, 1.0), 5.0);
    }

    #[test]
    fn trend_strength_of_flat_series_is_zero() {
        let series = vec![1.0; 10];
        assert_eq!(trend_strength(&series, 5), 0.0);
    }

    #[test]
    fn trend_strength_detects_a_rising_series() {
        let series: Vec<f64> = (0..20).map(|i| i as f64).collect();
        assert!(trend_strength(&series, 10) > 0.0);
    }

    #[test]
    fn percent_change_handles_zero_baseline() {
        assert_eq!(percent_change(0.0, 5.0), 0.0);
        assert!((percent_change(10.0, 12.0) - 20.0).abs() < 1e-9);
    }
}
