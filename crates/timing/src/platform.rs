//! Linear platform timing model: `runtime ≈ socket + speed * samples`.
//!
//! Fitted across every testcase's measurements at once, after normalizing
//! out each case's own expense factor, so a handful of unusually cheap or
//! expensive tests don't skew the line that every other test is judged
//! against.

use crate::{
    error::{Error, Result},
    stats::{fit_line, stdev},
};

/// One timing observation contributed to the platform-wide fit.
#[derive(Debug, Clone, Copy)]
pub struct DataPoint {
    /// Sample count processed by the invocation this point describes.
    pub samples: f64,
    /// Measured wall-clock runtime, in milliseconds.
    pub runtime_ms: f64,
    /// This testcase's baseline expense factor (1.0 if it has none yet).
    pub expense: f64,
}

/// `runtime_ms ≈ socket_ms + speed_ms_per_sample * samples`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformModel {
    /// Fixed per-invocation overhead, in milliseconds.
    pub socket_ms: f64,
    /// Marginal cost per sample, in milliseconds.
    pub speed_ms_per_sample: f64,
    /// Sample standard deviation of the fit residuals (`y - predict_ms(x)`),
    /// in milliseconds. Feeds `timing::timing_tolerance`'s model term.
    pub stdev_ms: f64,
    /// Number of data points the fit (and `stdev_ms`) were computed over.
    pub n: usize,
}

impl PlatformModel {
    /// Predict the runtime, in milliseconds, for `samples` samples.
    pub fn predict_ms(&self, samples: f64) -> f64 {
        self.socket_ms + self.speed_ms_per_sample * samples
    }

    /// Fit a model from observations, normalizing each point by its
    /// testcase's expense factor before the regression so that
    /// `y = runtime/expense` is fit against `x = samples`.
    ///
    /// Needs at least two distinct sample counts to produce a meaningful
    /// line; otherwise the slope is underdetermined.
    pub fn fit(points: &[DataPoint]) -> Result<Self> {
        let distinct_samples: std::collections::BTreeSet<u64> = points
            .iter()
            .map(|p| p.samples.round() as u64)
            .collect();
        if distinct_samples.len() < 2 {
            return Err(Error::InsufficientData(distinct_samples.len()));
        }

        let normalized: Vec<(f64, f64)> = points
            .iter()
            .map(|p| {
                let expense = if p.expense > 0.0 { p.expense } else { 1.0 };
                (p.samples, p.runtime_ms / expense)
            })
            .collect();

        let (intercept, slope) = fit_line(&normalized);
        let residuals: Vec<f64> = normalized
            .iter()
            .map(|(x, y)| y - (intercept + slope * x))
            .collect();
        Ok(Self {
            socket_ms: intercept,
            speed_ms_per_sample: slope,
            stdev_ms: stdev(&residuals),
            n: normalized.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(samples: f64, runtime_ms: f64, expense: f64) -> DataPoint {
        DataPoint {
            samples,
            runtime_ms,
            expense,
        }
    }

    #[test]
    fn recovers_an_exact_linear_model() {
        let points: Vec<DataPoint> = (1..=20)
            .map(|i| point(i as f64 * 1000.0, 5.0 + 0.01 * i as f64 * 1000.0, 1.0))
            .collect();
        let model = PlatformModel::fit(&points).unwrap();
        assert!((model.socket_ms - 5.0).abs() < 1e-6);
        assert!((model.speed_ms_per_sample - 0.01).abs() < 1e-6);
    }

    #[test]
    fn normalizes_out_per_case_expense_before_fitting() {
        let cheap = point(1000.0, 10.0, 0.5);
        let pricey = point(1000.0, 40.0, 2.0);
        let baseline: Vec<DataPoint> = (1..=10)
            .map(|i| point(i as f64 * 2000.0, 20.0 * i as f64, 1.0))
            .collect();
        let mut points = baseline;
        points.push(cheap);
        points.push(pricey);
        let model = PlatformModel::fit(&points).unwrap();
        assert!(model.speed_ms_per_sample > 0.0);
    }

    #[test]
    fn a_single_distinct_sample_count_is_insufficient() {
        let points = vec![point(1000.0, 10.0, 1.0), point(1000.0, 12.0, 1.0)];
        assert!(matches!(
            PlatformModel::fit(&points),
            Err(Error::InsufficientData(1))
        ));
    }

    #[test]
    fn predict_applies_the_linear_model() {
        let model = PlatformModel {
            socket_ms: 2.0,
            speed_ms_per_sample: 0.5,
            stdev_ms: 0.0,
            n: 0,
        };
        assert_eq!(model.predict_ms(100.0), 52.0);
    }
}
