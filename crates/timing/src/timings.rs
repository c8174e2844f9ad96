//! [`Timings`]: the suite-wide aggregator every testcase's timing
//! observation attaches a data point to, and which in turn owns the fitted
//! [`PlatformModel`].

use std::sync::RwLock;

use crate::{
    error::Result,
    platform::{DataPoint, PlatformModel},
};

/// Suite-wide timing configuration and the platform model fitted from all
/// testcases' measurements so far.
pub struct Timings {
    /// How many runtime rows to retain per testcase.
    pub timings_keep: usize,
    /// How many baseline (expense) rows to retain per testcase.
    pub baseline_keep: usize,
    /// How many trailing equivalent measurements to average into a new
    /// baseline.
    pub baseline_avg: u32,
    points: RwLock<Vec<DataPoint>>,
    model: RwLock<Option<PlatformModel>>,
}

impl Timings {
    /// A fresh aggregator with no data points and no fitted model yet.
    pub fn new(timings_keep: usize, baseline_keep: usize, baseline_avg: u32) -> Self {
        Self {
            timings_keep,
            baseline_keep,
            baseline_avg,
            points: RwLock::new(Vec::new()),
            model: RwLock::new(None),
        }
    }

    /// Record one more testcase's data point and refit the platform model.
    /// Refitting is cheap (linear in the number of testcases) so this is
    /// done eagerly rather than batched.
    pub fn attach(&self, point: DataPoint) {
        let mut points = self.points.write().unwrap();
        points.push(point);
        match PlatformModel::fit(&points) {
            Ok(model) => {
                tracing::debug!(?model, n = points.len(), "refit platform model");
                *self.model.write().unwrap() = Some(model);
            }
            Err(err) => {
                tracing::debug!(%err, n = points.len(), "not enough data to fit platform model yet");
            }
        }
    }

    /// The currently fitted platform model, if enough data has been seen.
    pub fn platform_model(&self) -> Option<PlatformModel> {
        *self.model.read().unwrap()
    }

    /// Predict a runtime in nanoseconds for `samples` samples, using the
    /// current platform model. `0.0` if no model has been fitted yet.
    pub fn predict_ns(&self, samples: u64) -> f64 {
        const NANOS_PER_MS: f64 = 1_000_000.0;
        self.platform_model()
            .map(|m| m.predict_ms(samples as f64) * NANOS_PER_MS)
            .unwrap_or(0.0)
    }

    /// Number of data points contributed so far.
    pub fn len(&self) -> usize {
        self.points.read().unwrap().len()
    }

    /// Whether no data points have been contributed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(samples: f64, runtime_ms: f64) -> DataPoint {
        DataPoint {
            samples,
            runtime_ms,
            expense: 1.0,
        }
    }

    #[test]
    fn no_model_until_two_distinct_sample_counts_seen() {
        let timings = Timings::new(200, 50, 5);
        timings.attach(point(1000.0, 10.0));
        assert!(timings.platform_model().is_none());
        timings.attach(point(2000.0, 20.0));
        assert!(timings.platform_model().is_some());
    }

    #[test]
    fn predict_ns_uses_the_fitted_model() {
        let timings = Timings::new(200, 50, 5);
        for i in 1..=10 {
            timings.attach(point(i as f64 * 1000.0, 1.0 + 0.01 * i as f64 * 1000.0));
        }
        let predicted = timings.predict_ns(5000);
        assert!(predicted > 0.0);
    }
}
