//! [`TimingTestData`]: one testcase's runtime/expense time series, grounded
//! on the original's `TimingTestData`.

use std::path::{Path, PathBuf};

use crate::{
    csv_store::{load_rows, save_rows_capped},
    error::{Error, Result},
    platform::DataPoint,
    rows::{ExpenseRow, TimingRow},
    stats::average_last_n,
};

const NANOS_PER_MS: f64 = 1_000_000.0;

/// A testcase's runtime and expense history files, loaded on demand and
/// persisted back with bounded history.
pub struct TimingTestData {
    runtime_path: PathBuf,
    expense_path: PathBuf,
    runtime: Vec<TimingRow>,
    expense: Vec<ExpenseRow>,
}

/// The most recent baseline-relative measurement for a testcase, used to
/// feed [`crate::platform::PlatformModel::fit`].
#[derive(Debug, Clone, Copy)]
pub struct AveragedPoint {
    /// Sample count of the underlying testcase.
    pub samples: f64,
    /// Averaged runtime over the requested window, in milliseconds.
    pub runtime_ms: f64,
    /// Current baseline expense factor (1.0 if none set yet).
    pub expense: f64,
}

impl From<AveragedPoint> for DataPoint {
    fn from(point: AveragedPoint) -> Self {
        DataPoint {
            samples: point.samples,
            runtime_ms: point.runtime_ms,
            expense: point.expense,
        }
    }
}

impl TimingTestData {
    /// Load (or start empty) the runtime/expense tables backing `runtime_path`
    /// and `expense_path`.
    pub fn load(runtime_path: impl Into<PathBuf>, expense_path: impl Into<PathBuf>) -> Result<Self> {
        let runtime_path = runtime_path.into();
        let expense_path = expense_path.into();
        let runtime = load_rows(&runtime_path)?;
        let expense = load_rows(&expense_path)?;
        Ok(Self {
            runtime_path,
            expense_path,
            runtime,
            expense,
        })
    }

    /// Whether a baseline expense factor has ever been recorded.
    pub fn has_baseline(&self) -> bool {
        !self.expense.is_empty()
    }

    /// This testcase's current baseline expense factor (1.0 if it has none
    /// recorded yet), as used by the most recent [`Self::calculate_point`].
    pub fn current_expense(&self) -> f64 {
        self.expense.last().map(|r| r.expense).unwrap_or(0.0)
    }

    /// Record one new runtime measurement, deriving its moving averages
    /// from the history accumulated so far.
    ///
    /// `raw_time_ns` is the measured wall-clock time in nanoseconds;
    /// `prediction_ns` is what the platform model predicted for this
    /// sample count, also in nanoseconds.
    pub fn calculate_point(
        &mut self,
        timestamp: &str,
        notes: u32,
        samples: u64,
        raw_time_ns: f64,
        prediction_ns: f64,
    ) {
        let runtime_ms = raw_time_ns / NANOS_PER_MS;
        let platform_ms = prediction_ns / NANOS_PER_MS;
        let expense = self.current_expense();

        let expected_time_ms = platform_ms * expense;
        let expense_current = if prediction_ns > 0.0 {
            raw_time_ns / prediction_ns
        } else {
            0.0
        };
        let delta_ms = if expected_time_ms > 0.0 {
            runtime_ms - expected_time_ms
        } else {
            0.0
        };

        let mut expense_series: Vec<f64> =
            self.runtime.iter().map(|r| r.expense_current).collect();
        expense_series.push(expense_current);

        self.runtime.push(TimingRow {
            timestamp: timestamp.to_string(),
            runtime_ms,
            samples,
            notes,
            platform_ms,
            expense,
            expense_current,
            delta_ms,
            ma05: average_last_n(&expense_series, 5),
            ma10: average_last_n(&expense_series, 10),
            ma50: average_last_n(&expense_series, 50),
        });
    }

    /// Persist the runtime table, keeping only the last `keep` rows.
    pub fn persist_runtime(&self, keep: usize) -> Result<()> {
        save_rows_capped(&self.runtime_path, &self.runtime, keep)
    }

    /// Accept a new baseline: average the last `baseline_avg` runtime rows
    /// and record `runtime_avg / platform` as the new expense factor.
    pub fn store_new_baseline(&mut self, timestamp: &str, baseline_avg: u32, baseline_keep: usize) -> Result<()> {
        let last = self.runtime.last().ok_or(Error::NoMeasurements)?;
        let runtimes: Vec<f64> = self.runtime.iter().map(|r| r.runtime_ms).collect();
        let runtime_avg = average_last_n(&runtimes, baseline_avg as usize);
        let expense = if last.platform_ms > 0.0 {
            runtime_avg / last.platform_ms
        } else {
            0.0
        };

        self.expense.push(ExpenseRow {
            timestamp: timestamp.to_string(),
            points: baseline_avg,
            runtime_ms: runtime_avg,
            samples: last.samples,
            notes: last.notes,
            platform_ms: last.platform_ms,
            expense,
        });
        save_rows_capped(&self.expense_path, &self.expense, baseline_keep)
    }

    /// Number of trailing rows, capped at `limit`, whose sample count and
    /// expense factor match the most recent row exactly. Averaging across
    /// these is meaningful; averaging across a changed setup isn't.
    pub fn ensure_equivalent_data_points(&self, limit: usize) -> usize {
        let Some(last) = self.runtime.last() else {
            return 0;
        };
        let ref_samples = last.samples;
        let ref_expense = last.expense;
        self.runtime
            .iter()
            .rev()
            .take(limit)
            .take_while(|r| r.samples == ref_samples && r.expense == ref_expense)
            .count()
    }

    /// Averaged data point over the last `limit` equivalent measurements,
    /// for contributing to the suite-wide platform model fit.
    pub fn averaged_data_point(&self, limit: usize) -> Result<AveragedPoint> {
        let last = self.runtime.last().ok_or(Error::NoMeasurements)?;
        let points = self.ensure_equivalent_data_points(limit);
        let runtimes: Vec<f64> = self
            .runtime
            .iter()
            .rev()
            .take(points)
            .map(|r| r.runtime_ms)
            .collect();
        Ok(AveragedPoint {
            samples: last.samples as f64,
            runtime_ms: average_last_n(&runtimes, points),
            expense: last.expense,
        })
    }

    /// Path to the underlying runtime CSV file.
    pub fn runtime_path(&self) -> &Path {
        &self.runtime_path
    }

    /// `delta_ms` of the most recently recorded runtime row, if any.
    pub fn last_delta_ms(&self) -> Option<f64> {
        self.runtime.last().map(|r| r.delta_ms)
    }

    /// Sample standard deviation of this testcase's own `delta_ms` history,
    /// the "local tolerance" source judgement steps combine with the
    /// platform model's tolerance.
    pub fn delta_stdev(&self) -> f64 {
        let deltas: Vec<f64> = self.runtime.iter().map(|r| r.delta_ms).collect();
        crate::stats::stdev(&deltas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_data() -> (tempfile::TempDir, TimingTestData) {
        let dir = tempfile::tempdir().unwrap();
        let data = TimingTestData::load(
            dir.path().join("runtime.csv"),
            dir.path().join("expense.csv"),
        )
        .unwrap();
        (dir, data)
    }

    #[test]
    fn first_measurement_has_zero_expense_and_delta() {
        let (_dir, mut data) = temp_data();
        data.calculate_point("2026-01-01T00:00:00Z", 1, 1000, 10_000_000.0, 9_000_000.0);
        let row = data.runtime.last().unwrap();
        assert_eq!(row.expense, 0.0);
        assert_eq!(row.delta_ms, 0.0);
        assert!((row.expense_current - 10_000_000.0 / 9_000_000.0).abs() < 1e-9);
    }

    #[test]
    fn baseline_uses_runtime_over_platform() {
        let (_dir, mut data) = temp_data();
        data.calculate_point("t0", 1, 1000, 10_000_000.0, 10_000_000.0);
        data.store_new_baseline("t1", 1, 10).unwrap();
        assert!(data.has_baseline());
        assert!((data.current_expense() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn baseline_without_measurements_errors() {
        let (_dir, mut data) = temp_data();
        assert!(matches!(
            data.store_new_baseline("t0", 1, 10),
            Err(Error::NoMeasurements)
        ));
    }

    #[test]
    fn equivalent_points_stop_at_a_changed_sample_count() {
        let (_dir, mut data) = temp_data();
        data.calculate_point("t0", 1, 1000, 10_000_000.0, 10_000_000.0);
        data.calculate_point("t1", 1, 1000, 11_000_000.0, 10_000_000.0);
        data.calculate_point("t2", 1, 2000, 20_000_000.0, 20_000_000.0);
        assert_eq!(data.ensure_equivalent_data_points(10), 1);
    }

    #[test]
    fn persist_and_reload_round_trips_rows() {
        let dir = tempfile::tempdir().unwrap();
        let runtime_path = dir.path().join("runtime.csv");
        let expense_path = dir.path().join("expense.csv");
        {
            let mut data =
                TimingTestData::load(&runtime_path, &expense_path).unwrap();
            data.calculate_point("t0", 1, 1000, 10_000_000.0, 10_000_000.0);
            data.persist_runtime(50).unwrap();
        }
        let reloaded = TimingTestData::load(&runtime_path, &expense_path).unwrap();
        assert_eq!(reloaded.runtime.len(), 1);
    }
}
