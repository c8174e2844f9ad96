//! [`SuiteStatistics`]: the suite-wide trend closure step's view of delta
//! history across every testcase, grounded on `TrendObservation`/
//! `TrendJudgement`.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::judgement::trend_strength;

/// Short-term and long-term trend windows (in suite runs), and the series
/// of recorded `Delta ms` values they're computed over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteStatistics {
    /// How many of the most recent runs count as "short term".
    pub short_term_window: usize,
    /// How many of the most recent runs count as "long term".
    pub long_term_window: usize,
    /// Suite-wide average `Delta ms` per run, oldest first.
    pub delta_series: Vec<f64>,
}

impl SuiteStatistics {
    /// An empty statistics record with the given window sizes.
    pub fn new(short_term_window: usize, long_term_window: usize) -> Self {
        Self {
            short_term_window,
            long_term_window,
            delta_series: Vec::new(),
        }
    }

    /// Append one run's suite-wide average delta.
    pub fn record(&mut self, average_delta_ms: f64) {
        self.delta_series.push(average_delta_ms);
    }

    /// Trend strength over the short-term window.
    pub fn short_term_trend(&self) -> f64 {
        trend_strength(&self.delta_series, self.short_term_window)
    }

    /// Trend strength over the long-term window.
    pub fn long_term_trend(&self) -> f64 {
        trend_strength(&self.delta_series, self.long_term_window)
    }

    /// Load suite-wide trend statistics from `path`, or a fresh record with
    /// the given windows if the file doesn't exist yet, grounded on the
    /// original's `PersistModelTrend` step (global trend storage).
    pub fn load_or_default(
        path: impl AsRef<Path>,
        short_term_window: usize,
        long_term_window: usize,
    ) -> io::Result<Self> {
        match fs::read_to_string(path.as_ref()) {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Ok(Self::new(short_term_window, long_term_window))
            }
            Err(err) => Err(err),
        }
    }

    /// Persist this record to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_history_has_no_trend() {
        let mut stats = SuiteStatistics::new(5, 20);
        for _ in 0..30 {
            stats.record(1.0);
        }
        assert_eq!(stats.short_term_trend(), 0.0);
        assert_eq!(stats.long_term_trend(), 0.0);
    }

    #[test]
    fn a_drifting_history_has_nonzero_trend() {
        let mut stats = SuiteStatistics::new(5, 20);
        for i in 0..30 {
            stats.record(i as f64 * 0.1);
        }
        assert!(stats.short_term_trend() > 0.0);
        assert!(stats.long_term_trend() > 0.0);
    }

    #[test]
    fn load_or_default_falls_back_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trend.json");
        let stats = SuiteStatistics::load_or_default(&path, 5, 20).unwrap();
        assert!(stats.delta_series.is_empty());
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trend.json");
        let mut stats = SuiteStatistics::new(5, 20);
        stats.record(1.5);
        stats.record(-0.5);
        stats.save(&path).unwrap();
        let reloaded = SuiteStatistics::load_or_default(&path, 5, 20).unwrap();
        assert_eq!(reloaded.delta_series, vec![1.5, -0.5]);
    }
}
