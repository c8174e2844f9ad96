//! Platform timing model, per-testcase runtime/expense history, and the
//! suite-wide trend statistics used by the timing and trend judgement
//! steps.

#![warn(missing_docs)]

mod csv_store;
mod error;
mod judgement;
mod platform;
mod rows;
mod stats;
mod suite_statistics;
mod timing_data;
mod timings;

pub use error::{Error, Result};
pub use judgement::{error_sum, percent_change, timing_tolerance, trend_strength, trend_tolerance};
pub use platform::{DataPoint, PlatformModel};
pub use rows::{ExpenseRow, TimingRow};
pub use stats::{average_last_n, correlation, fit_line, stdev};
pub use suite_statistics::SuiteStatistics;
pub use timing_data::{AveragedPoint, TimingTestData};
pub use timings::Timings;
