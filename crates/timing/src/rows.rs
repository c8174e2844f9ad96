//! CSV row shapes for the per-testcase runtime and expense (baseline)
//! history tables.

use serde::{Deserialize, Serialize};

/// One row of the runtime time series: a single measurement plus its
/// context and the derived moving averages, grounded on the original's
/// `TableRuntime`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingRow {
    /// Timestamp of the suite run that produced this row, RFC 3339.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    /// Measured runtime, in milliseconds.
    #[serde(rename = "Runtime ms")]
    pub runtime_ms: f64,
    /// Sample count processed by the invocation.
    #[serde(rename = "Samples count")]
    pub samples: u64,
    /// Notes-per-second count reported by the subject, if applicable.
    #[serde(rename = "Notes count")]
    pub notes: u32,
    /// Runtime predicted by the platform model, in milliseconds.
    #[serde(rename = "Platform ms")]
    pub platform_ms: f64,
    /// This testcase's baseline expense factor at the time of measurement.
    #[serde(rename = "Expense Factor")]
    pub expense: f64,
    /// `runtime_ms / platform_ms` for this measurement specifically.
    #[serde(rename = "Expense Factor(current)")]
    pub expense_current: f64,
    /// `runtime_ms - platform_ms * expense`, in milliseconds.
    #[serde(rename = "Delta ms")]
    pub delta_ms: f64,
    /// Moving average of `expense_current` over the last 5 measurements.
    #[serde(rename = "Expense MA-5")]
    pub ma05: f64,
    /// Moving average of `expense_current` over the last 10 measurements.
    #[serde(rename = "Expense MA-10")]
    pub ma10: f64,
    /// Moving average of `expense_current` over the last 50 measurements.
    #[serde(rename = "Expense MA-50")]
    pub ma50: f64,
}

/// One row of the expense (baseline) history: a newly accepted baseline
/// plus the context it was derived from, grounded on the original's
/// `TableExpense`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseRow {
    /// Timestamp this baseline was recorded, RFC 3339.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    /// Number of past runtime rows averaged into this baseline.
    #[serde(rename = "Averaged points")]
    pub points: u32,
    /// Averaged runtime used to define this baseline, in milliseconds.
    #[serde(rename = "Runtime(avg) ms")]
    pub runtime_ms: f64,
    /// Sample count of the underlying testcase.
    #[serde(rename = "Samples count")]
    pub samples: u64,
    /// Notes count of the underlying testcase.
    #[serde(rename = "Notes count")]
    pub notes: u32,
    /// Runtime predicted by the platform model for this baseline.
    #[serde(rename = "Platform ms")]
    pub platform_ms: f64,
    /// The actual baseline value: `runtime_ms / platform_ms`.
    #[serde(rename = "Expense Factor")]
    pub expense: f64,
}
