//! [`ResCode`], the per-step [`Outcome`], and the append-only [`TestLog`]
//! that accumulates outcomes for a case (or the whole suite).

use std::fmt;

/// Severity of a step's outcome, ordered from best to worst. `Ord` is
/// derived in declaration order, so `max()` over a set of codes gives the
/// worst one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResCode {
    /// Step completed within tolerance; nothing to report.
    Green,
    /// Step completed, but with something worth a human's attention.
    Warning,
    /// An assertion or tolerance was exceeded.
    Violation,
    /// The step's own machinery failed (I/O error, parse error, panic).
    Malfunction,
    /// The suite itself could not proceed (misconfiguration, missing
    /// subject, corrupted state).
    Debacle,
}

impl ResCode {
    /// Process exit code this result maps to.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Green => 0,
            Self::Warning => 1,
            Self::Violation => 2,
            Self::Malfunction => 3,
            Self::Debacle => 4,
        }
    }
}

impl fmt::Display for ResCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Green => "GREEN",
            Self::Warning => "WARNING",
            Self::Violation => "VIOLATION",
            Self::Malfunction => "MALFUNCTION",
            Self::Debacle => "DEBACLE",
        };
        f.write_str(label)
    }
}

/// The outcome of one step: a severity plus a human-readable explanation.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Severity of this outcome.
    pub code: ResCode,
    /// Human-readable explanation, suitable for the report.
    pub message: String,
}

impl Outcome {
    /// A clean, unremarkable outcome.
    pub fn green(message: impl Into<String>) -> Self {
        Self {
            code: ResCode::Green,
            message: message.into(),
        }
    }

    /// A warning-level outcome.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            code: ResCode::Warning,
            message: message.into(),
        }
    }

    /// A violation-level outcome.
    pub fn violation(message: impl Into<String>) -> Self {
        Self {
            code: ResCode::Violation,
            message: message.into(),
        }
    }

    /// A malfunction-level outcome.
    pub fn malfunction(message: impl Into<String>) -> Self {
        Self {
            code: ResCode::Malfunction,
            message: message.into(),
        }
    }

    /// A debacle-level outcome.
    pub fn debacle(message: impl Into<String>) -> Self {
        Self {
            code: ResCode::Debacle,
            message: message.into(),
        }
    }
}

/// One recorded step outcome, tagged with the step and case it came from.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Slash-separated testcase topic, or `"<suite>"` for suite-wide steps.
    pub topic: String,
    /// Name of the step that produced this outcome.
    pub step: &'static str,
    /// The outcome itself.
    pub outcome: Outcome,
}

/// Append-only, insertion-ordered log of every step outcome across a suite
/// run. Nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct TestLog {
    entries: Vec<LogEntry>,
}

impl TestLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one outcome.
    pub fn record(&mut self, topic: impl Into<String>, step: &'static str, outcome: Outcome) {
        self.entries.push(LogEntry {
            topic: topic.into(),
            step,
            outcome,
        });
    }

    /// All entries, in recording order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries belonging to a specific testcase topic.
    pub fn for_topic<'a>(&'a self, topic: &'a str) -> impl Iterator<Item = &'a LogEntry> {
        self.entries.iter().filter(move |e| e.topic == topic)
    }

    /// The worst `ResCode` seen so far, or `Green` if the log is empty.
    pub fn worst(&self) -> ResCode {
        self.entries
            .iter()
            .map(|e| e.outcome.code)
            .max()
            .unwrap_or(ResCode::Green)
    }

    /// Whether any entry malfunctioned.
    pub fn has_malfunction(&self) -> bool {
        self.entries.iter().any(|e| e.outcome.code == ResCode::Malfunction)
    }

    /// Whether any entry recorded a violation.
    pub fn has_violations(&self) -> bool {
        self.entries.iter().any(|e| e.outcome.code == ResCode::Violation)
    }

    /// Whether any entry recorded a warning.
    pub fn has_warnings(&self) -> bool {
        self.entries.iter().any(|e| e.outcome.code == ResCode::Warning)
    }

    /// Number of testcases concluded so far: by convention, one
    /// [`crate::steps::Summary`] entry is recorded per testcase.
    pub fn cnt_tests(&self) -> usize {
        self.entries.iter().filter(|e| e.step == "summary").count()
    }

    /// Merge another log's entries into this one, preserving relative order
    /// (this log's entries first).
    pub fn merge(&mut self, other: TestLog) {
        self.entries.extend(other.entries);
    }
}
