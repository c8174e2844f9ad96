//! [`CaseContext`]: the blackboard steps read from and write to as a case
//! runs, plus [`SuiteContext`], the handles shared by every case.

use std::{sync::Arc, time::Duration};

use progress::Progress;
use testspec::{Patterns, TestSpec};
use timing::Timings;
use watcher::Watcher;

use crate::outcome::TestLog;

/// Handles shared across every testcase in a suite run.
#[derive(Clone)]
pub struct SuiteContext {
    /// Suite-wide progress sink.
    pub progress: Arc<Progress>,
    /// Suite-wide platform timing model and per-testcase history config.
    pub timings: Arc<Timings>,
    /// Compiled subject protocol patterns (ready banner, prompt).
    pub patterns: Arc<Patterns>,
    /// Default per-step timeout, overridable per testcase.
    pub default_timeout: Duration,
    /// Whether this run should accept a new timing baseline for every
    /// testcase it measures (the `--baseline` CLI flag).
    pub baseline_mode: bool,
}

/// Mutable state threaded through one testcase's step graph.
pub struct CaseContext {
    /// Suite-wide shared handles.
    pub suite: SuiteContext,
    /// This testcase's resolved settings.
    pub spec: TestSpec,
    /// The running subject, once [`crate::steps::Launcher`] has spawned it.
    pub watcher: Option<Watcher>,
    /// Wall-clock runtime of the timed invocation, in nanoseconds.
    pub runtime_ns: Option<f64>,
    /// Sample count reported by the subject for the timed invocation.
    pub samples: Option<u64>,
    /// Notes-per-second count reported by the subject, if any.
    pub notes: Option<u32>,
    /// `runtime - platform*expense`, once [`crate::steps::TimingObservation`]
    /// has computed it.
    pub delta_ms: Option<f64>,
    /// The subject's exit code, once captured (e.g. after a crash, or
    /// during cleanup). `None` until something has reaped the child.
    pub exit_code: Option<i32>,
    /// Captured sound probe, once [`crate::steps::SoundObservation`] runs.
    pub probe: Option<sound::Probe>,
    /// Probe-vs-baseline residual, once [`crate::steps::SoundJudgement`]
    /// runs its diff.
    pub residual: Option<sound::Residual>,
    /// Per-case accumulated step outcomes.
    pub log: TestLog,
}

impl CaseContext {
    /// A fresh context for `spec`, with nothing populated yet.
    pub fn new(suite: SuiteContext, spec: TestSpec) -> Self {
        Self {
            suite,
            spec,
            watcher: None,
            runtime_ns: None,
            samples: None,
            notes: None,
            delta_ms: None,
            exit_code: None,
            probe: None,
            residual: None,
            log: TestLog::new(),
        }
    }

    /// Record `outcome` from `step` against this case's topic.
    pub fn record(&mut self, step: &'static str, outcome: crate::outcome::Outcome) {
        let topic = self.spec.topic.clone();
        self.log.record(topic, step, outcome);
    }
}
