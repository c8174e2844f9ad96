//! Single-slot rendezvous between the subject's output reader thread and
//! whichever step is waiting for a particular line to appear.
//!
//! Only one [`MatchCond`] can be armed at a time; `activate` replaces
//! whatever was armed before. The reader thread calls [`MatchTask::evaluate`]
//! for every line; the waiting side calls `activate` and then awaits the
//! returned oneshot receiver.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use regex::Regex;
use tokio::sync::oneshot;

use crate::error::Error;

/// A condition to watch for in the subject's output stream.
pub struct MatchCond {
    primary: Regex,
    precondition: Option<Regex>,
    label: String,
}

impl MatchCond {
    /// A condition matched as soon as `primary` matches any line.
    pub fn on_pattern(primary: Regex) -> MatchBuilder {
        MatchBuilder {
            primary,
            precondition: None,
            label: None,
        }
    }
}

/// Builder for [`MatchCond`], mirroring the fluent `onCondition().
/// withPrecondition().logOutputInto()` style of the construct this was
/// modeled on.
pub struct MatchBuilder {
    primary: Regex,
    precondition: Option<Regex>,
    label: Option<String>,
}

impl MatchBuilder {
    /// Require `precondition` to have matched some earlier line before
    /// `primary` is allowed to complete the match.
    pub fn with_precondition(mut self, precondition: Regex) -> Self {
        self.precondition = Some(precondition);
        self
    }

    /// Human-readable label used in [`Error::FailedLaunch`] diagnostics.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Finalize into an armable [`MatchCond`].
    pub fn build(self) -> MatchCond {
        let label = self
            .label
            .unwrap_or_else(|| self.primary.as_str().to_string());
        MatchCond {
            primary: self.primary,
            precondition: self.precondition,
            label,
        }
    }
}

struct State {
    cond: Option<MatchCond>,
    precondition_met: bool,
    sender: Option<oneshot::Sender<Result<String, Error>>>,
}

/// The single-slot match rendezvous itself. One instance per watched
/// subject; cheap to share behind an `Arc`.
pub struct MatchTask {
    active: AtomicBool,
    state: Mutex<State>,
}

impl Default for MatchTask {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchTask {
    /// A task with nothing armed.
    pub fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            state: Mutex::new(State {
                cond: None,
                precondition_met: false,
                sender: None,
            }),
        }
    }

    /// Arm `cond`; returns a receiver that resolves with the matching line
    /// of output, or with [`Error::FailedLaunch`] if the subject exits
    /// first.
    pub fn activate(&self, cond: MatchCond) -> oneshot::Receiver<Result<String, Error>> {
        let (tx, rx) = oneshot::channel();
        {
            let mut state = self.state.lock().unwrap();
            state.cond = Some(cond);
            state.precondition_met = false;
            state.sender = Some(tx);
        }
        self.active.store(true, Ordering::Release);
        rx
    }

    /// Whether a condition is currently armed.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Check `line` against the armed condition, if any. Called by the
    /// reader thread for every line of subject output.
    pub fn evaluate(&self, line: &str) {
        if !self.active.load(Ordering::Acquire) {
            return;
        }
        let mut state = self.state.lock().unwrap();
        let Some(cond) = state.cond.as_ref() else {
            return;
        };
        if let Some(pre) = &cond.precondition {
            if !state.precondition_met && pre.is_match(line) {
                state.precondition_met = true;
            }
        }
        let precondition_satisfied = cond.precondition.is_none() || state.precondition_met;
        if precondition_satisfied && cond.primary.is_match(line) {
            self.active.store(false, Ordering::Release);
            state.cond = None;
            if let Some(tx) = state.sender.take() {
                let _ = tx.send(Ok(line.to_string()));
            }
        }
    }

    /// Called when the subject process exits. If a condition was still
    /// armed, fails it with [`Error::FailedLaunch`] rather than leaving the
    /// waiter hanging forever.
    pub fn deactivate(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            let mut state = self.state.lock().unwrap();
            let label = state
                .cond
                .take()
                .map(|c| c.label)
                .unwrap_or_else(|| "<unknown>".to_string());
            if let Some(tx) = state.sender.take() {
                let _ = tx.send(Err(Error::FailedLaunch { expected: label }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_without_precondition() {
        let task = MatchTask::new();
        let rx = task.activate(MatchCond::on_pattern(Regex::new("ready").unwrap()).build());
        task.evaluate("not yet");
        task.evaluate("system ready now");
        assert!(rx.try_recv().unwrap().is_ok());
    }

    #[test]
    fn precondition_must_be_seen_first() {
        let task = MatchTask::new();
        let rx = task.activate(
            MatchCond::on_pattern(Regex::new("^done$").unwrap())
                .with_precondition(Regex::new("^started$").unwrap())
                .build(),
        );
        task.evaluate("done");
        assert!(rx.try_recv().is_err());
        task.evaluate("started");
        task.evaluate("done");
        assert!(rx.try_recv().unwrap().is_ok());
    }

    #[test]
    fn deactivate_while_armed_fails_the_waiter() {
        let task = MatchTask::new();
        let rx = task.activate(
            MatchCond::on_pattern(Regex::new("ready").unwrap())
                .label("ready-banner")
                .build(),
        );
        task.deactivate();
        let err = rx.try_recv().unwrap().unwrap_err();
        assert!(matches!(err, Error::FailedLaunch { .. }));
    }

    #[test]
    fn deactivate_with_nothing_armed_is_a_no_op() {
        let task = MatchTask::new();
        task.deactivate();
        assert!(!task.is_active());
    }
}
