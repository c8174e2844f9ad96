//! Renders an aggregated [`suite::TestLog`] as a human-readable report:
//! per-topic pass/fail detail lines, a final severity tally, and the
//! worst result across the run.

#![warn(missing_docs)]

use std::{fmt::Write as _, fs, io, path::Path};

use suite::{ResCode, TestLog};

/// Per-severity counts over a [`TestLog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Number of `Green` outcomes.
    pub green: usize,
    /// Number of `Warning` outcomes.
    pub warning: usize,
    /// Number of `Violation` outcomes.
    pub violation: usize,
    /// Number of `Malfunction` outcomes.
    pub malfunction: usize,
    /// Number of `Debacle` outcomes.
    pub debacle: usize,
}

impl Tally {
    fn add(&mut self, code: ResCode) {
        match code {
            ResCode::Green => self.green += 1,
            ResCode::Warning => self.warning += 1,
            ResCode::Violation => self.violation += 1,
            ResCode::Malfunction => self.malfunction += 1,
            ResCode::Debacle => self.debacle += 1,
        }
    }

    /// Total number of recorded outcomes.
    pub fn total(&self) -> usize {
        self.green + self.warning + self.violation + self.malfunction + self.debacle
    }
}

fn topics_in_order(log: &TestLog) -> Vec<&str> {
    let mut topics: Vec<&str> = Vec::new();
    for entry in log.entries() {
        if !topics.contains(&entry.topic.as_str()) {
            topics.push(&entry.topic);
        }
    }
    topics
}

/// Render `log` as a plain-text report: one block per testcase topic
/// (each step's outcome on its own line), followed by a suite-wide tally.
pub fn render(log: &TestLog) -> String {
    let mut out = String::new();
    let mut tally = Tally::default();

    for topic in topics_in_order(log) {
        let entries: Vec<_> = log.for_topic(topic).collect();
        let worst = entries
            .iter()
            .map(|e| e.outcome.code)
            .max()
            .unwrap_or(ResCode::Green);
        let _ = writeln!(out, "{topic}... {worst}");
        for entry in &entries {
            if entry.outcome.code != ResCode::Green {
                let _ = writeln!(out, "  {}: {} ({})", entry.step, entry.outcome.message, entry.outcome.code);
            }
            tally.add(entry.outcome.code);
        }
    }

    let _ = writeln!(
        out,
        "\n{} testcases, {} outcomes: {} green, {} warning, {} violation, {} malfunction, {} debacle",
        log.cnt_tests(),
        tally.total(),
        tally.green,
        tally.warning,
        tally.violation,
        tally.malfunction,
        tally.debacle
    );
    let _ = writeln!(out, "worst: {}", log.worst());
    out
}

/// Print `log`'s rendered report to stdout, and also to `path` if given.
pub fn emit(log: &TestLog, path: Option<&Path>) -> io::Result<()> {
    let rendered = render(log);
    print!("{rendered}");
    if let Some(path) = path {
        fs::write(path, &rendered)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use suite::Outcome;

    #[test]
    fn tally_counts_every_severity() {
        let mut log = TestLog::new();
        log.record("a", "launcher", Outcome::green("ok"));
        log.record("a", "sound-judgement", Outcome::warning("faint"));
        log.record("b", "timing-judgement", Outcome::violation("slow"));
        let rendered = render(&log);
        assert!(rendered.contains("0 testcases, 3 outcomes: 1 green, 1 warning, 1 violation, 0 malfunction, 0 debacle"));
        assert!(rendered.contains("worst: VIOLATION"));
    }

    #[test]
    fn testcase_count_tracks_summary_entries() {
        let mut log = TestLog::new();
        log.record("a", "launcher", Outcome::green("ok"));
        log.record("a", "summary", Outcome::green("concluded as GREEN"));
        let rendered = render(&log);
        assert!(rendered.contains("1 testcases, 2 outcomes"));
    }

    #[test]
    fn green_only_steps_are_omitted_from_the_detail_lines() {
        let mut log = TestLog::new();
        log.record("a", "launcher", Outcome::green("ok"));
        let rendered = render(&log);
        assert!(!rendered.contains("launcher:"));
        assert!(rendered.contains("a... GREEN"));
    }
}
