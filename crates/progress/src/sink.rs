//! [`Progress`]: an in-memory, optionally file-backed log of suite activity.
//!
//! Steps and judgements call [`Progress::note`] to record human-readable
//! progress lines; the report formatter and trend judgement both need to
//! search back through that history (e.g. "did step X already report a
//! warning"), hence [`Progress::grep`].

use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
};

use parking_lot::Mutex;
use regex::Regex;

/// Append-only log of progress lines, mirrored to an optional file.
///
/// Cheap to clone-share: wrap in an `Arc` at the call site. Insertion order
/// is preserved; nothing is ever removed except by an explicit
/// [`Progress::clear_log`].
pub struct Progress {
    lines: Mutex<Vec<String>>,
    file: Option<Mutex<File>>,
}

impl Progress {
    /// A sink that only keeps lines in memory.
    pub fn in_memory() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            file: None,
        }
    }

    /// A sink that also appends every line to `path`, truncating it first.
    pub fn with_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            lines: Mutex::new(Vec::new()),
            file: Some(Mutex::new(file)),
        })
    }

    /// Record a progress line. Also emitted as a `tracing` info event so it
    /// shows up under normal log filtering too.
    pub fn note(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "progress", "{message}");
        if let Some(file) = &self.file {
            let mut file = file.lock();
            let _ = writeln!(file, "{message}");
        }
        self.lines.lock().push(message);
    }

    /// Discard all recorded lines. Used between suite-level phases that
    /// shouldn't see each other's noise (e.g. calibration vs. the timed
    /// run).
    pub fn clear_log(&self) {
        self.lines.lock().clear();
    }

    /// All lines whose text matches `pattern`, in recording order.
    ///
    /// Returns owned strings rather than borrows into the internal buffer,
    /// since the buffer is behind a lock that can't outlive this call.
    pub fn grep(&self, pattern: &Regex) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|line| pattern.is_match(line))
            .cloned()
            .collect()
    }

    /// Snapshot of every recorded line, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Number of lines currently recorded.
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Whether no lines have been recorded since the last clear.
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_are_recorded_in_order() {
        let p = Progress::in_memory();
        p.note("first");
        p.note("second");
        assert_eq!(p.lines(), vec!["first", "second"]);
    }

    #[test]
    fn clear_log_empties_the_buffer() {
        let p = Progress::in_memory();
        p.note("line");
        p.clear_log();
        assert!(p.is_empty());
    }

    #[test]
    fn grep_filters_by_pattern() {
        let p = Progress::in_memory();
        p.note("step A: ok");
        p.note("step B: WARNING residual high");
        p.note("step C: ok");
        let hits = p.grep(&Regex::new("WARNING").unwrap());
        assert_eq!(hits, vec!["step B: WARNING residual high"]);
    }

    #[test]
    fn file_backed_sink_persists_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.log");
        {
            let p = Progress::with_file(&path).unwrap();
            p.note("persisted line");
        }
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "persisted line\n");
    }
}
