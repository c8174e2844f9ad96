//! Configurable match patterns for the subject's startup banner and prompt.
//!
//! The original hard-codes these to one subject's exact banner text
//! (`YOSHIMI_SUCCESFULL_START_PATTERN`, `YOSHIMI_PROMPT_PATTERN`). Since this
//! runner is meant to drive any CLI-shaped subject, the patterns are read
//! from config with conservative defaults and compiled once per suite.

use regex::Regex;

use crate::{error::Error, spec::Spec};

/// Config key for the regex matched against the subject's ready banner.
pub const KEY_READY_PATTERN: &str = "Subject.readyPattern";
/// Config key for the regex matched against the subject's interactive prompt.
pub const KEY_PROMPT_PATTERN: &str = "Subject.promptPattern";
/// Config key for the regex matched against the subject's test-complete
/// marker, with named capture groups `runtime_ns`, `samples`, `notes`.
pub const KEY_COMPLETE_PATTERN: &str = "Subject.completePattern";

const DEFAULT_READY_PATTERN: &str = r"(?i)ready|up and running|listening";
const DEFAULT_PROMPT_PATTERN: &str = r"^\S*>\s*$";
const DEFAULT_COMPLETE_PATTERN: &str = concat!(
    r"TEST::Complete.+runtime\s+(?P<runtime_ns>[0-9.eE+-]+)\s*ns",
    r"(?:\D+samples\s+(?P<samples>\d+))?",
    r"(?:\D+notes\s+(?P<notes>\d+))?",
);

/// The recognizers the watcher needs to drive a subprocess: one to know the
/// subject has finished starting up, one to know it is ready for the next
/// line of input, and one to know a timed invocation has finished (and to
/// mine the runtime/samples/notes it reports).
#[derive(Debug, Clone)]
pub struct Patterns {
    /// Matches the subject's startup-complete banner on stdout.
    pub ready: Regex,
    /// Matches the subject's interactive prompt on stdout.
    pub prompt: Regex,
    /// Matches the subject's test-complete marker; captures `runtime_ns`
    /// and, optionally, `samples` and `notes`.
    pub complete: Regex,
}

impl Patterns {
    /// Compile patterns from config, falling back to generic defaults.
    pub fn from_spec(spec: &Spec) -> Result<Self, Error> {
        let ready_src = spec.get_or(KEY_READY_PATTERN, DEFAULT_READY_PATTERN);
        let prompt_src = spec.get_or(KEY_PROMPT_PATTERN, DEFAULT_PROMPT_PATTERN);
        let complete_src = spec.get_or(KEY_COMPLETE_PATTERN, DEFAULT_COMPLETE_PATTERN);
        Ok(Self {
            ready: compile(KEY_READY_PATTERN, ready_src)?,
            prompt: compile(KEY_PROMPT_PATTERN, prompt_src)?,
            complete: compile(KEY_COMPLETE_PATTERN, complete_src)?,
        })
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self {
            ready: Regex::new(DEFAULT_READY_PATTERN).expect("default ready pattern compiles"),
            prompt: Regex::new(DEFAULT_PROMPT_PATTERN).expect("default prompt pattern compiles"),
            complete: Regex::new(DEFAULT_COMPLETE_PATTERN)
                .expect("default complete pattern compiles"),
        }
    }
}

fn compile(key: &str, source: &str) -> Result<Regex, Error> {
    Regex::new(source).map_err(|_| Error::BadValue {
        key: key.to_string(),
        value: source.to_string(),
        expected: "regular expression",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_typical_banners() {
        let p = Patterns::default();
        assert!(p.ready.is_match("Yay! We're up and running :-)"));
        assert!(p.prompt.is_match("synth> "));
    }

    #[test]
    fn config_can_override_patterns() {
        let mut spec = Spec::default();
        spec.set(KEY_READY_PATTERN, "^READY$");
        let p = Patterns::from_spec(&spec).unwrap();
        assert!(p.ready.is_match("READY"));
        assert!(!p.ready.is_match("ready"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let mut spec = Spec::default();
        spec.set(KEY_READY_PATTERN, "(unterminated");
        assert!(Patterns::from_spec(&spec).is_err());
    }

    #[test]
    fn complete_pattern_captures_runtime_samples_and_notes() {
        let p = Patterns::default();
        let caps = p
            .complete
            .captures("TEST::Complete after runtime 123456 ns, samples 2048, notes 4")
            .unwrap();
        assert_eq!(&caps["runtime_ns"], "123456");
        assert_eq!(&caps["samples"], "2048");
        assert_eq!(&caps["notes"], "4");
    }

    #[test]
    fn complete_pattern_tolerates_missing_samples_and_notes() {
        let p = Patterns::default();
        let caps = p
            .complete
            .captures("TEST::Complete runtime 99 ns")
            .unwrap();
        assert_eq!(&caps["runtime_ns"], "99");
        assert!(caps.name("samples").is_none());
        assert!(caps.name("notes").is_none());
    }
}
