use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while parsing spec files or assembling layered configuration.
///
/// These surface to callers as `Misconfig` per the error taxonomy: a case that
/// fails to even parse never reaches the orchestrator as a case at all, it is
/// reported at suite build time and pushed toward a `Debacle` exit.
#[derive(Error, Debug)]
pub enum Error {
    /// A line in a spec/INI file didn't match any recognized grammar production.
    #[error("invalid definition in {path} at line {line}: {content:?}")]
    InvalidDefinition {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Raw line content for diagnostics.
        content: String,
    },

    /// A `BlockID` / `End-BlockID` pair was malformed or mismatched.
    #[error("block error in {path} at line {line}: {reason}")]
    BlockError {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// A mandatory key was absent after all configuration layers were merged.
    #[error("'{key}' not defined by config or commandline")]
    MissingKey {
        /// The dotted key that was required.
        key: String,
    },

    /// A value existed but could not be converted to the requested type.
    #[error("'{key}' = {value:?} is not a valid {expected}")]
    BadValue {
        /// The dotted key.
        key: String,
        /// The raw string value.
        value: String,
        /// Human name of the expected type, e.g. "bool" or "duration(seconds)".
        expected: &'static str,
    },

    /// The executable named by `Test.subject` does not exist.
    #[error("unable to locate subject executable: {0}")]
    SubjectNotFound(PathBuf),

    /// Underlying I/O failure while reading a spec or config file.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
