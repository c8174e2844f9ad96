use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while fitting the platform model or persisting timing
/// history.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O failure reading or writing a CSV history file.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A CSV row could not be read or written.
    #[error("CSV error on {path}: {source}")]
    Csv {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },

    /// The platform model was asked to fit with too few distinct data
    /// points to produce a meaningful line.
    #[error("platform model needs at least 2 distinct sample counts, got {0}")]
    InsufficientData(usize),

    /// A test case asked for an averaged data point before it had recorded
    /// any measurements.
    #[error("no timing measurements recorded yet for this testcase")]
    NoMeasurements,
}

/// Convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
