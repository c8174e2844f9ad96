use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while loading, comparing, or persisting sound probes.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O failure reading or writing a probe/baseline file.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A WAV file could not be decoded.
    #[error("malformed WAV file {path}: {source}")]
    Wav {
        /// File involved.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: hound::Error,
    },

    /// A raw PCM file's byte length wasn't a multiple of the sample width.
    #[error("raw PCM file {path} has {len} bytes, not a multiple of 4")]
    TruncatedSample {
        /// File involved.
        path: PathBuf,
        /// Its byte length.
        len: u64,
    },

    /// The probe and baseline have different sample counts and cannot be
    /// diffed directly.
    #[error("probe has {probe_len} samples but baseline has {baseline_len}")]
    LengthMismatch {
        /// Probe sample count.
        probe_len: usize,
        /// Baseline sample count.
        baseline_len: usize,
    },
}

/// Convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
