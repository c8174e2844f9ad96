use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

/// Errors raised while spawning, driving, or tearing down a subject process.
#[derive(Error, Debug)]
pub enum Error {
    /// The subject executable could not be spawned at all.
    #[error("failed to launch subject {path}: {source}")]
    Spawn {
        /// Executable that failed to launch.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The subject process exited while a [`crate::MatchTask`] was still
    /// armed and waiting for a line of output.
    #[error("subject died while still expecting output matching '{expected}'")]
    FailedLaunch {
        /// Label of the condition that never matched.
        expected: String,
    },

    /// No matching output arrived before the configured timeout elapsed.
    #[error("timed out after {0:?} waiting for subject output")]
    Timeout(Duration),

    /// The subject's stdin pipe was already closed.
    #[error("subject stdin is closed")]
    StdinClosed,

    /// I/O failure writing to or reading from the subject's pipes.
    #[error("I/O error communicating with subject: {0}")]
    Io(#[from] io::Error),

    /// The oneshot completion channel was dropped before resolving, which
    /// only happens if the [`crate::Watcher`] itself was dropped mid-wait.
    #[error("watcher was dropped while waiting for a match")]
    WatcherGone,
}

/// Convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
