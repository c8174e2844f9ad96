use thiserror::Error;

/// Errors that abort case construction or orchestration outright, as
/// opposed to a step merely reporting a poor [`crate::Outcome`].
#[derive(Error, Debug)]
pub enum Error {
    /// Failure loading or resolving a testcase's settings.
    #[error(transparent)]
    Testspec(#[from] testspec::Error),

    /// Failure spawning or driving the subject process.
    #[error(transparent)]
    Watcher(#[from] watcher::Error),

    /// Failure capturing or comparing a sound probe.
    #[error(transparent)]
    Sound(#[from] sound::Error),

    /// Failure recording or fitting timing data.
    #[error(transparent)]
    Timing(#[from] timing::Error),

    /// A testcase names a mould kind that isn't wired up yet (LV2).
    #[error("unsupported testcase kind: {0}")]
    UnsupportedKind(String),

    /// Failure walking the suite directory tree or persisting trend data.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
