//! Sound probe capture, baseline comparison, and residual persistence.

#![warn(missing_docs)]

mod error;
mod probe;
mod raw;
mod wav;

pub use error::{Error, Result};
pub use probe::{
    discard_storage, sibling, Probe, Residual, DIFF_ERROR_LEVEL_DB, DIFF_WARN_LEVEL_DB,
    FAINT_PROBE_LEVEL_DB,
};
pub use raw::DEFAULT_SAMPLE_RATE;
pub use wav::WavData;
