//! Tracing subscriber setup for the `testrunner` binary.

use tracing_subscriber::{fmt, prelude::*};

use crate::log_args::{env_filter_from_spec, LogArgs};

/// Install a global tracing subscriber built from `args`.
///
/// Compact, single-line formatting with target names, no timestamps (the
/// runner's own progress output already carries suite-relative timing).
/// Safe to call once per process; a second call is a logic error in the
/// caller, not handled gracefully here.
pub fn init_tracing(args: &LogArgs) {
    let filter = env_filter_from_spec(&args.spec());
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(true))
        .with(filter)
        .init();
}
