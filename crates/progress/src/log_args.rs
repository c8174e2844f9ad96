//! CLI flags for tracing verbosity, and the filter-spec computation behind
//! them.

use std::env;

use clap::Args;
use tracing_subscriber::EnvFilter;

/// Crate targets included in default logging directives.
const OUR_CRATES: &[&str] = &[
    "testrunner",
    "testspec",
    "progress",
    "watcher",
    "sound",
    "timing",
    "suite",
    "report",
];

/// Logging controls shared by the `testrunner` binary.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only).
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only).
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single global log level for our crates (error|warn|info|debug|trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive, overriding the other flags,
    /// e.g. "suite=trace,watcher=debug".
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl LogArgs {
    /// Resolve this flag set into a final filter directive string.
    pub fn spec(&self) -> String {
        compute_spec(
            self.trace,
            self.debug,
            self.log_level.as_deref(),
            self.log_filter.as_deref(),
        )
    }
}

fn crate_specs(level: &str) -> Vec<String> {
    let lvl = level.to_ascii_lowercase();
    OUR_CRATES.iter().map(|t| format!("{t}={lvl}")).collect()
}

/// Build a filter directive string that sets the same `level` for all of
/// our crates.
pub fn level_spec_for(level: &str) -> String {
    crate_specs(level).join(",")
}

/// Compute the final filter spec string with precedence:
/// - `log_filter`
/// - `trace`/`debug`/`log_level` (crate-scoped)
/// - `RUST_LOG` env
/// - default to crate-scoped `info`
pub fn compute_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
) -> String {
    if let Some(spec) = log_filter {
        return spec.to_string();
    }
    if trace {
        return level_spec_for("trace");
    }
    if debug {
        return level_spec_for("debug");
    }
    if let Some(lvl) = log_level {
        return level_spec_for(lvl);
    }
    if let Ok(spec) = env::var("RUST_LOG") {
        return spec;
    }
    level_spec_for("info")
}

/// Create an `EnvFilter` from a spec string.
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}
