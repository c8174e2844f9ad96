//! Command-line interface for the `testrunner` binary.

use std::path::PathBuf;

use clap::Parser;
use progress::LogArgs;

/// Acceptance test runner for a real-time audio synthesizer CLI.
#[derive(Parser, Debug)]
#[command(name = "testrunner", about = "Run the synthesizer acceptance testsuite", version)]
pub struct Cli {
    /// Logging controls shared across the runner's crates.
    #[command(flatten)]
    pub log: LogArgs,

    /// Root directory of the testsuite definition tree (holds
    /// `defaults.ini` and the `.test` file hierarchy).
    #[arg(long, value_name = "DIR")]
    pub suite: PathBuf,

    /// Path to the subject executable under test, overriding any
    /// `Test.subject` set in the testsuite's `defaults.ini`.
    #[arg(long, value_name = "PATH")]
    pub subject: Option<PathBuf>,

    /// Extra arguments appended to every testcase's subject invocation,
    /// overriding `Test.arguments`.
    #[arg(long, value_name = "ARGS")]
    pub arguments: Option<String>,

    /// Accept this run's measurements as the new per-testcase expense
    /// baseline.
    #[arg(long)]
    pub baseline: bool,

    /// Accept this run's suite-wide timing trend as the new persisted
    /// history, instead of merely reporting against the existing one.
    #[arg(long)]
    pub calibrate: bool,

    /// Print the report to stdout only (default); combine with `--report`
    /// to also write it to a file.
    #[arg(long)]
    pub verbose: bool,

    /// Also write the rendered report to this file.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_required_flags() {
        let cli = Cli::try_parse_from(["testrunner", "--suite", "/tmp/suite"]).unwrap();
        assert_eq!(cli.suite, PathBuf::from("/tmp/suite"));
        assert!(!cli.baseline);
        assert!(!cli.calibrate);
    }

    #[test]
    fn rejects_missing_suite() {
        assert!(Cli::try_parse_from(["testrunner"]).is_err());
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "testrunner",
            "--suite",
            "/tmp/suite",
            "--subject",
            "/tmp/synth",
            "--arguments",
            "--headless",
            "--baseline",
            "--calibrate",
            "--verbose",
            "--report",
            "/tmp/report.txt",
        ])
        .unwrap();
        assert_eq!(cli.subject, Some(PathBuf::from("/tmp/synth")));
        assert_eq!(cli.arguments.as_deref(), Some("--headless"));
        assert!(cli.baseline);
        assert!(cli.calibrate);
        assert!(cli.verbose);
        assert_eq!(cli.report, Some(PathBuf::from("/tmp/report.txt")));
    }
}
