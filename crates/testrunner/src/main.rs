//! Binary entry point: parses CLI flags, wires up logging, runs the
//! discovered testsuite and renders its report, grounded on the original's
//! `Main.cpp` (`Config` → `Suite` → `Stage::perform`/`renderReport`).

mod cli;

use std::{process::ExitCode, sync::Arc, time::Duration};

use clap::Parser;
use cli::Cli;
use testspec::Spec;

fn main() -> ExitCode {
    let mut cli = Cli::parse();
    if cli.verbose && !cli.log.trace && !cli.log.debug && cli.log.log_level.is_none() {
        cli.log.debug = true;
    }
    progress::init_tracing(&cli.log);

    let mut overrides = Spec::default();
    if let Some(subject) = &cli.subject {
        overrides.set("Test.subject", subject.to_string_lossy());
    }
    if let Some(arguments) = &cli.arguments {
        overrides.set("Test.arguments", arguments.clone());
    }

    let run_cfg = suite::RunConfig {
        suite_root: cli.suite.clone(),
        baseline_mode: cli.baseline,
        calibrate_mode: cli.calibrate,
        default_timeout: Duration::from_secs(10),
    };
    let progress = Arc::new(progress::Progress::in_memory());

    // A single current-thread runtime for the whole run: the orchestrator
    // itself is a plain synchronous directory walk, and only the subject
    // match/await points underneath it ever suspend, so a full
    // multi-threaded tokio runtime would be pure overhead.
    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            return ExitCode::from(suite::ResCode::Debacle.exit_code() as u8);
        }
    };

    match rt.block_on(suite::run(&run_cfg, &overrides, progress)) {
        Ok(run_report) => {
            if let Err(err) = report::emit(&run_report.log, cli.report.as_deref()) {
                eprintln!("failed to write report: {err}");
                return ExitCode::from(suite::ResCode::Debacle.exit_code() as u8);
            }
            ExitCode::from(run_report.worst.exit_code() as u8)
        }
        Err(err) => {
            eprintln!("testsuite run aborted: {err}");
            ExitCode::from(suite::ResCode::Debacle.exit_code() as u8)
        }
    }
}
