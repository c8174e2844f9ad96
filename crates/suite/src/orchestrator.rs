//! Discovers the testcases under a suite directory and runs them in turn,
//! grounded on the original's `setup::Builder::buildTree` (directory
//! traversal and topic naming) and `Stage::perform`/`Stage::getReturnCode`
//! (suite-wide result accumulation and exit code).

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use testspec::{Config, Spec, TestSpec, TESTSPEC_EXTENSION};
use timing::{SuiteStatistics, Timings};

use crate::{
    case::Case,
    context::SuiteContext,
    error::Result,
    outcome::{ResCode, TestLog},
    trend,
};

/// Filename suite-wide trend/model statistics persist under, inside the
/// suite root, mirroring the original's `PersistModelTrend` step.
const TREND_FILE: &str = "trend.json";

/// One discovered testcase: its slash-separated topic and defining file.
#[derive(Debug, Clone)]
struct Discovered {
    topic: String,
    path: PathBuf,
}

/// Walk `dir`, collecting every `.test` file beneath it. At each level,
/// testcases sort before subfolders, and each group sorts by name — the
/// original's `SubTraversal` achieves the same ordering via `std::set`.
fn discover(dir: &Path, topic_prefix: &str, out: &mut Vec<Discovered>) -> std::io::Result<()> {
    let mut testcases = BTreeSet::new();
    let mut subfolders = BTreeSet::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            subfolders.insert(path);
        } else if path.extension().and_then(|e| e.to_str()) == Some(&TESTSPEC_EXTENSION[1..]) {
            testcases.insert(path);
        }
    }
    for path in testcases {
        let stem = path.file_stem().unwrap_or_default().to_string_lossy();
        let topic = join_topic(topic_prefix, &stem);
        out.push(Discovered { topic, path });
    }
    for sub in subfolders {
        let name = sub.file_name().unwrap_or_default().to_string_lossy();
        discover(&sub, &join_topic(topic_prefix, &name), out)?;
    }
    Ok(())
}

fn as_usize_or(spec: &Spec, key: &str, default: usize) -> Result<usize> {
    Ok(spec.as_i64(key)?.map(|v| v as usize).unwrap_or(default))
}

fn join_topic(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}/{segment}")
    }
}

/// Tunables that don't belong to any single testcase, resolved once from
/// the layered config at suite start.
pub struct RunConfig {
    /// Suite root directory, holding `defaults.ini` and the testcase tree.
    pub suite_root: PathBuf,
    /// Whether this run should accept newly measured timings as the next
    /// expense baseline for every testcase it measures (the `--baseline`
    /// CLI flag).
    pub baseline_mode: bool,
    /// Whether this run's suite-wide trend measurement is trustworthy
    /// enough to overwrite the persisted trend history (the `--calibrate`
    /// CLI flag). Every run still computes and reports the trend judgement;
    /// only a calibrating run commits it, mirroring the original's
    /// `PersistModelTrend` step taking a `calibrationMode_` flag.
    pub calibrate_mode: bool,
    /// Default per-step timeout used when a testcase doesn't override it.
    pub default_timeout: std::time::Duration,
}

const KEY_TIMINGS_KEEP: &str = "Timing.keep";
const KEY_BASELINE_KEEP: &str = "Timing.baselineKeep";
const KEY_BASELINE_AVG: &str = "Timing.baselineAvg";
const KEY_SHORT_TERM_WINDOW: &str = "Timing.shortTermWindow";
const KEY_LONG_TERM_WINDOW: &str = "Timing.longTermWindow";

const DEFAULT_TIMINGS_KEEP: usize = 200;
const DEFAULT_BASELINE_KEEP: usize = 50;
const DEFAULT_BASELINE_AVG: u32 = 5;
const DEFAULT_SHORT_TERM_WINDOW: usize = 5;
const DEFAULT_LONG_TERM_WINDOW: usize = 20;

/// Outcome of one suite run: the merged log of every case (plus the
/// suite-wide trend judgement) and the worst [`ResCode`] across all of it.
pub struct RunReport {
    /// Every step outcome recorded across every case, plus the trailing
    /// suite-wide trend entry.
    pub log: TestLog,
    /// Worst [`ResCode`] seen; this is what the binary's exit code maps.
    pub worst: ResCode,
    /// Number of testcases discovered and run.
    pub case_count: usize,
}

/// Discover, build and run every testcase under `run.suite_root`, then
/// judge the suite-wide timing trend and persist it.
///
/// This is the realization of the original's `Builder::buildTree` +
/// `Stage::perform`: a synchronous walk over the suite directory that
/// awaits each case's match points in turn. The caller drives this on a
/// single current-thread tokio runtime scoped to the whole run, rather
/// than a whole-program multi-threaded executor.
pub async fn run(run: &RunConfig, overrides: &Spec, progress: Arc<progress::Progress>) -> Result<RunReport> {
    let mut discovered = Vec::new();
    discover(&run.suite_root, "", &mut discovered)?;

    let config = Config::new(&run.suite_root);
    let merged = config.load(overrides)?;
    let patterns = Arc::new(testspec::Patterns::from_spec(&merged)?);
    let timings_keep = as_usize_or(&merged, KEY_TIMINGS_KEEP, DEFAULT_TIMINGS_KEEP)?;
    let baseline_keep = as_usize_or(&merged, KEY_BASELINE_KEEP, DEFAULT_BASELINE_KEEP)?;
    let baseline_avg = merged
        .as_i64(KEY_BASELINE_AVG)?
        .map(|v| v as u32)
        .unwrap_or(DEFAULT_BASELINE_AVG);
    let short_term_window = as_usize_or(&merged, KEY_SHORT_TERM_WINDOW, DEFAULT_SHORT_TERM_WINDOW)?;
    let long_term_window = as_usize_or(&merged, KEY_LONG_TERM_WINDOW, DEFAULT_LONG_TERM_WINDOW)?;
    let timings = Arc::new(Timings::new(timings_keep, baseline_keep, baseline_avg));

    let suite_ctx = SuiteContext {
        progress: Arc::clone(&progress),
        timings: Arc::clone(&timings),
        patterns,
        default_timeout: run.default_timeout,
        baseline_mode: run.baseline_mode,
    };

    let mut log = TestLog::new();
    let mut deltas = Vec::new();

    for item in &discovered {
        progress.note(format!("running {}", item.topic));
        let spec = match TestSpec::load(&item.path, &item.topic, &merged, run.default_timeout) {
            Ok(spec) => spec,
            Err(err) => {
                log.record(
                    item.topic.clone(),
                    "mould",
                    crate::outcome::Outcome::malfunction(format!(
                        "failed to resolve testcase settings: {err}"
                    )),
                );
                continue;
            }
        };
        let case = match Case::new(suite_ctx.clone(), spec) {
            Ok(case) => case,
            Err(err) => {
                log.record(
                    item.topic.clone(),
                    "mould",
                    crate::outcome::Outcome::malfunction(format!(
                        "failed to build step graph: {err}"
                    )),
                );
                continue;
            }
        };
        let (case_log, _worst, delta_ms) = case.run().await;
        if let Some(delta) = delta_ms {
            deltas.push(delta);
        }
        log.merge(case_log);
    }

    let trend_path = run.suite_root.join(TREND_FILE);
    let mut stats = SuiteStatistics::load_or_default(&trend_path, short_term_window, long_term_window)?;
    if let Some(model) = timings.platform_model() {
        let average_delta = if deltas.is_empty() {
            0.0
        } else {
            deltas.iter().sum::<f64>() / deltas.len() as f64
        };
        let configured_tolerance = 0.0;
        let outcome = trend::observe_and_judge(&mut stats, average_delta, configured_tolerance, model.stdev_ms);
        log.record("<suite>", "trend", outcome);
        if run.calibrate_mode {
            stats.save(&trend_path)?;
        }
    }

    let worst = log.worst();
    Ok(RunReport {
        log,
        worst,
        case_count: discovered.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_subject(dir: &Path) -> PathBuf {
        let subject = dir.join("subject.sh");
        fs::write(&subject, "#!/bin/sh\necho ready\n").unwrap();
        subject
    }

    #[test]
    fn discover_orders_testcases_before_subfolders_each_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::write(dir.path().join("zeta/inner.test"), "").unwrap();
        fs::write(dir.path().join("b.test"), "").unwrap();
        fs::write(dir.path().join("a.test"), "").unwrap();

        let mut out = Vec::new();
        discover(dir.path(), "", &mut out).unwrap();
        let topics: Vec<_> = out.iter().map(|d| d.topic.clone()).collect();
        assert_eq!(topics, vec!["a", "b", "zeta/inner"]);
    }

    #[tokio::test]
    async fn a_suite_with_no_testcases_runs_clean() {
        let dir = tempfile::tempdir().unwrap();
        write_subject(dir.path());
        fs::write(dir.path().join("defaults.ini"), "").unwrap();

        let run_cfg = RunConfig {
            suite_root: dir.path().to_path_buf(),
            baseline_mode: false,
            calibrate_mode: false,
            default_timeout: std::time::Duration::from_secs(5),
        };
        let progress = Arc::new(progress::Progress::in_memory());
        let report = run(&run_cfg, &Spec::default(), progress).await.unwrap();
        assert_eq!(report.case_count, 0);
        assert_eq!(report.worst, ResCode::Green);
    }
}
