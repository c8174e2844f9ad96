//! [`TestSpec`]: the fully-resolved description of a single testcase.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{config::TESTSPEC_EXTENSION, error::Error, parse::parse_spec_file, spec::Spec};

/// Which [`crate::protocol::Patterns`]-driven wiring a testcase needs.
///
/// Only `Cli` is implemented; `Lv2` is recognized so a `.test` file naming
/// it fails with a clear "not yet supported" error rather than a parse
/// error, mirroring the original leaving its LV2 mould unimplemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    /// Subject is an interactive CLI process driven over stdio pipes.
    Cli,
    /// Subject is an LV2 plugin. Not implemented.
    Lv2,
}

impl TestKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "CLI" => Some(Self::Cli),
            "LV2" => Some(Self::Lv2),
            _ => None,
        }
    }
}

/// Fully-resolved settings for one testcase, after config layering and
/// suite-wide defaults have been applied.
#[derive(Debug, Clone)]
pub struct TestSpec {
    /// Slash-separated path of the testcase relative to the suite root,
    /// without the `.test` extension, e.g. `features/oscillator/sine`.
    pub topic: String,
    /// Directory containing the `.test` file; working directory for the
    /// subject process and the base for relative paths in this spec.
    pub case_dir: PathBuf,
    /// Kind of wiring this testcase needs.
    pub kind: TestKind,
    /// Path to the subject executable.
    pub subject: PathBuf,
    /// Arguments passed to the subject on launch.
    pub arguments: Vec<String>,
    /// Optional setup script fed to the subject's stdin before the timed
    /// invocation begins.
    pub setup_script: Option<String>,
    /// Commandline fed to the subject for the timed invocation itself.
    pub invocation: String,
    /// Whether this testcase records a sound probe.
    pub capture_sound: bool,
    /// Path (relative to `case_dir`) of the baseline WAV/RAW file, when
    /// `capture_sound` is set.
    pub baseline: Option<PathBuf>,
    /// Where the subject is expected to write its raw PCM capture, when
    /// `capture_sound` is set.
    pub probe_path: PathBuf,
    /// Sample rate (Hz) of the raw PCM the subject writes.
    pub sample_rate: u32,
    /// Where this testcase's runtime history CSV lives.
    pub runtime_csv: PathBuf,
    /// Where this testcase's expense-baseline history CSV lives.
    pub expense_csv: PathBuf,
    /// Timeout applied to each step of this testcase.
    pub timeout: Duration,
    /// Additional tolerance (in dB) layered onto the suite-wide default
    /// when judging sound residuals.
    pub sound_tolerance_db: Option<f64>,
    /// Additional tolerance (fractional) layered onto the suite-wide
    /// default when judging timing.
    pub timing_tolerance: Option<f64>,
    /// All resolved settings, retained for components that need a raw key
    /// not promoted to a dedicated field above.
    pub raw: Spec,
}

const KEY_TYPE: &str = "Test.type";
const KEY_SUBJECT: &str = "Test.subject";
const KEY_ARGUMENTS: &str = "Test.arguments";
const KEY_SCRIPT: &str = "Script";
const KEY_INVOCATION: &str = "Invocation";
const KEY_CAPTURE_SOUND: &str = "Test.captureSound";
const KEY_BASELINE: &str = "Test.baseline";
const KEY_TIMEOUT: &str = "Test.timeout";
const KEY_SOUND_TOLERANCE: &str = "Sound.tolerance";
const KEY_TIMING_TOLERANCE: &str = "Timing.tolerance";
const KEY_FILE_PROBE: &str = "Sound.fileProbe";
const KEY_SAMPLE_RATE: &str = "Invocation.sample_rate";
const KEY_FILE_RUNTIME: &str = "Timing.fileRuntime";
const KEY_FILE_EXPENSE: &str = "Timing.fileExpense";

const DEFAULT_FILE_PROBE: &str = "sound";
const DEFAULT_FILE_RUNTIME: &str = "timing";
const DEFAULT_FILE_EXPENSE: &str = "expense";
/// Matches [`sound::DEFAULT_SAMPLE_RATE`]; duplicated here so this crate
/// stays free of a dependency on the sound-handling crate.
const DEFAULT_SAMPLE_RATE: u32 = 48_000;

impl TestSpec {
    /// Parse and resolve a single `.test` file, layering its own settings
    /// on top of `inherited` (suite-wide defaults plus any ancestor
    /// directory overlays already merged by the caller). `default_timeout`
    /// is the suite-wide per-step timeout used when this testcase doesn't
    /// set its own `Test.timeout`.
    pub fn load(
        path: &Path,
        topic: &str,
        inherited: &Spec,
        default_timeout: Duration,
    ) -> Result<Self, Error> {
        if path.extension().and_then(|e| e.to_str()) != Some(&TESTSPEC_EXTENSION[1..]) {
            return Err(Error::InvalidDefinition {
                path: path.to_path_buf(),
                line: 0,
                content: format!("testcase file must end in '{TESTSPEC_EXTENSION}'"),
            });
        }
        let case_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let own = parse_spec_file(path)?;
        let mut merged = inherited.clone();
        merged.merge_from(&Spec::new(own));

        let kind_raw = merged.require(KEY_TYPE)?.to_string();
        let kind = TestKind::parse(&kind_raw).ok_or_else(|| Error::BadValue {
            key: KEY_TYPE.to_string(),
            value: kind_raw.clone(),
            expected: "one of 'CLI', 'LV2'",
        })?;
        if kind == TestKind::Lv2 {
            return Err(Error::BadValue {
                key: KEY_TYPE.to_string(),
                value: kind_raw,
                expected: "'CLI' (LV2 subjects are not yet supported)",
            });
        }

        let subject_raw = merged.require(KEY_SUBJECT)?;
        let subject = merged
            .as_path(KEY_SUBJECT, &case_dir)
            .unwrap_or_else(|| PathBuf::from(subject_raw));
        if !subject.exists() {
            return Err(Error::SubjectNotFound(subject));
        }

        let arguments = crate::parse::tokenize_cmdline(merged.get_or(KEY_ARGUMENTS, ""));
        let setup_script = merged.get(KEY_SCRIPT).map(str::to_string);
        let invocation = merged.get_or(KEY_INVOCATION, "").to_string();
        let capture_sound = merged.as_bool_or(KEY_CAPTURE_SOUND, false)?;
        let baseline = if capture_sound {
            Some(
                merged
                    .as_path(KEY_BASELINE, &case_dir)
                    .ok_or_else(|| Error::MissingKey {
                        key: KEY_BASELINE.to_string(),
                    })?,
            )
        } else {
            None
        };
        let timeout = merged
            .as_duration_secs(KEY_TIMEOUT)?
            .unwrap_or(default_timeout);
        let sound_tolerance_db = merged.as_f64(KEY_SOUND_TOLERANCE)?;
        let timing_tolerance = merged.as_f64(KEY_TIMING_TOLERANCE)?;
        let probe_stem = merged.get_or(KEY_FILE_PROBE, DEFAULT_FILE_PROBE);
        let probe_path = case_dir.join(probe_stem).with_extension("raw");
        let sample_rate = merged
            .as_i64(KEY_SAMPLE_RATE)?
            .map(|v| v as u32)
            .unwrap_or(DEFAULT_SAMPLE_RATE);
        let runtime_csv = case_dir
            .join(merged.get_or(KEY_FILE_RUNTIME, DEFAULT_FILE_RUNTIME))
            .with_extension("csv");
        let expense_csv = case_dir
            .join(merged.get_or(KEY_FILE_EXPENSE, DEFAULT_FILE_EXPENSE))
            .with_extension("csv");

        Ok(Self {
            topic: topic.to_string(),
            case_dir,
            kind,
            subject,
            arguments,
            setup_script,
            invocation,
            capture_sound,
            baseline,
            probe_path,
            sample_rate,
            runtime_csv,
            expense_csv,
            timeout,
            sound_tolerance_db,
            timing_tolerance,
            raw: merged,
        })
    }
}
