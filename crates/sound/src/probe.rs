//! Sound probes, residuals against a baseline, and the RMS/dBFS math the
//! judgement step classifies against.

use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    raw, wav,
};

/// Residual peak RMS level (dB) above which a sound comparison warns.
pub const DIFF_WARN_LEVEL_DB: f64 = -200.0;
/// Residual peak RMS level (dB) above which a sound comparison is a
/// violation rather than a warning.
pub const DIFF_ERROR_LEVEL_DB: f64 = -100.0;
/// Probe peak level (dBFS) below which the probe itself is considered too
/// faint to meaningfully test against a baseline.
pub const FAINT_PROBE_LEVEL_DB: f64 = -60.0;

/// A captured sound sample buffer.
#[derive(Debug, Clone)]
pub struct Probe {
    /// Mono samples.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

/// The per-sample difference between a probe and its baseline, plus its
/// summary peak RMS level.
#[derive(Debug, Clone)]
pub struct Residual {
    /// Per-sample `probe - baseline`.
    pub samples: Vec<f32>,
    /// Peak RMS level of the residual, in dB relative to full scale.
    pub peak_rms_db: f64,
}

impl Probe {
    /// Load a probe from a headerless raw PCM file at `sample_rate`.
    pub fn load_raw(path: &Path, sample_rate: u32) -> Result<Self> {
        Ok(Self {
            samples: raw::load_raw(path)?,
            sample_rate,
        })
    }

    /// Load a probe (or baseline) from a WAV file.
    pub fn load_wav(path: &Path) -> Result<Self> {
        let wav::WavData {
            samples,
            sample_rate,
        } = wav::load_wav(path)?;
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Persist this probe as headerless raw PCM.
    pub fn save_raw(&self, path: &Path) -> Result<()> {
        raw::save_raw(path, &self.samples)
    }

    /// Persist this probe as a float WAV file.
    pub fn save_wav(&self, path: &Path) -> Result<()> {
        wav::save_wav(path, &self.samples, self.sample_rate)
    }

    /// This probe's average RMS over its full buffer, linear (not dB). The
    /// reference every residual's peak RMS is measured against.
    pub fn avg_rms(&self) -> f64 {
        rms(&self.samples)
    }

    /// This probe's average RMS level, in dBFS.
    pub fn avg_level_db(&self) -> f64 {
        db_relative_to(self.avg_rms(), 1.0)
    }

    /// Peak RMS level of this probe itself, in dBFS, over a sliding window
    /// sized for a ~20ms analysis frame at this probe's sample rate.
    pub fn peak_level_db(&self) -> f64 {
        db_relative_to(peak_rms(&self.samples, window_len(self.sample_rate)), 1.0)
    }

    /// Whether this probe is too quiet to be a meaningful test signal:
    /// average RMS below [`FAINT_PROBE_LEVEL_DB`].
    pub fn is_faint(&self) -> bool {
        self.avg_level_db() < FAINT_PROBE_LEVEL_DB
    }

    /// Compute the residual of this probe against `baseline`. Both buffers
    /// must have the same length. The residual's peak RMS is expressed in
    /// dB relative to this probe's own average RMS, not full scale.
    pub fn diff(&self, baseline: &Probe) -> Result<Residual> {
        if self.samples.len() != baseline.samples.len() {
            return Err(Error::LengthMismatch {
                probe_len: self.samples.len(),
                baseline_len: baseline.samples.len(),
            });
        }
        let samples: Vec<f32> = self
            .samples
            .iter()
            .zip(&baseline.samples)
            .map(|(p, b)| p - b)
            .collect();
        let peak_residual_rms = peak_rms(&samples, window_len(self.sample_rate));
        let probe_avg_rms = self.avg_rms();
        let reference = if probe_avg_rms > 0.0 { probe_avg_rms } else { 1.0 };
        let peak_rms_db = db_relative_to(peak_residual_rms, reference);
        Ok(Residual {
            samples,
            peak_rms_db,
        })
    }
}

impl Residual {
    /// Persist the residual waveform as a float WAV file, for manual
    /// inspection of a failing comparison.
    pub fn save_wav(&self, path: &Path, sample_rate: u32) -> Result<()> {
        wav::save_wav(path, &self.samples, sample_rate)
    }
}

/// Remove a previously saved probe/residual file, if present. No-op if it
/// doesn't exist.
pub fn discard_storage(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "discarded stored probe");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn window_len(sample_rate: u32) -> usize {
    ((sample_rate as f64) * 0.02).round().max(1.0) as usize
}

/// RMS over the full buffer, linear (not dB).
fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|s| (*s as f64).powi(2)).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Peak RMS over sliding windows of `window` samples, linear (not dB).
fn peak_rms(samples: &[f32], window: usize) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let window = window.max(1).min(samples.len());
    let mut current: f64 = samples[..window].iter().map(|s| (*s as f64).powi(2)).sum();
    let mut peak_sq_sum = current;
    for i in window..samples.len() {
        current += (samples[i] as f64).powi(2) - (samples[i - window] as f64).powi(2);
        peak_sq_sum = peak_sq_sum.max(current);
    }
    (peak_sq_sum / window as f64).sqrt()
}

/// `value` expressed in dB relative to `reference`. A zero `value` reports
/// `-inf`.
fn db_relative_to(value: f64, reference: f64) -> f64 {
    if value <= 0.0 {
        return f64::NEG_INFINITY;
    }
    20.0 * (value / reference).log10()
}

/// Derive a sibling path for a residual file next to `path`, inserting
/// `suffix` before the extension (e.g. `probe.wav` -> `probe.residual.wav`).
pub fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_stem()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_probes_diff_to_silence() {
        let a = Probe {
            samples: vec![0.1, -0.2, 0.3, -0.1],
            sample_rate: 48_000,
        };
        let b = a.clone();
        let residual = a.diff(&b).unwrap();
        assert!(residual.peak_rms_db.is_infinite() || residual.peak_rms_db < -300.0);
    }

    #[test]
    fn full_scale_square_wave_is_near_zero_db() {
        let samples = vec![1.0_f32; 2000];
        let probe = Probe {
            samples,
            sample_rate: 48_000,
        };
        assert!(probe.peak_level_db() > -0.1);
    }

    #[test]
    fn silence_is_faint() {
        let probe = Probe {
            samples: vec![0.0; 2000],
            sample_rate: 48_000,
        };
        assert!(probe.is_faint());
    }

    #[test]
    fn mismatched_lengths_error() {
        let a = Probe {
            samples: vec![0.0; 3],
            sample_rate: 48_000,
        };
        let b = Probe {
            samples: vec![0.0; 4],
            sample_rate: 48_000,
        };
        assert!(matches!(a.diff(&b), Err(Error::LengthMismatch { .. })));
    }

    #[test]
    fn discard_storage_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        discard_storage(&dir.path().join("absent.wav")).unwrap();
    }

    #[test]
    fn sibling_naming_inserts_suffix_before_extension() {
        let path = Path::new("/tmp/case/probe.wav");
        assert_eq!(sibling(path, ".residual"), PathBuf::from("/tmp/case/probe.residual.wav"));
    }
}
