//! WAV baseline I/O via `hound`.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{Error, Result};

/// Samples plus the sample rate they were recorded at.
pub struct WavData {
    /// Mono samples, normalized to `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

/// Load a mono (or first-channel-of-stereo) WAV file as `f32` samples.
pub fn load_wav(path: &Path) -> Result<WavData> {
    let mut reader = WavReader::open(path).map_err(|source| Error::Wav {
        path: path.to_path_buf(),
        source,
    })?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let samples: std::result::Result<Vec<f32>, hound::Error> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().step_by(channels.max(1)).collect(),
        SampleFormat::Int => {
            let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .step_by(channels.max(1))
                .map(|s| s.map(|v| v as f32 / max))
                .collect()
        }
    };
    let samples = samples.map_err(|source| Error::Wav {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(WavData {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Write mono `f32` samples as a 32-bit float WAV file.
pub fn save_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).map_err(|source| Error::Wav {
        path: path.to_path_buf(),
        source,
    })?;
    for &sample in samples {
        writer.write_sample(sample).map_err(|source| Error::Wav {
            path: path.to_path_buf(),
            source,
        })?;
    }
    writer.finalize().map_err(|source| Error::Wav {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_mono_float_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.wav");
        let samples = vec![0.0_f32, 0.25, -0.25, 0.5, -1.0];
        save_wav(&path, &samples, 48_000).unwrap();

        let loaded = load_wav(&path).unwrap();
        assert_eq!(loaded.sample_rate, 48_000);
        for (a, b) in loaded.samples.iter().zip(&samples) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
