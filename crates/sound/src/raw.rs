//! Headerless mono PCM: the format the subject writes its probes in.
//!
//! A raw probe file is nothing but native-endian `f32` samples back to
//! back, mono, at a sample rate agreed out of band (the suite config's
//! default, unless a testcase overrides it).

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Default sample rate assumed for raw probes when a testcase doesn't
/// specify one.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Load a headerless mono `f32` PCM file into memory.
pub fn load_raw(path: &Path) -> Result<Vec<f32>> {
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.len() % 4 != 0 {
        return Err(Error::TruncatedSample {
            path: path.to_path_buf(),
            len: bytes.len() as u64,
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_ne_bytes(chunk.try_into().expect("chunk is exactly 4 bytes")))
        .collect())
}

/// Atomically write `samples` as headerless `f32` PCM to `path` (write to a
/// sibling temp file, then rename over the destination).
pub fn save_raw(path: &Path, samples: &[f32]) -> Result<()> {
    let tmp_path = sibling_temp_path(path);
    {
        let mut file = fs::File::create(&tmp_path).map_err(|source| Error::Io {
            path: tmp_path.clone(),
            source,
        })?;
        for sample in samples {
            file.write_all(&sample.to_ne_bytes())
                .map_err(|source| Error::Io {
                    path: tmp_path.clone(),
                    source,
                })?;
        }
    }
    fs::rename(&tmp_path, path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn sibling_temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.raw");
        let samples = vec![0.0_f32, 0.5, -0.5, 1.0, -1.0];
        save_raw(&path, &samples).unwrap();
        let loaded = load_raw(&path).unwrap();
        assert_eq!(loaded, samples);
    }

    #[test]
    fn truncated_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.raw");
        fs::write(&path, [0u8, 1, 2]).unwrap();
        assert!(matches!(
            load_raw(&path),
            Err(Error::TruncatedSample { .. })
        ));
    }

    #[test]
    fn save_does_not_leave_a_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.raw");
        save_raw(&path, &[1.0]).unwrap();
        assert!(!sibling_temp_path(&path).exists());
        assert!(path.exists());
    }
}
