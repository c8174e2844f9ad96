//! Capped, atomically-written CSV history files shared by the runtime and
//! expense tables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

/// Read every row of `path` as `T`. A missing file yields an empty vec.
pub fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path).map_err(|source| Error::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()
        .map_err(|source| Error::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Write `rows` to `path`, keeping only the last `keep` of them, atomically
/// (temp file + rename).
pub fn save_rows_capped<T: Serialize>(path: &Path, rows: &[T], keep: usize) -> Result<()> {
    let start = rows.len().saturating_sub(keep.max(1));
    let tmp_path = sibling_temp_path(path);
    {
        let mut writer = csv::Writer::from_path(&tmp_path).map_err(|source| Error::Csv {
            path: tmp_path.clone(),
            source,
        })?;
        for row in &rows[start..] {
            writer.serialize(row).map_err(|source| Error::Csv {
                path: tmp_path.clone(),
                source,
            })?;
        }
        writer.flush().map_err(|source| Error::Io {
            path: tmp_path.clone(),
            source,
        })?;
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
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Row {
        #[serde(rename = "Value")]
        value: u32,
    }

    #[test]
    fn caps_history_to_the_last_n_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let rows: Vec<Row> = (0..10).map(|v| Row { value: v }).collect();
        save_rows_capped(&path, &rows, 3).unwrap();

        let loaded: Vec<Row> = load_rows(&path).unwrap();
        assert_eq!(loaded, vec![Row { value: 7 }, Row { value: 8 }, Row { value: 9 }]);
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let rows: Vec<Row> = load_rows(&dir.path().join("absent.csv")).unwrap();
        assert!(rows.is_empty());
    }
}
