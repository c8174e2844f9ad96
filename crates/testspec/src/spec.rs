//! Typed access over a flat `key -> value` map produced by [`crate::parse`].

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::{Error, Result};

/// A flat, ordered set of string settings with typed accessors.
///
/// Wraps the map produced by parsing one or more spec/INI files after
/// layering (see [`crate::config::Config`]). Keys are dotted paths such as
/// `Test.type` or `Timing.tolerance`.
#[derive(Debug, Clone, Default)]
pub struct Spec {
    values: BTreeMap<String, String>,
}

impl Spec {
    /// Wrap an already-merged map.
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Raw string lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Raw string lookup with a fallback.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Raw string lookup, erroring if absent.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::MissingKey {
            key: key.to_string(),
        })
    }

    /// Insert or overwrite a value; used when layering config sources.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Merge `other` into `self`, with `other`'s values taking precedence.
    pub fn merge_from(&mut self, other: &Spec) {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), v.clone());
        }
    }

    /// Iterate all key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse a boolean value. Accepts `true`/`false`/`yes`/`no`/`1`/`0`
    /// case-insensitively.
    pub fn as_bool(&self, key: &str) -> Result<Option<bool>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            _ => Err(Error::BadValue {
                key: key.to_string(),
                value: raw.to_string(),
                expected: "bool",
            }),
        }
    }

    /// Like [`Self::as_bool`] but with a default for an absent key.
    pub fn as_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self.as_bool(key)?.unwrap_or(default))
    }

    /// Parse an integer value.
    pub fn as_i64(&self, key: &str) -> Result<Option<i64>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        raw.trim().parse().map(Some).map_err(|_| Error::BadValue {
            key: key.to_string(),
            value: raw.to_string(),
            expected: "integer",
        })
    }

    /// Parse a floating-point value.
    pub fn as_f64(&self, key: &str) -> Result<Option<f64>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        raw.trim().parse().map(Some).map_err(|_| Error::BadValue {
            key: key.to_string(),
            value: raw.to_string(),
            expected: "float",
        })
    }

    /// Parse a value as whole seconds, returning a [`Duration`].
    pub fn as_duration_secs(&self, key: &str) -> Result<Option<Duration>> {
        let Some(secs) = self.as_f64(key)? else {
            return Ok(None);
        };
        if secs < 0.0 {
            return Err(Error::BadValue {
                key: key.to_string(),
                value: secs.to_string(),
                expected: "duration(seconds), non-negative",
            });
        }
        Ok(Some(Duration::from_secs_f64(secs)))
    }

    /// Resolve a value as a filesystem path, relative to `base` if it is
    /// not already absolute.
    pub fn as_path(&self, key: &str, base: &Path) -> Option<PathBuf> {
        let raw = self.get(key)?;
        let candidate = Path::new(raw);
        Some(if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            base.join(candidate)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_from(pairs: &[(&str, &str)]) -> Spec {
        let mut values = BTreeMap::new();
        for (k, v) in pairs {
            values.insert(k.to_string(), v.to_string());
        }
        Spec::new(values)
    }

    #[test]
    fn bool_accepts_common_spellings() {
        let s = spec_from(&[("a", "yes"), ("b", "False"), ("c", "1")]);
        assert_eq!(s.as_bool("a").unwrap(), Some(true));
        assert_eq!(s.as_bool("b").unwrap(), Some(false));
        assert_eq!(s.as_bool("c").unwrap(), Some(true));
        assert!(s.as_bool("missing").unwrap().is_none());
    }

    #[test]
    fn bool_rejects_garbage() {
        let s = spec_from(&[("a", "maybe")]);
        assert!(s.as_bool("a").is_err());
    }

    #[test]
    fn duration_rejects_negative() {
        let s = spec_from(&[("a", "-3")]);
        assert!(s.as_duration_secs("a").is_err());
    }

    #[test]
    fn path_is_joined_to_base_when_relative() {
        let s = spec_from(&[("p", "sub/file.test")]);
        let base = Path::new("/suite/root");
        assert_eq!(
            s.as_path("p", base).unwrap(),
            PathBuf::from("/suite/root/sub/file.test")
        );
    }

    #[test]
    fn path_is_kept_when_absolute() {
        let s = spec_from(&[("p", "/abs/file.test")]);
        let base = Path::new("/suite/root");
        assert_eq!(s.as_path("p", base).unwrap(), PathBuf::from("/abs/file.test"));
    }

    #[test]
    fn require_errors_on_missing_key() {
        let s = Spec::default();
        assert!(s.require("Test.type").is_err());
    }

    #[test]
    fn merge_from_overwrites_existing_keys() {
        let mut base = spec_from(&[("a", "1"), ("b", "2")]);
        let overlay = spec_from(&[("b", "3"), ("c", "4")]);
        base.merge_from(&overlay);
        assert_eq!(base.get("a"), Some("1"));
        assert_eq!(base.get("b"), Some("3"));
        assert_eq!(base.get("c"), Some("4"));
    }
}
