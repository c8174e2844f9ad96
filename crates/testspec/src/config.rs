//! Layered configuration: `defaults.ini` < `setup.ini` < commandline overrides.

use std::path::{Path, PathBuf};

use crate::{error::Result, parse::parse_spec_file, spec::Spec};

/// Filename of the suite-wide defaults layer, checked into the suite root.
pub const DEFAULTS_INI: &str = "defaults.ini";
/// Filename of the optional machine-local overrides layer.
pub const SETUP_INI: &str = "setup.ini";
/// Extension recognized for individual testcase spec files.
pub const TESTSPEC_EXTENSION: &str = ".test";

/// Builds a [`Spec`] by merging, in increasing precedence:
/// `defaults.ini`, then `setup.ini`, then explicit commandline overrides.
///
/// Mirrors the original's `combine_with_decreasing_precedence` chain, just
/// expressed as repeated left-biased overlay instead of a precedence list.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
}

impl Config {
    /// A config rooted at the suite's top-level directory, where
    /// `defaults.ini` and an optional `setup.ini` live.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The suite root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load and merge the configuration layers, with `overrides` (typically
    /// parsed CLI flags) taking highest precedence.
    pub fn load(&self, overrides: &Spec) -> Result<Spec> {
        let defaults = parse_spec_file(self.root.join(DEFAULTS_INI))?;
        let setup = parse_spec_file(self.root.join(SETUP_INI))?;
        tracing::debug!(root = %self.root.display(), "loaded configuration layers");

        let mut merged = Spec::new(defaults);
        merged.merge_from(&Spec::new(setup));
        merged.merge_from(overrides);
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn setup_overrides_defaults_and_cli_overrides_both() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DEFAULTS_INI), "Test.tolerance = 1\nTest.keep = 5\n").unwrap();
        fs::write(dir.path().join(SETUP_INI), "Test.tolerance = 2\n").unwrap();

        let mut cli = Spec::default();
        cli.set("Test.tolerance", "3");

        let cfg = Config::new(dir.path());
        let merged = cfg.load(&cli).unwrap();

        assert_eq!(merged.get("Test.tolerance"), Some("3"));
        assert_eq!(merged.get("Test.keep"), Some("5"));
    }

    #[test]
    fn missing_setup_ini_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DEFAULTS_INI), "Test.tolerance = 1\n").unwrap();

        let cfg = Config::new(dir.path());
        let merged = cfg.load(&Spec::default()).unwrap();
        assert_eq!(merged.get("Test.tolerance"), Some("1"));
    }
}
