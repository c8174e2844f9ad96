//! Spec-file grammar, layered configuration, and the resolved [`TestSpec`]
//! type shared by the suite builder and orchestrator.
//!
//! This crate has no knowledge of subprocesses, sound, or timing: it only
//! turns `.test`/`.ini` files on disk into typed, suite-relative settings.

#![warn(missing_docs)]

mod config;
mod error;
mod parse;
mod protocol;
mod spec;
mod testcase;

pub use config::{Config, DEFAULTS_INI, SETUP_INI, TESTSPEC_EXTENSION};
pub use error::{Error, Result};
pub use parse::{parse_spec_file, parse_spec_str, tokenize_cmdline};
pub use protocol::{Patterns, KEY_COMPLETE_PATTERN, KEY_PROMPT_PATTERN, KEY_READY_PATTERN};
pub use spec::Spec;
pub use testcase::{TestKind, TestSpec};
