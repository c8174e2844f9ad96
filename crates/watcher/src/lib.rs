//! Subprocess scaffolding for driving an interactive CLI subject: spawning
//! it with piped stdio, draining its output on background threads, and a
//! single-slot match rendezvous steps use to wait for specific output.

#![warn(missing_docs)]

mod error;
mod matcher;
mod process;
mod reader;
mod watcher;

pub use error::{Error, Result};
pub use matcher::{MatchBuilder, MatchCond, MatchTask};
pub use process::{
    is_running, launch_subprocess, looks_executable, terminate_child, terminate_child_sync,
    ProcessConfig, SubProcHandle,
};
pub use watcher::Watcher;
