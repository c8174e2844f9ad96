//! Spawning the subject process with its three pipes wired up, and the
//! SIGTERM-then-SIGKILL shutdown escalation used to tear it back down.

use std::{
    io::Error as IoError,
    path::{Path, PathBuf},
    process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, Stdio},
    time::Duration,
};

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Time to wait for graceful shutdown after SIGTERM before escalating.
const TERM_WAIT_TIMEOUT_MS: u64 = 500;
/// Poll interval while waiting for graceful exit.
pub(crate) const TERM_POLL_INTERVAL_MS: u64 = 10;

/// Launch configuration for a subject process.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Path to the subject executable.
    pub executable: PathBuf,
    /// Arguments passed on the commandline.
    pub args: Vec<String>,
    /// Working directory for the subject; defaults to the parent process's.
    pub working_dir: Option<PathBuf>,
}

impl ProcessConfig {
    /// A config launching `executable` with `args`, in the current working
    /// directory.
    pub fn new(executable: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            args,
            working_dir: None,
        }
    }

    /// Run the subject from `dir` instead of the parent's working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// The three pipe endpoints of a freshly spawned subject, plus the handle
/// needed to reap or signal it.
pub struct SubProcHandle {
    /// The spawned child. `stdin`/`stdout`/`stderr` have already been taken
    /// out of it into the fields below.
    pub child: Child,
    /// Write end of the subject's stdin.
    pub stdin: ChildStdin,
    /// Read end of the subject's stdout.
    pub stdout: ChildStdout,
    /// Read end of the subject's stderr.
    pub stderr: ChildStderr,
}

/// Spawn `config.executable` with stdin/stdout/stderr all piped.
pub fn launch_subprocess(config: &ProcessConfig) -> Result<SubProcHandle> {
    info!(subject = %config.executable.display(), args = ?config.args, "launching subject");

    let mut command = Command::new(&config.executable);
    command
        .args(&config.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &config.working_dir {
        command.current_dir(dir);
    }

    let mut child = command.spawn().map_err(|source| Error::Spawn {
        path: config.executable.clone(),
        source,
    })?;

    let stdin = child.stdin.take().expect("stdin was piped");
    let stdout = child.stdout.take().expect("stdout was piped");
    let stderr = child.stderr.take().expect("stderr was piped");

    debug!(pid = child.id(), "subject spawned");
    Ok(SubProcHandle {
        child,
        stdin,
        stdout,
        stderr,
    })
}

#[inline]
fn send_sigterm(pid: libc::pid_t) {
    unsafe {
        libc::kill(pid, libc::SIGTERM);
    }
}

async fn wait_exit_async(child: &mut Child, timeout_ms: u64) -> bool {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    while Instant::now() < deadline {
        match child.try_wait() {
            Ok(Some(_status)) => return true,
            Ok(None) => sleep(Duration::from_millis(TERM_POLL_INTERVAL_MS)).await,
            Err(_) => break,
        }
    }
    false
}

/// Stop `child`: SIGTERM, wait briefly, then SIGKILL if it hasn't exited.
pub async fn terminate_child(child: &mut Child) -> Result<()> {
    let pid = child.id() as libc::pid_t;
    send_sigterm(pid);
    if wait_exit_async(child, TERM_WAIT_TIMEOUT_MS).await {
        info!(pid, "subject exited gracefully");
        return Ok(());
    }
    warn!(pid, "graceful stop timed out, escalating to SIGKILL");
    child.kill()?;
    match child.wait() {
        Ok(status) => info!(pid, ?status, "subject killed"),
        Err(e) => warn!(pid, error = %e, "failed to reap killed subject"),
    }
    Ok(())
}

fn wait_exit_sync(child: &mut Child, timeout_ms: u64) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < Duration::from_millis(timeout_ms) {
        if let Ok(Some(_)) = child.try_wait() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(TERM_POLL_INTERVAL_MS));
    }
    false
}

/// Synchronous version of [`terminate_child`], for use from `Drop` where an
/// async runtime may not be reachable.
pub fn terminate_child_sync(child: &mut Child) {
    let pid = child.id() as libc::pid_t;
    send_sigterm(pid);
    if wait_exit_sync(child, TERM_WAIT_TIMEOUT_MS) {
        return;
    }
    let _ = child.kill();
    let _ = child.wait();
}

/// Whether `child` still looks alive, probing with a non-blocking reap
/// followed by `kill(pid, 0)`.
pub fn is_running(child: &mut Child) -> bool {
    if let Ok(Some(_status)) = child.try_wait() {
        return false;
    }
    let pid = child.id() as libc::pid_t;
    let alive = unsafe { libc::kill(pid, 0) };
    alive == 0 || IoError::last_os_error().raw_os_error() == Some(libc::EPERM)
}

/// Reduce an [`std::process::ExitStatus`] to a single `i32`: the exit code
/// if the child exited normally, or the negated signal number if it was
/// killed by one.
pub fn exit_code_of(status: std::process::ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => {
            use std::os::unix::process::ExitStatusExt;
            -status.signal().unwrap_or(0)
        }
    }
}

/// Whether `path` exists and is executable by the current user.
pub fn looks_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
