//! [`Watcher`]: owns a running subject process, its output reader threads,
//! and the [`MatchTask`] rendezvous steps use to wait for specific lines.

use std::{
    io::Write,
    process::Child,
    sync::Arc,
    thread::JoinHandle,
    time::Duration,
};

use progress::Progress;
use tokio::time::timeout;

use crate::{
    error::{Error, Result},
    matcher::{MatchCond, MatchTask},
    process::{self, ProcessConfig, SubProcHandle},
};

/// A running subject process plus everything needed to drive and observe it.
pub struct Watcher {
    child: Child,
    stdin: std::process::ChildStdin,
    matcher: Arc<MatchTask>,
    stdout_thread: Option<JoinHandle<()>>,
    stderr_thread: Option<JoinHandle<()>>,
    log: Arc<Progress>,
    exit_code: Option<i32>,
}

impl Watcher {
    /// Launch the subject described by `config` and start draining its
    /// output pipes in background threads.
    pub fn launch(config: &ProcessConfig, log: Arc<Progress>) -> Result<Self> {
        let SubProcHandle {
            child,
            stdin,
            stdout,
            stderr,
        } = process::launch_subprocess(config)?;

        let matcher = Arc::new(MatchTask::new());
        let stdout_thread = Some(crate::reader::spawn_reader(
            stdout,
            matcher.clone(),
            log.clone(),
            "stdout",
        ));
        // stderr is logged but never drives a match: the subject's stdout
        // banner/prompt protocol is the only thing steps wait on.
        let stderr_thread = Some(crate::reader::spawn_reader(
            stderr,
            Arc::new(MatchTask::new()),
            log.clone(),
            "stderr",
        ));

        Ok(Self {
            child,
            stdin,
            matcher,
            stdout_thread,
            stderr_thread,
            log,
            exit_code: None,
        })
    }

    /// Shared handle to the match rendezvous, for arming conditions.
    pub fn matcher(&self) -> Arc<MatchTask> {
        self.matcher.clone()
    }

    /// Arm `cond` and block (asynchronously) until it matches, the subject
    /// exits, or `timeout_after` elapses. On success, returns the line of
    /// output that satisfied the condition.
    pub async fn await_match(&self, cond: MatchCond, timeout_after: Duration) -> Result<String> {
        let rx = self.matcher.activate(cond);
        match timeout(timeout_after, rx).await {
            Ok(Ok(inner)) => inner,
            Ok(Err(_)) => Err(Error::WatcherGone),
            Err(_) => Err(Error::Timeout(timeout_after)),
        }
    }

    /// Wait for the subject to exit and return its exit code, reaping it
    /// if that hasn't happened yet. Resolves immediately if the exit code
    /// was already captured by an earlier call.
    pub async fn retrieve_exit_code(&mut self) -> Result<i32> {
        if let Some(code) = self.exit_code {
            return Ok(code);
        }
        loop {
            if let Some(status) = self.child.try_wait()? {
                let code = process::exit_code_of(status);
                self.exit_code = Some(code);
                return Ok(code);
            }
            tokio::time::sleep(Duration::from_millis(process::TERM_POLL_INTERVAL_MS)).await;
        }
    }

    /// Write `line` (with a trailing newline) to the subject's stdin.
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.stdin, "{line}")?;
        self.stdin.flush()?;
        self.log.note(format!("[stdin] {line}"));
        Ok(())
    }

    /// Whether the subject process still looks alive.
    pub fn is_running(&mut self) -> bool {
        process::is_running(&mut self.child)
    }

    /// The subject's process ID.
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Stop the subject (SIGTERM, then SIGKILL on timeout) and fail any
    /// still-armed match, then join the reader threads.
    pub async fn shutdown(mut self) -> Result<()> {
        process::terminate_child(&mut self.child).await?;
        self.matcher.deactivate();
        if let Some(h) = self.stdout_thread.take() {
            let _ = h.join();
        }
        if let Some(h) = self.stderr_thread.take() {
            let _ = h.join();
        }
        Ok(())
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        if self.is_running() {
            tracing::debug!(pid = self.child.id(), "watcher dropped while subject still running");
            process::terminate_child_sync(&mut self.child);
        }
        self.matcher.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[tokio::test]
    async fn launch_and_match_a_banner_line() {
        let cfg = ProcessConfig::new(
            "/bin/sh",
            vec!["-c".to_string(), "echo ready; sleep 5".to_string()],
        );
        let mut watcher = Watcher::launch(&cfg, Arc::new(Progress::in_memory())).unwrap();
        watcher
            .await_match(
                MatchCond::on_pattern(Regex::new("ready").unwrap()).build(),
                Duration::from_secs(2),
            )
            .await
            .unwrap();
        watcher.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn retrieve_exit_code_reaps_and_caches_the_status() {
        let cfg = ProcessConfig::new("/bin/sh", vec!["-c".to_string(), "exit 7".to_string()]);
        let mut watcher = Watcher::launch(&cfg, Arc::new(Progress::in_memory())).unwrap();
        assert_eq!(watcher.retrieve_exit_code().await.unwrap(), 7);
        assert_eq!(watcher.retrieve_exit_code().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn dying_subject_fails_a_pending_match() {
        let cfg = ProcessConfig::new("/bin/sh", vec!["-c".to_string(), "exit 0".to_string()]);
        let watcher = Watcher::launch(&cfg, Arc::new(Progress::in_memory())).unwrap();
        let result = watcher
            .await_match(
                MatchCond::on_pattern(Regex::new("never").unwrap()).build(),
                Duration::from_secs(2),
            )
            .await;
        assert!(result.is_err());
    }
}
