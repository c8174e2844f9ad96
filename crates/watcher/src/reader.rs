//! Background threads that drain the subject's stdout/stderr pipes.

use std::{
    io::{BufRead, BufReader, Read},
    sync::Arc,
    thread::{self, JoinHandle},
};

use progress::Progress;

use crate::matcher::MatchTask;

/// Spawn a thread that reads `stream` line by line, feeding each line to
/// `matcher` and recording it in `log` under `tag`.
///
/// Returns once the stream hits EOF, i.e. once the subject closes that pipe
/// (typically because it exited).
pub fn spawn_reader<R>(stream: R, matcher: Arc<MatchTask>, log: Arc<Progress>, tag: &'static str) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    log.note(format!("[{tag}] {line}"));
                    matcher.evaluate(&line);
                }
                Err(err) => {
                    tracing::warn!(tag, error = %err, "error reading subject output");
                    break;
                }
            }
        }
        tracing::debug!(tag, "reader thread exiting, pipe closed");
        matcher.deactivate();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::io::Cursor;

    use crate::matcher::MatchCond;

    #[test]
    fn lines_are_forwarded_to_log_and_matcher() {
        let data = Cursor::new(b"hello\nworld ready\n".to_vec());
        let matcher = Arc::new(MatchTask::new());
        let rx = matcher.activate(MatchCond::on_pattern(Regex::new("ready").unwrap()).build());
        let log = Arc::new(Progress::in_memory());

        let handle = spawn_reader(data, matcher, log.clone(), "stdout");
        handle.join().unwrap();

        assert!(rx.try_recv().unwrap().is_ok());
        assert_eq!(log.len(), 2);
    }
}
