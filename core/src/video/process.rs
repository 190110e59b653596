//! Helpers for supervising external encoder processes.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStderr, ExitStatus};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::VideoError;

/// Stderr lines kept for error messages.
const STDERR_TAIL: usize = 20;
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Wait for `child` to exit, killing it once `timeout` has passed.
pub(crate) fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
    what: &'static str,
) -> Result<ExitStatus, VideoError> {
    let start = Instant::now();
    loop {
        match child.try_wait().map_err(VideoError::Wait)? {
            Some(status) => return Ok(status),
            None if start.elapsed() > timeout => {
                log::warn!("{} still running after {:?}, killing it", what, timeout);
                let _ = child.kill();
                let _ = child.wait();
                return Err(VideoError::Timeout {
                    what,
                    seconds: timeout.as_secs(),
                });
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    }
}

/// Drain `stderr` on a helper thread so the child never blocks on a full
/// pipe. Lines are logged at debug level; the last few are returned.
pub(crate) fn drain_stderr(stderr: ChildStderr, label: &'static str) -> JoinHandle<Vec<String>> {
    thread::spawn(move || {
        let mut tail = VecDeque::with_capacity(STDERR_TAIL);
        for line in BufReader::new(stderr).lines() {
            let Ok(line) = line else { break };
            log::debug!("{}: {}", label, line);
            if tail.len() == STDERR_TAIL {
                tail.pop_front();
            }
            tail.push_back(line);
        }
        tail.into()
    })
}

/// Join a stderr drain thread, returning its tail joined by newlines.
pub(crate) fn stderr_tail(handle: Option<JoinHandle<Vec<String>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|lines| lines.join("\n"))
        .unwrap_or_default()
}
