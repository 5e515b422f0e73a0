//! External command execution.
//!
//! Every git invocation goes through [`CommandRunner`], so the sync logic can
//! be driven by a scripted fake in tests. [`SystemRunner`] is the real thing:
//! it spawns the process, drains its output and kills it once the timeout
//! expires.

use anyhow::Context;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::constants::CHILD_POLL_MS;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs `program args...` inside `dir`.
///
/// `Err` means the process could not be launched or did not finish in time;
/// a non-zero exit is still `Ok` and left to the caller to interpret.
pub trait CommandRunner {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> anyhow::Result<CommandOutput>;
}

/// Runs real processes with a per-invocation timeout.
#[derive(Debug, Clone, Copy)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> anyhow::Result<CommandOutput> {
        let mut child = Command::new(program)
            .current_dir(dir)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to execute {}", program))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let now = Instant::now();
        let deadline = now
            .checked_add(self.timeout)
            .unwrap_or(now + Duration::from_secs(u64::from(u32::MAX)));
        let poll_interval = Duration::from_millis(CHILD_POLL_MS);
        let timed_out = || {
            anyhow::anyhow!(
                "{} {} timed out after {:?}",
                program,
                args.join(" "),
                self.timeout
            )
        };

        let status = loop {
            match child.try_wait().context("Failed to wait for child process")? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    // Already exited if kill fails; either way reap it.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(timed_out());
                }
                None => std::thread::sleep(poll_interval),
            }
        };

        // A grandchild holding the pipes open must not outlive the deadline.
        let stdout = collect(stdout, deadline).ok_or_else(timed_out)?;
        let stderr = collect(stderr, deadline).ok_or_else(timed_out)?;

        Ok(CommandOutput {
            code: status.code(),
            stdout,
            stderr,
        })
    }
}

/// Reads `pipe` to the end on a detached thread.
fn drain<R>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
        rx
    })
}

/// Waits for drained output until `deadline`; `None` once it has passed.
fn collect(rx: Option<Receiver<Vec<u8>>>, deadline: Instant) -> Option<String> {
    let Some(rx) = rx else {
        return Some(String::new());
    };
    let remaining = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(remaining) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}
