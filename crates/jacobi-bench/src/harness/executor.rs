// Dweve Jacobi Bench - Parallel scaling harness for Jacobi solvers
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Process execution with a bounded wait.
//!
//! [`Executor`] is the seam between the driver and the operating system so
//! the sweep logic can be exercised without spawning real solvers.
//!
//! On unix every child leads its own process group. A timeout kills the
//! whole group, so launcher-spawned ranks and other grandchildren go down
//! with it instead of competing for CPUs with the next run.

use crate::core::measurement::RunFailure;
use crate::harness::invocation::Invocation;
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// How often a running child is polled for exit.
///
/// This bounds the error added to wall-clock measurements.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Captured result of a run that exited successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Wall-clock time from spawn until exit was observed.
    pub elapsed: Duration,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// Runs an invocation to completion or until the timeout expires.
pub trait Executor {
    /// Executes `invocation`, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns a [`RunFailure`] for spawn errors, unsuccessful exits, and
    /// timeouts. These are per-run outcomes, not fatal errors.
    fn execute(
        &self,
        invocation: &Invocation,
        timeout: Duration,
    ) -> Result<ProcessOutput, RunFailure>;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(
        &self,
        invocation: &Invocation,
        timeout: Duration,
    ) -> Result<ProcessOutput, RunFailure> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let start = Instant::now();
        let deadline = start + timeout;
        let mut child = command.spawn().map_err(|e| RunFailure::Launch {
            message: format!("{}: {}", invocation.program.to_string_lossy(), e),
        })?;

        let (tx, rx) = mpsc::channel();
        let pending = spawn_reader(child.stdout.take(), Stream::Stdout, &tx)
            + spawn_reader(child.stderr.take(), Stream::Stderr, &tx);
        drop(tx);

        let status = match wait_with_deadline(&mut child, deadline) {
            Ok(Some(status)) => status,
            Ok(None) => {
                debug!(pid = child.id(), "killed process group after timeout");
                return Err(RunFailure::TimedOut { after: timeout });
            }
            Err(e) => {
                return Err(RunFailure::Launch {
                    message: format!("failed waiting for child: {}", e),
                })
            }
        };
        let elapsed = start.elapsed();

        // Something the child started may still hold the pipes open.
        let Some((stdout, stderr)) = collect_output(&rx, pending, deadline) else {
            debug!(pid = child.id(), "output still open at deadline, killing process group");
            kill_process_group(&mut child);
            return Err(RunFailure::TimedOut { after: timeout });
        };

        if status.success() {
            Ok(ProcessOutput {
                elapsed,
                stdout,
                stderr,
            })
        } else {
            Err(RunFailure::ExitStatus {
                code: status.code(),
                stderr,
            })
        }
    }
}

/// Polls `child` until it exits or `deadline` passes.
///
/// Returns `Ok(None)` after killing the process group and reaping a child
/// that overran.
fn wait_with_deadline(child: &mut Child, deadline: Instant) -> std::io::Result<Option<ExitStatus>> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {
                let now = Instant::now();
                if now >= deadline {
                    kill_process_group(child);
                    let _ = child.wait();
                    return Ok(None);
                }
                thread::sleep(POLL_INTERVAL.min(deadline - now));
            }
            Err(e) => {
                kill_process_group(child);
                let _ = child.wait();
                return Err(e);
            }
        }
    }
}

/// Sends SIGKILL to the child's process group, then to the child itself.
#[cfg(unix)]
fn kill_process_group(child: &mut Child) {
    // The child was spawned with `process_group(0)`, so its pid is the group id.
    let pgid = child.id() as libc::pid_t;
    // SAFETY: killpg takes no pointers; an empty group only yields ESRCH.
    unsafe {
        libc::killpg(pgid, libc::SIGKILL);
    }
    let _ = child.kill();
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) {
    let _ = child.kill();
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Drains `pipe` on its own thread. Returns the number of readers started.
fn spawn_reader<R>(pipe: Option<R>, stream: Stream, tx: &Sender<(Stream, String)>) -> usize
where
    R: Read + Send + 'static,
{
    let Some(mut pipe) = pipe else {
        return 0;
    };
    let tx = tx.clone();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send((stream, String::from_utf8_lossy(&buf).into_owned()));
    });
    1
}

/// Waits for `pending` readers to finish, but not past `deadline`.
///
/// Returns `None` if a pipe is still open when the deadline passes.
fn collect_output(
    rx: &Receiver<(Stream, String)>,
    pending: usize,
    deadline: Instant,
) -> Option<(String, String)> {
    let mut stdout = String::new();
    let mut stderr = String::new();
    for _ in 0..pending {
        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok((Stream::Stdout, text)) => stdout = text,
            Ok((Stream::Stderr, text)) => stderr = text,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    Some((stdout, stderr))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn sh(script: &str) -> Invocation {
        Invocation {
            program: OsString::from("/bin/sh"),
            args: vec![OsString::from("-c"), OsString::from(script)],
            env: vec![(OsString::from("OMP_NUM_THREADS"), OsString::from("3"))],
            working_dir: None,
        }
    }

    #[test]
    fn test_captures_stdout_and_env() {
        let output = ProcessExecutor
            .execute(&sh("echo threads=$OMP_NUM_THREADS"), Duration::from_secs(10))
            .unwrap();
        assert_eq!(output.stdout.trim(), "threads=3");
    }

    #[test]
    fn test_nonzero_exit_is_failure() {
        let err = ProcessExecutor
            .execute(&sh("echo boom >&2; exit 7"), Duration::from_secs(10))
            .unwrap_err();
        match err {
            RunFailure::ExitStatus { code, stderr } => {
                assert_eq!(code, Some(7));
                assert!(stderr.contains("boom"));
            }
            other => panic!("unexpected failure: {:?}", other),
        }
    }

    #[test]
    fn test_timeout_kills_child() {
        let start = Instant::now();
        let err = ProcessExecutor
            .execute(&sh("exec sleep 5"), Duration::from_millis(200))
            .unwrap_err();
        assert!(matches!(err, RunFailure::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    /// Whether `pid` is gone; zombies awaiting reaping count as gone.
    #[cfg(target_os = "linux")]
    fn process_gone(pid: &str) -> bool {
        match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            Ok(stat) => stat
                .rsplit_once(')')
                .map_or(false, |(_, rest)| rest.trim_start().starts_with('Z')),
            Err(_) => true,
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_timeout_kills_grandchildren() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("grandchild.pid");
        let script = format!(
            "sleep 30 & echo $! > '{}'; exec sleep 30",
            pid_file.display()
        );

        let err = ProcessExecutor
            .execute(&sh(&script), Duration::from_millis(500))
            .unwrap_err();
        assert!(matches!(err, RunFailure::TimedOut { .. }));

        let pid = std::fs::read_to_string(&pid_file).unwrap();
        let pid = pid.trim();
        let deadline = Instant::now() + Duration::from_secs(3);
        while !process_gone(pid) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(20));
        }
        assert!(process_gone(pid), "background process {} survived the timeout", pid);
    }

    #[test]
    fn test_inherited_pipe_does_not_outlive_timeout() {
        let start = Instant::now();
        let err = ProcessExecutor
            .execute(&sh("(sleep 4) & echo done"), Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, RunFailure::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_missing_program_is_launch_failure() {
        let inv = Invocation {
            program: OsString::from("/nonexistent/jacobi_mpi.exe"),
            args: Vec::new(),
            env: Vec::new(),
            working_dir: None,
        };
        let err = ProcessExecutor
            .execute(&inv, Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, RunFailure::Launch { .. }));
    }
}
