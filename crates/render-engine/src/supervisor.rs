//! Subprocess supervision for the external transcoding tool.
//!
//! At most one tool process runs at a time, system-wide for the owning
//! supervisor instance. The active-process slot is an explicit field
//! (never module-level state): acquiring it is an atomic
//! check-and-insert under a mutex, and it is released by a drop guard
//! so every exit path — normal exit, spawn failure, cancellation,
//! panic — returns the supervisor to idle.
//!
//! Cancellation is cooperative: `cancel()` only requests termination
//! (SIGTERM on unix), and the running `run()` future escalates to a
//! forced kill if the process has not exited within the grace period.
//! Callers observe the actual stop by awaiting `run()`.

use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::sync::watch;

use reelcut_common::{ReelcutError, ReelcutResult, ToolConfig};

use crate::events::{EventSink, LogStream};
use crate::progress;

/// Grace period between the terminate signal and a forced kill.
const KILL_GRACE: Duration = Duration::from_secs(5);

/// Bookkeeping for the one running process.
struct ActiveProcess {
    pid: Option<u32>,
    cancel: watch::Sender<bool>,
}

/// Owns the single active-process slot and the tool configuration.
#[derive(Clone)]
pub struct ProcessSupervisor {
    tool: ToolConfig,
    slot: Arc<Mutex<Option<ActiveProcess>>>,
}

/// Releases the slot when a run reaches its terminal event, no matter
/// how it got there.
struct SlotGuard {
    slot: Arc<Mutex<Option<ActiveProcess>>>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

impl ProcessSupervisor {
    pub fn new(tool: ToolConfig) -> Self {
        Self {
            tool,
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Whether a process is currently running.
    pub fn is_running(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Request termination of the active process. Returns `false` when
    /// idle. The state stays Running until the process actually exits;
    /// await the in-flight `run()` to observe the terminal event.
    pub fn cancel(&self) -> bool {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        match slot.as_ref() {
            Some(active) => {
                tracing::info!(pid = ?active.pid, "Cancellation requested");
                active.cancel.send(true).is_ok()
            }
            None => false,
        }
    }

    /// Spawn the tool with the control flags prefixed to `argv`, stream
    /// its output into `sink`, and resolve on the terminal event.
    ///
    /// Returns the accumulated stdout+stderr text on success. A call
    /// while another run is active fails immediately with
    /// [`ReelcutError::Busy`] and does not touch the OS.
    pub async fn run(&self, argv: &[String], sink: Arc<dyn EventSink>) -> ReelcutResult<String> {
        let mut cancel_rx = {
            let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
            if slot.is_some() {
                return Err(ReelcutError::Busy);
            }
            let (tx, rx) = watch::channel(false);
            *slot = Some(ActiveProcess {
                pid: None,
                cancel: tx,
            });
            rx
        };
        let _slot_guard = SlotGuard {
            slot: Arc::clone(&self.slot),
        };

        let mut child = Command::new(&self.tool.binary)
            .args(&self.tool.control_args)
            .args(argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ReelcutError::Spawn {
                tool: self.tool.binary.clone(),
                source,
            })?;

        let pid = child.id();
        {
            let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(active) = slot.as_mut() {
                active.pid = pid;
            }
        }
        tracing::info!(?pid, tool = %self.tool.binary, "Tool process started");

        let logs = Arc::new(Mutex::new(String::new()));

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to capture tool stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to capture tool stderr"))?;

        let stdout_task = tokio::spawn(forward_stdout(
            stdout,
            Arc::clone(&logs),
            Arc::clone(&sink),
        ));
        let stderr_task = tokio::spawn(forward_stderr(
            stderr,
            Arc::clone(&logs),
            Arc::clone(&sink),
        ));

        // Wait for the terminal event; fall out early on a cancel
        // request so the child is never touched inside the select arms.
        let wait_result = tokio::select! {
            status = child.wait() => Some(status),
            _ = cancel_rx.changed() => None,
        };

        let status = match wait_result {
            Some(status) => status?,
            None => {
                tracing::info!(?pid, "Sending terminate signal");
                terminate(pid, &mut child);
                match tokio::time::timeout(KILL_GRACE, child.wait()).await {
                    Ok(status) => status?,
                    Err(_) => {
                        tracing::warn!(?pid, "Tool ignored terminate signal; killing");
                        child.kill().await.ok();
                        child.wait().await?
                    }
                }
            }
        };

        // Drain the readers so the log buffer holds the complete output.
        let _ = stdout_task.await;
        let _ = stderr_task.await;

        let logs = logs.lock().unwrap_or_else(|e| e.into_inner()).clone();

        if status.success() {
            tracing::info!(?pid, "Tool process completed");
            Ok(logs)
        } else if is_cancel_status(&status) {
            tracing::info!(?pid, "Tool process terminated by cancellation");
            Err(ReelcutError::Cancelled { logs })
        } else {
            tracing::warn!(?pid, status = %status, "Tool process failed");
            Err(ReelcutError::RenderFailed {
                status: status.to_string(),
                logs,
            })
        }
    }
}

/// Forward stdout lines: raw log, decoded progress, derived status.
async fn forward_stdout(stdout: ChildStdout, logs: Arc<Mutex<String>>, sink: Arc<dyn EventSink>) {
    let mut lines = BufReader::new(stdout).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        append_log(&logs, &line);
        sink.on_log(&line, LogStream::Stdout);

        let update = progress::parse_line(&line);
        if let Some(status) = update.progress.as_deref() {
            if status == "end" {
                sink.on_status("Processing complete");
            } else {
                sink.on_status(&format!("Processing: {status}"));
            }
        }
        if !update.is_empty() {
            sink.on_progress(&update);
        }
    }
}

/// Forward stderr lines as log events only; the tool's diagnostics are
/// not parsed for progress.
async fn forward_stderr(stderr: ChildStderr, logs: Arc<Mutex<String>>, sink: Arc<dyn EventSink>) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        append_log(&logs, &line);
        sink.on_log(&line, LogStream::Stderr);
    }
}

fn append_log(logs: &Mutex<String>, line: &str) {
    let mut logs = logs.lock().unwrap_or_else(|e| e.into_inner());
    logs.push_str(line);
    logs.push('\n');
}

#[cfg(unix)]
fn terminate(pid: Option<u32>, _child: &mut Child) {
    if let Some(pid) = pid {
        // SAFETY: pid belongs to the child we spawned and still hold.
        let _ = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    }
}

#[cfg(not(unix))]
fn terminate(_pid: Option<u32>, child: &mut Child) {
    let _ = child.start_kill();
}

/// Whether an exit status should classify as cancelled rather than
/// failed: signal death (no code on unix), or the shell-convention
/// codes for SIGINT/SIGTERM.
fn is_cancel_status(status: &std::process::ExitStatus) -> bool {
    match status.code() {
        None => true,
        Some(130) | Some(143) => true,
        Some(_) => false,
    }
}
