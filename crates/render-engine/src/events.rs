//! Event sink abstraction for render observers.
//!
//! The supervisor reports through this interface so it carries no
//! compile-time dependency on any UI transport. Implementations must be
//! cheap and non-blocking: callbacks fire on the supervisor's reader
//! tasks, in the order the OS delivers process output.

use crate::progress::ProgressUpdate;

/// Which output stream a log line arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

impl LogStream {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Observer interface for a running render.
pub trait EventSink: Send + Sync {
    /// A decoded progress snapshot (only fired for non-empty snapshots).
    fn on_progress(&self, _update: &ProgressUpdate) {}

    /// A human-readable status change derived from the progress stream.
    fn on_status(&self, _status: &str) {}

    /// A raw output line from the tool.
    fn on_log(&self, _line: &str, _stream: LogStream) {}
}

/// Sink that discards every event.
pub struct NullSink;

impl EventSink for NullSink {}
