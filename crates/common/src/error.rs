//! Error types shared across ReelCut crates.

use std::path::PathBuf;

/// Top-level error type for ReelCut operations.
#[derive(Debug, thiserror::Error)]
pub enum ReelcutError {
    /// A render was requested while another one is still running.
    /// The request is rejected immediately; nothing was spawned.
    #[error("A render is already in progress")]
    Busy,

    /// The external tool binary could not be launched.
    #[error("Failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The render process was terminated through `cancel()`.
    /// Not a failure; callers should not present this as an error.
    #[error("Render cancelled")]
    Cancelled { logs: String },

    /// The render process exited with a non-zero, non-cancel status.
    #[error("Render failed with exit status {status}")]
    RenderFailed { status: String, logs: String },

    #[error("Invalid edit job: {message}")]
    Job { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ReelcutError.
pub type ReelcutResult<T> = Result<T, ReelcutError>;

impl ReelcutError {
    pub fn job(msg: impl Into<String>) -> Self {
        Self::Job {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error represents a cooperative cancellation rather
    /// than a genuine failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// The accumulated process log, if this error carries one.
    pub fn logs(&self) -> Option<&str> {
        match self {
            Self::Cancelled { logs } | Self::RenderFailed { logs, .. } => Some(logs),
            _ => None,
        }
    }
}
