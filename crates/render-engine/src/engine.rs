//! Render orchestration.
//!
//! The [`Renderer`] wires the compiler, the supervisor, and the
//! progress decoder together and exposes the run/cancel surface the
//! caller consumes. It owns nothing beyond forwarding: compilation is
//! pure, the supervisor holds the process slot, and events flow to the
//! caller's sink.

use std::path::PathBuf;
use std::sync::Arc;

use reelcut_common::{AppConfig, ReelcutResult, ToolConfig};
use reelcut_edit_model::EditJob;

use crate::command;
use crate::events::EventSink;
use crate::supervisor::ProcessSupervisor;

/// Settings a renderer is constructed with.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Directory output files are written into.
    pub output_dir: PathBuf,

    /// External tool settings.
    pub tool: ToolConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            tool: ToolConfig::default(),
        }
    }
}

impl From<&AppConfig> for RenderConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            tool: config.tool.clone(),
        }
    }
}

/// Result of a successful render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// The full invocation string, for diagnostics and UI display.
    pub command: String,

    /// Accumulated stdout+stderr text of the tool run.
    pub logs: String,
}

/// Compiles edit jobs and supervises their execution.
#[derive(Clone)]
pub struct Renderer {
    config: RenderConfig,
    supervisor: ProcessSupervisor,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        let supervisor = ProcessSupervisor::new(config.tool.clone());
        Self { config, supervisor }
    }

    /// Compile the job without running it. Returns the argv the tool
    /// would receive; the binary name and control flags are prefixed at
    /// spawn time.
    pub fn compile(&self, job: &EditJob) -> ReelcutResult<Vec<String>> {
        command::compile(job, &self.config.output_dir)
    }

    /// The full invocation string for a compiled argv.
    pub fn command_line(&self, argv: &[String]) -> String {
        let mut parts = Vec::with_capacity(1 + self.config.tool.control_args.len() + argv.len());
        parts.push(self.config.tool.binary.clone());
        parts.extend(self.config.tool.control_args.iter().cloned());
        parts.extend(argv.iter().cloned());
        parts.join(" ")
    }

    /// Compile and execute the job, forwarding events to `sink`.
    ///
    /// Resolves only on the process's terminal event. A second call
    /// while a render is active fails fast with
    /// [`reelcut_common::ReelcutError::Busy`].
    pub async fn run(&self, job: &EditJob, sink: Arc<dyn EventSink>) -> ReelcutResult<RenderOutput> {
        let argv = self.compile(job)?;
        let command = self.command_line(&argv);
        tracing::info!(command = %command, output = %job.output, "Starting render");

        let logs = self.supervisor.run(&argv, sink).await?;
        Ok(RenderOutput { command, logs })
    }

    /// Request cancellation of the active render, if any.
    pub fn cancel(&self) -> bool {
        self.supervisor.cancel()
    }

    /// Whether a render is currently in progress.
    pub fn is_running(&self) -> bool {
        self.supervisor.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_edit_model::{InputSpec, Operations};

    #[test]
    fn test_command_line_includes_control_flags() {
        let renderer = Renderer::new(RenderConfig::default());
        let job = EditJob {
            inputs: vec![InputSpec::from("a.mp4")],
            operations: Operations::default(),
            output: "out.mp4".to_string(),
        };

        let argv = renderer.compile(&job).unwrap();
        let command = renderer.command_line(&argv);
        assert_eq!(command, "ffmpeg -progress pipe:1 -y -i a.mp4 output/out.mp4");
    }
}
