//! Execute an edit job.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use reelcut_render_engine::{EventSink, LogStream, ProgressUpdate, Renderer};

pub async fn run(
    job_path: PathBuf,
    output_dir: Option<PathBuf>,
    show_log: bool,
) -> anyhow::Result<()> {
    let job = super::load_job(&job_path)?;
    let renderer = Renderer::new(super::render_config(output_dir));

    println!("Rendering job: {}", job_path.display());
    println!("  Inputs: {}", job.inputs.len());
    println!("  Output: {}", job.output);

    // Ctrl-C requests cancellation; the render resolves as cancelled
    // once the tool actually exits.
    let cancel_target = renderer.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupt received, cancelling render...");
            cancel_target.cancel();
        }
    });

    let sink = Arc::new(ConsoleSink { show_log });
    match renderer.run(&job, sink).await {
        Ok(output) => {
            println!("\nRender complete");
            println!("  Command: {}", output.command);
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            println!("\nRender cancelled");
            Ok(())
        }
        Err(e) => {
            if let Some(logs) = e.logs() {
                eprintln!("{}", logs.trim_end());
            }
            Err(anyhow::anyhow!("Render failed: {e}"))
        }
    }
}

/// Sink that draws progress on one console line.
struct ConsoleSink {
    show_log: bool,
}

impl EventSink for ConsoleSink {
    fn on_progress(&self, update: &ProgressUpdate) {
        let mut parts = Vec::new();
        if let Some(frame) = update.frame {
            parts.push(format!("frame {frame}"));
        }
        if let Some(time) = &update.out_time {
            parts.push(format!("time {time}"));
        }
        if let Some(fps) = update.fps {
            parts.push(format!("{fps} fps"));
        }
        if let Some(speed) = &update.speed {
            parts.push(format!("speed {speed}"));
        }
        if !parts.is_empty() {
            print!("\r  {}        ", parts.join(", "));
            let _ = std::io::stdout().flush();
        }
    }

    fn on_status(&self, status: &str) {
        if status == "Processing complete" {
            println!("\n  {status}");
        }
    }

    fn on_log(&self, line: &str, stream: LogStream) {
        if self.show_log {
            eprintln!("[{}] {line}", stream.as_str());
        }
    }
}
