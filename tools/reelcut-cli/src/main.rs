//! ReelCut CLI — Command-line interface for compiling and running edit jobs.
//!
//! Usage:
//!   reelcut render <JOB>      Execute an edit job file
//!   reelcut compile <JOB>     Print the compiled invocation without running
//!   reelcut check             Check that the transcoding tool is available

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "reelcut",
    about = "Declarative video editing on top of an external transcoder",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute an edit job described by a JSON file
    Render {
        /// Path to the job file
        job: PathBuf,

        /// Output directory (overrides the configured one)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print every tool output line
        #[arg(long)]
        show_log: bool,
    },

    /// Compile an edit job and print the invocation without running it
    Compile {
        /// Path to the job file
        job: PathBuf,

        /// Output directory (overrides the configured one)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Check that the transcoding tool is available
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    reelcut_common::logging::init_logging(&reelcut_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Render {
            job,
            output_dir,
            show_log,
        } => commands::render::run(job, output_dir, show_log).await,
        Commands::Compile { job, output_dir } => commands::compile::run(job, output_dir),
        Commands::Check => commands::check::run(),
    }
}
