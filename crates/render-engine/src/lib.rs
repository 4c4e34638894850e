//! ReelCut Render Engine
//!
//! Translates a declarative edit job into a concrete argument vector
//! and filter graph for the external transcoding tool, then supervises
//! execution: spawning the tool, decoding its machine-readable progress
//! stream, enforcing a single active run, and supporting cancellation.
//!
//! Pipeline: `EditJob` → handler pipeline ([`builder`]) → assembled argv
//! ([`command`]) → supervised process ([`supervisor`]) → decoded
//! progress ([`progress`]) → caller events ([`events`]).

pub mod builder;
pub mod command;
pub mod engine;
pub mod events;
pub mod graph;
pub mod progress;
pub mod supervisor;

pub use engine::{RenderConfig, RenderOutput, Renderer};
pub use events::{EventSink, LogStream, NullSink};
pub use progress::{parse_line, ProgressUpdate};
pub use supervisor::ProcessSupervisor;
