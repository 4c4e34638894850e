//! ReelCut Edit Model
//!
//! The declarative data contract between the UI layer and the render
//! engine: edit jobs, their inputs and operations, and media-kind
//! classification. This crate holds no execution logic.

pub mod job;
pub mod media;

pub use job::{Crop, EditJob, GlobalTrim, InputSpec, Operations};
pub use media::MediaKind;
