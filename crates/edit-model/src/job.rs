//! Edit job types.
//!
//! An edit job is the declarative request handed to the render engine:
//! a list of media inputs plus the set of operations to apply. Jobs are
//! assembled and validated by the caller (typically a UI layer speaking
//! JSON), so field names follow the camelCase wire convention.

use serde::{Deserialize, Serialize};

/// A declarative video-edit request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditJob {
    /// Media inputs, in presentation order.
    pub inputs: Vec<InputSpec>,

    /// Operations to apply. All optional and independent.
    #[serde(default)]
    pub operations: Operations,

    /// Output file name, joined onto the configured output directory.
    pub output: String,
}

/// One media input: either a bare path, or a path with a per-input
/// trim intent (honored only inside concat jobs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputSpec {
    Path(String),

    #[serde(rename_all = "camelCase")]
    Clip {
        path: String,

        /// Trim start in seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_time: Option<f64>,

        /// Trim duration in seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
    },
}

impl InputSpec {
    /// The input's file path.
    pub fn path(&self) -> &str {
        match self {
            Self::Path(path) => path,
            Self::Clip { path, .. } => path,
        }
    }

    /// Per-input trim start, if any.
    pub fn start_time(&self) -> Option<f64> {
        match self {
            Self::Path(_) => None,
            Self::Clip { start_time, .. } => *start_time,
        }
    }

    /// Per-input trim duration, if any.
    pub fn duration(&self) -> Option<f64> {
        match self {
            Self::Path(_) => None,
            Self::Clip { duration, .. } => *duration,
        }
    }

    /// Whether this input carries any trim intent.
    pub fn has_trim(&self) -> bool {
        self.start_time().is_some() || self.duration().is_some()
    }
}

impl From<&str> for InputSpec {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

/// The set of requested operations. Every field is optional; absent
/// operations are simply skipped at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Operations {
    /// Join all inputs into one continuous output stream.
    pub concat: bool,

    /// Global trim applied to the whole job (timecode strings).
    pub trim: Option<GlobalTrim>,

    /// Rectangular crop.
    pub crop: Option<Crop>,

    /// Subtitle file to burn into the video.
    pub subtitles: Option<String>,

    /// Display aspect ratio override (e.g., "16:9").
    pub aspect: Option<String>,

    /// Replace the audio track with this file.
    pub replace_audio: Option<String>,

    /// Normalize every concat segment to `target_frame_rate`.
    pub normalize_frame_rate: bool,

    /// Frame rate used by `normalize_frame_rate`.
    pub target_frame_rate: u32,
}

impl Default for Operations {
    fn default() -> Self {
        Self {
            concat: false,
            trim: None,
            crop: None,
            subtitles: None,
            aspect: None,
            replace_audio: None,
            normalize_frame_rate: false,
            target_frame_rate: 30,
        }
    }
}

/// Global trim window. `start`/`duration`/`end` are timecode strings
/// (`"SS"`, `"MM:SS"`, or `"HH:MM:SS"`). `end` without `start` applies
/// nothing; this is documented boundary behavior, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalTrim {
    pub start: Option<String>,
    pub duration: Option<String>,
    pub end: Option<String>,
}

/// Crop rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_path_and_clip_inputs_deserialize() {
        let json = r#"{
            "inputs": [
                "a.mp4",
                { "path": "b.mp4", "startTime": 1.5, "duration": 4 }
            ],
            "operations": { "concat": true },
            "output": "joined.mp4"
        }"#;

        let job: EditJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.inputs.len(), 2);
        assert_eq!(job.inputs[0].path(), "a.mp4");
        assert!(!job.inputs[0].has_trim());
        assert_eq!(job.inputs[1].start_time(), Some(1.5));
        assert_eq!(job.inputs[1].duration(), Some(4.0));
        assert!(job.operations.concat);
        assert_eq!(job.output, "joined.mp4");
    }

    #[test]
    fn test_operations_default_when_absent() {
        let json = r#"{ "inputs": ["a.mp4"], "output": "out.mp4" }"#;
        let job: EditJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.operations, Operations::default());
        assert_eq!(job.operations.target_frame_rate, 30);
    }

    #[test]
    fn test_camel_case_wire_names() {
        let json = r#"{
            "inputs": ["a.mp4"],
            "operations": {
                "replaceAudio": "music.mp3",
                "normalizeFrameRate": true,
                "targetFrameRate": 24
            },
            "output": "out.mp4"
        }"#;

        let job: EditJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.operations.replace_audio.as_deref(), Some("music.mp3"));
        assert!(job.operations.normalize_frame_rate);
        assert_eq!(job.operations.target_frame_rate, 24);
    }

    #[test]
    fn test_job_round_trips_through_json() {
        let job = EditJob {
            inputs: vec![
                InputSpec::from("a.mp4"),
                InputSpec::Clip {
                    path: "b.mp4".to_string(),
                    start_time: Some(2.0),
                    duration: None,
                },
            ],
            operations: Operations {
                concat: true,
                crop: Some(Crop {
                    width: 640,
                    height: 480,
                    x: 0,
                    y: 0,
                }),
                ..Operations::default()
            },
            output: "out.mp4".to_string(),
        };

        let json = serde_json::to_string(&job).unwrap();
        let back: EditJob = serde_json::from_str(&json).unwrap();
        assert_eq!(back, job);
    }
}
