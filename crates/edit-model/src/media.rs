//! Media classification by file extension.
//!
//! Concat jobs sort their inputs into video and audio buckets before
//! wiring the filter graph. Classification is by extension only; inputs
//! with no extension or an unknown one are treated as video, since a
//! bare container path is overwhelmingly likely to carry a video track.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Broad media kind of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

/// Extensions classified as audio-only containers.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "aac", "m4a", "flac", "ogg", "opus", "wma"];

impl MediaKind {
    /// Classify a path by its extension.
    pub fn from_path(path: &str) -> Self {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext {
            Some(ext) if AUDIO_EXTENSIONS.contains(&ext.as_str()) => Self::Audio,
            _ => Self::Video,
        }
    }

    pub fn is_audio(self) -> bool {
        self == Self::Audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_extensions() {
        assert_eq!(MediaKind::from_path("track.mp3"), MediaKind::Audio);
        assert_eq!(MediaKind::from_path("voice.WAV"), MediaKind::Audio);
        assert_eq!(MediaKind::from_path("/abs/dir/theme.flac"), MediaKind::Audio);
    }

    #[test]
    fn test_video_and_unknown_extensions() {
        assert_eq!(MediaKind::from_path("clip.mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_path("clip.mkv"), MediaKind::Video);
        assert_eq!(MediaKind::from_path("clip"), MediaKind::Video);
        assert_eq!(MediaKind::from_path("clip.weird"), MediaKind::Video);
    }
}
