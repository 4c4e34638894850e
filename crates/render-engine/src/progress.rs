//! Machine-readable progress decoding.
//!
//! The tool reports transcoding progress as `key=value` tokens on
//! stdout. Decoding is stateless: one compiled pattern per field,
//! applied independently to each line, so a line carrying any subset of
//! keys produces a partial snapshot. Absent fields stay `None`; later
//! snapshots simply overwrite earlier values at the caller's
//! discretion.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// One decoded snapshot of the tool's self-reported progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressUpdate {
    pub frame: Option<u64>,
    pub fps: Option<f64>,
    pub bitrate: Option<String>,
    pub out_time: Option<String>,
    pub total_size: Option<String>,
    pub speed: Option<String>,
    pub progress: Option<String>,
}

impl ProgressUpdate {
    /// Whether the line carried none of the known keys.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Protocol-level completion marker (`progress=end`).
    pub fn is_end(&self) -> bool {
        self.progress.as_deref() == Some("end")
    }
}

fn pattern(cell: &'static OnceLock<Regex>, source: &'static str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("static progress pattern"))
}

/// Decode one stdout line into a progress snapshot.
///
/// The `time=`/`size=` patterns intentionally also match inside the
/// protocol's `out_time=`/`total_size=` keys, so both the stats line
/// and the newline-delimited `key=value` stream decode with one table.
pub fn parse_line(line: &str) -> ProgressUpdate {
    static FRAME: OnceLock<Regex> = OnceLock::new();
    static FPS: OnceLock<Regex> = OnceLock::new();
    static BITRATE: OnceLock<Regex> = OnceLock::new();
    static TIME: OnceLock<Regex> = OnceLock::new();
    static SIZE: OnceLock<Regex> = OnceLock::new();
    static SPEED: OnceLock<Regex> = OnceLock::new();
    static PROGRESS: OnceLock<Regex> = OnceLock::new();

    let mut update = ProgressUpdate::default();

    if let Some(cap) = pattern(&FRAME, r"frame=\s*(\d+)").captures(line) {
        update.frame = cap[1].parse().ok();
    }
    if let Some(cap) = pattern(&FPS, r"fps=\s*([\d.]+)").captures(line) {
        update.fps = cap[1].parse().ok();
    }
    if let Some(cap) = pattern(&BITRATE, r"bitrate=\s*(\S+)").captures(line) {
        update.bitrate = Some(cap[1].to_string());
    }
    if let Some(cap) = pattern(&TIME, r"time=\s*(\d[\d:.]*)").captures(line) {
        update.out_time = Some(cap[1].to_string());
    }
    if let Some(cap) = pattern(&SIZE, r"size=\s*(\S+)").captures(line) {
        update.total_size = Some(cap[1].to_string());
    }
    if let Some(cap) = pattern(&SPEED, r"speed=\s*(\S+)").captures(line) {
        update.speed = Some(cap[1].to_string());
    }
    if let Some(cap) = pattern(&PROGRESS, r"progress=\s*(\w+)").captures(line) {
        update.progress = Some(cap[1].to_string());
    }

    update
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_line_decodes_every_field() {
        let update = parse_line(
            "frame=120 fps=29.97 bitrate=1000kbits/s time=00:00:04.00 size=256kB speed=1.0x progress=continue",
        );

        assert_eq!(
            update,
            ProgressUpdate {
                frame: Some(120),
                fps: Some(29.97),
                bitrate: Some("1000kbits/s".to_string()),
                out_time: Some("00:00:04.00".to_string()),
                total_size: Some("256kB".to_string()),
                speed: Some("1.0x".to_string()),
                progress: Some("continue".to_string()),
            }
        );
    }

    #[test]
    fn test_single_key_protocol_lines() {
        assert_eq!(parse_line("frame=42").frame, Some(42));
        assert_eq!(
            parse_line("out_time=00:00:04.000000").out_time.as_deref(),
            Some("00:00:04.000000")
        );
        assert_eq!(
            parse_line("total_size=262144").total_size.as_deref(),
            Some("262144")
        );
        assert_eq!(parse_line("speed=1.2x").speed.as_deref(), Some("1.2x"));
    }

    #[test]
    fn test_out_time_us_is_not_misread_as_time() {
        // `out_time_us=` / `out_time_ms=` carry microsecond counters;
        // only the clock-formatted `out_time=` should decode.
        assert_eq!(parse_line("out_time_us=4000000").out_time, None);
        assert_eq!(parse_line("out_time_ms=4000000").out_time, None);
    }

    #[test]
    fn test_unrelated_line_is_empty() {
        let update = parse_line("Press [q] to stop, [?] for help");
        assert!(update.is_empty());
    }

    #[test]
    fn test_end_marker() {
        let update = parse_line("progress=end");
        assert!(update.is_end());
        assert!(!parse_line("progress=continue").is_end());
    }

    #[test]
    fn test_absent_fields_stay_none() {
        let update = parse_line("frame=10 fps=25.0");
        assert_eq!(update.frame, Some(10));
        assert_eq!(update.fps, Some(25.0));
        assert_eq!(update.bitrate, None);
        assert_eq!(update.out_time, None);
        assert_eq!(update.progress, None);
    }
}
