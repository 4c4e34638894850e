//! Final command assembly.
//!
//! Runs the handler pipeline over a fresh context, resolves the
//! `-filter_complex` vs `-vf` choice, and appends the output path. The
//! returned argv excludes the tool binary and the control flags; the
//! supervisor prefixes those at spawn time.

use std::path::{Path, PathBuf};

use reelcut_common::ReelcutResult;
use reelcut_edit_model::EditJob;

use crate::builder::{CommandContext, HANDLERS};

/// Compile an edit job into the tool's argument vector.
pub fn compile(job: &EditJob, output_dir: &Path) -> ReelcutResult<Vec<String>> {
    let mut cx = CommandContext::default();
    for handler in HANDLERS {
        handler(job, &mut cx)?;
    }

    let mut args = cx.args;

    if !cx.graph.is_empty() {
        args.push("-filter_complex".to_string());
        args.push(cx.graph.render());
        for map in &cx.maps {
            args.push("-map".to_string());
            args.push(map.render_map());
        }
        // `-vf` cannot ride alongside a labeled graph, so simple filters
        // are dropped when the job builds one.
        if !cx.filters.is_empty() {
            tracing::warn!(
                dropped = ?cx.filters,
                "Simple filters skipped: job already builds a filter graph"
            );
        }
    } else if !cx.filters.is_empty() {
        args.push("-vf".to_string());
        args.push(cx.filters.join(","));
    }

    args.push(resolve_output_path(output_dir, &job.output).display().to_string());
    Ok(args)
}

/// Join the configured output directory and the job's output name.
/// Trailing separators on the directory are irrelevant.
pub fn resolve_output_path(output_dir: &Path, file_name: &str) -> PathBuf {
    output_dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_edit_model::{Crop, GlobalTrim, InputSpec, Operations};

    fn job(inputs: Vec<InputSpec>, operations: Operations) -> EditJob {
        EditJob {
            inputs,
            operations,
            output: "video.mp4".to_string(),
        }
    }

    #[test]
    fn test_output_path_join_is_trailing_slash_idempotent() {
        assert_eq!(
            resolve_output_path(Path::new("public/output/"), "video.mp4"),
            PathBuf::from("public/output/video.mp4")
        );
        assert_eq!(
            resolve_output_path(Path::new("public/output"), "video.mp4"),
            PathBuf::from("public/output/video.mp4")
        );
    }

    #[test]
    fn test_simple_filters_render_as_one_vf() {
        let job = job(
            vec![InputSpec::from("a.mp4")],
            Operations {
                crop: Some(Crop {
                    width: 640,
                    height: 480,
                    x: 0,
                    y: 0,
                }),
                subtitles: Some("subs.srt".to_string()),
                ..Operations::default()
            },
        );

        let args = compile(&job, Path::new("out")).unwrap();
        assert_eq!(
            args,
            vec![
                "-i",
                "a.mp4",
                "-vf",
                "crop=640:480:0:0,subtitles=subs.srt",
                "out/video.mp4"
            ]
        );
    }

    #[test]
    fn test_complex_graph_suppresses_simple_filters() {
        let job = job(
            vec![InputSpec::from("a.mp4"), InputSpec::from("b.mp4")],
            Operations {
                concat: true,
                crop: Some(Crop {
                    width: 640,
                    height: 480,
                    x: 0,
                    y: 0,
                }),
                ..Operations::default()
            },
        );

        let args = compile(&job, Path::new("out")).unwrap();
        assert!(args.contains(&"-filter_complex".to_string()));
        assert!(!args.contains(&"-vf".to_string()));
        assert!(!args.iter().any(|a| a.contains("crop=")));
    }

    #[test]
    fn test_full_concat_invocation_shape() {
        let job = job(
            vec![InputSpec::from("a.mp4"), InputSpec::from("b.mp4")],
            Operations {
                concat: true,
                ..Operations::default()
            },
        );

        let args = compile(&job, Path::new("renders")).unwrap();
        assert_eq!(
            args,
            vec![
                "-i",
                "a.mp4",
                "-i",
                "b.mp4",
                "-filter_complex",
                "[0:v][0:a][1:v][1:a]concat=n=2:v=1:a=1[outv][outa]",
                "-map",
                "[outv]",
                "-map",
                "[outa]",
                "renders/video.mp4"
            ]
        );
    }

    #[test]
    fn test_compiles_a_job_straight_from_wire_json() {
        let job: EditJob = serde_json::from_str(
            r#"{
                "inputs": [
                    "intro.mp4",
                    { "path": "main.mp4", "startTime": 2, "duration": 40 }
                ],
                "operations": { "concat": true, "normalizeFrameRate": true },
                "output": "final.mp4"
            }"#,
        )
        .unwrap();

        let args = compile(&job, Path::new("renders")).unwrap();
        let graph = &args[args.iter().position(|a| a == "-filter_complex").unwrap() + 1];
        assert!(graph.contains("[1:v]trim=start=2:duration=40[v1_trimmed]"));
        assert!(graph.contains("fps=30"));
        assert!(graph.contains("concat=n=2:v=1:a=1[outv][outa]"));
        assert_eq!(args.last().unwrap(), "renders/final.mp4");
    }

    #[test]
    fn test_global_trim_flags_survive_assembly() {
        let job = job(
            vec![InputSpec::from("a.mp4")],
            Operations {
                trim: Some(GlobalTrim {
                    start: Some("10".to_string()),
                    duration: None,
                    end: Some("25".to_string()),
                }),
                ..Operations::default()
            },
        );

        let args = compile(&job, Path::new("out")).unwrap();
        assert_eq!(args, vec!["-ss", "10", "-i", "a.mp4", "-t", "15", "out/video.mp4"]);
    }
}
