//! Operation handlers that build the tool invocation.
//!
//! Compilation runs a fixed pipeline of independent handlers over one
//! shared [`CommandContext`]. Each handler reads only the operations
//! relevant to it and appends arguments, simple filters, or graph nodes.
//! A fresh context is created per compilation pass; contexts are never
//! shared across concurrent compiles.

use reelcut_common::{timecode, ReelcutResult};
use reelcut_edit_model::{EditJob, InputSpec, MediaKind};

use crate::graph::{FilterGraph, StreamRef};

/// Mutable accumulator threaded through the handler pipeline.
#[derive(Debug, Default)]
pub struct CommandContext {
    /// Raw argument accumulator: `-i` flags, codec forces, map pairs.
    pub args: Vec<String>,

    /// Simple single-stream filters, rendered later as one `-vf` chain.
    pub filters: Vec<String>,

    /// Labeled multi-stream graph, rendered later as `-filter_complex`.
    pub graph: FilterGraph,

    /// Streams to `-map` when the labeled graph is in play.
    pub maps: Vec<StreamRef>,
}

pub type Handler = fn(&EditJob, &mut CommandContext) -> ReelcutResult<()>;

/// The handler pipeline, in fixed order. `handle_inputs` must run first
/// so later handlers can index against the original input count; the
/// rest are order-independent.
pub const HANDLERS: [Handler; 6] = [
    handle_inputs,
    handle_trim,
    handle_crop,
    handle_subtitles,
    handle_aspect,
    handle_replace_audio,
];

/// Push `-i` flags and wire the per-input stream graph.
///
/// Branches on input shape: concat over multiple inputs builds the
/// labeled graph; a single trimmed input gets a direct `[outv]`/`[outa]`
/// trim pair; multiple inputs without concat are pushed bare so later
/// handlers can do the stream selection.
fn handle_inputs(job: &EditJob, cx: &mut CommandContext) -> ReelcutResult<()> {
    if job.operations.concat && job.inputs.len() > 1 {
        return concat_inputs(job, cx);
    }

    for input in &job.inputs {
        cx.args.push("-i".to_string());
        cx.args.push(input.path().to_string());
    }

    if let [input] = job.inputs.as_slice() {
        if input.has_trim() {
            let video = cx.graph.add(
                vec![StreamRef::InputVideo(0)],
                trim_clause("trim", input),
                vec!["outv".to_string()],
            )?;
            let audio = cx.graph.add(
                vec![StreamRef::InputAudio(0)],
                trim_clause("atrim", input),
                vec!["outa".to_string()],
            )?;
            cx.maps.push(video);
            cx.maps.push(audio);
        }
    }

    Ok(())
}

/// Concat branch: classify inputs into video/audio buckets by extension
/// and build the concat graph.
fn concat_inputs(job: &EditJob, cx: &mut CommandContext) -> ReelcutResult<()> {
    for input in &job.inputs {
        cx.args.push("-i".to_string());
        cx.args.push(input.path().to_string());
    }

    let mut video_idx = Vec::new();
    let mut audio_idx = Vec::new();
    for (i, input) in job.inputs.iter().enumerate() {
        if MediaKind::from_path(input.path()).is_audio() {
            audio_idx.push(i);
        } else {
            video_idx.push(i);
        }
    }

    // Per-segment video chain: optional trim, then optional frame-rate
    // normalization on the (possibly trimmed) stream.
    let mut video_refs = Vec::with_capacity(video_idx.len());
    for &i in &video_idx {
        let input = &job.inputs[i];
        let mut stream = StreamRef::InputVideo(i);
        if input.has_trim() {
            stream = cx.graph.add(
                vec![stream],
                trim_clause("trim", input),
                vec![format!("v{i}_trimmed")],
            )?;
        }
        if job.operations.normalize_frame_rate {
            stream = cx.graph.add(
                vec![stream],
                format!("fps={}", job.operations.target_frame_rate),
                vec![format!("v{i}_fps")],
            )?;
        }
        video_refs.push(stream);
    }

    if let Some(&first_audio) = audio_idx.first() {
        // Dedicated audio inputs: concat video only, map the audio
        // beside it. Only the first audio input's trim is honored.
        let outv = cx.graph.add(
            video_refs,
            format!("concat=n={}:v=1:a=0", video_idx.len()),
            vec!["outv".to_string()],
        )?;

        let audio_input = &job.inputs[first_audio];
        let audio_ref = if audio_input.has_trim() {
            cx.graph.add(
                vec![StreamRef::InputAudio(first_audio)],
                trim_clause("atrim", audio_input),
                vec![format!("a{first_audio}_trimmed")],
            )?
        } else {
            StreamRef::InputAudio(first_audio)
        };

        cx.maps.push(outv);
        cx.maps.push(audio_ref);

        // Segments from different recordings join on fresh timestamps.
        for arg in [
            "-c:v",
            "libx264",
            "-c:a",
            "aac",
            "-avoid_negative_ts",
            "make_zero",
        ] {
            cx.args.push(arg.to_string());
        }
    } else {
        // Every input is a video container with an embedded audio
        // track: concat interleaved video/audio pairs in one node.
        let mut pads = Vec::with_capacity(video_idx.len() * 2);
        for (stream, &i) in video_refs.into_iter().zip(&video_idx) {
            let input = &job.inputs[i];
            let audio = if input.has_trim() {
                cx.graph.add(
                    vec![StreamRef::InputAudio(i)],
                    trim_clause("atrim", input),
                    vec![format!("a{i}_trimmed")],
                )?
            } else {
                StreamRef::InputAudio(i)
            };
            pads.push(stream);
            pads.push(audio);
        }

        cx.graph.add(
            pads,
            format!("concat=n={}:v=1:a=1", video_idx.len()),
            vec!["outv".to_string(), "outa".to_string()],
        )?;
        cx.maps.push(StreamRef::label("outv"));
        cx.maps.push(StreamRef::label("outa"));
    }

    Ok(())
}

/// Apply the global trim window.
///
/// `-ss` goes to the very front of argv so the tool treats it as an
/// input seek on the first `-i`. `-t` comes from `duration` when set,
/// otherwise from `end - start`; `end` alone applies nothing.
fn handle_trim(job: &EditJob, cx: &mut CommandContext) -> ReelcutResult<()> {
    let Some(trim) = &job.operations.trim else {
        return Ok(());
    };

    if let Some(start) = &trim.start {
        cx.args.insert(0, start.clone());
        cx.args.insert(0, "-ss".to_string());
    }

    if let Some(duration) = &trim.duration {
        cx.args.push("-t".to_string());
        cx.args.push(duration.clone());
    } else if let (Some(end), Some(start)) = (&trim.end, &trim.start) {
        let duration = timecode::parse_timecode(end)? - timecode::parse_timecode(start)?;
        cx.args.push("-t".to_string());
        cx.args.push(timecode::format_seconds(duration));
    }

    Ok(())
}

fn handle_crop(job: &EditJob, cx: &mut CommandContext) -> ReelcutResult<()> {
    if let Some(crop) = &job.operations.crop {
        cx.filters.push(format!(
            "crop={}:{}:{}:{}",
            crop.width, crop.height, crop.x, crop.y
        ));
    }
    Ok(())
}

fn handle_subtitles(job: &EditJob, cx: &mut CommandContext) -> ReelcutResult<()> {
    if let Some(path) = &job.operations.subtitles {
        cx.filters.push(format!("subtitles={path}"));
    }
    Ok(())
}

fn handle_aspect(job: &EditJob, cx: &mut CommandContext) -> ReelcutResult<()> {
    if let Some(aspect) = &job.operations.aspect {
        cx.args.push("-aspect".to_string());
        cx.args.push(aspect.clone());
    }
    Ok(())
}

/// Append the replacement audio file as an extra input and select video
/// from the first original input, audio from the appended one.
fn handle_replace_audio(job: &EditJob, cx: &mut CommandContext) -> ReelcutResult<()> {
    let Some(path) = &job.operations.replace_audio else {
        return Ok(());
    };

    let appended_index = job.inputs.len();
    cx.args.push("-i".to_string());
    cx.args.push(path.clone());
    cx.args.push("-map".to_string());
    cx.args.push("0:v".to_string());
    cx.args.push("-map".to_string());
    cx.args.push(format!("{appended_index}:a"));

    Ok(())
}

/// Build a `trim=`/`atrim=` expression carrying only the clauses the
/// input actually sets.
fn trim_clause(filter: &str, input: &InputSpec) -> String {
    let mut clauses = Vec::new();
    if let Some(start) = input.start_time() {
        clauses.push(format!("start={}", timecode::format_seconds(start)));
    }
    if let Some(duration) = input.duration() {
        clauses.push(format!("duration={}", timecode::format_seconds(duration)));
    }
    format!("{filter}={}", clauses.join(":"))
}
