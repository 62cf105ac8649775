use crate::parser::{parse_srt, parse_vtt};
use crate::segment::Segment;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::debug;

/// A transcription result: either `{"segments": [...], ...}` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Transcript {
    Result { segments: Vec<Segment> },
    Bare(Vec<Segment>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Json,
    Vtt,
    Srt,
}

fn sniff(data: &str) -> InputKind {
    let head = data.trim_start_matches('\u{FEFF}').trim_start();
    if head.starts_with('{') || head.starts_with('[') {
        InputKind::Json
    } else if head.starts_with("WEBVTT") {
        InputKind::Vtt
    } else {
        InputKind::Srt
    }
}

/// Read segments from a transcription JSON document or an existing SRT or
/// WebVTT file, whichever `data` looks like.
pub fn load_segments(data: &str) -> Result<Vec<Segment>> {
    let kind = sniff(data);
    let segments = match kind {
        InputKind::Json => {
            let transcript: Transcript = serde_json::from_str(data.trim_start_matches('\u{FEFF}'))
                .context("Failed to read transcription segments from JSON")?;
            match transcript {
                Transcript::Result { segments } | Transcript::Bare(segments) => segments,
            }
        }
        InputKind::Vtt => parse_vtt(data).context("Failed to parse WebVTT file")?,
        InputKind::Srt => parse_srt(data).context("Failed to parse SRT file")?,
    };
    debug!(?kind, segments = segments.len(), "loaded input");

    if segments.is_empty() {
        return Err(anyhow!("You appear to have supplied an empty file."));
    }
    Ok(segments)
}
