use std::fmt;

use serde::Deserialize;

/// One timed piece of transcribed speech, in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Segment {
    pub(crate) start: f64,
    pub(crate) end: f64,
    pub(crate) text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Vtt,
    Srt,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Vtt => "vtt",
            Format::Srt => "srt",
        }
    }

    pub fn header(self) -> Option<&'static str> {
        match self {
            Format::Vtt => Some("WEBVTT"),
            Format::Srt => None,
        }
    }

    pub fn fraction_separator(self) -> char {
        match self {
            Format::Vtt => '.',
            Format::Srt => ',',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Vtt => "VTT",
            Format::Srt => "SRT",
        }
    }
}

/// Maximum characters per cue line. Zero leaves the text on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WrapConfig {
    pub max_line_length: usize,
}

impl WrapConfig {
    pub fn new(max_line_length: usize) -> Self {
        Self { max_line_length }
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(self) -> bool {
        self.max_line_length > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOpts {
    pub format: Format,
    pub wrap: WrapConfig,
}

/// A fully rendered subtitle entry. `index` is only set for SRT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub(crate) index: Option<usize>,
    pub(crate) start_ts: String,
    pub(crate) end_ts: String,
    pub(crate) lines: Vec<String>,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(index) = self.index {
            writeln!(f, "{}", index)?;
        }
        writeln!(f, "{} --> {}", self.start_ts, self.end_ts)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}
