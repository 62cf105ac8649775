use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubtitleError {
    #[error("cannot format {0} as a timestamp")]
    InvalidTimestamp(f64),
    #[error("segment {index} ends at {end}s, before it starts at {start}s")]
    InvalidSegment { index: usize, start: f64, end: f64 },
    #[error("segment {index} has no text")]
    EmptySegmentText { index: usize },
    #[error("{0}")]
    Parse(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
