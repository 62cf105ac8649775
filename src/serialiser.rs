use crate::error::SubtitleError;
use crate::linebreak::reflow;
use crate::segment::{Cue, Format, RenderOpts, Segment};
use crate::timestamp::format_timestamp;

use std::io::{BufWriter, Write};

use tracing::debug;

pub fn serialise<W: Write>(
    segments: &[Segment],
    opts: RenderOpts,
    dst: W,
) -> Result<(), SubtitleError> {
    let mut writer = BufWriter::new(dst);
    write_subs(&mut writer, segments, opts)?;
    writer.flush()?;
    Ok(())
}

/// Write the whole document: the WebVTT header if the format has one, then one
/// cue per segment in input order. A cue is only written once it has rendered
/// successfully, so a bad segment leaves no partial cue behind.
pub fn write_subs<W: Write>(
    buf: &mut W,
    segments: &[Segment],
    opts: RenderOpts,
) -> Result<(), SubtitleError> {
    if let Some(header) = opts.format.header() {
        writeln!(buf, "{}", header)?;
        writeln!(buf)?;
    }
    for (i, segment) in segments.iter().enumerate() {
        let cue = render_cue(segment, i + 1, opts)?;
        write!(buf, "{}", cue)?;
    }
    debug!(
        cues = segments.len(),
        format = opts.format.name(),
        "wrote subtitle document"
    );
    Ok(())
}

/// Render the `index`th (1-based) segment as a cue.
pub fn render_cue(segment: &Segment, index: usize, opts: RenderOpts) -> Result<Cue, SubtitleError> {
    let text = segment.text.trim();
    if text.is_empty() {
        return Err(SubtitleError::EmptySegmentText { index });
    }
    if segment.end < segment.start {
        return Err(SubtitleError::InvalidSegment {
            index,
            start: segment.start,
            end: segment.end,
        });
    }

    let start_ts = format_timestamp(segment.start, opts.format)?;
    let end_ts = format_timestamp(segment.end, opts.format)?;

    // A literal arrow would read as a timing line and a blank line would end
    // the cue early.
    let text = text.replace("-->", "->");
    let lines = reflow(&text, opts.wrap)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    let index = match opts.format {
        Format::Srt => Some(index),
        Format::Vtt => None,
    };

    Ok(Cue {
        index,
        start_ts,
        end_ts,
        lines,
    })
}
