use crate::error::SubtitleError;
use crate::segment::Segment;

use nom::bytes::complete::{tag, take_till, take_while, take_while1, take_while_m_n};
use nom::character::complete::{digit1, line_ending, multispace0, multispace1, one_of, space1};
use nom::combinator::{map, map_res, opt, peek, verify};
use nom::error::{convert_error, ErrorKind, VerboseError};
use nom::multi::many_till;
use nom::sequence::{preceded, terminated};
use nom::{branch::alt, error_position, Err, IResult};

/// Parse a SubRip document into segments, in document order.
pub fn parse_srt(input: &str) -> Result<Vec<Segment>, SubtitleError> {
    finish(input, srt_file(input))
}

/// Parse a WebVTT document into segments, in document order.
pub fn parse_vtt(input: &str) -> Result<Vec<Segment>, SubtitleError> {
    finish(input, vtt_file(input))
}

fn finish(
    input: &str,
    result: IResult<&str, Vec<Segment>, VerboseError<&str>>,
) -> Result<Vec<Segment>, SubtitleError> {
    match result {
        Ok((_, subs)) => Ok(subs),
        Err(Err::Error(err)) | Err(Err::Failure(err)) => {
            Err(SubtitleError::Parse(convert_error(input, err)))
        }
        Err(Err::Incomplete(_)) => {
            unreachable!("Incomplete data received by non-streaming parser.")
        }
    }
}

fn optional_bom(input: &str) -> IResult<&str, Option<&str>, VerboseError<&str>> {
    opt(tag("\u{FEFF}"))(input)
}

fn srt_file(input: &str) -> IResult<&str, Vec<Segment>, VerboseError<&str>> {
    let (input, _) = optional_bom(input)?;
    let (input, subs) = all_blocks(input, srt_block)?;
    let (input, _) = end_of_file(input)?;
    Ok((input, subs))
}

fn vtt_file(input: &str) -> IResult<&str, Vec<Segment>, VerboseError<&str>> {
    let (input, _) = optional_bom(input)?;
    let (input, _) = vtt_header(input)?;
    let (input, subs) = all_blocks(input, vtt_block)?;
    let (input, _) = end_of_file(input)?;
    Ok((input, subs))
}

fn all_blocks<'a>(
    input: &'a str,
    block: fn(&'a str) -> IResult<&'a str, Option<Segment>, VerboseError<&'a str>>,
) -> IResult<&'a str, Vec<Segment>, VerboseError<&'a str>> {
    let mut parsed_subs = Vec::new();
    let (mut input, _) = multispace0(input)?;
    loop {
        match block(input) {
            Ok((rem_input, parsed)) => {
                parsed_subs.extend(parsed);
                let (rem_input, _) = multispace0(rem_input)?;
                input = rem_input;
            }
            Err(err) => {
                if input.is_empty() {
                    return Ok((input, parsed_subs));
                } else {
                    return Err(err);
                }
            }
        }
    }
}

fn srt_block(input: &str) -> IResult<&str, Option<Segment>, VerboseError<&str>> {
    let (input, _) = terminated(seq_num, multispace1)(input)?;
    let (input, (start, end)) = terminated(show_hide, line_ending)(input)?;
    let (input, text) = sub_text(input)?;

    Ok((input, segment(start, end, text)))
}

fn vtt_header(input: &str) -> IResult<&str, (), VerboseError<&str>> {
    let (input, _) = tag("WEBVTT")(input)?;
    let (input, _) = peek(alt((tag(" "), tag("\t"), line_ending, end_of_file)))(input)?;
    let (input, _) = rest_of_line(input)?;
    let (input, _) = sub_text(input)?;
    Ok((input, ()))
}

fn vtt_block(input: &str) -> IResult<&str, Option<Segment>, VerboseError<&str>> {
    alt((map(vtt_ignored_block, |_| None), vtt_cue))(input)
}

// NOTE, STYLE and REGION blocks carry nothing we render.
fn vtt_ignored_block(input: &str) -> IResult<&str, (), VerboseError<&str>> {
    let (input, _) = alt((tag("NOTE"), tag("STYLE"), tag("REGION")))(input)?;
    let (input, _) = rest_of_line(input)?;
    let (input, _) = sub_text(input)?;
    Ok((input, ()))
}

// A cue without text is valid WebVTT but has nothing to show, so it yields `None`.
fn vtt_cue(input: &str) -> IResult<&str, Option<Segment>, VerboseError<&str>> {
    let (input, _) = opt(terminated(cue_identifier, line_ending))(input)?;
    let (input, (start, end)) = terminated(show_hide, alt((line_ending, end_of_file)))(input)?;
    let (input, text) = sub_text(input)?;

    Ok((input, segment(start, end, text)))
}

fn cue_identifier(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    verify(take_while1(|c: char| c != '\n' && c != '\r'), |s: &str| {
        !s.contains("-->")
    })(input)
}

fn segment(start: u64, end: u64, text: Vec<String>) -> Option<Segment> {
    let lines: Vec<String> = text.into_iter().filter(|l| !l.is_empty()).collect();
    if lines.is_empty() {
        return None;
    }
    Some(Segment::new(
        start as f64 / 1000.0,
        end as f64 / 1000.0,
        lines.join(" "),
    ))
}

fn rest_of_line(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    terminated(
        take_till(|c: char| c == '\n' || c == '\r'),
        alt((line_ending, end_of_file)),
    )(input)
}

fn end_of_file(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    if input.is_empty() {
        Ok((input, input))
    } else {
        std::result::Result::Err(Err::Error(error_position!(input, ErrorKind::Eof)))
    }
}

fn sub_text(input: &str) -> IResult<&str, Vec<String>, VerboseError<&str>> {
    let line = terminated(
        take_while1(|c: char| c != '\n' && c != '\r'),
        alt((line_ending, end_of_file)),
    );

    let (input, (vec, _)) = many_till(line, alt((line_ending, end_of_file)))(input)?;

    Ok((input, vec.into_iter().map(|l| l.trim().to_string()).collect()))
}

/// Start and end in milliseconds. WebVTT cue settings after the end time are skipped.
fn show_hide(input: &str) -> IResult<&str, (u64, u64), VerboseError<&str>> {
    let (input, show_at) = timestamp(input)?;
    let (input, _) = space1(input)?;
    let (input, _) = tag("-->")(input)?;
    let (input, _) = space1(input)?;
    let (input, hide_at) = timestamp(input)?;
    let (input, _) = take_till(|c: char| c == '\n' || c == '\r')(input)?;

    Ok((input, (show_at, hide_at)))
}

/// `H:MM:SS,mmm` or `H:MM:SS.mmm`, hours optional and of any width.
fn timestamp(input: &str) -> IResult<&str, u64, VerboseError<&str>> {
    let start = input;
    const MILLIS_MIN: usize = 0;
    const MILLIS_MAX: usize = 3;
    let take_millis = || {
        map_res(
            take_while_m_n(MILLIS_MIN, MILLIS_MAX, |c: char| c.is_ascii_digit()),
            move |s: &str| {
                if s.len() < MILLIS_MAX {
                    // `,2` is not valid SRT but turns up in the wild. Right-pad it
                    // so it reads as `,200`.
                    let millis = format!("{:0<3}", s);
                    millis.parse::<u64>()
                } else {
                    s.parse::<u64>()
                }
            },
        )
    };

    const HMS_MIN: usize = 0;
    const HMS_MAX: usize = 2;
    // Left-pad instead: 1:13:45 means 01:13:45.
    let pad_left = |s: &str| format!("{:0>2}", s).parse::<u64>();
    let take_hms = || {
        map_res(
            take_while_m_n(HMS_MIN, HMS_MAX, |c: char| c.is_ascii_digit()),
            pad_left,
        )
    };
    let mut take_leading = map_res(take_while(|c: char| c.is_ascii_digit()), pad_left);

    let (input, first) = take_leading(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, second) = take_hms()(input)?;
    let (input, third) = opt(preceded(tag(":"), take_hms()))(input)?;
    let (input, _) = one_of(",.")(input)?;
    let (input, millis) = take_millis()(input)?;

    let (hours, minutes, seconds) = match third {
        Some(seconds) => (first, second, seconds),
        None => (0, first, second),
    };

    let total = [
        (hours, 60 * 60 * 1000),
        (minutes, 60 * 1000),
        (seconds, 1000),
        (millis, 1),
    ]
    .iter()
    .try_fold(0u64, |acc, &(value, unit): &(u64, u64)| {
        value.checked_mul(unit).and_then(|v| acc.checked_add(v))
    });

    match total {
        Some(total) => Ok((input, total)),
        None => Err(Err::Error(error_position!(start, ErrorKind::TooLarge))),
    }
}

fn seq_num(input: &str) -> IResult<&str, usize, VerboseError<&str>> {
    map_res(digit1, |s: &str| s.parse())(input)
}
