use crate::error::SubtitleError;
use crate::segment::Format;

/// Render `seconds` as `HH:MM:SS,mmm` (SRT) or `HH:MM:SS.mmm` (VTT).
///
/// The value is rounded half-up to whole milliseconds. Hours are padded to two
/// digits and widen past 99 instead of wrapping. Values whose millisecond count
/// does not fit in a `u64` are rejected.
pub fn format_timestamp(seconds: f64, format: Format) -> Result<String, SubtitleError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(SubtitleError::InvalidTimestamp(seconds));
    }

    let rounded = (seconds * 1000.0).round();
    if rounded >= u64::MAX as f64 {
        return Err(SubtitleError::InvalidTimestamp(seconds));
    }
    let total_millis = rounded as u64;
    let millis = total_millis % 1000;
    let total_secs = total_millis / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    Ok(format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours,
        minutes,
        secs,
        format.fraction_separator(),
        millis
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    macro_rules! test_write_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, format, expected) = $value;

                let ts = format_timestamp(input, format).expect("Failed to format timestamp");

                assert_eq!(ts, expected);
            }
        )*
        }
    }

    test_write_ts! {
        test_write_ts_0: (0.0, Format::Vtt, "00:00:00.000"),
        test_write_ts_1: (0.001, Format::Srt, "00:00:00,001"),
        test_write_ts_2: (0.999, Format::Srt, "00:00:00,999"),
        test_write_ts_3: (1.0, Format::Srt, "00:00:01,000"),
        test_write_ts_4: (1.2, Format::Srt, "00:00:01,200"),
        test_write_ts_5: (59.999, Format::Vtt, "00:00:59.999"),
        test_write_ts_6: (60.0, Format::Vtt, "00:01:00.000"),
        test_write_ts_7: (3600.0, Format::Srt, "01:00:00,000"),
        test_write_ts_8: (3661.5, Format::Srt, "01:01:01,500"),
        test_write_ts_9: (7326.159, Format::Vtt, "02:02:06.159"),
        test_write_ts_10: (360_000.001, Format::Srt, "100:00:00,001"),
        test_write_ts_11: (0.0005, Format::Srt, "00:00:00,001"),
        test_write_ts_12: (0.0004, Format::Srt, "00:00:00,000"),
        test_write_ts_13: (59.9996, Format::Srt, "00:01:00,000"),
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        for bad in [-0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                format_timestamp(bad, Format::Srt),
                Err(SubtitleError::InvalidTimestamp(_))
            ));
        }
    }

    #[test]
    fn rejects_values_past_the_millisecond_range() {
        for too_big in [1.9e16, 1e17, f64::MAX] {
            assert!(matches!(
                format_timestamp(too_big, Format::Vtt),
                Err(SubtitleError::InvalidTimestamp(_))
            ));
        }
        assert_eq!(
            format_timestamp(1e16, Format::Srt).unwrap(),
            "2777777777777:46:40,000"
        );
    }

    #[test]
    fn fixed_width_shape() {
        let srt = Regex::new(r"^\d{2,}:\d{2}:\d{2},\d{3}$").unwrap();
        let vtt = Regex::new(r"^\d{2,}:\d{2}:\d{2}\.\d{3}$").unwrap();
        for secs in [0.0, 0.0004, 1.5, 59.9999, 61.25, 3599.9995, 86_399.999, 1_000_000.0] {
            assert!(srt.is_match(&format_timestamp(secs, Format::Srt).unwrap()));
            assert!(vtt.is_match(&format_timestamp(secs, Format::Vtt).unwrap()));
        }
    }

    #[test]
    fn deterministic() {
        let a = format_timestamp(12.3456, Format::Srt).unwrap();
        let b = format_timestamp(12.3456, Format::Srt).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "00:00:12,346");
    }
}
