//! Time-span literal parsing and formatting shared by [`Duration`] and
//! [`RepeatBehavior`] textual forms.
//!
//! Two literal shapes are accepted:
//! - unit-suffixed: `250ms`, `1.5s`, `2m`, `1h`
//! - colon-separated: `m:ss[.frac]` or `h:mm:ss[.frac]`
//!
//! [`Duration`]: crate::Duration
//! [`RepeatBehavior`]: crate::RepeatBehavior

use std::time::Duration as StdDuration;

use crate::error::ParseError;

/// Parse a time-span literal. Negative and non-finite values are rejected.
pub(crate) fn parse_time_span(text: &str) -> Result<StdDuration, ParseError> {
    let s = text.trim();
    if s.is_empty() {
        return Err(ParseError::InvalidTimeSpan(text.to_string()));
    }

    let seconds = if let Some(v) = s.strip_suffix("ms") {
        positive_number(v, text)? / 1_000.0
    } else if let Some(v) = s.strip_suffix('s') {
        positive_number(v, text)?
    } else if let Some(v) = s.strip_suffix('m') {
        positive_number(v, text)? * 60.0
    } else if let Some(v) = s.strip_suffix('h') {
        positive_number(v, text)? * 3_600.0
    } else {
        colon_form_seconds(s, text)?
    };

    StdDuration::try_from_secs_f64(seconds)
        .map_err(|_| ParseError::InvalidTimeSpan(text.to_string()))
}

/// Render a span the way the parser reads it back: `Nms` below one second,
/// `Ns` below one minute, `h:mm:ss[.fff]` above.
pub(crate) fn format_time_span(span: StdDuration) -> String {
    let secs = span.as_secs_f64();
    if secs < 1.0 {
        let ms = secs * 1_000.0;
        if ms == ms.trunc() {
            return format!("{}ms", ms as u64);
        }
        return format!("{ms}ms");
    }
    if secs < 60.0 {
        if secs == secs.trunc() {
            return format!("{}s", secs as u64);
        }
        return format!("{secs}s");
    }

    let whole = span.as_secs();
    let hours = whole / 3_600;
    let minutes = (whole % 3_600) / 60;
    let seconds = whole % 60;
    let millis = span.subsec_millis();
    if millis == 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours}:{minutes:02}:{seconds:02}.{millis:03}")
    }
}

fn positive_number(v: &str, original: &str) -> Result<f64, ParseError> {
    let n: f64 = v
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidTimeSpan(original.to_string()))?;
    if !n.is_finite() || n < 0.0 {
        return Err(ParseError::InvalidTimeSpan(original.to_string()));
    }
    Ok(n)
}

fn colon_form_seconds(s: &str, original: &str) -> Result<f64, ParseError> {
    let parts: Vec<&str> = s.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, sec] => (0.0, positive_number(m, original)?, positive_number(sec, original)?),
        [h, m, sec] => (
            positive_number(h, original)?,
            positive_number(m, original)?,
            positive_number(sec, original)?,
        ),
        _ => return Err(ParseError::InvalidTimeSpan(original.to_string())),
    };
    Ok(hours * 3_600.0 + minutes * 60.0 + seconds)
}
