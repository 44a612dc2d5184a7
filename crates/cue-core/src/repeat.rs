//! Repeat policy for animation units.

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::timespan::{format_time_span, parse_time_span};

/// How an animation's single run is repeated.
///
/// A [`Span`](RepeatBehavior::Span) repeat runs for the given wall-clock time,
/// so the last loop may execute partially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RepeatBehavior {
    /// Run once, no repetition.
    #[default]
    Single,
    /// Run `count` times; `1x` is equivalent to `Single`.
    Count { count: u32 },
    /// Repeat for an explicit span of time.
    Span { span: StdDuration },
    /// Repeat until explicitly stopped.
    Forever,
}

impl RepeatBehavior {
    pub const fn count(count: u32) -> Self {
        Self::Count { count }
    }

    pub const fn span(span: StdDuration) -> Self {
        Self::Span { span }
    }

    pub const fn is_forever(&self) -> bool {
        matches!(self, Self::Forever)
    }

    /// The repeat count, if this policy carries one.
    pub const fn count_value(&self) -> Option<u32> {
        match self {
            Self::Count { count } => Some(*count),
            _ => None,
        }
    }

    /// The repeat span, if this policy carries one.
    pub const fn span_value(&self) -> Option<StdDuration> {
        match self {
            Self::Span { span } => Some(*span),
            _ => None,
        }
    }

    /// Whether this policy actually causes more than one run.
    pub const fn repeat_enabled(&self) -> bool {
        match self {
            Self::Single => false,
            Self::Count { count } => *count > 1,
            Self::Span { .. } | Self::Forever => true,
        }
    }
}

impl FromStr for RepeatBehavior {
    type Err = ParseError;

    /// Accepted forms: empty (single run), case-insensitive `Forever`, a
    /// `{count}x` token, or a time-span literal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::Single);
        }
        if trimmed.eq_ignore_ascii_case("forever") {
            return Ok(Self::Forever);
        }
        if let Some(prefix) = trimmed.strip_suffix('x') {
            if let Ok(count) = prefix.parse::<u32>() {
                return Ok(Self::Count { count });
            }
        }
        parse_time_span(trimmed)
            .map(|span| Self::Span { span })
            .map_err(|_| ParseError::InvalidRepeat(s.to_string()))
    }
}

impl fmt::Display for RepeatBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("1x"),
            Self::Count { count } => write!(f, "{count}x"),
            Self::Span { span } => f.write_str(&format_time_span(*span)),
            Self::Forever => f.write_str("Forever"),
        }
    }
}
