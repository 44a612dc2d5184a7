//! Tri-state animation duration.
//!
//! A [`Duration`] is either an explicit span, `Automatic` (computed from
//! content, e.g. a storyboard taking the longest of its units) or `Forever`.
//! Addition folds the states: `Forever` absorbs everything, `Automatic`
//! absorbs explicit spans, and two explicit spans sum saturating at
//! [`std::time::Duration::MAX`].

use std::fmt;
use std::ops::Add;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::timespan::{format_time_span, parse_time_span};

/// The finite scheduling horizon substituted for `Forever` — large enough to
/// outlive any real session while keeping the scheduler's tick math finite.
pub const FOREVER_HORIZON: StdDuration = StdDuration::from_secs(48 * 60 * 60);

/// How long a single run of an animation lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Duration {
    /// Computed from content; a storyboard resolves it to the longest of its
    /// units, a bare unit resolves it to zero.
    #[default]
    Automatic,
    /// Runs until explicitly stopped.
    Forever,
    /// An explicit span.
    Timed { span: StdDuration },
}

impl Duration {
    /// A zero-length explicit duration.
    pub const ZERO: Duration = Duration::Timed {
        span: StdDuration::ZERO,
    };

    /// An explicit duration of `span`.
    pub const fn timed(span: StdDuration) -> Self {
        Self::Timed { span }
    }

    pub const fn is_automatic(&self) -> bool {
        matches!(self, Self::Automatic)
    }

    pub const fn is_forever(&self) -> bool {
        matches!(self, Self::Forever)
    }

    pub const fn is_timed(&self) -> bool {
        matches!(self, Self::Timed { .. })
    }

    /// The explicit span, if this duration carries one.
    pub const fn span(&self) -> Option<StdDuration> {
        match self {
            Self::Timed { span } => Some(*span),
            _ => None,
        }
    }

    /// Normalize to a concrete span for scheduling: `Automatic` collapses to
    /// zero, `Forever` to [`FOREVER_HORIZON`].
    pub const fn resolve(&self) -> StdDuration {
        match self {
            Self::Automatic => StdDuration::ZERO,
            Self::Forever => FOREVER_HORIZON,
            Self::Timed { span } => *span,
        }
    }
}

impl From<StdDuration> for Duration {
    fn from(span: StdDuration) -> Self {
        Self::Timed { span }
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        match (self, rhs) {
            (Self::Timed { span: a }, Self::Timed { span: b }) => Self::Timed {
                span: a.saturating_add(b),
            },
            (Self::Forever, _) | (_, Self::Forever) => Self::Forever,
            _ => Self::Automatic,
        }
    }
}

impl Add<StdDuration> for Duration {
    type Output = Duration;

    fn add(self, rhs: StdDuration) -> Duration {
        match self {
            Self::Timed { span } => Self::Timed {
                span: span.saturating_add(rhs),
            },
            other => other,
        }
    }
}

impl Add<Duration> for StdDuration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        rhs + self
    }
}

impl FromStr for Duration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("automatic") {
            return Ok(Self::Automatic);
        }
        if trimmed.eq_ignore_ascii_case("forever") {
            return Ok(Self::Forever);
        }
        parse_time_span(trimmed)
            .map(|span| Self::Timed { span })
            .map_err(|_| ParseError::InvalidDuration(s.to_string()))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Automatic => f.write_str("Automatic"),
            Self::Forever => f.write_str("Forever"),
            Self::Timed { span } => f.write_str(&format_time_span(*span)),
        }
    }
}

static_assertions::assert_impl_all!(Duration: Copy, Send, Sync);
