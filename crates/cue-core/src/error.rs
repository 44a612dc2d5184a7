//! Error types for the animation engine.

use thiserror::Error;

use crate::target::PropertyKey;
use crate::value::ValueKind;

/// Errors produced while parsing textual timing values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input was not `Automatic`, `Forever` or a time-span literal.
    #[error("unrecognized duration \"{0}\", expected Automatic, Forever or a time span")]
    InvalidDuration(String),

    /// Input was not `Forever`, a `{{count}}x` token or a time-span literal.
    #[error("unrecognized repeat behavior \"{0}\", expected Forever, a {{count}}x token or a time span")]
    InvalidRepeat(String),

    /// Input was not a valid time-span literal.
    #[error("malformed time span \"{0}\"")]
    InvalidTimeSpan(String),
}

/// Errors raised by animation construction and playback.
///
/// All of these surface synchronously to the immediate caller; they indicate
/// contract violations rather than transient conditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    /// The value involved does not match the kind the animation works with.
    #[error("property {property} holds a {found:?} value, expected {expected:?}")]
    KindMismatch {
        property: PropertyKey,
        expected: ValueKind,
        found: ValueKind,
    },

    /// The target carries no value for the animated property.
    #[error("property {property} is not set on the target")]
    MissingProperty { property: PropertyKey },

    /// A play state was paired with an animation shape it does not belong to.
    #[error("play state does not belong to this animation")]
    ForeignState,

    /// A repeat-enabled animation whose single run resolves to zero length
    /// cannot be compiled (its repeat arithmetic would divide by zero).
    #[error("repeating animation on {property} has a zero-length single run")]
    ZeroLengthRepeat { property: PropertyKey },

    /// No target could be resolved at begin time.
    #[error("storyboard has no resolvable target")]
    NoTarget,

    /// Apply animations are instantaneous and cannot repeat or reverse.
    #[error("apply animations cannot have a duration, repeat or auto-reverse")]
    UnsupportedApplySettings,
}
