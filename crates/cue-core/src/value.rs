//! Animatable property values.
//!
//! [`Value`] is the closed set of value shapes the engine can read from and
//! write to a target: scalars, colors, four-sided thicknesses, and the
//! discrete-only booleans and strings.

use serde::{Deserialize, Serialize};

/// An RGBA color with normalized `[0,1]` channels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Each channel clamped to `[0,1]`.
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }
}

/// A four-sided margin/padding-style thickness.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Thickness {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Thickness {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}

/// A value an animation can read from or write to a target property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    /// Numeric scalar (opacity, offsets, font sizes, ...).
    Float { value: f64 },
    /// RGBA color.
    Color { color: Color },
    /// Four-sided thickness.
    Thickness { thickness: Thickness },
    /// Boolean flag; discrete-only.
    Bool { value: bool },
    /// Text; discrete-only.
    Text { value: String },
}

/// The shape of a [`Value`], used for build-time validation and error
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Float,
    Color,
    Thickness,
    Bool,
    Text,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Float { .. } => ValueKind::Float,
            Self::Color { .. } => ValueKind::Color,
            Self::Thickness { .. } => ValueKind::Thickness,
            Self::Bool { .. } => ValueKind::Bool,
            Self::Text { .. } => ValueKind::Text,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color { color } => Some(*color),
            _ => None,
        }
    }

    pub fn as_thickness(&self) -> Option<Thickness> {
        match self {
            Self::Thickness { thickness } => Some(*thickness),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { value } => Some(value),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float { value }
    }
}

impl From<Color> for Value {
    fn from(color: Color) -> Self {
        Self::Color { color }
    }
}

impl From<Thickness> for Value {
    fn from(thickness: Thickness) -> Self {
        Self::Thickness { thickness }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool { value }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text {
            value: value.to_string(),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text { value }
    }
}

static_assertions::assert_impl_all!(Value: Clone, Send, Sync);
