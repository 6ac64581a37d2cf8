//! Value: typed property values carried by tracks and poses.
//! All numeric types use f32.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Coarse kind of a [`Value`], used for track homogeneity checks and dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Float,
    Vec2,
    ColorRgba,
    Bool,
    Text,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Value {
    /// Scalar float (rotations are radians)
    Float(f32),

    /// 2D vector
    Vec2([f32; 2]),

    /// RGBA color (0..1 per channel)
    ColorRgba([f32; 4]),

    /// Boolean (step)
    Bool(bool),

    /// Text / string; step-only for interpolation
    Text(String),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::ColorRgba(_) => ValueKind::ColorRgba,
            Value::Bool(_) => ValueKind::Bool,
            Value::Text(_) => ValueKind::Text,
        }
    }

    /// Discrete kinds hold their value between keys and never blend.
    #[inline]
    pub fn is_step(&self) -> bool {
        matches!(self, Value::Bool(_) | Value::Text(_))
    }

    /// True when every numeric component is finite (always true for step kinds).
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Float(v) => v.is_finite(),
            Value::Vec2(a) => a.iter().all(|c| c.is_finite()),
            Value::ColorRgba(a) => a.iter().all(|c| c.is_finite()),
            Value::Bool(_) | Value::Text(_) => true,
        }
    }

    pub fn vec2(v: Vec2) -> Self {
        Value::Vec2([v.x, v.y])
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            Value::Vec2(a) => Some(Vec2::new(a[0], a[1])),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<[f32; 4]> {
        match self {
            Value::ColorRgba(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Value::vec2(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}
