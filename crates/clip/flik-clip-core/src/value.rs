//! Animatable property values.
//! All numeric types use f32.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Vec2,
    Vec3,
    Vec4,
    ColorRgba,
    Bool,
    Text,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Scalar float (opacity, length in px, angle in deg, ...)
    Float(f32),

    /// 2D vector (translate)
    Vec2([f32; 2]),

    /// 3D vector
    Vec3([f32; 3]),

    /// 4D vector
    Vec4([f32; 4]),

    /// RGBA color
    ColorRgba([f32; 4]),

    /// Boolean (step)
    Bool(bool),

    /// Text; step-only for interpolation
    Text(String),
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Vec4(_) => ValueKind::Vec4,
            Value::ColorRgba(_) => ValueKind::ColorRgba,
            Value::Bool(_) => ValueKind::Bool,
            Value::Text(_) => ValueKind::Text,
        }
    }

    #[inline]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Interpolate towards `other`. `t` may lie outside [0, 1] (overshooting easings).
    /// Discrete kinds and mismatched kinds flip at the midpoint.
    pub fn lerp(&self, other: &Value, t: f32) -> Value {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => Value::Float(lerp_f32(*a, *b, t)),
            (Value::Vec2(a), Value::Vec2(b)) => Value::Vec2(lerp_n(*a, *b, t)),
            (Value::Vec3(a), Value::Vec3(b)) => Value::Vec3(lerp_n(*a, *b, t)),
            (Value::Vec4(a), Value::Vec4(b)) => Value::Vec4(lerp_n(*a, *b, t)),
            (Value::ColorRgba(a), Value::ColorRgba(b)) => Value::ColorRgba(lerp_n(*a, *b, t)),
            _ => {
                if self.kind() != other.kind() {
                    log::trace!(
                        "stepping between mismatched kinds {:?} and {:?}",
                        self.kind(),
                        other.kind()
                    );
                }
                if t < 0.5 {
                    self.clone()
                } else {
                    other.clone()
                }
            }
        }
    }

    /// Component-wise sum, used by additive compositing. `None` for kinds that do not add.
    pub fn add(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => Some(Value::Float(a + b)),
            (Value::Vec2(a), Value::Vec2(b)) => Some(Value::Vec2(add_n(*a, *b))),
            (Value::Vec3(a), Value::Vec3(b)) => Some(Value::Vec3(add_n(*a, *b))),
            (Value::Vec4(a), Value::Vec4(b)) => Some(Value::Vec4(add_n(*a, *b))),
            (Value::ColorRgba(a), Value::ColorRgba(b)) => Some(Value::ColorRgba(add_n(*a, *b))),
            _ => None,
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

#[inline]
fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn lerp_n<const N: usize>(a: [f32; N], b: [f32; N], t: f32) -> [f32; N] {
    std::array::from_fn(|i| lerp_f32(a[i], b[i], t))
}

#[inline]
fn add_n<const N: usize>(a: [f32; N], b: [f32; N]) -> [f32; N] {
    std::array::from_fn(|i| a[i] + b[i])
}
