//! Blending utilities for Value types.
//! - f32 linear interpolation for floats and vector/color components
//! - step blending for Bool/Text (choose left or right by t < 0.5)

use crate::math::lerp_f32;
use crate::Value;

/// Lerp for fixed-size arrays
fn lerp_array<const N: usize>(a: &[f32; N], b: &[f32; N], t: f32) -> [f32; N] {
    let mut out = [0.0f32; N];
    for i in 0..N {
        out[i] = lerp_f32(a[i], b[i], t);
    }
    out
}

/// Blend two Values according to their kinds.
/// Mismatched kinds fall back to the left value (fail-soft).
pub fn blend_values(a: &Value, b: &Value, t: f32) -> Value {
    match (a, b) {
        (Value::Float(af), Value::Float(bf)) => Value::Float(lerp_f32(*af, *bf, t)),
        (Value::Vec2(aa), Value::Vec2(bb)) => Value::Vec2(lerp_array(aa, bb, t)),
        (Value::ColorRgba(ac), Value::ColorRgba(bc)) => Value::ColorRgba(lerp_array(ac, bc, t)),
        (Value::Bool(_), Value::Bool(_)) | (Value::Text(_), Value::Text(_)) => {
            if t < 0.5 {
                a.clone()
            } else {
                b.clone()
            }
        }
        _ => a.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_and_vectors_lerp() {
        assert_eq!(
            blend_values(&Value::Float(0.0), &Value::Float(2.0), 0.25),
            Value::Float(0.5)
        );
        assert_eq!(
            blend_values(&Value::Vec2([0.0, 4.0]), &Value::Vec2([2.0, 0.0]), 0.5),
            Value::Vec2([1.0, 2.0])
        );
    }

    #[test]
    fn step_kinds_switch_at_half() {
        let a = Value::Text("A".into());
        let b = Value::Text("B".into());
        assert_eq!(blend_values(&a, &b, 0.49), a);
        assert_eq!(blend_values(&a, &b, 0.5), b);
    }

    #[test]
    fn mismatched_kinds_keep_left() {
        let a = Value::Float(1.0);
        assert_eq!(blend_values(&a, &Value::Bool(true), 0.9), a);
    }
}
