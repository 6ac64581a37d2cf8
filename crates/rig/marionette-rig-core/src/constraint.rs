use serde::{Deserialize, Serialize};

use marionette_api_core::math::wrap_angle;

/// Declarative limits on a bone's local rotation and length.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoneConstraint {
    pub min_rotation: Option<f32>,
    pub max_rotation: Option<f32>,
    pub fixed_length: Option<f32>,
}

impl BoneConstraint {
    pub fn rotation_range(min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min_rotation: Some(min),
            max_rotation: Some(max),
            fixed_length: None,
        }
    }

    pub fn with_fixed_length(mut self, length: f32) -> Self {
        self.fixed_length = Some(length);
        self
    }

    /// Clamp a local rotation into the allowed range.
    ///
    /// With both bounds present the angle is first unwrapped to the turn
    /// closest to the middle of the range, so `-PI + e` and `PI + e` are the
    /// same input.
    pub fn clamp_rotation(&self, rotation: f32) -> f32 {
        match (self.min_rotation, self.max_rotation) {
            (Some(min), Some(max)) => {
                let center = 0.5 * (min + max);
                (center + wrap_angle(rotation - center)).clamp(min, max)
            }
            (Some(min), None) => rotation.max(min),
            (None, Some(max)) => rotation.min(max),
            (None, None) => rotation,
        }
    }

    pub fn allows(&self, rotation: f32) -> bool {
        (self.clamp_rotation(rotation) - rotation).abs() <= 1e-6
    }

    /// Length the bone is drawn and solved with.
    pub fn resolve_length(&self, length: f32) -> f32 {
        self.fixed_length.unwrap_or(length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn clamps_around_half_turn() {
        let hip = BoneConstraint::rotation_range(PI - 1.0, PI + 0.5);
        // -PI + 0.2 is the same direction as PI + 0.2.
        assert!((hip.clamp_rotation(-PI + 0.2) - (PI + 0.2)).abs() < 1e-5);
        assert!((hip.clamp_rotation(PI + 2.0) - (PI + 0.5)).abs() < 1e-5);
        assert!(hip.allows(PI));
    }

    #[test]
    fn one_sided_bounds() {
        let c = BoneConstraint {
            min_rotation: Some(0.0),
            ..BoneConstraint::default()
        };
        assert_eq!(c.clamp_rotation(-1.0), 0.0);
        assert_eq!(c.clamp_rotation(3.0), 3.0);
        assert_eq!(c.with_fixed_length(4.0).resolve_length(9.0), 4.0);
    }
}
