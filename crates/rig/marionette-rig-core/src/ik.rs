//! Analytic two-bone inverse kinematics (law of cosines).

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use marionette_api_core::Vec2;

/// Smallest root-to-target distance the solver works with.
pub const MIN_REACH: f32 = 1e-4;

/// Side the middle joint bends to. `Positive` bends the lower bone toward
/// increasing angles (clockwise on screen, since +y points down).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BendDirection {
    #[default]
    Positive,
    Negative,
}

impl BendDirection {
    pub fn sign(self) -> f32 {
        match self {
            BendDirection::Positive => 1.0,
            BendDirection::Negative => -1.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TwoBoneSolution {
    /// World angle of the upper bone.
    pub root_angle: f32,
    /// Rotation of the lower bone relative to the upper one; 0 is fully
    /// extended.
    pub joint_angle: f32,
    pub joint: Vec2,
    pub end: Vec2,
    /// The target was within `[|l1 - l2|, l1 + l2]` of the root.
    pub reachable: bool,
}

/// Solve a two-bone chain rooted at `root` with bone lengths `l1`, `l2`.
///
/// The root-to-target distance is clamped to `[max(|l1 - l2|, MIN_REACH),
/// l1 + l2]` along the root-to-target direction (+x when the target sits on
/// the root), so unreachable targets produce the closest reachable pose.
pub fn solve_two_bone(
    root: Vec2,
    l1: f32,
    l2: f32,
    target: Vec2,
    bend: BendDirection,
) -> TwoBoneSolution {
    let l1 = l1.max(0.0);
    let l2 = l2.max(0.0);
    let to_target = target - root;
    let dir = to_target.normalize_or(Vec2::X);
    let raw = to_target.length();
    let min = (l1 - l2).abs().max(MIN_REACH);
    let max = l1 + l2;

    if l1 <= 0.0 || l2 <= 0.0 || max <= min {
        // Degenerate chain: point it straight at the target.
        let root_angle = dir.angle();
        let joint = root + dir * l1;
        return TwoBoneSolution {
            root_angle,
            joint_angle: 0.0,
            joint,
            end: joint + dir * l2,
            reachable: (raw - max).abs() <= MIN_REACH,
        };
    }

    let reachable = raw >= min && raw <= max;
    let d = raw.clamp(min, max);
    let sign = bend.sign();

    let cos_inner = ((l1 * l1 + l2 * l2 - d * d) / (2.0 * l1 * l2)).clamp(-1.0, 1.0);
    let joint_angle = sign * (PI - cos_inner.acos());
    let cos_root = ((l1 * l1 + d * d - l2 * l2) / (2.0 * l1 * d)).clamp(-1.0, 1.0);
    let root_angle = dir.angle() - sign * cos_root.acos();

    let joint = root + Vec2::from_angle(root_angle) * l1;
    let end = joint + Vec2::from_angle(root_angle + joint_angle) * l2;
    TwoBoneSolution {
        root_angle,
        joint_angle,
        joint,
        end,
        reachable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bend_direction_picks_the_knee_side() {
        let down = Vec2::new(0.0, 60.0);
        let pos = solve_two_bone(Vec2::ZERO, 40.0, 40.0, down, BendDirection::Positive);
        let neg = solve_two_bone(Vec2::ZERO, 40.0, 40.0, down, BendDirection::Negative);
        // Positive rotates the upper bone toward +x when reaching down.
        assert!(pos.joint.x > 0.0);
        assert!(neg.joint.x < 0.0);
        assert!(pos.joint_angle > 0.0 && neg.joint_angle < 0.0);
        assert!(pos.end.distance(down) < 1e-3);
        assert!(neg.end.distance(down) < 1e-3);
    }

    #[test]
    fn coincident_target_uses_x_axis() {
        let s = solve_two_bone(Vec2::ZERO, 30.0, 20.0, Vec2::ZERO, BendDirection::Positive);
        assert!(!s.reachable);
        assert!(s.root_angle.is_finite() && s.joint_angle.is_finite());
        // Folded to the minimum distance along +x.
        assert!((s.end.x - 10.0).abs() < 1e-2, "{:?}", s.end);
        assert!(s.end.y.abs() < 1e-2);
    }
}
