//! Canon proportions and the standard humanoid skeleton built from them.
//!
//! Segment sizes are given in head units. `head_units` is the standing
//! height in heads; the vertical segments (head, neck, spine, pelvis, thigh,
//! shin) are rescaled so they add up to it.

use std::f32::consts::{FRAC_PI_2, PI};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::constraint::BoneConstraint;
use crate::error::RigError;
use crate::ik::BendDirection;
use crate::legs::LegChain;
use crate::skeleton::{BoneDef, Skeleton};
use marionette_api_core::Vec2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonProportions {
    pub head_units: f32,
    pub head: f32,
    pub neck: f32,
    pub spine: f32,
    pub pelvis: f32,
    pub upper_arm: f32,
    pub forearm: f32,
    pub hand: f32,
    pub thigh: f32,
    pub shin: f32,
    pub foot: f32,
    pub shoulder_width: f32,
    pub hip_width: f32,
}

impl Default for CanonProportions {
    /// Eight-head canon.
    fn default() -> Self {
        Self {
            head_units: 8.0,
            head: 1.0,
            neck: 0.3,
            spine: 1.5,
            pelvis: 0.7,
            upper_arm: 1.5,
            forearm: 1.3,
            hand: 0.7,
            thigh: 2.3,
            shin: 2.2,
            foot: 1.0,
            shoulder_width: 2.0,
            hip_width: 1.4,
        }
    }
}

impl CanonProportions {
    /// Sum of the segments stacked from ankle to crown.
    pub fn stacked_height(&self) -> f32 {
        self.head + self.neck + self.spine + self.pelvis + self.thigh + self.shin
    }

    pub fn validate(&self) -> Result<(), RigError> {
        let positive = [
            ("head_units", self.head_units),
            ("head", self.head),
            ("neck", self.neck),
            ("spine", self.spine),
            ("pelvis", self.pelvis),
            ("upper_arm", self.upper_arm),
            ("forearm", self.forearm),
            ("hand", self.hand),
            ("thigh", self.thigh),
            ("shin", self.shin),
            ("foot", self.foot),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(RigError::InvalidProportion(name));
            }
        }
        for (name, v) in [
            ("shoulder_width", self.shoulder_width),
            ("hip_width", self.hip_width),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(RigError::InvalidProportion(name));
            }
        }
        Ok(())
    }

    /// Copy with shoulder and hip widths foreshortened for a body turned by
    /// `view_angle_deg` (0 faces the viewer, 90 is a side profile).
    pub fn viewed_at(&self, view_angle_deg: f32) -> Self {
        let factor = view_angle_deg.clamp(0.0, 90.0).to_radians().cos().max(0.0);
        Self {
            shoulder_width: self.shoulder_width * factor,
            hip_width: self.hip_width * factor,
            ..self.clone()
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn suffix(self) -> &'static str {
        match self {
            Side::Left => "_l",
            Side::Right => "_r",
        }
    }

    /// Screen-x sign of this side's limbs (left limbs sit on screen left).
    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Standard bone set built from [`CanonProportions`].
///
/// The figure faces +x in profile: knees bend toward +x, elbows toward +x,
/// feet point along +x.
#[derive(Clone, Debug)]
pub struct HumanoidRig {
    pub skeleton: Skeleton,
    proportions: CanonProportions,
    unit: f32,
    ground_y: f32,
    rest_ends: HashMap<String, Vec2>,
}

impl HumanoidRig {
    pub const ROOT: &'static str = "pelvis";
    pub const LEG_BEND: BendDirection = BendDirection::Positive;
    pub const ARM_BEND: BendDirection = BendDirection::Negative;

    /// Build the rig standing on `origin` (the ground point under the hips),
    /// with one head unit measuring `head_px` pixels before canon rescaling.
    pub fn build(
        proportions: &CanonProportions,
        head_px: f32,
        origin: Vec2,
    ) -> Result<Self, RigError> {
        proportions.validate()?;
        if !head_px.is_finite() || head_px <= 0.0 {
            return Err(RigError::InvalidProportion("head_px"));
        }
        if !origin.is_finite() {
            return Err(RigError::InvalidProportion("origin"));
        }
        let p = proportions;
        let unit = head_px * p.head_units / p.stacked_height();
        let u = |v: f32| v * unit;

        let hip = origin - Vec2::new(0.0, u(p.thigh + p.shin));
        let mut sk = Skeleton::new(hip);
        sk.add_bone(BoneDef::root("pelvis", u(p.pelvis), -FRAC_PI_2))?;
        sk.add_bone(BoneDef::child("spine", "pelvis", u(p.spine), 0.0))?;
        sk.add_bone(BoneDef::child("neck", "spine", u(p.neck), 0.0))?;
        sk.add_bone(BoneDef::child("head", "neck", u(p.head), 0.0))?;

        for side in Side::BOTH {
            let s = side.suffix();
            // Parent frames point up the torso; local +y is screen +x.
            let shoulder = Vec2::new(-u(0.25), side.sign() * u(p.shoulder_width) * 0.5);
            sk.add_bone(
                BoneDef::child(format!("upper_arm{s}"), "spine", u(p.upper_arm), PI)
                    .with_attach(shoulder),
            )?;
            sk.add_bone(
                BoneDef::child(format!("forearm{s}"), format!("upper_arm{s}"), u(p.forearm), 0.0)
                    .with_constraint(BoneConstraint::rotation_range(-2.6, 0.0)),
            )?;
            sk.add_bone(BoneDef::child(
                format!("hand{s}"),
                format!("forearm{s}"),
                u(p.hand),
                0.0,
            ))?;
        }
        for side in Side::BOTH {
            let s = side.suffix();
            let hip_joint = Vec2::new(-u(p.pelvis), side.sign() * u(p.hip_width) * 0.5);
            sk.add_bone(
                BoneDef::child(format!("thigh{s}"), "pelvis", u(p.thigh), PI)
                    .with_attach(hip_joint)
                    .with_constraint(BoneConstraint::rotation_range(PI - 1.9, PI + 0.7)),
            )?;
            sk.add_bone(
                BoneDef::child(format!("shin{s}"), format!("thigh{s}"), u(p.shin), 0.0)
                    .with_constraint(BoneConstraint::rotation_range(0.0, 2.6)),
            )?;
            sk.add_bone(BoneDef::child(
                format!("foot{s}"),
                format!("shin{s}"),
                u(p.foot),
                -FRAC_PI_2,
            ))?;
        }
        sk.solve_forward();

        let rest_ends = sk
            .bones()
            .iter()
            .map(|b| (b.name().to_string(), b.end()))
            .collect();
        Ok(Self {
            skeleton: sk,
            proportions: proportions.clone(),
            unit,
            ground_y: origin.y,
            rest_ends,
        })
    }

    pub fn proportions(&self) -> &CanonProportions {
        &self.proportions
    }

    /// Pixels per head unit after canon rescaling.
    pub fn unit(&self) -> f32 {
        self.unit
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    pub fn leg(side: Side) -> LegChain {
        let s = side.suffix();
        LegChain::new(format!("thigh{s}"), format!("shin{s}")).with_foot(format!("foot{s}"))
    }

    /// Upper and lower bone driven by an `ik.<effector>` channel, with the
    /// side the middle joint bends to. Feet are handled by the leg solver.
    pub fn effector_bones(effector: &str) -> Option<(String, String, BendDirection)> {
        let side = match effector {
            "hand_l" | "foot_l" => Side::Left,
            "hand_r" | "foot_r" => Side::Right,
            _ => return None,
        };
        let s = side.suffix();
        if effector.starts_with("hand") {
            Some((format!("upper_arm{s}"), format!("forearm{s}"), Self::ARM_BEND))
        } else {
            Some((format!("thigh{s}"), format!("shin{s}"), Self::LEG_BEND))
        }
    }

    /// End point of `bone` in the rest pose.
    pub fn rest_end(&self, bone: &str) -> Option<Vec2> {
        self.rest_ends.get(bone).copied()
    }

    /// Rest position of an `ik.<effector>` target: the end of its lower bone.
    pub fn rest_effector(&self, effector: &str) -> Option<Vec2> {
        let (_, lower, _) = Self::effector_bones(effector)?;
        self.rest_end(&lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_canon_stands_eight_heads_tall() {
        let p = CanonProportions::default();
        assert!((p.stacked_height() - 8.0).abs() < 1e-5);
        let rig = HumanoidRig::build(&p, 20.0, Vec2::new(100.0, 300.0)).unwrap();
        assert!((rig.unit() - 20.0).abs() < 1e-4);
        let crown = rig.skeleton.bone("head").unwrap().end();
        assert!((crown.y - (300.0 - 160.0)).abs() < 1e-2, "{crown:?}");
        assert!((crown.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn rejects_bad_sizes() {
        let p = CanonProportions {
            shin: -1.0,
            ..CanonProportions::default()
        };
        assert_eq!(p.validate(), Err(RigError::InvalidProportion("shin")));
        assert!(HumanoidRig::build(&CanonProportions::default(), 0.0, Vec2::ZERO).is_err());
    }
}
