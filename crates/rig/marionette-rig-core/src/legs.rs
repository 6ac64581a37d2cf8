//! Ground-aware leg IK.
//!
//! Feet are placed on a ground line (`ground_y`, +y down) raised by a per-leg
//! lift. When a foot cannot be reached the pelvis is lowered first, up to
//! `max_pelvis_drop`; a target that is still too far is then pinned: the
//! foot keeps its height and slides horizontally toward the hip, so a planted
//! foot never leaves the ground to fix an overlong stride.

use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::ik::BendDirection;
use crate::skeleton::Skeleton;
use marionette_api_core::Vec2;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegIkConfig {
    /// Screen-space y of the ground line.
    pub ground_y: f32,
    /// Usable fraction of the full leg length.
    pub reach_ratio: f32,
    /// Targets farther than `reach * ground_priority_threshold` are pinned.
    pub ground_priority_threshold: f32,
    /// Largest pelvis drop, as a fraction of the longest leg.
    pub max_pelvis_drop: f32,
    pub bend: BendDirection,
}

impl Default for LegIkConfig {
    fn default() -> Self {
        Self {
            ground_y: 0.0,
            reach_ratio: 1.0,
            ground_priority_threshold: 1.0,
            max_pelvis_drop: 0.25,
            bend: BendDirection::Positive,
        }
    }
}

/// Bones of one leg. The foot, when present, is kept at its rest world angle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegChain {
    pub upper: String,
    pub lower: String,
    #[serde(default)]
    pub foot: Option<String>,
}

impl LegChain {
    pub fn new(upper: impl Into<String>, lower: impl Into<String>) -> Self {
        Self {
            upper: upper.into(),
            lower: lower.into(),
            foot: None,
        }
    }

    pub fn with_foot(mut self, foot: impl Into<String>) -> Self {
        self.foot = Some(foot.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegTarget {
    pub leg: LegChain,
    /// Desired ankle x in pixels.
    pub foot_x: f32,
    /// Height above the ground line in pixels.
    pub lift: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LegOutcome {
    /// Target handed to the two-bone solver, after pinning.
    pub target: Vec2,
    /// Ankle position after the solve.
    pub end: Vec2,
    pub pinned: bool,
    pub reached: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegIkReport {
    /// How far the root bone was moved down, in pixels.
    pub pelvis_drop: f32,
    /// One entry per solved leg, in input order; legs with missing bones are
    /// skipped.
    pub legs: Vec<LegOutcome>,
    pub missing: Vec<String>,
}

/// Relative slack before a target counts as out of reach.
const REACH_TOLERANCE: f32 = 1e-4;

struct ResolvedLeg<'a> {
    target: &'a LegTarget,
    length: f32,
}

/// Solve every leg against the ground. Never fails on geometry; bones that
/// do not exist are listed in the report.
pub fn solve_legs(
    skeleton: &mut Skeleton,
    root_bone: &str,
    legs: &[LegTarget],
    config: &LegIkConfig,
) -> LegIkReport {
    let mut report = LegIkReport::default();
    skeleton.solve_forward();

    let mut resolved = Vec::with_capacity(legs.len());
    for target in legs {
        let upper = skeleton.bone(&target.leg.upper);
        let lower = skeleton.bone(&target.leg.lower);
        match (upper, lower) {
            (Ok(upper), Ok(lower)) => resolved.push(ResolvedLeg {
                target,
                length: upper.length() + lower.length(),
            }),
            _ => {
                for name in [&target.leg.upper, &target.leg.lower] {
                    if !skeleton.contains(name) {
                        report.missing.push(name.clone());
                    }
                }
            }
        }
    }

    let reach_ratio = if config.reach_ratio.is_finite() {
        config.reach_ratio.clamp(0.0, 1.0)
    } else {
        1.0
    };
    let foot_of = |leg: &ResolvedLeg| {
        Vec2::new(leg.target.foot_x, config.ground_y - leg.target.lift.max(0.0))
    };

    // Lower the pelvis so the farthest foot comes within reach.
    let longest = resolved.iter().map(|l| l.length).fold(0.0, f32::max);
    let max_drop = config.max_pelvis_drop.max(0.0) * longest;
    let mut drop: f32 = 0.0;
    for leg in &resolved {
        let Ok(upper) = skeleton.bone(&leg.target.leg.upper) else {
            continue;
        };
        let hip = upper.start();
        let foot = foot_of(leg);
        let reach = leg.length * reach_ratio;
        if hip.distance(foot) <= reach * (1.0 + REACH_TOLERANCE) {
            continue;
        }
        let dx = foot.x - hip.x;
        let needed = if dx.abs() < reach {
            foot.y - (reach * reach - dx * dx).sqrt() - hip.y
        } else {
            max_drop
        };
        drop = drop.max(needed);
    }
    let drop = drop.clamp(0.0, max_drop);
    if drop > longest * REACH_TOLERANCE {
        let lowered = skeleton
            .bone(root_bone)
            .map(|b| b.offset())
            .and_then(|offset| skeleton.set_offset(root_bone, offset + Vec2::new(0.0, drop)));
        match lowered {
            Ok(()) => {
                skeleton.solve_forward();
                report.pelvis_drop = drop;
            }
            Err(RigError::BoneNotFound(name)) => report.missing.push(name),
            Err(e) => log::warn!("leg ik: cannot lower '{root_bone}': {e}"),
        }
    }

    let threshold = config.ground_priority_threshold.max(0.0);
    for leg in &resolved {
        let chain = &leg.target.leg;
        let Ok(upper) = skeleton.bone(&chain.upper) else {
            continue;
        };
        let hip = upper.start();
        let reach = leg.length * reach_ratio;
        // Pinned feet slide toward the hip onto this radius, never away.
        let radius = reach * threshold.min(1.0);
        let mut target = foot_of(leg);
        let mut pinned = false;
        if hip.distance(target) > reach * threshold * (1.0 + REACH_TOLERANCE) {
            let dy = target.y - hip.y;
            target.x = if dy.abs() < radius {
                hip.x + (target.x - hip.x).signum() * (radius * radius - dy * dy).sqrt()
            } else {
                hip.x
            };
            pinned = true;
        }

        let Ok(end) = skeleton.solve_two_bone_ik(&chain.upper, &chain.lower, target, config.bend)
        else {
            continue;
        };
        if let Some(foot) = &chain.foot {
            keep_foot_level(skeleton, &chain.lower, foot, &mut report.missing);
        }
        report.legs.push(LegOutcome {
            target,
            end,
            pinned,
            reached: end.distance(target) <= 1e-3 * leg.length.max(1.0),
        });
    }

    report.missing.sort();
    report.missing.dedup();
    for name in &report.missing {
        log::warn!("leg ik: bone '{name}' not found");
    }
    report
}

fn keep_foot_level(skeleton: &mut Skeleton, lower: &str, foot: &str, missing: &mut Vec<String>) {
    let (Ok(rest_world), Ok(lower_bone)) =
        (skeleton.rest_world_rotation(foot), skeleton.bone(lower))
    else {
        missing.push(foot.to_string());
        return;
    };
    let local = rest_world - lower_bone.rotation();
    if skeleton.set_local_rotation(foot, local).is_ok() {
        skeleton.solve_forward();
    }
}
