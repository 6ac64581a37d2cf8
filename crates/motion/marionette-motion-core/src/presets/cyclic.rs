//! Looping presets: idle sway, breathing and the gait cycles.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::motion::{Motion, PhaseClock};
use marionette_api_core::{Pose, Value, Vec2};

/// Slow weight shift of a character standing still.
#[derive(Clone, Debug, PartialEq)]
pub struct Idle {
    clock: PhaseClock,
    /// Peak spine rotation, radians.
    pub sway: f32,
}

impl Default for Idle {
    fn default() -> Self {
        Self {
            clock: PhaseClock::new(4.0),
            sway: 0.03,
        }
    }
}

impl Motion for Idle {
    fn advance(&mut self, dt: f32) {
        self.clock.advance(dt);
    }

    fn sample(&self, _time: f32) -> Pose {
        let s = self.clock.wave(0.0);
        let mut pose = Pose::with_capacity(5);
        pose.set_rotation("spine", self.sway * s);
        pose.set_rotation("head", -0.5 * self.sway * s);
        pose.set_rotation("upper_arm_l", 0.4 * self.sway * s);
        pose.set_rotation("upper_arm_r", 0.4 * self.sway * s);
        pose.set_offset("pelvis", Vec2::new(0.04 * s, 0.0));
        pose
    }

    fn duration(&self) -> Option<f32> {
        None
    }

    fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }
}

/// Chest rise and fall.
#[derive(Clone, Debug, PartialEq)]
pub struct Breathing {
    clock: PhaseClock,
    /// Shoulder lift at full inhale, head units.
    pub depth: f32,
}

impl Default for Breathing {
    fn default() -> Self {
        Self {
            clock: PhaseClock::new(3.5),
            depth: 0.04,
        }
    }
}

impl Motion for Breathing {
    fn advance(&mut self, dt: f32) {
        self.clock.advance(dt);
    }

    fn sample(&self, _time: f32) -> Pose {
        let b = self.clock.wave(0.0);
        let mut pose = Pose::with_capacity(4);
        // Arm offsets live in the spine frame, whose +x runs up the torso.
        let lift = Vec2::new(self.depth * b, 0.0);
        pose.set_offset("upper_arm_l", lift);
        pose.set_offset("upper_arm_r", lift);
        pose.set_rotation("neck", -0.01 * b);
        pose.insert("breath", Value::Float(b));
        pose
    }

    fn duration(&self) -> Option<f32> {
        None
    }

    fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }
}

/// Shape of a walk or run cycle. Distances are in head units.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitParams {
    /// Seconds per full cycle (two steps).
    pub period: f32,
    /// Front-to-back foot travel.
    pub stride: f32,
    /// Peak foot height during swing.
    pub lift: f32,
    /// Peak upper-arm swing, radians.
    pub arm_swing: f32,
    /// Constant elbow bend, radians (negative bends forward).
    pub elbow: f32,
    /// Vertical pelvis travel over a step.
    pub bounce: f32,
    /// Forward torso lean, radians.
    pub lean: f32,
}

impl GaitParams {
    pub fn walk() -> Self {
        Self {
            period: 1.0,
            stride: 1.6,
            lift: 0.35,
            arm_swing: 0.35,
            elbow: -0.25,
            bounce: 0.08,
            lean: 0.04,
        }
    }

    pub fn run() -> Self {
        Self {
            period: 0.65,
            stride: 2.4,
            lift: 0.9,
            arm_swing: 0.7,
            elbow: -1.3,
            bounce: 0.2,
            lean: 0.18,
        }
    }
}

impl Default for GaitParams {
    fn default() -> Self {
        Self::walk()
    }
}

/// Two-leg gait. Feet are driven through `ik.foot_l` / `ik.foot_r` offsets
/// from the rest stance; the right leg runs half a cycle behind the left.
#[derive(Clone, Debug, PartialEq)]
pub struct Gait {
    clock: PhaseClock,
    params: GaitParams,
}

impl Gait {
    pub fn new(params: GaitParams) -> Self {
        Self {
            clock: PhaseClock::new(params.period),
            params,
        }
    }

    pub fn params(&self) -> &GaitParams {
        &self.params
    }

    pub fn set_params(&mut self, params: GaitParams) {
        self.clock.set_period(params.period);
        self.params = params;
    }

    pub fn phase(&self) -> f32 {
        self.clock.phase()
    }

    /// Foot offset at cycle phase `phase` (+y lifts).
    pub fn foot_offset(&self, phase: f32) -> Vec2 {
        let angle = TAU * phase;
        let x = -angle.cos() * 0.5 * self.params.stride;
        let lift = angle.sin().max(0.0) * self.params.lift;
        Vec2::new(x, lift)
    }
}

impl Motion for Gait {
    fn advance(&mut self, dt: f32) {
        self.clock.advance(dt);
    }

    fn sample(&self, _time: f32) -> Pose {
        let p = &self.params;
        let phase = self.clock.phase();
        let mut pose = Pose::with_capacity(10);
        for (side, shift) in [("l", 0.0), ("r", 0.5)] {
            let foot = self.foot_offset(phase + shift);
            pose.set_ik_target(&format!("foot_{side}"), foot);
            // Arms swing against the leg on the same side.
            let swing = if p.stride > 0.0 {
                foot.x / (0.5 * p.stride)
            } else {
                0.0
            };
            pose.set_rotation(&format!("upper_arm_{side}"), p.arm_swing * swing);
            pose.set_rotation(&format!("forearm_{side}"), p.elbow);
        }
        let step = 0.5 - 0.5 * (2.0 * TAU * phase).cos();
        pose.set_offset("pelvis", Vec2::new(0.0, -p.bounce * step));
        pose.set_rotation("spine", p.lean);
        pose.insert("gait_phase", Value::Float(phase));
        pose
    }

    fn duration(&self) -> Option<f32> {
        None
    }

    fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }
}
