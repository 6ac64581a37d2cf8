//! One-shot gestures. Each runs for a fixed duration under an ease-in /
//! hold / ease-out envelope and reports finished afterwards.

use std::f32::consts::TAU;

use crate::motion::{Motion, OneShotClock};
use marionette_api_core::{Pose, Vec2};

const RAMP: f32 = 0.3;

macro_rules! one_shot {
    ($name:ident, $duration:expr) => {
        impl $name {
            pub const DURATION: f32 = $duration;
        }

        impl Motion for $name {
            fn advance(&mut self, dt: f32) {
                self.clock.advance(dt);
            }

            fn sample(&self, _time: f32) -> Pose {
                self.pose(self.clock.envelope(RAMP), self.clock.elapsed())
            }

            fn duration(&self) -> Option<f32> {
                Some(self.clock.duration())
            }

            fn elapsed(&self) -> f32 {
                self.clock.elapsed()
            }
        }
    };
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shrug {
    clock: OneShotClock,
}

impl Default for Shrug {
    fn default() -> Self {
        Self {
            clock: OneShotClock::new(Self::DURATION),
        }
    }
}

impl Shrug {
    fn pose(&self, env: f32, _t: f32) -> Pose {
        let mut pose = Pose::with_capacity(6);
        let lift = Vec2::new(0.3 * env, 0.0);
        pose.set_offset("upper_arm_l", lift);
        pose.set_offset("upper_arm_r", lift);
        pose.set_rotation("upper_arm_l", 0.25 * env);
        pose.set_rotation("upper_arm_r", -0.25 * env);
        pose.set_rotation("forearm_l", -0.9 * env);
        pose.set_rotation("forearm_r", -0.9 * env);
        pose.set_rotation("head", 0.08 * env);
        pose
    }
}

one_shot!(Shrug, 1.2);

#[derive(Clone, Debug, PartialEq)]
pub struct Wave {
    clock: OneShotClock,
    /// Hand oscillations per second.
    pub rate: f32,
}

impl Default for Wave {
    fn default() -> Self {
        Self {
            clock: OneShotClock::new(Self::DURATION),
            rate: 2.5,
        }
    }
}

impl Wave {
    fn pose(&self, env: f32, t: f32) -> Pose {
        let wag = (TAU * self.rate * t).sin();
        let mut pose = Pose::with_capacity(3);
        pose.set_rotation("upper_arm_r", -2.4 * env);
        // Stays inside the elbow's forward-only range.
        pose.set_rotation("forearm_r", env * (-0.9 + 0.4 * wag));
        pose.set_rotation("head", -0.05 * env);
        pose
    }
}

one_shot!(Wave, 2.0);

#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    clock: OneShotClock,
    /// Hand offset from its rest position, head units (+y up).
    pub target: Vec2,
}

impl Point {
    pub fn new(target: Vec2) -> Self {
        Self {
            clock: OneShotClock::new(Self::DURATION),
            target,
        }
    }

    fn pose(&self, env: f32, _t: f32) -> Pose {
        let mut pose = Pose::with_capacity(2);
        pose.set_ik_target("hand_r", self.target * env);
        // Look along the arm: screen rotation toward the target's side.
        let tilt = if self.target.y == 0.0 {
            0.0
        } else {
            -0.1 * self.target.y.signum()
        };
        pose.set_rotation("head", tilt * env);
        pose
    }
}

one_shot!(Point, 1.5);

#[derive(Clone, Debug, PartialEq)]
pub struct Thinking {
    clock: OneShotClock,
}

impl Default for Thinking {
    fn default() -> Self {
        Self {
            clock: OneShotClock::new(Self::DURATION),
        }
    }
}

impl Thinking {
    fn pose(&self, env: f32, t: f32) -> Pose {
        let mut pose = Pose::with_capacity(3);
        // Hand up to the chin.
        pose.set_ik_target("hand_r", Vec2::new(0.9, 3.6) * env);
        pose.set_rotation("head", (0.12 + 0.02 * (TAU * 0.5 * t).sin()) * env);
        pose.set_rotation("spine", -0.03 * env);
        pose
    }
}

one_shot!(Thinking, 2.5);

#[derive(Clone, Debug, PartialEq)]
pub struct Celebrate {
    clock: OneShotClock,
}

impl Default for Celebrate {
    fn default() -> Self {
        Self {
            clock: OneShotClock::new(Self::DURATION),
        }
    }
}

impl Celebrate {
    fn pose(&self, env: f32, t: f32) -> Pose {
        let hop = (TAU * 2.0 * t).sin().abs();
        let mut pose = Pose::with_capacity(6);
        pose.set_rotation("upper_arm_l", 2.5 * env);
        pose.set_rotation("upper_arm_r", -2.5 * env);
        pose.set_rotation("forearm_l", -0.3 * env);
        pose.set_rotation("forearm_r", -0.3 * env);
        pose.set_offset("pelvis", Vec2::new(0.0, -0.25 * hop * env));
        pose.set_rotation("head", -0.1 * env);
        pose
    }
}

one_shot!(Celebrate, 1.6);
