//! The closed set of motion presets.
//!
//! [`MotionPreset`] dispatches statically to the concrete motion; the blender
//! stores presets by value.

mod cyclic;
mod gestures;
mod talking;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::motion::Motion;
use marionette_animation_core::LipSyncTrack;
use marionette_api_core::{Pose, Vec2};

pub use cyclic::{Breathing, Gait, GaitParams, Idle};
pub use gestures::{Celebrate, Point, Shrug, Thinking, Wave};
pub use talking::Talking;

/// Preset names without state, for logging and configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetKind {
    Idle,
    Breathing,
    Talking,
    Shrug,
    Wave,
    Point,
    Thinking,
    Celebrate,
    WalkCycle,
    RunCycle,
}

#[derive(Clone, Debug)]
pub enum MotionPreset {
    Idle(Idle),
    Breathing(Breathing),
    Talking(Talking),
    Shrug(Shrug),
    Wave(Wave),
    Point(Point),
    Thinking(Thinking),
    Celebrate(Celebrate),
    WalkCycle(Gait),
    RunCycle(Gait),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            MotionPreset::Idle($m) => $body,
            MotionPreset::Breathing($m) => $body,
            MotionPreset::Talking($m) => $body,
            MotionPreset::Shrug($m) => $body,
            MotionPreset::Wave($m) => $body,
            MotionPreset::Point($m) => $body,
            MotionPreset::Thinking($m) => $body,
            MotionPreset::Celebrate($m) => $body,
            MotionPreset::WalkCycle($m) => $body,
            MotionPreset::RunCycle($m) => $body,
        }
    };
}

impl MotionPreset {
    pub fn idle() -> Self {
        MotionPreset::Idle(Idle::default())
    }

    pub fn breathing() -> Self {
        MotionPreset::Breathing(Breathing::default())
    }

    pub fn talking(cues: Option<Arc<LipSyncTrack>>) -> Self {
        MotionPreset::Talking(Talking::new(cues))
    }

    pub fn shrug() -> Self {
        MotionPreset::Shrug(Shrug::default())
    }

    pub fn wave() -> Self {
        MotionPreset::Wave(Wave::default())
    }

    /// Point the right hand at `target`, an offset from its rest position in
    /// head units (+y up).
    pub fn point(target: Vec2) -> Self {
        MotionPreset::Point(Point::new(target))
    }

    pub fn thinking() -> Self {
        MotionPreset::Thinking(Thinking::default())
    }

    pub fn celebrate() -> Self {
        MotionPreset::Celebrate(Celebrate::default())
    }

    pub fn walk(params: GaitParams) -> Self {
        MotionPreset::WalkCycle(Gait::new(params))
    }

    pub fn run(params: GaitParams) -> Self {
        MotionPreset::RunCycle(Gait::new(params))
    }

    pub fn kind(&self) -> PresetKind {
        match self {
            MotionPreset::Idle(_) => PresetKind::Idle,
            MotionPreset::Breathing(_) => PresetKind::Breathing,
            MotionPreset::Talking(_) => PresetKind::Talking,
            MotionPreset::Shrug(_) => PresetKind::Shrug,
            MotionPreset::Wave(_) => PresetKind::Wave,
            MotionPreset::Point(_) => PresetKind::Point,
            MotionPreset::Thinking(_) => PresetKind::Thinking,
            MotionPreset::Celebrate(_) => PresetKind::Celebrate,
            MotionPreset::WalkCycle(_) => PresetKind::WalkCycle,
            MotionPreset::RunCycle(_) => PresetKind::RunCycle,
        }
    }

    pub fn is_one_shot(&self) -> bool {
        self.duration().is_some()
    }

    /// Gait state for walk and run cycles.
    pub fn gait_mut(&mut self) -> Option<&mut Gait> {
        match self {
            MotionPreset::WalkCycle(g) | MotionPreset::RunCycle(g) => Some(g),
            _ => None,
        }
    }
}

impl Motion for MotionPreset {
    fn advance(&mut self, dt: f32) {
        dispatch!(self, m => m.advance(dt))
    }

    fn sample(&self, time: f32) -> Pose {
        dispatch!(self, m => m.sample(time))
    }

    fn duration(&self) -> Option<f32> {
        dispatch!(self, m => m.duration())
    }

    fn elapsed(&self) -> f32 {
        dispatch!(self, m => m.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shots_have_durations() {
        assert!(MotionPreset::wave().is_one_shot());
        assert!(MotionPreset::point(Vec2::new(1.0, 1.0)).is_one_shot());
        assert!(!MotionPreset::walk(GaitParams::walk()).is_one_shot());
        assert_eq!(MotionPreset::run(GaitParams::run()).kind(), PresetKind::RunCycle);
    }
}
