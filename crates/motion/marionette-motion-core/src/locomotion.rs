//! Idle/walk/run switching on top of the blender.

use serde::{Deserialize, Serialize};

use crate::blender::MotionBlender;
use crate::ids::LayerId;
use crate::presets::{GaitParams, MotionPreset};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocomotionState {
    #[default]
    Idle,
    Walk,
    Run,
}

/// Owns one layer per locomotion state. Exactly one of them is targeted at
/// weight 1; switching crossfades the old state out and the new one in.
#[derive(Clone, Debug)]
pub struct Locomotion {
    state: LocomotionState,
    idle: LayerId,
    walk: LayerId,
    run: LayerId,
}

impl Locomotion {
    /// Add the three layers to `blender`, starting idle.
    pub fn new(blender: &mut MotionBlender, walk: GaitParams, run: GaitParams) -> Self {
        Self {
            state: LocomotionState::Idle,
            idle: blender.add(MotionPreset::idle(), 1.0),
            walk: blender.add(MotionPreset::walk(walk), 0.0),
            run: blender.add(MotionPreset::run(run), 0.0),
        }
    }

    pub fn state(&self) -> LocomotionState {
        self.state
    }

    pub fn layer(&self, state: LocomotionState) -> LayerId {
        match state {
            LocomotionState::Idle => self.idle,
            LocomotionState::Walk => self.walk,
            LocomotionState::Run => self.run,
        }
    }

    /// Crossfade to `state` over `fade` seconds. A zero fade switches at once.
    pub fn set_state(&mut self, blender: &mut MotionBlender, state: LocomotionState, fade: f32) {
        if state == self.state {
            return;
        }
        log::debug!("locomotion: {:?} -> {:?} over {fade}s", self.state, state);
        // Every other layer fades out, including one still fading in from an
        // earlier switch.
        for other in [
            LocomotionState::Idle,
            LocomotionState::Walk,
            LocomotionState::Run,
        ] {
            let target = if other == state { 1.0 } else { 0.0 };
            blender.fade_to(self.layer(other), target, fade);
        }
        self.state = state;
    }
}
