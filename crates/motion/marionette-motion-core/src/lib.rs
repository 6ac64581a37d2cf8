//! Marionette Motion Core (engine-agnostic)
//!
//! Procedural motion generators and the layer that composes them:
//! - `presets`: the closed set of motions (idle, breathing, talking, gait
//!   cycles and one-shot gestures), each producing a [`Pose`] per sample
//! - `blender`: weighted layers with linear fades, summed through the
//!   animation accumulator
//! - `locomotion`: idle/walk/run layer switching
//! - `gesture`: one-at-a-time gesture triggering with an overlap policy

pub mod blender;
pub mod gesture;
pub mod ids;
pub mod locomotion;
pub mod motion;
pub mod presets;

pub use blender::MotionBlender;
pub use gesture::{Gesture, GestureGenerator, OverlapPolicy, TriggerOutcome};
pub use ids::{LayerId, LayerIdAllocator};
pub use locomotion::{Locomotion, LocomotionState};
pub use motion::{Motion, PhaseClock};
pub use presets::{GaitParams, MotionPreset, PresetKind};
pub use marionette_api_core::Pose;
