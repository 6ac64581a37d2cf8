//! Marionette Animation Core (engine-agnostic)
//!
//! Authored property animation: easing curves, keyframe tracks grouped into
//! clips, clip playback with loop modes, the stored clip JSON format, lip-sync
//! cue tracks, and the weighted accumulator used to compose poses from several
//! sources.

pub mod accumulate;
pub mod data;
pub mod easing;
pub mod error;
pub mod lipsync;
pub mod playback;
pub mod sampling;
pub mod stored_clip;

// Re-exports for consumers
pub use accumulate::Accumulator;
pub use data::{AnimationClip, Keyframe, Track};
pub use easing::Easing;
pub use error::AnimationError;
pub use lipsync::{LipSyncTrack, MouthCue, MouthShape};
pub use playback::{ClipPlayback, LoopMode};
pub use sampling::sample_track;
pub use stored_clip::parse_clip_json;
pub use marionette_api_core::{Pose, Value, ValueKind};
