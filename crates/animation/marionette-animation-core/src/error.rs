//! Authoring errors raised while building or loading animation data.

use marionette_api_core::ValueKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum AnimationError {
    #[error("keyframe time must be finite, got {time}")]
    NonFiniteTime { time: f32 },

    #[error("keyframe value at time {time} has a non-finite component")]
    NonFiniteValue { time: f32 },

    #[error("keyframe at time {time} is {actual:?} but the track holds {expected:?}")]
    KindMismatch {
        time: f32,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("lip-sync cue {index} is invalid: {reason}")]
    InvalidCue { index: usize, reason: String },

    #[error("clip json parse error: {0}")]
    Parse(String),

    #[error("track '{track}': {source}")]
    Track {
        track: String,
        #[source]
        source: Box<AnimationError>,
    },
}
