//! Authored animation data: keyframes, per-property tracks and clips.
//!
//! Invariant: keyframe times within a track are finite and strictly increasing,
//! and every keyframe in a track has the same value kind.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::AnimationError;
use crate::sampling::sample_track;
use marionette_api_core::{Pose, Value, ValueKind};

/// A single authored (time, value) pair. `easing` shapes the segment that
/// starts at this keyframe and ends at the next one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Seconds from clip start.
    pub time: f32,
    pub value: Value,
    #[serde(default)]
    pub easing: Easing,
}

/// Ordered keyframes for a single property.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Track {
    keyframes: Vec<Keyframe>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a track by inserting keyframes one by one (order does not matter).
    pub fn from_keyframes(
        keyframes: impl IntoIterator<Item = Keyframe>,
    ) -> Result<Self, AnimationError> {
        let mut track = Track::new();
        for k in keyframes {
            track.add_keyframe(k.time, k.value, k.easing)?;
        }
        Ok(track)
    }

    /// Insert a keyframe in time order. A keyframe already present at exactly
    /// `time` is replaced.
    pub fn add_keyframe(
        &mut self,
        time: f32,
        value: Value,
        easing: Easing,
    ) -> Result<(), AnimationError> {
        if !time.is_finite() {
            return Err(AnimationError::NonFiniteTime { time });
        }
        if !value.is_finite() {
            return Err(AnimationError::NonFiniteValue { time });
        }
        if let Some(expected) = self.kind() {
            let actual = value.kind();
            if actual != expected {
                return Err(AnimationError::KindMismatch {
                    time,
                    expected,
                    actual,
                });
            }
        }

        let idx = self.keyframes.partition_point(|k| k.time < time);
        let keyframe = Keyframe {
            time,
            value,
            easing,
        };
        match self.keyframes.get_mut(idx) {
            Some(existing) if existing.time == time => *existing = keyframe,
            _ => self.keyframes.insert(idx, keyframe),
        }
        Ok(())
    }

    /// Remove the keyframe at exactly `time`, if any.
    pub fn remove_keyframe(&mut self, time: f32) -> Option<Keyframe> {
        let idx = self.keyframes.iter().position(|k| k.time == time)?;
        Some(self.keyframes.remove(idx))
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Value kind shared by every keyframe, `None` for an empty track.
    pub fn kind(&self) -> Option<ValueKind> {
        self.keyframes.first().map(|k| k.value.kind())
    }

    pub fn start_time(&self) -> Option<f32> {
        self.keyframes.first().map(|k| k.time)
    }

    pub fn end_time(&self) -> Option<f32> {
        self.keyframes.last().map(|k| k.time)
    }

    /// Sample at `time` seconds; `None` only for an empty track.
    pub fn sample(&self, time: f32) -> Option<Value> {
        sample_track(self, time)
    }
}

/// Named set of property tracks. Clips are authored (or loaded) once and then
/// shared read-only between playbacks.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AnimationClip {
    pub name: String,
    tracks: HashMap<String, Track>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: HashMap::new(),
        }
    }

    /// Add a keyframe to the track for `property`, creating the track if needed.
    pub fn add_keyframe(
        &mut self,
        property: &str,
        time: f32,
        value: Value,
        easing: Easing,
    ) -> Result<(), AnimationError> {
        self.tracks
            .entry(property.to_string())
            .or_default()
            .add_keyframe(time, value, easing)
            .map_err(|source| AnimationError::Track {
                track: property.to_string(),
                source: Box::new(source),
            })
    }

    /// Track for `property`, created empty if the clip has none yet.
    pub fn track_mut(&mut self, property: &str) -> &mut Track {
        self.tracks.entry(property.to_string()).or_default()
    }

    pub fn insert_track(&mut self, property: impl Into<String>, track: Track) {
        self.tracks.insert(property.into(), track);
    }

    pub fn track(&self, property: &str) -> Option<&Track> {
        self.tracks.get(property)
    }

    pub fn tracks(&self) -> impl Iterator<Item = (&str, &Track)> {
        self.tracks.iter().map(|(k, t)| (k.as_str(), t))
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.values().all(Track::is_empty)
    }

    /// Time of the last keyframe across all tracks (0 for an empty clip).
    pub fn duration(&self) -> f32 {
        self.tracks
            .values()
            .filter_map(Track::end_time)
            .fold(0.0, f32::max)
    }

    /// Sample every non-empty track at `time`.
    pub fn sample(&self, time: f32) -> Pose {
        let mut pose = Pose::with_capacity(self.tracks.len());
        for (property, track) in &self.tracks {
            if let Some(v) = track.sample(time) {
                pose.insert(property.clone(), v);
            }
        }
        pose
    }
}
