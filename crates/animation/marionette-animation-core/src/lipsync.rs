//! Lip-sync cues consumed as a track-like input.
//!
//! Cues are produced elsewhere (from audio); this module only validates,
//! orders and samples them. The JSON loader accepts the common
//! `{ "mouthCues": [ { "start", "end", "value" } ] }` layout with single-letter
//! shape codes.

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouthShape {
    #[default]
    #[serde(rename = "X", alias = "rest")]
    Rest,
    /// M, B, P
    #[serde(rename = "A", alias = "closed")]
    Closed,
    /// Most consonants, slightly open
    #[serde(rename = "B", alias = "narrow")]
    Narrow,
    /// E, AE
    #[serde(rename = "C", alias = "open")]
    Open,
    /// AA
    #[serde(rename = "D", alias = "wide")]
    Wide,
    /// AO, ER
    #[serde(rename = "E", alias = "round")]
    Round,
    /// UW, OW, W
    #[serde(rename = "F", alias = "pucker")]
    Pucker,
    /// F, V
    #[serde(rename = "G", alias = "teeth")]
    Teeth,
    /// L
    #[serde(rename = "H", alias = "tongue")]
    Tongue,
}

impl MouthShape {
    /// Jaw openness in [0, 1] used to drive the talking motion.
    pub fn openness(self) -> f32 {
        match self {
            MouthShape::Rest | MouthShape::Closed => 0.0,
            MouthShape::Teeth => 0.2,
            MouthShape::Narrow => 0.25,
            MouthShape::Pucker => 0.35,
            MouthShape::Tongue => 0.45,
            MouthShape::Open => 0.6,
            MouthShape::Round => 0.7,
            MouthShape::Wide => 1.0,
        }
    }

    /// Single-letter code, as used by the cue files.
    pub fn code(self) -> &'static str {
        match self {
            MouthShape::Rest => "X",
            MouthShape::Closed => "A",
            MouthShape::Narrow => "B",
            MouthShape::Open => "C",
            MouthShape::Wide => "D",
            MouthShape::Round => "E",
            MouthShape::Pucker => "F",
            MouthShape::Teeth => "G",
            MouthShape::Tongue => "H",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MouthCue {
    pub start: f32,
    pub end: f32,
    #[serde(alias = "value")]
    pub shape: MouthShape,
}

/// Time-ordered cues. Between cues the mouth is at rest.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LipSyncTrack {
    cues: Vec<MouthCue>,
}

#[derive(Deserialize)]
struct CueFile {
    #[serde(rename = "mouthCues")]
    mouth_cues: Vec<MouthCue>,
}

impl LipSyncTrack {
    pub fn new(mut cues: Vec<MouthCue>) -> Result<Self, AnimationError> {
        for (index, cue) in cues.iter().enumerate() {
            if !cue.start.is_finite() || !cue.end.is_finite() {
                return Err(AnimationError::InvalidCue {
                    index,
                    reason: "non-finite time".into(),
                });
            }
            if cue.end < cue.start {
                return Err(AnimationError::InvalidCue {
                    index,
                    reason: format!("ends at {} before it starts at {}", cue.end, cue.start),
                });
            }
        }
        cues.sort_by(|a, b| a.start.total_cmp(&b.start));
        Ok(Self { cues })
    }

    pub fn from_json(s: &str) -> Result<Self, AnimationError> {
        let file: CueFile =
            serde_json::from_str(s).map_err(|e| AnimationError::Parse(e.to_string()))?;
        Self::new(file.mouth_cues)
    }

    pub fn cues(&self) -> &[MouthCue] {
        &self.cues
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// End of the last cue.
    pub fn duration(&self) -> f32 {
        self.cues.iter().map(|c| c.end).fold(0.0, f32::max)
    }

    /// Mouth shape active at `time` (the latest cue started at or before `time`
    /// that has not ended yet), or `Rest`.
    pub fn shape_at(&self, time: f32) -> MouthShape {
        let idx = self.cues.partition_point(|c| c.start <= time);
        self.cues[..idx]
            .iter()
            .rev()
            .find(|c| time < c.end)
            .map(|c| c.shape)
            .unwrap_or_default()
    }
}
