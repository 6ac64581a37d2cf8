//! Talking: mouth shapes from lip-sync cues, or a procedural chatter when no
//! cues are attached.

use std::sync::Arc;

use crate::motion::{Motion, PhaseClock};
use marionette_animation_core::{LipSyncTrack, MouthShape};
use marionette_api_core::{Pose, Value};

#[derive(Clone, Debug)]
pub struct Talking {
    cues: Option<Arc<LipSyncTrack>>,
    syllables: PhaseClock,
    phrase: PhaseClock,
    /// Head nod per unit of jaw opening, radians.
    pub nod: f32,
}

impl Talking {
    pub fn new(cues: Option<Arc<LipSyncTrack>>) -> Self {
        Self {
            cues,
            syllables: PhaseClock::new(0.18),
            phrase: PhaseClock::new(1.7),
            nod: 0.04,
        }
    }

    pub fn cues(&self) -> Option<&LipSyncTrack> {
        self.cues.as_deref()
    }

    fn chatter(&self) -> MouthShape {
        // Open on syllable peaks, close briefly between phrases.
        if self.phrase.phase() > 0.85 {
            return MouthShape::Closed;
        }
        let open = self.syllables.wave(0.0).abs() * (0.6 + 0.4 * self.phrase.wave(0.0).abs());
        match open {
            o if o < 0.15 => MouthShape::Closed,
            o if o < 0.35 => MouthShape::Narrow,
            o if o < 0.6 => MouthShape::Open,
            o if o < 0.8 => MouthShape::Round,
            _ => MouthShape::Wide,
        }
    }
}

impl Motion for Talking {
    fn advance(&mut self, dt: f32) {
        self.syllables.advance(dt);
        self.phrase.advance(dt);
    }

    fn sample(&self, time: f32) -> Pose {
        let shape = match &self.cues {
            Some(cues) => cues.shape_at(time),
            None => self.chatter(),
        };
        let jaw = shape.openness();
        let mut pose = Pose::with_capacity(3);
        pose.insert("mouth", Value::Text(shape.code().to_string()));
        pose.insert("jaw_open", Value::Float(jaw));
        pose.set_rotation("head", self.nod * jaw);
        pose
    }

    fn duration(&self) -> Option<f32> {
        None
    }

    fn elapsed(&self) -> f32 {
        self.syllables.elapsed()
    }
}
