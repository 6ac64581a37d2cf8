//! One-at-a-time gesture triggering.
//!
//! At most one gesture layer is live in the blender. Triggers that arrive
//! while it plays are queued, ignored or replace it, per [`OverlapPolicy`].
//! A gesture is never left in the blender past its duration: the blender
//! drops finished one-shots on advance and [`GestureGenerator::update`]
//! removes any that are still there.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::blender::MotionBlender;
use crate::ids::LayerId;
use crate::motion::Motion;
use crate::presets::{MotionPreset, PresetKind};
use marionette_api_core::Vec2;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", rename_all = "snake_case")]
pub enum Gesture {
    Shrug,
    Wave,
    Point { target: Vec2 },
    Thinking,
    Celebrate,
}

impl Gesture {
    /// Point target used by phrase selection: out in front, chest height.
    pub const DEFAULT_POINT: Vec2 = Vec2::new(1.5, 1.0);

    pub fn to_preset(self) -> MotionPreset {
        match self {
            Gesture::Shrug => MotionPreset::shrug(),
            Gesture::Wave => MotionPreset::wave(),
            Gesture::Point { target } => MotionPreset::point(target),
            Gesture::Thinking => MotionPreset::thinking(),
            Gesture::Celebrate => MotionPreset::celebrate(),
        }
    }

    pub fn kind(self) -> PresetKind {
        match self {
            Gesture::Shrug => PresetKind::Shrug,
            Gesture::Wave => PresetKind::Wave,
            Gesture::Point { .. } => PresetKind::Point,
            Gesture::Thinking => PresetKind::Thinking,
            Gesture::Celebrate => PresetKind::Celebrate,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    #[default]
    Queue,
    Ignore,
    Replace,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started(LayerId),
    Queued,
    Ignored,
    /// The active gesture was removed and this one started in its place.
    Replaced(LayerId),
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Active {
    id: LayerId,
    gesture: Gesture,
}

#[derive(Clone, Debug)]
pub struct GestureGenerator {
    policy: OverlapPolicy,
    capacity: usize,
    queue: VecDeque<Gesture>,
    active: Option<Active>,
}

impl Default for GestureGenerator {
    fn default() -> Self {
        Self::new(OverlapPolicy::default())
    }
}

impl GestureGenerator {
    pub const DEFAULT_QUEUE: usize = 4;

    pub fn new(policy: OverlapPolicy) -> Self {
        Self::with_capacity(policy, Self::DEFAULT_QUEUE)
    }

    /// `capacity` bounds the queue; triggers beyond it are ignored.
    pub fn with_capacity(policy: OverlapPolicy, capacity: usize) -> Self {
        Self {
            policy,
            capacity,
            queue: VecDeque::with_capacity(capacity),
            active: None,
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: OverlapPolicy) {
        self.policy = policy;
    }

    pub fn active(&self) -> Option<(LayerId, Gesture)> {
        self.active.map(|a| (a.id, a.gesture))
    }

    pub fn queued(&self) -> impl Iterator<Item = &Gesture> {
        self.queue.iter()
    }

    pub fn trigger(&mut self, blender: &mut MotionBlender, gesture: Gesture) -> TriggerOutcome {
        self.release_finished(blender);
        let Some(active) = self.active else {
            return TriggerOutcome::Started(self.start(blender, gesture));
        };
        match self.policy {
            OverlapPolicy::Queue if self.queue.len() < self.capacity => {
                self.queue.push_back(gesture);
                TriggerOutcome::Queued
            }
            OverlapPolicy::Queue | OverlapPolicy::Ignore => {
                log::warn!(
                    "gesture {:?} ignored while {:?} plays",
                    gesture.kind(),
                    active.gesture.kind()
                );
                TriggerOutcome::Ignored
            }
            OverlapPolicy::Replace => {
                blender.remove(active.id);
                TriggerOutcome::Replaced(self.start(blender, gesture))
            }
        }
    }

    /// Call once per frame after the blender advanced: clears a gesture that
    /// ended, force-removes one that overran, and starts the next queued one.
    pub fn update(&mut self, blender: &mut MotionBlender) {
        self.release_finished(blender);
        if self.active.is_none() {
            if let Some(next) = self.queue.pop_front() {
                self.start(blender, next);
            }
        }
    }

    /// Drop the active gesture and everything queued.
    pub fn clear(&mut self, blender: &mut MotionBlender) {
        if let Some(active) = self.active.take() {
            blender.remove(active.id);
        }
        self.queue.clear();
    }

    fn start(&mut self, blender: &mut MotionBlender, gesture: Gesture) -> LayerId {
        let id = blender.add(gesture.to_preset(), 1.0);
        self.active = Some(Active { id, gesture });
        id
    }

    fn release_finished(&mut self, blender: &mut MotionBlender) {
        let Some(active) = self.active else {
            return;
        };
        match blender.motion(active.id).map(Motion::is_finished) {
            None => self.active = None,
            Some(true) => {
                log::debug!("gesture {:?} overran; removing", active.gesture.kind());
                blender.remove(active.id);
                self.active = None;
            }
            Some(false) => {}
        }
    }

    /// Pick a gesture for a spoken phrase from its first matching keyword.
    pub fn select_for_phrase(text: &str) -> Option<Gesture> {
        text.split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
            .find_map(|word| keyword_gesture(&word.to_lowercase()))
    }
}

fn keyword_gesture(word: &str) -> Option<Gesture> {
    let gesture = match word {
        "hi" | "hello" | "hey" | "bye" | "goodbye" | "welcome" => Gesture::Wave,
        "this" | "that" | "there" | "look" | "see" => Gesture::Point {
            target: Gesture::DEFAULT_POINT,
        },
        "hmm" | "think" | "wonder" | "maybe" | "perhaps" | "idea" => Gesture::Thinking,
        "yay" | "great" | "awesome" | "amazing" | "congratulations" | "hooray" => {
            Gesture::Celebrate
        }
        "dunno" | "whatever" | "unsure" | "shrug" | "don't" => Gesture::Shrug,
        _ => return None,
    };
    Some(gesture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_keywords() {
        assert_eq!(
            GestureGenerator::select_for_phrase("Hello there!"),
            Some(Gesture::Wave)
        );
        assert_eq!(
            GestureGenerator::select_for_phrase("I don't know"),
            Some(Gesture::Shrug)
        );
        assert_eq!(
            GestureGenerator::select_for_phrase("Look, over THERE"),
            Some(Gesture::Point {
                target: Gesture::DEFAULT_POINT
            })
        );
        assert_eq!(GestureGenerator::select_for_phrase("plain words"), None);
    }

    #[test]
    fn gesture_json_is_tagged() {
        let g: Gesture = serde_json::from_str(r#"{"gesture":"wave"}"#).unwrap();
        assert_eq!(g, Gesture::Wave);
        let p: Gesture =
            serde_json::from_str(r#"{"gesture":"point","target":{"x":1.0,"y":2.0}}"#).unwrap();
        assert_eq!(
            p,
            Gesture::Point {
                target: Vec2::new(1.0, 2.0)
            }
        );
    }
}
