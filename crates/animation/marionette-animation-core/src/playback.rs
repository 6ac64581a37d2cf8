//! Clip playback: maps a running clock onto a shared clip's local time.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::AnimationClip;
use marionette_api_core::Pose;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    #[default]
    Once,
    Loop,
    PingPong,
}

fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Reflect t into [0, span] with ping-pong behavior, where period = 2 * span.
fn ping_pong(t: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return 0.0;
    }
    let period = 2.0 * span;
    let m = fmod(t, period);
    if m <= span {
        m
    } else {
        period - m
    }
}

/// Map a running time onto [0, duration] under `mode`.
pub fn local_time(time: f32, duration: f32, mode: LoopMode) -> f32 {
    if duration <= 0.0 {
        return 0.0;
    }
    match mode {
        LoopMode::Once => time.clamp(0.0, duration),
        LoopMode::Loop => fmod(time, duration),
        LoopMode::PingPong => ping_pong(time, duration),
    }
}

/// A playing instance of a shared clip.
#[derive(Clone, Debug)]
pub struct ClipPlayback {
    clip: Arc<AnimationClip>,
    pub time: f32,
    pub speed: f32,
    pub mode: LoopMode,
}

impl ClipPlayback {
    pub fn new(clip: Arc<AnimationClip>, mode: LoopMode) -> Self {
        Self {
            clip,
            time: 0.0,
            speed: 1.0,
            mode,
        }
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() {
            self.time += dt * self.speed;
        }
    }

    pub fn seek(&mut self, time: f32) {
        self.time = time;
    }

    /// Clip-local time after loop mapping.
    pub fn local_time(&self) -> f32 {
        local_time(self.time, self.clip.duration(), self.mode)
    }

    /// A `Once` playback has finished when its clock passed the clip end.
    pub fn is_finished(&self) -> bool {
        self.mode == LoopMode::Once && self.time >= self.clip.duration()
    }

    pub fn sample(&self) -> Pose {
        self.clip.sample(self.local_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_and_ping_pong_mapping() {
        assert!((local_time(2.5, 2.0, LoopMode::Loop) - 0.5).abs() < 1e-6);
        assert!((local_time(-0.5, 2.0, LoopMode::Loop) - 1.5).abs() < 1e-6);
        assert!((local_time(2.5, 2.0, LoopMode::PingPong) - 1.5).abs() < 1e-6);
        assert!((local_time(5.0, 2.0, LoopMode::Once) - 2.0).abs() < 1e-6);
        assert_eq!(local_time(1.0, 0.0, LoopMode::Loop), 0.0);
    }
}
