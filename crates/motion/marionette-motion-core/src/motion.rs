//! The `Motion` trait and the timing helpers shared by presets.

use std::f32::consts::TAU;

use marionette_animation_core::Easing;
use marionette_api_core::Pose;

/// A procedural motion source.
///
/// `advance` moves the motion's own clock; `sample` reads the current state.
/// The `time` passed to `sample` is the character clock, used by motions
/// aligned to an external timeline (lip-sync cues); self-timed motions ignore
/// it.
pub trait Motion {
    fn advance(&mut self, dt: f32);

    fn sample(&self, time: f32) -> Pose;

    /// Length of a one-shot motion; `None` for looping motions.
    fn duration(&self) -> Option<f32>;

    /// Seconds advanced so far.
    fn elapsed(&self) -> f32;

    fn is_finished(&self) -> bool {
        self.duration().is_some_and(|d| self.elapsed() >= d)
    }
}

/// Phase accumulator in `[0, 1)`.
///
/// The phase only depends on the total time advanced, not on how it was
/// split into ticks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhaseClock {
    phase: f32,
    period: f32,
    elapsed: f32,
}

impl PhaseClock {
    pub fn new(period: f32) -> Self {
        Self {
            phase: 0.0,
            period: if period.is_finite() && period > 0.0 {
                period
            } else {
                1.0
            },
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.elapsed += dt;
        self.phase = (self.phase + dt / self.period).rem_euclid(1.0);
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    /// Change the period while keeping the current phase.
    pub fn set_period(&mut self, period: f32) {
        if period.is_finite() && period > 0.0 {
            self.period = period;
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// `sin(2 pi (phase + shift))`.
    pub fn wave(&self, shift: f32) -> f32 {
        (TAU * (self.phase + shift)).sin()
    }
}

/// Clock of a bounded motion.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OneShotClock {
    elapsed: f32,
    duration: f32,
}

impl OneShotClock {
    pub fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Ease in over the first `ramp` seconds, hold, ease out over the last
    /// `ramp` seconds. Zero outside `[0, duration]`.
    pub fn envelope(&self, ramp: f32) -> f32 {
        let t = self.elapsed;
        let d = self.duration;
        if d <= 0.0 || t >= d {
            return 0.0;
        }
        let ramp = ramp.clamp(0.0, 0.5 * d);
        if ramp <= 0.0 {
            return 1.0;
        }
        let curve = Easing::EaseInOutQuad;
        if t < ramp {
            curve.apply(t / ramp)
        } else if t > d - ramp {
            curve.apply((d - t) / ramp)
        } else {
            1.0
        }
    }
}
