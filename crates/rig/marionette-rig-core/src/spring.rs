//! Damped springs integrated with semi-implicit Euler.
//!
//! Per step of size `h` (unit mass):
//! ```text
//! a  = k * (target - x) - c * v
//! v += a * h
//! x += v * h
//! ```
//! `update(dt)` splits `dt` into equal sub-steps no longer than
//! [`MAX_SUBSTEP`], so a long frame integrates the same way a run of short
//! frames would.

use serde::{Deserialize, Serialize};

use marionette_api_core::Vec2;

/// Longest single integration step, in seconds.
pub const MAX_SUBSTEP: f32 = 1.0 / 60.0;

/// Stiffness `k` and damping `c` of a unit-mass spring.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringParams {
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: 120.0,
            damping: 20.0,
        }
    }
}

fn sanitize(value: f32, what: &str) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("spring {what} {value} is not a non-negative number; using 0");
        0.0
    }
}

impl SpringParams {
    /// Negative or non-finite constants are replaced by 0.
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness: sanitize(stiffness, "stiffness"),
            damping: sanitize(damping, "damping"),
        }
    }

    /// Critically damped spring of the given stiffness.
    pub fn critical(stiffness: f32) -> Self {
        let stiffness = sanitize(stiffness, "stiffness");
        Self {
            stiffness,
            damping: 2.0 * stiffness.sqrt(),
        }
    }

    /// `2 * sqrt(k)`.
    pub fn critical_damping(&self) -> f32 {
        2.0 * self.stiffness.max(0.0).sqrt()
    }

    /// `c / (2 * sqrt(k))`; infinite for a spring without stiffness.
    pub fn damping_ratio(&self) -> f32 {
        let critical = self.critical_damping();
        if critical > 0.0 {
            self.damping / critical
        } else {
            f32::INFINITY
        }
    }

    /// At or above critical damping: approaches the target without crossing it.
    pub fn is_overdamped(&self) -> bool {
        self.damping >= self.critical_damping()
    }

    fn sanitized(self) -> Self {
        Self::new(self.stiffness, self.damping)
    }
}

/// Number and size of the sub-steps used for a tick of `dt` seconds, or `None`
/// when the tick should be ignored.
pub(crate) fn substeps(dt: f32) -> Option<(u32, f32)> {
    if !dt.is_finite() || dt <= 0.0 {
        return None;
    }
    let wanted = (dt / MAX_SUBSTEP).ceil().max(1.0);
    if wanted > u32::MAX as f32 {
        log::warn!("spring: tick of {dt}s exceeds {} sub-steps; step size grows", u32::MAX);
        return Some((u32::MAX, dt / u32::MAX as f32));
    }
    let n = wanted as u32;
    Some((n, dt / n as f32))
}

/// Scalar spring.
#[derive(Clone, Debug, PartialEq)]
pub struct Spring {
    value: f32,
    velocity: f32,
    target: f32,
    params: SpringParams,
}

impl Spring {
    /// A spring at rest on `value`.
    pub fn new(value: f32, params: SpringParams) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            params: params.sanitized(),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn params(&self) -> SpringParams {
        self.params
    }

    pub fn set_params(&mut self, params: SpringParams) {
        self.params = params.sanitized();
    }

    pub fn set_target(&mut self, target: f32) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Jump to `value` and stop there.
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn update(&mut self, dt: f32) {
        if let Some((n, h)) = substeps(dt) {
            for _ in 0..n {
                self.step(h);
            }
        }
    }

    fn step(&mut self, h: f32) {
        let accel =
            self.params.stiffness * (self.target - self.value) - self.params.damping * self.velocity;
        self.velocity += accel * h;
        self.value += self.velocity * h;
    }

    /// Both the distance to the target and the speed are within `eps`.
    pub fn is_settled(&self, eps: f32) -> bool {
        (self.target - self.value).abs() <= eps && self.velocity.abs() <= eps
    }
}

/// Two-dimensional spring; both axes share the constants.
#[derive(Clone, Debug, PartialEq)]
pub struct Spring2D {
    value: Vec2,
    velocity: Vec2,
    target: Vec2,
    params: SpringParams,
}

impl Spring2D {
    pub fn new(value: Vec2, params: SpringParams) -> Self {
        Self {
            value,
            velocity: Vec2::ZERO,
            target: value,
            params: params.sanitized(),
        }
    }

    pub fn value(&self) -> Vec2 {
        self.value
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn params(&self) -> SpringParams {
        self.params
    }

    pub fn set_params(&mut self, params: SpringParams) {
        self.params = params.sanitized();
    }

    pub fn set_target(&mut self, target: Vec2) {
        if target.is_finite() {
            self.target = target;
        }
    }

    pub fn snap_to(&mut self, value: Vec2) {
        self.value = value;
        self.target = value;
        self.velocity = Vec2::ZERO;
    }

    pub fn update(&mut self, dt: f32) {
        if let Some((n, h)) = substeps(dt) {
            for _ in 0..n {
                self.step(h);
            }
        }
    }

    pub(crate) fn step(&mut self, h: f32) {
        let accel = (self.target - self.value) * self.params.stiffness
            - self.velocity * self.params.damping;
        self.velocity += accel * h;
        self.value += self.velocity * h;
    }

    /// Move the value without touching the velocity (used by length clamps).
    pub(crate) fn place(&mut self, value: Vec2) {
        self.value = value;
    }

    pub fn is_settled(&self, eps: f32) -> bool {
        self.value.distance(self.target) <= eps && self.velocity.length() <= eps
    }
}
