//! Rig configuration, loaded from JSON.
//!
//! Every field has a default, so `{}` is a valid configuration: a front-facing
//! eight-head figure on a 640x480 canvas at 30 fps.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use marionette_api_core::Vec2;
use marionette_motion_core::{GaitParams, OverlapPolicy};
use marionette_rig_core::{CanonProportions, ChainParams, LegIkConfig, RigError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rig config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame_rate must be at least 1")]
    FrameRate,

    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("view_angle must lie in [0, 90] degrees, got {0}")]
    ViewAngle(f32),

    #[error("canvas must be at least 1x1, got {width}x{height}")]
    Canvas { width: u32, height: u32 },

    #[error("origin must be finite")]
    Origin,

    #[error(transparent)]
    Rig(#[from] RigError),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Frames per second of the render clock.
    pub frame_rate: u32,
    pub width: u32,
    pub height: u32,
    /// Global size multiplier applied to `head_size`.
    pub scale: f32,
    /// Pixels per head unit before scaling.
    pub head_size: f32,
    pub proportions: CanonProportions,
    /// 0 faces the viewer, 90 is a side profile.
    pub view_angle: f32,
    /// Ground point under the hips. Defaults to the canvas centre, 10% above
    /// the bottom edge.
    pub origin: Option<Vec2>,
    /// `ground_y` is replaced by the rig's ground line.
    pub leg_ik: LegIkConfig,
    pub hair: ChainParams,
    /// Hair nodes; 0 disables the chain.
    pub hair_segments: usize,
    pub walk: GaitParams,
    pub run: GaitParams,
    pub gesture_policy: OverlapPolicy,
    pub breathing: bool,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            width: 640,
            height: 480,
            scale: 1.0,
            head_size: 40.0,
            proportions: CanonProportions::default(),
            view_angle: 0.0,
            origin: None,
            leg_ik: LegIkConfig::default(),
            hair: ChainParams::default(),
            hair_segments: 6,
            walk: GaitParams::walk(),
            run: GaitParams::run(),
            gesture_policy: OverlapPolicy::default(),
            breathing: true,
        }
    }
}

impl RigConfig {
    /// Parse and validate.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: RigConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate < 1 {
            return Err(ConfigError::FrameRate);
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Canvas {
                width: self.width,
                height: self.height,
            });
        }
        for (field, value) in [("scale", self.scale), ("head_size", self.head_size)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !(0.0..=90.0).contains(&self.view_angle) {
            return Err(ConfigError::ViewAngle(self.view_angle));
        }
        if self.origin.is_some_and(|o| !o.is_finite()) {
            return Err(ConfigError::Origin);
        }
        self.proportions.validate()?;
        Ok(())
    }

    /// Pixels per head unit before canon rescaling.
    pub fn head_px(&self) -> f32 {
        self.head_size * self.scale
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
            .unwrap_or_else(|| Vec2::new(self.width as f32 * 0.5, self.height as f32 * 9.0 / 10.0))
    }

    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }

    /// Fraction of a walk stride visible on screen: none facing the viewer,
    /// all of it in profile.
    pub fn stride_factor(&self) -> f32 {
        self.view_angle.clamp(0.0, 90.0).to_radians().sin()
    }
}
