//! marionette-orchestrator
//!
//! Turns the rig, motion and animation crates into a drawable character:
//! - `config`: the JSON rig configuration and its validation
//! - `character`: per-frame pose assembly (motion blend, IK, physics, clip
//!   properties) producing a [`Frame`]
//! - `surface` / `raster`: the drawing interface, a recording surface and an
//!   RGBA software target
//! - `encoder` / `render`: frame sinks, the external FFmpeg encoder and the
//!   offline render loop

pub mod character;
pub mod clock;
pub mod config;
pub mod encoder;
pub mod raster;
pub mod render;
pub mod surface;

pub use crate::character::{BoneSegment, Character, Frame};
pub use crate::clock::FrameClock;
pub use crate::config::{ConfigError, RigConfig};
pub use crate::encoder::{EncodeError, EncoderConfig, FfmpegEncoder, FrameSink, MemorySink};
pub use crate::raster::RasterTarget;
pub use crate::render::render_sequence;
pub use crate::surface::{draw_frame, Color, DrawCommand, DrawStyle, DrawSurface, RecordingSurface};
