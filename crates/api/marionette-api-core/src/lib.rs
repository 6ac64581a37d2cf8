//! marionette-api-core: shared vector math, Value and Pose types (engine-agnostic)
//!
//! Coordinates follow screen conventions throughout the workspace: +x points
//! right, +y points down, and angles are radians measured from +x toward +y.

pub mod blend;
pub mod math;
pub mod pose;
pub mod value;

pub use math::Vec2;
pub use pose::Pose;
pub use value::{Value, ValueKind};
