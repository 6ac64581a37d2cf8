//! Marionette Rig Core (engine-agnostic)
//!
//! Everything that turns a pose into joint positions: damped springs and the
//! chains built from them, the bone arena with forward kinematics, rotation
//! constraints, analytic two-bone IK, ground-aware leg IK and the canon
//! humanoid built from head-unit proportions.

pub mod chain;
pub mod constraint;
pub mod error;
pub mod ik;
pub mod legs;
pub mod proportions;
pub mod skeleton;
pub mod spring;

pub use chain::{ChainParams, PhysicsChain};
pub use constraint::BoneConstraint;
pub use error::RigError;
pub use ik::{solve_two_bone, BendDirection, TwoBoneSolution};
pub use legs::{solve_legs, LegChain, LegIkConfig, LegIkReport, LegOutcome, LegTarget};
pub use proportions::{CanonProportions, HumanoidRig, Side};
pub use skeleton::{Bone, BoneDef, BoneTransform, Skeleton};
pub use spring::{Spring, Spring2D, SpringParams, MAX_SUBSTEP};
