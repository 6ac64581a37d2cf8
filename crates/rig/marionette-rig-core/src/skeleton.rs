//! Flat bone arena with forward kinematics.
//!
//! Bones are stored in insertion order and a parent must be added before its
//! children, so `parent < child` holds for every index and a single pass in
//! index order resolves all world transforms.

use hashbrown::HashMap;

use crate::constraint::BoneConstraint;
use crate::error::RigError;
use crate::ik::{solve_two_bone, BendDirection};
use marionette_api_core::math::wrap_angle;
use marionette_api_core::pose::Channel;
use marionette_api_core::{Pose, Value, Vec2};

/// Construction-time description of a bone.
#[derive(Clone, Debug, PartialEq)]
pub struct BoneDef {
    pub name: String,
    pub parent: Option<String>,
    pub length: f32,
    /// Local rotation at rest, radians relative to the parent's world rotation.
    pub rest_rotation: f32,
    /// Start position relative to the parent's end, in the parent's frame
    /// (relative to the skeleton origin for roots).
    pub attach: Vec2,
    pub constraint: Option<BoneConstraint>,
}

impl BoneDef {
    pub fn root(name: impl Into<String>, length: f32, rest_rotation: f32) -> Self {
        Self {
            name: name.into(),
            parent: None,
            length,
            rest_rotation,
            attach: Vec2::ZERO,
            constraint: None,
        }
    }

    pub fn child(
        name: impl Into<String>,
        parent: impl Into<String>,
        length: f32,
        rest_rotation: f32,
    ) -> Self {
        Self {
            parent: Some(parent.into()),
            ..Self::root(name, length, rest_rotation)
        }
    }

    pub fn with_attach(mut self, attach: Vec2) -> Self {
        self.attach = attach;
        self
    }

    pub fn with_constraint(mut self, constraint: BoneConstraint) -> Self {
        self.constraint = Some(constraint);
        self
    }
}

/// World-space result of forward kinematics.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoneTransform {
    pub start: Vec2,
    pub end: Vec2,
    pub rotation: f32,
}

#[derive(Clone, Debug)]
pub struct Bone {
    name: String,
    parent: Option<usize>,
    length: f32,
    rest_rotation: f32,
    local_rotation: f32,
    attach: Vec2,
    offset: Vec2,
    constraint: Option<BoneConstraint>,
    world: BoneTransform,
}

impl Bone {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Length after the constraint's fixed length, if any.
    pub fn length(&self) -> f32 {
        match &self.constraint {
            Some(c) => c.resolve_length(self.length),
            None => self.length,
        }
    }

    pub fn rest_rotation(&self) -> f32 {
        self.rest_rotation
    }

    pub fn local_rotation(&self) -> f32 {
        self.local_rotation
    }

    pub fn attach(&self) -> Vec2 {
        self.attach
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn constraint(&self) -> Option<&BoneConstraint> {
        self.constraint.as_ref()
    }

    pub fn world(&self) -> &BoneTransform {
        &self.world
    }

    pub fn start(&self) -> Vec2 {
        self.world.start
    }

    pub fn end(&self) -> Vec2 {
        self.world.end
    }

    pub fn rotation(&self) -> f32 {
        self.world.rotation
    }

    fn clamp(&self, rotation: f32) -> f32 {
        match &self.constraint {
            Some(c) => c.clamp_rotation(rotation),
            None => rotation,
        }
    }

    /// Local rotation equivalent to `rotation` on the turn closest to rest.
    fn unwrap_near_rest(&self, rotation: f32) -> f32 {
        self.rest_rotation + wrap_angle(rotation - self.rest_rotation)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    origin: Vec2,
    bones: Vec<Bone>,
    index: HashMap<String, usize>,
}

impl Skeleton {
    pub fn new(origin: Vec2) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// Append a bone. Its parent must already exist.
    pub fn add_bone(&mut self, def: BoneDef) -> Result<usize, RigError> {
        if self.index.contains_key(&def.name) {
            return Err(RigError::DuplicateBone(def.name));
        }
        if !def.length.is_finite() || def.length < 0.0 {
            return Err(RigError::InvalidBone {
                bone: def.name,
                field: "length",
            });
        }
        if !def.rest_rotation.is_finite() {
            return Err(RigError::InvalidBone {
                bone: def.name,
                field: "rest rotation",
            });
        }
        if !def.attach.is_finite() {
            return Err(RigError::InvalidBone {
                bone: def.name,
                field: "attach offset",
            });
        }
        let parent = match def.parent {
            Some(parent) => match self.index.get(&parent) {
                Some(&idx) => Some(idx),
                None => {
                    return Err(RigError::UnknownParent {
                        bone: def.name,
                        parent,
                    })
                }
            },
            None => None,
        };

        let idx = self.bones.len();
        self.index.insert(def.name.clone(), idx);
        self.bones.push(Bone {
            name: def.name,
            parent,
            length: def.length,
            rest_rotation: def.rest_rotation,
            local_rotation: def.rest_rotation,
            attach: def.attach,
            offset: Vec2::ZERO,
            constraint: def.constraint,
            world: BoneTransform::default(),
        });
        self.solve_bone(idx);
        Ok(idx)
    }

    pub fn bone_index(&self, name: &str) -> Result<usize, RigError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| RigError::BoneNotFound(name.to_string()))
    }

    pub fn bone(&self, name: &str) -> Result<&Bone, RigError> {
        self.bone_index(name).map(|idx| &self.bones[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// World rotation the bone has when the whole chain above it is at rest.
    pub fn rest_world_rotation(&self, name: &str) -> Result<f32, RigError> {
        let mut idx = Some(self.bone_index(name)?);
        let mut rotation = 0.0;
        while let Some(i) = idx {
            rotation += self.bones[i].rest_rotation;
            idx = self.bones[i].parent;
        }
        Ok(rotation)
    }

    /// Set a local rotation, clamped by the bone's constraint. Returns the
    /// rotation actually stored.
    pub fn set_local_rotation(&mut self, name: &str, rotation: f32) -> Result<f32, RigError> {
        let idx = self.bone_index(name)?;
        Ok(self.set_local_rotation_at(idx, rotation))
    }

    fn set_local_rotation_at(&mut self, idx: usize, rotation: f32) -> f32 {
        let bone = &mut self.bones[idx];
        let clamped = bone.clamp(rotation);
        bone.local_rotation = clamped;
        clamped
    }

    /// Positional offset added to the bone's attach point, in pixels.
    pub fn set_offset(&mut self, name: &str, offset: Vec2) -> Result<(), RigError> {
        let idx = self.bone_index(name)?;
        self.bones[idx].offset = offset;
        Ok(())
    }

    /// Restore rest rotations, clear offsets and re-run forward kinematics.
    pub fn reset_to_rest(&mut self) {
        for bone in &mut self.bones {
            bone.local_rotation = bone.rest_rotation;
            bone.offset = Vec2::ZERO;
        }
        self.solve_forward();
    }

    /// Shift every root bone by `delta`. Call [`Skeleton::solve_forward`]
    /// afterwards.
    pub fn translate_root(&mut self, delta: Vec2) {
        for bone in self.bones.iter_mut().filter(|b| b.parent.is_none()) {
            bone.offset += delta;
        }
    }

    pub fn solve_forward(&mut self) {
        for idx in 0..self.bones.len() {
            self.solve_bone(idx);
        }
    }

    fn solve_bone(&mut self, idx: usize) {
        let (parent_rotation, base) = match self.bones[idx].parent {
            Some(p) => {
                let parent = &self.bones[p].world;
                (parent.rotation, parent.end)
            }
            None => (0.0, self.origin),
        };
        let bone = &mut self.bones[idx];
        let rotation = parent_rotation + bone.local_rotation;
        let start = base + (bone.attach + bone.offset).rotate(parent_rotation);
        let length = match &bone.constraint {
            Some(c) => c.resolve_length(bone.length),
            None => bone.length,
        };
        bone.world = BoneTransform {
            start,
            end: start + Vec2::from_angle(rotation) * length,
            rotation,
        };
    }

    /// Apply the rotation and offset channels of `pose` on top of the rest
    /// pose. Rotations are radians relative to rest; offsets are in head
    /// units and scaled by `head_units` pixels.
    ///
    /// Channels naming bones that do not exist are skipped; their bone names
    /// are returned (sorted, without duplicates). Forward kinematics is not
    /// re-run.
    pub fn apply_pose(&mut self, pose: &Pose, head_units: f32) -> Vec<String> {
        let mut missing = Vec::new();
        for (key, value) in pose.iter() {
            let (bone, is_rotation) = match Channel::parse(key) {
                Channel::Rotation(bone) => (bone, true),
                Channel::Offset(bone) => (bone, false),
                Channel::IkTarget(_) | Channel::Property(_) => continue,
            };
            let Some(&idx) = self.index.get(bone) else {
                missing.push(bone.to_string());
                continue;
            };
            match (is_rotation, value) {
                (true, Value::Float(delta)) => {
                    let rest = self.bones[idx].rest_rotation;
                    self.set_local_rotation_at(idx, rest + delta);
                }
                (false, Value::Vec2([x, y])) => {
                    self.bones[idx].offset = Vec2::new(*x, *y) * head_units;
                }
                _ => log::warn!(
                    "pose channel '{key}' has unexpected kind {:?}; ignored",
                    value.kind()
                ),
            }
        }
        missing.sort();
        missing.dedup();
        for name in &missing {
            log::warn!("pose references missing bone '{name}'");
        }
        missing
    }

    /// Point `upper` and `lower` at `target` with analytic two-bone IK.
    ///
    /// The solved world angles are converted to local rotations, clamped by
    /// the bones' constraints, and forward kinematics is re-run. Returns the
    /// end of `lower` after the solve, which differs from `target` when the
    /// target is out of reach or a constraint kicked in.
    pub fn solve_two_bone_ik(
        &mut self,
        upper: &str,
        lower: &str,
        target: Vec2,
        bend: BendDirection,
    ) -> Result<Vec2, RigError> {
        let ui = self.bone_index(upper)?;
        let li = self.bone_index(lower)?;
        let up = &self.bones[ui];
        let parent_rotation = up
            .parent
            .map(|p| self.bones[p].world.rotation)
            .unwrap_or(0.0);
        let solution = solve_two_bone(
            up.world.start,
            up.length(),
            self.bones[li].length(),
            target,
            bend,
        );

        let upper_local = self.bones[ui].unwrap_near_rest(solution.root_angle - parent_rotation);
        self.set_local_rotation_at(ui, upper_local);
        let lower_local = self.bones[li].unwrap_near_rest(solution.joint_angle);
        self.set_local_rotation_at(li, lower_local);
        self.solve_forward();
        Ok(self.bones[li].world.end)
    }
}
