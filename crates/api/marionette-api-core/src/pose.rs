//! Pose: the transient per-frame map from channel key to resolved value.
//!
//! Channel keys follow a small naming convention:
//! - `"<bone>.rotation"`: Float, radians, delta from the bone's rest rotation
//! - `"<bone>.offset"`: Vec2, head units, delta from the bone's rest attach point
//! - `"ik.<effector>"`: Vec2, head units, offset from the effector's rest position
//!   (+y lifts the effector, i.e. points up on screen)
//! - anything else is a free property (`"mouth"`, `"jaw_open"`, `"opacity"`, ...)

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::Value;

const ROTATION_SUFFIX: &str = ".rotation";
const OFFSET_SUFFIX: &str = ".offset";
const IK_PREFIX: &str = "ik.";

/// Parsed view of a channel key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel<'a> {
    Rotation(&'a str),
    Offset(&'a str),
    IkTarget(&'a str),
    Property(&'a str),
}

impl<'a> Channel<'a> {
    pub fn parse(key: &'a str) -> Self {
        if let Some(effector) = key.strip_prefix(IK_PREFIX) {
            return Channel::IkTarget(effector);
        }
        if let Some(bone) = key.strip_suffix(ROTATION_SUFFIX) {
            return Channel::Rotation(bone);
        }
        if let Some(bone) = key.strip_suffix(OFFSET_SUFFIX) {
            return Channel::Offset(bone);
        }
        Channel::Property(key)
    }
}

pub fn rotation_key(bone: &str) -> String {
    format!("{bone}{ROTATION_SUFFIX}")
}

pub fn offset_key(bone: &str) -> String {
    format!("{bone}{OFFSET_SUFFIX}")
}

pub fn ik_key(effector: &str) -> String {
    format!("{IK_PREFIX}{effector}")
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pose {
    values: HashMap<String, Value>,
}

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            values: HashMap::with_capacity(n),
        }
    }

    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn set_rotation(&mut self, bone: &str, radians: f32) {
        self.insert(rotation_key(bone), Value::Float(radians));
    }

    pub fn rotation(&self, bone: &str) -> Option<f32> {
        self.get(&rotation_key(bone)).and_then(Value::as_float)
    }

    pub fn set_offset(&mut self, bone: &str, offset: Vec2) {
        self.insert(offset_key(bone), Value::vec2(offset));
    }

    pub fn offset(&self, bone: &str) -> Option<Vec2> {
        self.get(&offset_key(bone)).and_then(Value::as_vec2)
    }

    pub fn set_ik_target(&mut self, effector: &str, offset: Vec2) {
        self.insert(ik_key(effector), Value::vec2(offset));
    }

    pub fn ik_target(&self, effector: &str) -> Option<Vec2> {
        self.get(&ik_key(effector)).and_then(Value::as_vec2)
    }

    pub fn scalar(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(Value::as_float)
    }

    /// Overlay `other` on top of `self`; keys present in both take `other`'s value.
    pub fn merge(&mut self, other: Pose) {
        self.values.extend(other.values);
    }

    /// Keep only free properties (drops bone and IK channels).
    pub fn properties(&self) -> Pose {
        let values = self
            .values
            .iter()
            .filter(|(k, _)| matches!(Channel::parse(k), Channel::Property(_)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Pose { values }
    }
}

impl FromIterator<(String, Value)> for Pose {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Pose {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Pose {
    type Item = (String, Value);
    type IntoIter = hashbrown::hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
