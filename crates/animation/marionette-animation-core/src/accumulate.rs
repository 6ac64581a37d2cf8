//! Accumulation of weighted per-channel contributions into a final Pose.
//!
//! Numeric kinds are combined by weighted sum, which is commutative and
//! associative, so the result does not depend on the order contributions are
//! added in. Step kinds (Bool/Text) keep the value with the highest weight,
//! ties broken by a fixed ordering of the values themselves. When one channel
//! receives values of different kinds, each kind is accumulated separately and
//! the kind carrying the most weight is kept.

use std::cmp::Ordering;

use hashbrown::HashMap;

use marionette_api_core::{Pose, Value, ValueKind};

/// Accumulator entry storing weighted sums per Value kind.
#[derive(Clone, Debug)]
enum AccumEntry {
    Scalar { sum: f32, w: f32 },
    Vec2 { sum: [f32; 2], w: f32 },
    Color { sum: [f32; 4], w: f32 },
    Step { value: Value, w: f32 },
}

/// Fixed ordering used to break weight ties between step values.
fn step_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Text(x), Value::Text(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

impl AccumEntry {
    fn from_value(v: &Value, w: f32) -> Self {
        match v {
            Value::Float(x) => AccumEntry::Scalar { sum: x * w, w },
            Value::Vec2(a) => AccumEntry::Vec2 {
                sum: [a[0] * w, a[1] * w],
                w,
            },
            Value::ColorRgba(c) => AccumEntry::Color {
                sum: [c[0] * w, c[1] * w, c[2] * w, c[3] * w],
                w,
            },
            Value::Bool(_) | Value::Text(_) => AccumEntry::Step {
                value: v.clone(),
                w,
            },
        }
    }

    fn kind(&self) -> ValueKind {
        match self {
            AccumEntry::Scalar { .. } => ValueKind::Float,
            AccumEntry::Vec2 { .. } => ValueKind::Vec2,
            AccumEntry::Color { .. } => ValueKind::ColorRgba,
            AccumEntry::Step { value, .. } => value.kind(),
        }
    }

    fn weight(&self) -> f32 {
        match self {
            AccumEntry::Scalar { w, .. }
            | AccumEntry::Vec2 { w, .. }
            | AccumEntry::Color { w, .. }
            | AccumEntry::Step { w, .. } => *w,
        }
    }

    /// `v` must have this entry's kind.
    fn add_value(&mut self, v: &Value, w: f32) {
        match (self, v) {
            (AccumEntry::Scalar { sum, w: ww }, Value::Float(x)) => {
                *sum += x * w;
                *ww += w;
            }
            (AccumEntry::Vec2 { sum, w: ww }, Value::Vec2(a)) => {
                sum[0] += a[0] * w;
                sum[1] += a[1] * w;
                *ww += w;
            }
            (AccumEntry::Color { sum, w: ww }, Value::ColorRgba(c)) => {
                sum[0] += c[0] * w;
                sum[1] += c[1] * w;
                sum[2] += c[2] * w;
                sum[3] += c[3] * w;
                *ww += w;
            }
            (AccumEntry::Step { value, w: ww }, Value::Bool(_) | Value::Text(_)) => {
                let wins = match w.partial_cmp(ww) {
                    Some(Ordering::Greater) => true,
                    Some(Ordering::Equal) => step_order(v, value) == Ordering::Greater,
                    _ => false,
                };
                if wins {
                    *value = v.clone();
                    *ww = w;
                }
            }
            _ => {}
        }
    }

    fn finalize(self, normalize: bool) -> Option<Value> {
        let scale = |w: f32| -> Option<f32> {
            if !normalize {
                Some(1.0)
            } else if w > 0.0 {
                Some(1.0 / w)
            } else {
                None
            }
        };
        match self {
            AccumEntry::Scalar { sum, w } => scale(w).map(|s| Value::Float(sum * s)),
            AccumEntry::Vec2 { sum, w } => scale(w).map(|s| Value::Vec2([sum[0] * s, sum[1] * s])),
            AccumEntry::Color { sum, w } => {
                scale(w).map(|s| Value::ColorRgba([sum[0] * s, sum[1] * s, sum[2] * s, sum[3] * s]))
            }
            AccumEntry::Step { value, .. } => Some(value),
        }
    }
}

/// Accumulates per-channel contributions across motion sources.
#[derive(Debug, Default)]
pub struct Accumulator {
    /// One entry per value kind seen on the channel.
    map: HashMap<String, Vec<AccumEntry>>,
}

fn kind_rank(kind: ValueKind) -> u8 {
    match kind {
        ValueKind::Float => 0,
        ValueKind::Vec2 => 1,
        ValueKind::ColorRgba => 2,
        ValueKind::Bool => 3,
        ValueKind::Text => 4,
    }
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contribution; non-positive or non-finite weights are skipped.
    pub fn add(&mut self, key: &str, value: &Value, weight: f32) {
        if !weight.is_finite() || weight <= 0.0 {
            return;
        }
        let kind = value.kind();
        match self.map.get_mut(key) {
            Some(entries) => match entries.iter_mut().find(|e| e.kind() == kind) {
                Some(entry) => entry.add_value(value, weight),
                None => entries.push(AccumEntry::from_value(value, weight)),
            },
            None => {
                self.map
                    .insert(key.to_string(), vec![AccumEntry::from_value(value, weight)]);
            }
        }
    }

    /// Add every channel of `pose` with the same weight.
    pub fn add_pose(&mut self, pose: &Pose, weight: f32) {
        for (key, value) in pose.iter() {
            self.add(key, value, weight);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Weighted sum per channel (weights are not normalized).
    pub fn finalize(self) -> Pose {
        self.finish(false)
    }

    /// Weighted average per channel (sum divided by total weight).
    pub fn finalize_normalized(self) -> Pose {
        self.finish(true)
    }

    fn finish(self, normalize: bool) -> Pose {
        self.map
            .into_iter()
            .filter_map(|(k, entries)| {
                if entries.len() > 1 {
                    let kinds: Vec<ValueKind> = entries.iter().map(AccumEntry::kind).collect();
                    log::warn!("accumulate: '{k}' received mixed kinds {kinds:?}");
                }
                let entry = entries.into_iter().max_by(|a, b| {
                    a.weight()
                        .total_cmp(&b.weight())
                        .then_with(|| kind_rank(b.kind()).cmp(&kind_rank(a.kind())))
                })?;
                entry.finalize(normalize).map(|v| (k, v))
            })
            .collect()
    }
}
