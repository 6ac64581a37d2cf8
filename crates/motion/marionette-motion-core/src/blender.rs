//! Weighted motion layers.
//!
//! Sampling sums every layer's pose scaled by its weight (weights are not
//! normalized), through the same accumulator clips use, so the result does
//! not depend on layer order. Bool/Text channels go to the heaviest layer.

use marionette_animation_core::Accumulator;
use marionette_api_core::math::lerp_f32;
use marionette_api_core::Pose;

use crate::ids::{LayerId, LayerIdAllocator};
use crate::motion::Motion;
use crate::presets::MotionPreset;

#[derive(Copy, Clone, Debug, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    remove_when_done: bool,
}

#[derive(Clone, Debug)]
struct Layer {
    id: LayerId,
    motion: MotionPreset,
    weight: f32,
    fade: Option<Fade>,
}

fn sanitize_weight(weight: f32) -> Option<f32> {
    weight.is_finite().then(|| weight.max(0.0))
}

#[derive(Debug, Default)]
pub struct MotionBlender {
    ids: LayerIdAllocator,
    layers: Vec<Layer>,
}

impl MotionBlender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer. Negative weights become 0, non-finite ones 0 as well.
    pub fn add(&mut self, motion: MotionPreset, weight: f32) -> LayerId {
        let id = self.ids.alloc();
        log::debug!("blender: add {:?} as {id:?} at weight {weight}", motion.kind());
        self.layers.push(Layer {
            id,
            motion,
            weight: sanitize_weight(weight).unwrap_or(0.0),
            fade: None,
        });
        id
    }

    pub fn remove(&mut self, id: LayerId) -> Option<MotionPreset> {
        let idx = self.layers.iter().position(|l| l.id == id)?;
        Some(self.layers.remove(idx).motion)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.iter().map(|l| l.id)
    }

    pub fn motion(&self, id: LayerId) -> Option<&MotionPreset> {
        self.layer(id).map(|l| &l.motion)
    }

    pub fn motion_mut(&mut self, id: LayerId) -> Option<&mut MotionPreset> {
        self.layer_mut(id).map(|l| &mut l.motion)
    }

    pub fn weight(&self, id: LayerId) -> Option<f32> {
        self.layer(id).map(|l| l.weight)
    }

    /// Set a weight immediately, cancelling any running fade. Returns false
    /// for unknown layers or non-finite weights.
    pub fn set_weight(&mut self, id: LayerId, weight: f32) -> bool {
        let Some(weight) = sanitize_weight(weight) else {
            return false;
        };
        match self.layer_mut(id) {
            Some(layer) => {
                layer.weight = weight;
                layer.fade = None;
                true
            }
            None => false,
        }
    }

    /// Ramp a layer's weight linearly to `weight` over `duration` seconds.
    pub fn fade_to(&mut self, id: LayerId, weight: f32, duration: f32) -> bool {
        self.start_fade(id, weight, duration, false)
    }

    /// Fade a layer to zero and remove it once the fade completes.
    pub fn fade_out(&mut self, id: LayerId, duration: f32) -> bool {
        self.start_fade(id, 0.0, duration, true)
    }

    /// Fade `from` to 0 and `to` to 1 over the same duration. Both layers
    /// stay in the blender.
    pub fn crossfade(&mut self, from: LayerId, to: LayerId, duration: f32) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        self.fade_to(from, 0.0, duration) && self.fade_to(to, 1.0, duration)
    }

    fn start_fade(&mut self, id: LayerId, weight: f32, duration: f32, remove: bool) -> bool {
        let Some(weight) = sanitize_weight(weight) else {
            return false;
        };
        let Some(layer) = self.layer_mut(id) else {
            return false;
        };
        if !duration.is_finite() || duration <= 0.0 {
            layer.weight = weight;
            layer.fade = None;
            if remove {
                self.remove(id);
            }
            return true;
        }
        layer.fade = Some(Fade {
            from: layer.weight,
            to: weight,
            duration,
            elapsed: 0.0,
            remove_when_done: remove,
        });
        true
    }

    /// Advance every layer's motion and fade by `dt`, then drop finished
    /// one-shots and completed fade-outs.
    pub fn advance(&mut self, dt: f32) {
        if !dt.is_finite() || dt < 0.0 {
            return;
        }
        for layer in &mut self.layers {
            layer.motion.advance(dt);
            if let Some(fade) = &mut layer.fade {
                fade.elapsed += dt;
                let t = (fade.elapsed / fade.duration).min(1.0);
                layer.weight = lerp_f32(fade.from, fade.to, t);
                if t >= 1.0 {
                    layer.weight = fade.to;
                }
            }
        }
        self.layers.retain(|layer| {
            if layer.motion.is_finished() {
                log::debug!("blender: {:?} {:?} finished", layer.id, layer.motion.kind());
                return false;
            }
            match layer.fade {
                Some(fade) if fade.elapsed >= fade.duration && fade.remove_when_done => {
                    log::debug!("blender: {:?} faded out", layer.id);
                    false
                }
                _ => true,
            }
        });
        for layer in &mut self.layers {
            if layer.fade.is_some_and(|f| f.elapsed >= f.duration) {
                layer.fade = None;
            }
        }
    }

    /// Weighted sum of every layer sampled at `time`.
    pub fn sample(&self, time: f32) -> Pose {
        let mut acc = Accumulator::new();
        for layer in &self.layers {
            if layer.weight > 0.0 {
                acc.add_pose(&layer.motion.sample(time), layer.weight);
            }
        }
        acc.finalize()
    }

    fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }
}
