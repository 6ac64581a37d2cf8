//! Spring chains for secondary motion (hair, tails, cloth strips).
//!
//! Node 0 chases the anchor; every following node chases its predecessor
//! plus one segment along the rest direction, bent toward gravity and wind.
//! After each sub-step every link longer than `segment_length * max_stretch`
//! is shortened back to that length.

use serde::{Deserialize, Serialize};

use crate::spring::{substeps, Spring2D, SpringParams};
use marionette_api_core::Vec2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainParams {
    pub stiffness: f32,
    pub damping: f32,
    /// Rest distance between neighbouring nodes, in pixels.
    pub segment_length: f32,
    /// Direction the chain hangs in without any force.
    pub rest_direction: Vec2,
    pub gravity: Vec2,
    pub wind: Vec2,
    /// How strongly gravity and wind bend the rest direction.
    pub bend_weight: f32,
    /// Longest allowed link as a multiple of `segment_length`.
    pub max_stretch: f32,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            stiffness: 180.0,
            damping: 14.0,
            segment_length: 10.0,
            rest_direction: Vec2::Y,
            gravity: Vec2::new(0.0, 1.0),
            wind: Vec2::ZERO,
            bend_weight: 0.5,
            max_stretch: 1.5,
        }
    }
}

impl ChainParams {
    /// Unit direction from one node to the next at rest.
    pub fn hang_direction(&self) -> Vec2 {
        let base = self.rest_direction.normalize_or(Vec2::Y);
        (self.rest_direction + (self.gravity + self.wind) * self.bend_weight).normalize_or(base)
    }

    fn spring(&self) -> SpringParams {
        SpringParams::new(self.stiffness, self.damping)
    }

    fn max_link(&self) -> f32 {
        self.segment_length.max(0.0) * self.max_stretch.max(1.0)
    }
}

#[derive(Clone, Debug)]
pub struct PhysicsChain {
    params: ChainParams,
    anchor: Vec2,
    nodes: Vec<Spring2D>,
}

impl PhysicsChain {
    /// A chain of `node_count` nodes hanging at rest from `anchor`.
    pub fn new(anchor: Vec2, node_count: usize, params: ChainParams) -> Self {
        let spring = params.spring();
        let nodes = (0..node_count)
            .map(|i| Spring2D::new(rest_position(anchor, &params, i), spring))
            .collect();
        Self {
            params,
            anchor,
            nodes,
        }
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    pub fn set_params(&mut self, params: ChainParams) {
        let spring = params.spring();
        for node in &mut self.nodes {
            node.set_params(spring);
        }
        self.params = params;
    }

    pub fn set_wind(&mut self, wind: Vec2) {
        self.params.wind = wind;
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: Vec2) {
        if anchor.is_finite() {
            self.anchor = anchor;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Put every node back on its rest position below the current anchor.
    pub fn reset(&mut self) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.snap_to(rest_position(self.anchor, &self.params, i));
        }
    }

    pub fn update(&mut self, dt: f32) {
        let Some((n, h)) = substeps(dt) else {
            return;
        };
        let step = self.params.hang_direction() * self.params.segment_length;
        let max_link = self.params.max_link();
        for _ in 0..n {
            for i in 0..self.nodes.len() {
                let target = if i == 0 {
                    self.anchor
                } else {
                    self.nodes[i - 1].value() + step
                };
                self.nodes[i].set_target(target);
                self.nodes[i].step(h);
            }
            for i in 1..self.nodes.len() {
                let prev = self.nodes[i - 1].value();
                let link = self.nodes[i].value() - prev;
                let len = link.length();
                if len > max_link && len > 0.0 {
                    self.nodes[i].place(prev + link * (max_link / len));
                }
            }
        }
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.nodes.iter().map(Spring2D::value).collect()
    }

    /// Displacement of each node from where it would hang at rest below the
    /// current anchor.
    pub fn offsets(&self) -> Vec<Vec2> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| node.value() - rest_position(self.anchor, &self.params, i))
            .collect()
    }
}

fn rest_position(anchor: Vec2, params: &ChainParams, index: usize) -> Vec2 {
    anchor + params.hang_direction() * (params.segment_length * index as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hang_direction_bends_toward_wind() {
        let params = ChainParams {
            gravity: Vec2::ZERO,
            wind: Vec2::new(2.0, 0.0),
            bend_weight: 0.5,
            ..ChainParams::default()
        };
        let dir = params.hang_direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - dir.y).abs() < 1e-6, "45 degrees: {dir:?}");
    }

    #[test]
    fn opposing_forces_fall_back_to_rest_direction() {
        let params = ChainParams {
            rest_direction: Vec2::Y,
            gravity: Vec2::new(0.0, -2.0),
            wind: Vec2::ZERO,
            bend_weight: 0.5,
            ..ChainParams::default()
        };
        assert_eq!(params.hang_direction(), Vec2::Y);
    }
}
