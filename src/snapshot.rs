//! Drawable state read back from a world
//!
//! `CircleInstance` is laid out for direct upload as a GPU instance buffer.
//! `Snapshot` carries the same information for front ends that draw with a
//! 2D canvas or just log it.

use bytemuck::{Pod, Zeroable};
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sim::{BeadWorld, Body, BodyId, Obstacle, World};

/// One filled circle, in simulation units
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub pos: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

impl CircleInstance {
    pub const fn new(x: f32, y: f32, radius: f32, color: [f32; 4]) -> Self {
        Self {
            pos: [x, y],
            radius,
            _pad: 0.0,
            color,
        }
    }

    fn at(pos: DVec2, radius: f64, color: [f32; 4]) -> Self {
        Self::new(pos.x as f32, pos.y as f32, radius as f32, color)
    }
}

impl From<&Body> for CircleInstance {
    fn from(body: &Body) -> Self {
        Self::at(body.pos, body.radius(), body.color)
    }
}

impl From<&Obstacle> for CircleInstance {
    fn from(obstacle: &Obstacle) -> Self {
        Self::at(obstacle.pos, obstacle.radius, obstacle.color)
    }
}

impl World {
    /// Obstacles first, then bodies in insertion order
    pub fn circle_instances(&self) -> Vec<CircleInstance> {
        self.obstacles
            .iter()
            .map(CircleInstance::from)
            .chain(self.bodies().iter().map(CircleInstance::from))
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            bodies: self.bodies().iter().map(BodyView::from).collect(),
            score: self.score(),
            flippers: self
                .flippers
                .iter()
                .map(|f| FlipperView {
                    pivot: f.pos,
                    tip: f.tip(),
                    radius: f.radius,
                })
                .collect(),
        }
    }
}

impl BeadWorld {
    pub fn circle_instances(&self) -> Vec<CircleInstance> {
        self.beads().iter().map(|b| CircleInstance::from(&b.body)).collect()
    }
}

/// Position and look of a single body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyView {
    pub id: BodyId,
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub color: [f32; 4],
    #[serde(default)]
    pub label: Option<String>,
}

impl From<&Body> for BodyView {
    fn from(body: &Body) -> Self {
        Self {
            id: body.id,
            pos: body.pos,
            vel: body.vel,
            radius: body.radius(),
            color: body.color,
            label: body.label.clone(),
        }
    }
}

/// A flipper drawn as a capsule from `pivot` to `tip`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlipperView {
    pub pivot: DVec2,
    pub tip: DVec2,
    pub radius: f64,
}

/// Everything a 2D front end needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub bodies: Vec<BodyView>,
    pub score: u64,
    pub flippers: Vec<FlipperView>,
}
