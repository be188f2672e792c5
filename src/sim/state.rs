//! Simulation entities
//!
//! Bodies are the only entities that move. Obstacles, boundaries and bounds
//! are fixed for the lifetime of a scene.

use std::f64::consts::PI;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use super::integrator::{IntegrationMode, integrate};
use crate::error::SceneError;

/// Stable identifier handed out by a world's body registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// A ball or bead
///
/// `mass` and `radius` are fixed after construction; only `pos` and `vel`
/// change during simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BodyFields")]
pub struct Body {
    pub id: BodyId,
    pub pos: DVec2,
    pub vel: DVec2,
    radius: f64,
    mass: f64,
    restitution: f64,
    /// RGBA color for the renderer
    pub color: [f32; 4],
    /// Optional caller-assigned label
    #[serde(default)]
    pub label: Option<String>,
}

impl Body {
    pub fn new(radius: f64, mass: f64, pos: DVec2, vel: DVec2) -> Result<Self, SceneError> {
        if !(radius > 0.0) {
            return Err(SceneError::InvalidRadius(radius));
        }
        if !(mass > 0.0) {
            return Err(SceneError::InvalidMass(mass));
        }
        Ok(Self {
            id: BodyId(0),
            pos,
            vel,
            radius,
            mass,
            restitution: 1.0,
            color: [0.0, 0.0, 0.0, 1.0],
            label: None,
        })
    }

    /// Body whose mass equals its disc area (`π r²`)
    pub fn with_area_mass(radius: f64, pos: DVec2, vel: DVec2) -> Result<Self, SceneError> {
        Self::new(radius, PI * radius * radius, pos, vel)
    }

    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Coefficient of restitution, clamped to [0, 1]
    #[inline]
    pub fn restitution(&self) -> f64 {
        self.restitution.clamp(0.0, 1.0)
    }

    /// Advance under a constant acceleration
    pub fn integrate(&mut self, accel: DVec2, dt: f64, substeps: u32, mode: IntegrationMode) {
        integrate(&mut self.pos, &mut self.vel, accel, dt, substeps, mode);
    }

    pub fn momentum(&self) -> DVec2 {
        self.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.length_squared()
    }
}

/// Wire form of `Body`, checked through `Body::new` on the way in
#[derive(Deserialize)]
struct BodyFields {
    id: BodyId,
    pos: DVec2,
    vel: DVec2,
    radius: f64,
    mass: f64,
    restitution: f64,
    color: [f32; 4],
    #[serde(default)]
    label: Option<String>,
}

impl TryFrom<BodyFields> for Body {
    type Error = SceneError;

    fn try_from(fields: BodyFields) -> Result<Self, Self::Error> {
        let mut body = Body::new(fields.radius, fields.mass, fields.pos, fields.vel)?
            .with_restitution(fields.restitution)
            .with_color(fields.color);
        body.id = fields.id;
        body.label = fields.label;
        Ok(body)
    }
}

/// A static circular bumper that kicks balls away at a fixed speed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: DVec2,
    pub radius: f64,
    /// Outward speed given to any ball that touches the obstacle
    pub push_velocity: f64,
    pub color: [f32; 4],
}

impl Obstacle {
    pub fn new(radius: f64, pos: DVec2, push_velocity: f64) -> Self {
        Self {
            pos,
            radius,
            push_velocity,
            color: [1.0, 0.5, 0.0, 1.0],
        }
    }
}

/// Closed polyline enclosing a playfield
///
/// Vertices are stored counter-clockwise so that `perp(b - a)` of every edge
/// faces into the playfield. Clockwise input is reversed on construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<DVec2>", into = "Vec<DVec2>")]
pub struct Boundary {
    vertices: Vec<DVec2>,
}

impl Boundary {
    pub fn new(mut vertices: Vec<DVec2>) -> Result<Self, SceneError> {
        if vertices.len() < 3 {
            return Err(SceneError::TooFewVertices(vertices.len()));
        }
        if let Some(i) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(SceneError::NonFiniteVertex(i));
        }
        if signed_area(&vertices) < 0.0 {
            log::debug!("Boundary given clockwise, reversing {} vertices", vertices.len());
            vertices.reverse();
        }
        Ok(Self { vertices })
    }

    /// Static tables known to be counter-clockwise with at least 3 vertices
    pub(crate) fn from_ccw_unchecked(vertices: Vec<DVec2>) -> Self {
        debug_assert!(vertices.len() >= 3 && signed_area(&vertices) > 0.0);
        Self { vertices }
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Edges `(a, b)` in order, including the closing edge back to the start
    pub fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

impl TryFrom<Vec<DVec2>> for Boundary {
    type Error = SceneError;

    fn try_from(vertices: Vec<DVec2>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

impl From<Boundary> for Vec<DVec2> {
    fn from(boundary: Boundary) -> Self {
        boundary.vertices
    }
}

/// Shoelace area, positive for counter-clockwise winding
fn signed_area(vertices: &[DVec2]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
        .sum::<f64>()
        * 0.5
}

/// Axis-aligned rectangle in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Rectangle from the origin to `(width, height)`
    pub fn from_size(width: f64, height: f64) -> Self {
        Self {
            min: DVec2::ZERO,
            max: DVec2::new(width, height),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Axis-aligned box for the 3D cannonball: walls on x and z, a floor on y
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3 {
    pub x_min: f64,
    pub x_max: f64,
    pub z_min: f64,
    pub z_max: f64,
    pub y_min: f64,
}

impl Bounds3 {
    /// Box symmetric around the origin on x/z, floor at `y_min`
    pub fn symmetric(half_x: f64, half_z: f64, y_min: f64) -> Self {
        Self {
            x_min: -half_x,
            x_max: half_x,
            z_min: -half_z,
            z_max: half_z,
            y_min,
        }
    }

    pub fn contains(&self, p: DVec3) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.z >= self.z_min && p.z <= self.z_max && p.y >= self.y_min
    }
}

/// What keeps balls inside a 2D world
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum Walls {
    #[default]
    None,
    Rect(Bounds),
    Polygon(Boundary),
}
