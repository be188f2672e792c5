//! Pinball flipper kinematics
//!
//! A flipper is a capsule pivoting around `pos`. Holding it activated swings
//! `rotation` toward `max_rotation` at a constant angular speed; releasing it
//! swings back toward zero.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Opaque identifier of whatever input is holding a flipper (key, touch id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputSource(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flipper {
    pub radius: f64,
    /// Pivot point
    pub pos: DVec2,
    pub length: f64,
    pub rest_angle: f64,
    /// Magnitude of the swing (radians)
    pub max_rotation: f64,
    /// +1 swings counter-clockwise, -1 clockwise
    pub sign: f64,
    /// Maximum angular speed (radians/s)
    pub angular_velocity: f64,
    /// Current swing, in `[0, max_rotation]`
    pub rotation: f64,
    /// Signed angular rate measured over the last substep
    pub current_angular_velocity: f64,
    active: Option<InputSource>,
}

impl Flipper {
    /// `max_rotation` is signed: its sign picks the swing direction
    pub fn new(
        radius: f64,
        pos: DVec2,
        length: f64,
        rest_angle: f64,
        max_rotation: f64,
        angular_velocity: f64,
    ) -> Self {
        let sign = if max_rotation > 0.0 {
            1.0
        } else if max_rotation < 0.0 {
            -1.0
        } else {
            0.0
        };
        Self {
            radius,
            pos,
            length,
            rest_angle,
            max_rotation: max_rotation.abs(),
            sign,
            angular_velocity,
            rotation: 0.0,
            current_angular_velocity: 0.0,
            active: None,
        }
    }

    /// Hold (`Some`) or release (`None`) the flipper
    pub fn activate(&mut self, source: Option<InputSource>) {
        self.active = source;
    }

    pub fn set_activated(&mut self, pressed: bool) {
        self.active = pressed.then_some(InputSource(0));
    }

    pub fn is_activated(&self) -> bool {
        self.active.is_some()
    }

    /// Input currently holding the flipper, if any
    pub fn input_source(&self) -> Option<InputSource> {
        self.active
    }

    /// Advance the swing by `dt`
    pub fn simulate(&mut self, dt: f64) {
        let previous_rotation = self.rotation;
        if self.is_activated() {
            self.rotation = (self.rotation + dt * self.angular_velocity).min(self.max_rotation);
        } else {
            self.rotation = (self.rotation - dt * self.angular_velocity).max(0.0);
        }
        if dt != 0.0 {
            self.current_angular_velocity = self.sign * (self.rotation - previous_rotation) / dt;
        }
    }

    /// Current world-space angle of the pivot-to-tip direction
    #[inline]
    pub fn angle(&self) -> f64 {
        self.rest_angle + self.sign * self.rotation
    }

    /// Centre of the tip cap
    pub fn tip(&self) -> DVec2 {
        let angle = self.angle();
        self.pos + DVec2::new(angle.cos(), angle.sin()) * self.length
    }
}
