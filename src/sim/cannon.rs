//! Single 3D projectile bouncing inside a box

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::collision::bounds3_reflect;
use super::integrator::{IntegrationMode, integrate};
use super::state::Bounds3;
use crate::consts::GRAVITY;

/// A cannonball in 3D, with start/stop/reset controls for a front end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cannonball3 {
    pub pos: DVec3,
    pub vel: DVec3,
    pub radius: f64,
    pub gravity: DVec3,
    pub bounds: Bounds3,
    pub mode: IntegrationMode,
    pub substeps: u32,
    initial_pos: DVec3,
    initial_vel: DVec3,
    running: bool,
}

impl Cannonball3 {
    pub fn new(pos: DVec3, radius: f64, vel: DVec3, bounds: Bounds3) -> Self {
        Self {
            pos,
            vel,
            radius,
            gravity: DVec3::new(0.0, GRAVITY, 0.0),
            bounds,
            mode: IntegrationMode::SemiImplicit,
            substeps: 1,
            initial_pos: pos,
            initial_vel: vel,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop and return to the launch state
    pub fn reset(&mut self) {
        self.running = false;
        self.pos = self.initial_pos;
        self.vel = self.initial_vel;
    }

    /// Advance by `dt` if running; returns whether anything moved
    pub fn step(&mut self, dt: f64) -> bool {
        if !self.running {
            return false;
        }
        let steps = self.substeps.max(1);
        let sdt = dt / steps as f64;
        for _ in 0..steps {
            integrate(&mut self.pos, &mut self.vel, self.gravity, sdt, 1, self.mode);
            bounds3_reflect(&mut self.pos, &mut self.vel, self.radius, &self.bounds);
        }
        true
    }
}
