//! Beads constrained to a circular wire
//!
//! Each substep integrates the bead freely, projects it back onto the wire,
//! then derives its velocity from the actual displacement. The projection is
//! first order, so it needs very small substeps to conserve energy.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::Body;
use crate::error::SceneError;

/// Circular wire a bead is forced onto
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireConstraint {
    pub center: DVec2,
    pub radius: f64,
}

impl WireConstraint {
    pub fn new(center: DVec2, radius: f64) -> Result<Self, SceneError> {
        if !(radius > 0.0) {
            return Err(SceneError::InvalidWireRadius(radius));
        }
        Ok(Self { center, radius })
    }

    /// Project `bead` onto this wire, returning the correction λ
    #[inline]
    pub fn project(&self, bead: &mut Bead) -> f64 {
        bead.project(self.center, self.radius)
    }

    /// Point on the wire at `angle` (radians, from +x)
    pub fn point_at(&self, angle: f64) -> DVec2 {
        self.center + DVec2::new(angle.cos(), angle.sin()) * self.radius
    }
}

/// A body threaded on a wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bead {
    pub body: Body,
    /// Position at the start of the current substep
    pub prev_pos: DVec2,
}

impl Bead {
    pub fn new(body: Body) -> Self {
        Self {
            prev_pos: body.pos,
            body,
        }
    }

    /// Apply gravity, remember the position, then move with the new velocity
    pub fn start_step(&mut self, gravity: DVec2, dt: f64) {
        self.body.vel += gravity * dt;
        self.prev_pos = self.body.pos;
        self.body.pos += self.body.vel * dt;
    }

    /// Move the bead onto the circle `(center, radius)`
    ///
    /// Returns `λ = radius - distance`, proportional to the constraint force.
    /// A bead sitting exactly on `center` has no direction and is left alone.
    pub fn project(&mut self, center: DVec2, radius: f64) -> f64 {
        let dir = self.body.pos - center;
        let len = dir.length();
        if len == 0.0 {
            return 0.0;
        }
        let lambda = radius - len;
        self.body.pos += (dir / len) * lambda;
        lambda
    }

    /// Recover velocity from the displacement over the substep
    pub fn end_step(&mut self, dt: f64) {
        if dt == 0.0 {
            return;
        }
        self.body.vel = (self.body.pos - self.prev_pos) / dt;
    }
}

/// Constraint force magnitude implied by a projection λ over substep `dt`
#[inline]
pub fn constraint_force(lambda: f64, dt: f64) -> f64 {
    if dt == 0.0 {
        return 0.0;
    }
    (lambda / dt / dt).abs()
}

/// Closed-form pendulum on a ring, used as a reference for the solver
///
/// `angle` is measured from the bottom of the ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyticBead {
    pub radius: f64,
    pub angle: f64,
    pub omega: f64,
}

impl AnalyticBead {
    pub fn new(radius: f64, angle: f64) -> Self {
        Self {
            radius,
            angle,
            omega: 0.0,
        }
    }

    /// Advance by `dt` under gravity magnitude `gravity`, returning the
    /// normal force per unit mass
    pub fn simulate(&mut self, dt: f64, gravity: f64) -> f64 {
        let acc = -gravity / self.radius * self.angle.sin();
        self.omega += acc * dt;
        self.angle += self.omega * dt;
        let centrifugal = self.omega * self.omega * self.radius;
        centrifugal + self.angle.cos() * gravity.abs()
    }

    /// Position relative to the ring centre
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.angle.sin() * self.radius, -self.angle.cos() * self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    const G: DVec2 = DVec2::new(0.0, -9.87);

    fn bead_at(pos: DVec2) -> Bead {
        Bead::new(Body::new(0.1, 1.0, pos, DVec2::ZERO).unwrap())
    }

    #[test]
    fn test_project_returns_signed_correction() {
        let mut bead = bead_at(DVec2::new(3.0, 4.0));
        let lambda = bead.project(DVec2::ZERO, 2.0);

        assert!((lambda + 3.0).abs() < 1e-12);
        assert!((bead.body.pos.length() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_project_at_center_is_noop() {
        let mut bead = bead_at(DVec2::new(1.0, 1.0));
        let lambda = bead.project(DVec2::new(1.0, 1.0), 0.8);
        assert_eq!(lambda, 0.0);
        assert_eq!(bead.body.pos, DVec2::new(1.0, 1.0));
    }

    #[test]
    fn test_end_step_with_zero_dt_keeps_velocity() {
        let mut bead = bead_at(DVec2::ZERO);
        bead.body.vel = DVec2::new(1.0, 2.0);
        bead.prev_pos = DVec2::new(-5.0, 0.0);
        bead.end_step(0.0);
        assert_eq!(bead.body.vel, DVec2::new(1.0, 2.0));
    }

    #[test]
    fn test_velocity_is_tangent_after_step() {
        let wire = WireConstraint::new(DVec2::ZERO, 0.8).unwrap();
        let mut bead = bead_at(wire.point_at(0.0));
        let dt = 1.0 / 60.0 / 1000.0;

        for _ in 0..1000 {
            bead.start_step(G, dt);
            wire.project(&mut bead);
            bead.end_step(dt);
        }

        let radial = (bead.body.pos - wire.center).normalize();
        let speed = bead.body.vel.length();
        assert!(speed > 0.0);
        assert!(bead.body.vel.dot(radial).abs() / speed < 1e-2);
    }

    #[test]
    fn test_solver_tracks_analytic_pendulum() {
        let wire = WireConstraint::new(DVec2::ZERO, 0.8).unwrap();
        let mut bead = bead_at(wire.point_at(0.0));
        let mut analytic = AnalyticBead::new(0.8, FRAC_PI_2);
        let steps = 1000;
        let dt = 1.0 / 60.0 / steps as f64;

        // Half a second of swinging
        for _ in 0..30 * steps {
            bead.start_step(G, dt);
            wire.project(&mut bead);
            bead.end_step(dt);
            analytic.simulate(dt, -G.y);
        }

        let diff = (bead.body.pos - (wire.center + analytic.position())).length();
        assert!(diff < 1e-2, "solver drifted {diff} from the analytic bead");
    }

    #[test]
    fn test_analytic_bead_at_rest_at_bottom() {
        let mut analytic = AnalyticBead::new(1.0, 0.0);
        let force = analytic.simulate(0.01, 9.87);
        assert_eq!(analytic.angle, 0.0);
        assert!((force - 9.87).abs() < 1e-12);
        assert_eq!(analytic.position(), DVec2::new(0.0, -1.0));
    }

    #[test]
    fn test_constraint_force_guards_zero_dt() {
        assert_eq!(constraint_force(0.5, 0.0), 0.0);
        assert!((constraint_force(-0.01, 0.1) - 1.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_projection_lands_on_wire(
            x in -10.0f64..10.0,
            y in -10.0f64..10.0,
            cx in -5.0f64..5.0,
            cy in -5.0f64..5.0,
            radius in 0.01f64..5.0,
        ) {
            let center = DVec2::new(cx, cy);
            let pos = DVec2::new(x, y);
            prop_assume!(pos != center);

            let mut bead = bead_at(pos);
            bead.project(center, radius);
            prop_assert!(((bead.body.pos - center).length() - radius).abs() < 1e-9);
        }
    }
}
