//! Numerical integrators for (position, velocity) pairs
//!
//! All four schemes advance a body under a constant acceleration. The same
//! code drives 2D balls, beads and the 3D cannonball through the `Vector`
//! trait.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Anything the integrators can treat as a position or velocity
pub trait Vector: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f64, Output = Self> {}

impl<T> Vector for T where T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T> {}

/// Integration scheme selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegrationMode {
    /// Explicit Euler: position advances with the old velocity
    Euler,
    /// Semi-implicit (symplectic) Euler: position advances with the new velocity
    #[default]
    SemiImplicit,
    /// Classical fourth-order Runge-Kutta
    Rk4,
    /// Simplified velocity Verlet
    Verlet,
}

impl IntegrationMode {
    pub const ALL: [IntegrationMode; 4] = [
        IntegrationMode::Euler,
        IntegrationMode::SemiImplicit,
        IntegrationMode::Rk4,
        IntegrationMode::Verlet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationMode::Euler => "Euler",
            IntegrationMode::SemiImplicit => "Semi-Implicit",
            IntegrationMode::Rk4 => "RK4",
            IntegrationMode::Verlet => "Verlet",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "euler" | "explicit" => Some(IntegrationMode::Euler),
            "semi-implicit" | "semi_implicit" | "semiimplicit" | "symplectic" => {
                Some(IntegrationMode::SemiImplicit)
            }
            "rk4" | "runge-kutta" => Some(IntegrationMode::Rk4),
            "verlet" => Some(IntegrationMode::Verlet),
            _ => None,
        }
    }
}

/// Apply one scheme once over the full `dt`
#[inline]
pub fn step_once<V: Vector>(pos: &mut V, vel: &mut V, accel: V, dt: f64, mode: IntegrationMode) {
    match mode {
        IntegrationMode::Euler => {
            let v0 = *vel;
            *vel = v0 + accel * dt;
            *pos = *pos + v0 * dt;
        }
        IntegrationMode::SemiImplicit => {
            *vel = *vel + accel * dt;
            *pos = *pos + *vel * dt;
        }
        IntegrationMode::Rk4 => {
            // dp/dt = v, dv/dt = a. The acceleration field is constant, so
            // every acceleration sample is `accel`; only velocity varies.
            let (a1, a2, a3, a4) = (accel, accel, accel, accel);
            let v1 = *vel;
            let v2 = *vel + a1 * (dt / 2.0);
            let v3 = *vel + a2 * (dt / 2.0);
            let v4 = *vel + a3 * dt;
            *pos = *pos + (v1 + v2 * 2.0 + v3 * 2.0 + v4) * (dt / 6.0);
            *vel = *vel + (a1 + a2 * 2.0 + a3 * 2.0 + a4) * (dt / 6.0);
        }
        IntegrationMode::Verlet => {
            let new_pos = *pos + *vel * dt + accel * (0.5 * dt * dt);
            *vel = *vel + accel * dt;
            *pos = new_pos;
        }
    }
}

/// Advance `(pos, vel)` by `dt`, split into `substeps` equal pieces
///
/// A substep count of zero is treated as one.
pub fn integrate<V: Vector>(
    pos: &mut V,
    vel: &mut V,
    accel: V,
    dt: f64,
    substeps: u32,
    mode: IntegrationMode,
) {
    let steps = substeps.max(1);
    let sdt = dt / steps as f64;
    for _ in 0..steps {
        step_once(pos, vel, accel, sdt, mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec2, DVec3};

    fn closed_form(p0: DVec2, v0: DVec2, a: DVec2, t: f64) -> DVec2 {
        p0 + v0 * t + a * (0.5 * t * t)
    }

    #[test]
    fn test_uniform_motion_without_acceleration() {
        for mode in IntegrationMode::ALL {
            let mut pos = DVec2::new(1.0, 2.0);
            let mut vel = DVec2::new(3.0, -4.0);
            integrate(&mut pos, &mut vel, DVec2::ZERO, 0.5, 7, mode);

            assert_eq!(vel, DVec2::new(3.0, -4.0), "{}", mode.as_str());
            assert!((pos - DVec2::new(2.5, 0.0)).length() < 1e-12, "{}", mode.as_str());
        }
    }

    #[test]
    fn test_semi_implicit_single_step() {
        let mut pos = DVec2::ZERO;
        let mut vel = DVec2::ZERO;
        integrate(&mut pos, &mut vel, DVec2::new(0.0, -10.0), 1.0, 1, IntegrationMode::SemiImplicit);

        assert_eq!(vel, DVec2::new(0.0, -10.0));
        assert_eq!(pos, DVec2::new(0.0, -10.0));
    }

    #[test]
    fn test_explicit_euler_uses_old_velocity() {
        let mut pos = DVec2::ZERO;
        let mut vel = DVec2::ZERO;
        integrate(&mut pos, &mut vel, DVec2::new(0.0, -10.0), 1.0, 1, IntegrationMode::Euler);

        assert_eq!(vel, DVec2::new(0.0, -10.0));
        assert_eq!(pos, DVec2::ZERO);
    }

    #[test]
    fn test_zero_substeps_behaves_as_one() {
        let mut p1 = DVec2::ZERO;
        let mut v1 = DVec2::X;
        let mut p2 = DVec2::ZERO;
        let mut v2 = DVec2::X;
        let g = DVec2::new(0.0, -10.0);
        integrate(&mut p1, &mut v1, g, 0.1, 0, IntegrationMode::SemiImplicit);
        integrate(&mut p2, &mut v2, g, 0.1, 1, IntegrationMode::SemiImplicit);
        assert_eq!(p1, p2);
        assert_eq!(v1, v2);
    }

    #[test]
    fn test_error_ordering_under_constant_acceleration() {
        let p0 = DVec2::new(0.0, 10.0);
        let v0 = DVec2::new(2.0, 5.0);
        let a = DVec2::new(0.0, -10.0);
        let exact = closed_form(p0, v0, a, 1.0);

        let error = |mode: IntegrationMode, steps: u32| {
            let mut pos = p0;
            let mut vel = v0;
            integrate(&mut pos, &mut vel, a, 1.0, steps, mode);
            (pos - exact).length()
        };

        // Higher-order schemes reproduce the parabola up to rounding
        for steps in [1, 10, 100] {
            assert!(error(IntegrationMode::Rk4, steps) < 1e-9);
            assert!(error(IntegrationMode::Verlet, steps) < 1e-9);
        }

        // First-order schemes converge linearly as substeps shrink
        for mode in [IntegrationMode::Euler, IntegrationMode::SemiImplicit] {
            let coarse = error(mode, 10);
            let fine = error(mode, 100);
            assert!(fine < coarse, "{}", mode.as_str());
            assert!((coarse / fine - 10.0).abs() < 0.5, "{}", mode.as_str());
            assert!(error(IntegrationMode::Rk4, 10) < fine);
        }
    }

    #[test]
    fn test_integrates_3d_vectors() {
        let mut pos = DVec3::new(0.0, 5.0, 0.0);
        let mut vel = DVec3::new(2.0, 5.0, 3.0);
        integrate(&mut pos, &mut vel, DVec3::new(0.0, -10.0, 0.0), 1.0, 4, IntegrationMode::Verlet);

        assert!((vel - DVec3::new(2.0, -5.0, 3.0)).length() < 1e-12);
        assert!((pos - DVec3::new(2.0, 5.0, 3.0)).length() < 1e-12);
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in IntegrationMode::ALL {
            assert_eq!(IntegrationMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(IntegrationMode::from_str("symplectic"), Some(IntegrationMode::SemiImplicit));
        assert_eq!(IntegrationMode::from_str("leapfrog"), None);
    }
}
