//! Physics Demos - simulation core for small interactive physics scenes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integrators, constraints, collisions, worlds)
//! - `config`: Plain-value simulation knobs with per-demo presets
//! - `scene`: Seeded scene builders (billiard, pinball, beads, cannonball)
//! - `snapshot`: Read-back of drawable state for a rendering front end
//!
//! Rendering, input and frame timing belong to the caller. The core only
//! advances state by the `dt` it is handed.

pub mod config;
pub mod error;
pub mod scene;
pub mod sim;
pub mod snapshot;

pub use config::SimConfig;
pub use error::{ConfigError, SceneError};

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Frame rate the demos are tuned for
    pub const FRAME_DT: f64 = 1.0 / 60.0;

    /// Standard gravity used by the cannonball demos (m/s²)
    pub const GRAVITY: f64 = -10.0;
    /// Gravity used by the bead demos (m/s²)
    pub const BEAD_GRAVITY: f64 = -9.87;

    /// Substeps per frame for the cannonball and billiard demos
    pub const DEFAULT_SUBSTEPS: u32 = 10;
    /// Substeps per frame for the bead demos (first-order projection needs many)
    pub const BEAD_SUBSTEPS: u32 = 1000;

    /// Playfield height of the pinball table
    pub const PINBALL_HEIGHT: f64 = 1.7;
}

/// Left-hand perpendicular of a 2D vector: `(-y, x)`
#[inline]
pub fn perp(v: DVec2) -> DVec2 {
    DVec2::new(-v.y, v.x)
}

/// Closest point to `p` on the segment `a..b`
///
/// A degenerate segment (`a == b`) returns `a`.
#[inline]
pub fn closest_point_on_segment(p: DVec2, a: DVec2, b: DVec2) -> DVec2 {
    let ab = b - a;
    let ab_len_sq = ab.length_squared();
    if ab_len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / ab_len_sq).clamp(0.0, 1.0);
    a + ab * t
}
