//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Time deltas come from the caller only
//! - No randomness once bodies exist
//! - Stable iteration order (by insertion / body ID)
//! - No rendering or platform dependencies

pub mod cannon;
pub mod collision;
pub mod constraint;
pub mod flipper;
pub mod integrator;
pub mod state;
pub mod world;

pub use cannon::Cannonball3;
pub use collision::{CollisionEvent, ball_ball, ball_boundary, ball_bounds, ball_flipper, ball_obstacle};
pub use constraint::{AnalyticBead, Bead, WireConstraint, constraint_force};
pub use flipper::{Flipper, InputSource};
pub use integrator::{IntegrationMode, Vector, integrate, step_once};
pub use state::{Body, BodyId, Boundary, Bounds, Bounds3, Obstacle, Walls};
pub use world::{BeadWorld, World};
