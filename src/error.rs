//! Error types for scene construction and configuration.
//!
//! Stepping a simulation never fails; numerical degeneracies are skipped
//! silently. Only building a scene or loading a configuration can be rejected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("boundary needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("boundary vertex {0} is not finite")]
    NonFiniteVertex(usize),

    #[error("body radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error("body mass must be positive, got {0}")]
    InvalidMass(f64),

    #[error("wire radius must be positive, got {0}")]
    InvalidWireRadius(f64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("gravity must be finite")]
    NonFiniteGravity,

    #[error("restitution must lie in [0, 1], got {0}")]
    RestitutionOutOfRange(f64),

    #[error("substep count must be at least 1")]
    ZeroSubsteps,

    #[error("rectangular walls must have positive width and height")]
    EmptyBounds,
}
