//! Simulation configuration
//!
//! Plain values handed to a world at construction. Nothing here touches the
//! filesystem; a front end may keep a config as JSON and pass the string in.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::IntegrationMode;
use crate::sim::state::{Boundary, Bounds, Walls};

/// Knobs for a 2D world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Constant acceleration applied to every body
    pub gravity: DVec2,
    /// When set, replaces the per-body coefficients in ball-ball contacts
    #[serde(default)]
    pub restitution: Option<f64>,
    /// Substeps per `step` call
    pub substeps: u32,
    /// Integration scheme for free bodies
    #[serde(default)]
    pub mode: IntegrationMode,
    /// Resolve ball-ball contacts (the cannonball demos let balls overlap)
    #[serde(default = "default_true")]
    pub ball_collisions: bool,
    /// What keeps balls inside the world
    #[serde(default)]
    pub walls: Walls,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: DVec2::new(0.0, GRAVITY),
            restitution: None,
            substeps: DEFAULT_SUBSTEPS,
            mode: IntegrationMode::SemiImplicit,
            ball_collisions: true,
            walls: Walls::None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl SimConfig {
    /// Projectiles under gravity in a 20 x 15 box
    pub fn cannonball() -> Self {
        Self {
            mode: IntegrationMode::Rk4,
            ball_collisions: false,
            walls: Walls::Rect(Bounds::from_size(20.0, 15.0)),
            ..Self::default()
        }
    }

    /// Gravity-free billiard table with a global restitution slider
    pub fn billiard() -> Self {
        Self {
            gravity: DVec2::ZERO,
            restitution: Some(1.0),
            walls: Walls::Rect(Bounds::from_size(20.0, 12.0)),
            ..Self::default()
        }
    }

    /// Pinball table with its polygonal border
    pub fn pinball() -> Self {
        Self {
            gravity: DVec2::ZERO,
            restitution: None,
            substeps: 1,
            mode: IntegrationMode::SemiImplicit,
            ball_collisions: true,
            walls: Walls::Polygon(pinball_border()),
        }
    }

    /// Beads on a wire: many substeps, no walls
    pub fn beads() -> Self {
        Self {
            gravity: DVec2::new(0.0, BEAD_GRAVITY),
            restitution: Some(1.0),
            substeps: BEAD_SUBSTEPS,
            mode: IntegrationMode::SemiImplicit,
            ball_collisions: true,
            walls: Walls::None,
        }
    }

    /// Parse a config from a JSON string and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() {
            return Err(ConfigError::NonFiniteGravity);
        }
        if let Some(e) = self.restitution {
            if !(0.0..=1.0).contains(&e) {
                return Err(ConfigError::RestitutionOutOfRange(e));
            }
        }
        if self.substeps == 0 {
            return Err(ConfigError::ZeroSubsteps);
        }
        if let Walls::Rect(bounds) = &self.walls {
            if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
                return Err(ConfigError::EmptyBounds);
            }
        }
        Ok(())
    }
}

/// Border of the pinball table, counter-clockwise
pub fn pinball_border() -> Boundary {
    let offset = 0.02;
    let vertices = vec![
        DVec2::new(0.74, 0.25),
        DVec2::new(1.0 - offset, 0.4),
        DVec2::new(1.0 - offset, PINBALL_HEIGHT - offset),
        DVec2::new(offset, PINBALL_HEIGHT - offset),
        DVec2::new(offset, 0.4),
        DVec2::new(0.26, 0.25),
        DVec2::new(0.26, 0.0),
        DVec2::new(0.74, 0.0),
    ];
    Boundary::from_ccw_unchecked(vertices)
}
