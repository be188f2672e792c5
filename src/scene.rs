//! Scene builders for the demos
//!
//! Every random choice is drawn from a `Pcg32` seeded by the caller, so
//! resetting a scene with the same seed reproduces it exactly.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::{DVec2, DVec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::SimConfig;
use crate::error::SceneError;
use crate::sim::{AnalyticBead, BeadWorld, Body, Bounds, Bounds3, Cannonball3, Flipper, Obstacle, Walls, WireConstraint, World};

/// Colors for scene elements
pub mod colors {
    pub const BALL: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const PINBALL_BALL: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
    pub const BUMPER: [f32; 4] = [1.0, 0.5, 0.0, 1.0];
    pub const BEAD: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
}

fn random_color(rng: &mut Pcg32) -> [f32; 4] {
    [rng.random(), rng.random(), rng.random(), 1.0]
}

/// Billiard table of `count` balls with random size, position and velocity
pub fn billiard(seed: u64, count: usize, width: f64, height: f64) -> Result<World, SceneError> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let config = SimConfig {
        walls: Walls::Rect(Bounds::from_size(width, height)),
        ..SimConfig::billiard()
    };
    let mut world = World::new(config);

    for _ in 0..count {
        let radius = rng.random_range(0.2..1.0);
        // Keep the whole disc on the table even when it is narrower than a ball
        let pos = DVec2::new(
            uniform(&mut rng, radius, width - radius),
            uniform(&mut rng, radius, height - radius),
        );
        let vel = DVec2::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0));
        let color = random_color(&mut rng);
        world.add_body(Body::with_area_mass(radius, pos, vel)?.with_color(color));
    }

    log::info!("billiard scene: seed={seed} balls={count}");
    Ok(world)
}

/// Single RK4 cannonball launched from the lower-left corner
pub fn cannonball() -> Result<World, SceneError> {
    let mut world = World::new(SimConfig::cannonball());
    let ball = Body::with_area_mass(0.2, DVec2::new(0.2, 0.2), DVec2::new(10.0, 15.0))?
        .with_color(colors::BALL);
    world.add_body(ball);
    log::info!("cannonball scene");
    Ok(world)
}

/// Spray `count` cannonballs from `at` with random velocities up to 10 m/s
pub fn cannonball_burst(world: &mut World, rng: &mut Pcg32, at: DVec2, count: usize) -> Result<(), SceneError> {
    for _ in 0..count {
        let radius = 0.2 * rng.random_range(0.5..1.5);
        let vel = DVec2::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0));
        let color = random_color(rng);
        world.add_body(Body::with_area_mass(radius, at, vel)?.with_color(color));
    }
    log::debug!("cannonball burst: {count} balls at {at:?}");
    Ok(())
}

/// Pinball table: two balls, four bumpers and a pair of flippers
pub fn pinball() -> Result<World, SceneError> {
    let mut world = World::new(SimConfig::pinball());

    let radius = 0.03;
    for (pos, vel) in [
        (DVec2::new(0.92, 0.5), DVec2::new(-0.2, 3.5)),
        (DVec2::new(0.08, 0.5), DVec2::new(0.2, 3.5)),
    ] {
        let ball = Body::with_area_mass(radius, pos, vel)?
            .with_restitution(0.2)
            .with_color(colors::PINBALL_BALL);
        world.add_body(ball);
    }

    world.obstacles = [
        (0.1, DVec2::new(0.25, 0.6)),
        (0.1, DVec2::new(0.75, 0.5)),
        (0.12, DVec2::new(0.7, 1.0)),
        (0.1, DVec2::new(0.2, 1.2)),
    ]
    .into_iter()
    .map(|(r, pos)| {
        let mut obstacle = Obstacle::new(r, pos, 2.0);
        obstacle.color = colors::BUMPER;
        obstacle
    })
    .collect();

    let flipper_radius = 0.03;
    let length = 0.2;
    let max_rotation = 1.0;
    let angular_velocity = 10.0;
    world.flippers = vec![
        Flipper::new(
            flipper_radius,
            DVec2::new(0.25, 0.22),
            length,
            -0.5,
            max_rotation,
            angular_velocity,
        ),
        Flipper::new(
            flipper_radius,
            DVec2::new(0.74, 0.22),
            length,
            PI + 0.5,
            -max_rotation,
            angular_velocity,
        ),
    ];

    log::info!(
        "pinball scene: balls={} bumpers={} flippers={}",
        world.bodies().len(),
        world.obstacles.len(),
        world.flippers.len()
    );
    Ok(world)
}

/// `count` beads spread around `wire`, `π / count` apart
///
/// With `fixed_radius` unset, each bead gets a random radius in 0.01..0.25.
pub fn bead_ring(
    seed: u64,
    count: usize,
    fixed_radius: Option<f64>,
    wire: WireConstraint,
) -> Result<BeadWorld, SceneError> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut world = BeadWorld::new(&SimConfig::beads(), wire);

    let step = if count > 0 { PI / count as f64 } else { 0.0 };
    for i in 0..count {
        let radius = match fixed_radius {
            Some(r) => r,
            None => rng.random_range(0.01..0.25),
        };
        let pos = wire.point_at(i as f64 * step);
        let color = random_color(&mut rng);
        world.add_bead(Body::with_area_mass(radius, pos, DVec2::ZERO)?.with_color(color));
    }

    log::info!("bead ring: seed={seed} beads={count} wire radius={}", wire.radius);
    Ok(world)
}

/// One bead at the rightmost point of the wire, raced by its closed-form twin
pub fn single_bead(wire: WireConstraint) -> Result<BeadWorld, SceneError> {
    let mut world = BeadWorld::new(&SimConfig::beads(), wire);
    let bead = Body::new(0.1, 1.0, wire.point_at(0.0), DVec2::ZERO)?.with_color(colors::BEAD);
    world.add_bead(bead);
    world.set_analytic(Some(AnalyticBead::new(wire.radius, FRAC_PI_2)));
    log::info!("single bead: wire radius={}", wire.radius);
    Ok(world)
}

/// 3D cannonball in a 3 x 5 box with a floor at y = 0
pub fn cannonball3d() -> Cannonball3 {
    Cannonball3::new(
        DVec3::new(0.0, 5.0, 0.0),
        0.01,
        DVec3::new(2.0, 5.0, 3.0),
        Bounds3::symmetric(1.5, 2.5, 0.0),
    )
}

fn uniform(rng: &mut Pcg32, low: f64, high: f64) -> f64 {
    if high > low {
        rng.random_range(low..high)
    } else {
        0.5 * (low + high)
    }
}
