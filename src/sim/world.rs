//! Substepped simulation loops
//!
//! A world owns its bodies and static geometry and advances them by the `dt`
//! its caller hands in. Each `step` splits `dt` into equal substeps and runs
//! integration followed by collision resolution in every one of them.

use glam::DVec2;

use super::collision::{self, CollisionEvent};
use super::constraint::{AnalyticBead, Bead, WireConstraint, constraint_force};
use super::flipper::{Flipper, InputSource};
use super::state::{Body, BodyId, Obstacle, Walls};
use crate::config::SimConfig;

/// A 2D world of free balls, with optional bumpers, flippers and walls
#[derive(Debug, Clone)]
pub struct World {
    pub config: SimConfig,
    bodies: Vec<Body>,
    pub obstacles: Vec<Obstacle>,
    pub flippers: Vec<Flipper>,
    score: u64,
    next_id: u32,
}

impl World {
    pub fn new(config: SimConfig) -> Self {
        log::debug!(
            "World: mode={} substeps={} gravity={:?}",
            config.mode.as_str(),
            config.substeps,
            config.gravity
        );
        Self {
            config,
            bodies: Vec::new(),
            obstacles: Vec::new(),
            flippers: Vec::new(),
            score: 0,
            next_id: 1,
        }
    }

    /// Register a body, assigning it a fresh ID
    pub fn add_body(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.id = id;
        self.bodies.push(body);
        id
    }

    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let index = self.bodies.iter().position(|b| b.id == id)?;
        Some(self.bodies.remove(index))
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    /// Bodies in insertion order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Drop every body, obstacle and flipper and zero the score
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.obstacles.clear();
        self.flippers.clear();
        self.score = 0;
    }

    /// Bumper hits so far
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    pub fn momentum(&self) -> DVec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    /// Press or release a flipper; false if there is no such flipper
    pub fn activate_flipper(&mut self, index: usize, pressed: bool) -> bool {
        match self.flippers.get_mut(index) {
            Some(flipper) => {
                flipper.set_activated(pressed);
                true
            }
            None => false,
        }
    }

    /// Hold a flipper with a specific input (touch id, key code)
    pub fn hold_flipper(&mut self, index: usize, source: InputSource) -> bool {
        match self.flippers.get_mut(index) {
            Some(flipper) => {
                flipper.activate(Some(source));
                true
            }
            None => false,
        }
    }

    /// Release every flipper held by `source`
    pub fn release_input(&mut self, source: InputSource) {
        for flipper in &mut self.flippers {
            if flipper.input_source() == Some(source) {
                flipper.activate(None);
            }
        }
    }

    pub fn flipper_activated(&self, index: usize) -> Option<bool> {
        self.flippers.get(index).map(Flipper::is_activated)
    }

    /// Advance by `dt` using the configured substep count
    pub fn step(&mut self, dt: f64) -> Vec<CollisionEvent> {
        self.step_with(dt, self.config.substeps)
    }

    /// Advance by `dt` split into `substeps` pieces (zero counts as one)
    pub fn step_with(&mut self, dt: f64, substeps: u32) -> Vec<CollisionEvent> {
        let steps = substeps.max(1);
        let sdt = dt / steps as f64;
        let mut events = Vec::new();

        for _ in 0..steps {
            self.substep(sdt, &mut events);
        }

        log::trace!("step dt={dt} substeps={steps} events={}", events.len());
        events
    }

    fn substep(&mut self, sdt: f64, events: &mut Vec<CollisionEvent>) {
        for flipper in &mut self.flippers {
            flipper.simulate(sdt);
        }

        let gravity = self.config.gravity;
        let mode = self.config.mode;
        for body in &mut self.bodies {
            body.integrate(gravity, sdt, 1, mode);
        }

        // All pairs, i < j, in insertion order
        if self.config.ball_collisions {
            let restitution = self.config.restitution;
            for i in 0..self.bodies.len() {
                let (head, tail) = self.bodies.split_at_mut(i + 1);
                let a = &mut head[i];
                for b in tail.iter_mut() {
                    if collision::ball_ball(a, b, restitution) {
                        events.push(CollisionEvent::BallBall(a.id, b.id));
                    }
                }
            }
        }

        for body in &mut self.bodies {
            for (index, obstacle) in self.obstacles.iter().enumerate() {
                if collision::ball_obstacle(body, obstacle) {
                    self.score += 1;
                    events.push(CollisionEvent::Obstacle(body.id, index));
                }
            }
            for (index, flipper) in self.flippers.iter().enumerate() {
                if collision::ball_flipper(body, flipper) {
                    events.push(CollisionEvent::Flipper(body.id, index));
                }
            }
            let hit = match &self.config.walls {
                Walls::None => false,
                Walls::Rect(bounds) => collision::ball_bounds(body, bounds),
                Walls::Polygon(boundary) => collision::ball_boundary(body, boundary),
            };
            if hit {
                events.push(CollisionEvent::Wall(body.id));
            }
        }
    }
}

/// Beads threaded on a single circular wire
///
/// Every substep runs start_step, projection and velocity recovery for all
/// beads, then resolves bead-bead contacts so the velocity change survives
/// into the next substep.
#[derive(Debug, Clone)]
pub struct BeadWorld {
    pub gravity: DVec2,
    pub substeps: u32,
    /// Coefficient used for every bead-bead contact
    pub restitution: f64,
    pub wire: WireConstraint,
    beads: Vec<Bead>,
    analytic: Option<AnalyticBead>,
    last_force: f64,
    last_analytic_force: f64,
    next_id: u32,
}

impl BeadWorld {
    pub fn new(config: &SimConfig, wire: WireConstraint) -> Self {
        log::debug!(
            "BeadWorld: wire radius={} substeps={}",
            wire.radius,
            config.substeps
        );
        Self {
            gravity: config.gravity,
            substeps: config.substeps,
            restitution: config.restitution.unwrap_or(1.0),
            wire,
            beads: Vec::new(),
            analytic: None,
            last_force: 0.0,
            last_analytic_force: 0.0,
            next_id: 1,
        }
    }

    pub fn add_bead(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.id = id;
        self.beads.push(Bead::new(body));
        id
    }

    pub fn remove_bead(&mut self, id: BodyId) -> Option<Bead> {
        let index = self.beads.iter().position(|b| b.body.id == id)?;
        Some(self.beads.remove(index))
    }

    pub fn beads(&self) -> &[Bead] {
        &self.beads
    }

    pub fn clear(&mut self) {
        self.beads.clear();
        self.analytic = None;
        self.last_force = 0.0;
        self.last_analytic_force = 0.0;
    }

    /// Run a closed-form reference bead alongside the solver
    pub fn set_analytic(&mut self, analytic: Option<AnalyticBead>) {
        self.analytic = analytic;
    }

    pub fn analytic(&self) -> Option<&AnalyticBead> {
        self.analytic.as_ref()
    }

    /// Largest constraint force seen in the last substep
    pub fn constraint_force(&self) -> f64 {
        self.last_force
    }

    /// Normal force of the reference bead after the last substep
    pub fn analytic_force(&self) -> f64 {
        self.last_analytic_force
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.beads.iter().map(|b| b.body.kinetic_energy()).sum()
    }

    pub fn step(&mut self, dt: f64) -> Vec<CollisionEvent> {
        self.step_with(dt, self.substeps)
    }

    pub fn step_with(&mut self, dt: f64, substeps: u32) -> Vec<CollisionEvent> {
        let steps = substeps.max(1);
        let sdt = dt / steps as f64;
        let mut events = Vec::new();

        for _ in 0..steps {
            for bead in &mut self.beads {
                bead.start_step(self.gravity, sdt);
            }

            let mut force: f64 = 0.0;
            for bead in &mut self.beads {
                let lambda = self.wire.project(bead);
                force = force.max(constraint_force(lambda, sdt));
            }
            self.last_force = force;

            for bead in &mut self.beads {
                bead.end_step(sdt);
            }

            for i in 0..self.beads.len() {
                let (head, tail) = self.beads.split_at_mut(i + 1);
                let a = &mut head[i].body;
                for b in tail.iter_mut() {
                    if collision::ball_ball(a, &mut b.body, Some(self.restitution)) {
                        events.push(CollisionEvent::BallBall(a.id, b.body.id));
                    }
                }
            }

            if let Some(analytic) = &mut self.analytic {
                self.last_analytic_force = analytic.simulate(sdt, -self.gravity.y);
            }
        }

        log::trace!("bead step dt={dt} substeps={steps} events={}", events.len());
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::sim::state::{Boundary, Bounds};
    use crate::sim::IntegrationMode;

    fn ball(radius: f64, pos: DVec2, vel: DVec2) -> Body {
        Body::new(radius, 1.0, pos, vel).unwrap()
    }

    #[test]
    fn test_registry_add_remove() {
        let mut world = World::new(SimConfig::default());
        let a = world.add_body(ball(0.1, DVec2::ZERO, DVec2::ZERO));
        let b = world.add_body(ball(0.1, DVec2::X, DVec2::ZERO).with_label("cue"));
        assert_ne!(a, b);
        assert_eq!(world.bodies().len(), 2);
        assert_eq!(world.body(b).and_then(|b| b.label.as_deref()), Some("cue"));

        let removed = world.remove_body(a).unwrap();
        assert_eq!(removed.id, a);
        assert!(world.body(a).is_none());
        assert!(world.remove_body(a).is_none());

        // IDs are never reused
        let c = world.add_body(ball(0.1, DVec2::Y, DVec2::ZERO));
        assert!(c > b);
    }

    #[test]
    fn test_free_fall_matches_semi_implicit_euler() {
        let config = SimConfig {
            gravity: DVec2::new(0.0, -10.0),
            substeps: 1,
            mode: IntegrationMode::SemiImplicit,
            ..SimConfig::default()
        };
        let mut world = World::new(config);
        let id = world.add_body(ball(0.1, DVec2::ZERO, DVec2::ZERO));

        world.step(1.0);
        let body = world.body(id).unwrap();
        assert_eq!(body.vel, DVec2::new(0.0, -10.0));
        assert_eq!(body.pos, DVec2::new(0.0, -10.0));
    }

    #[test]
    fn test_head_on_collision_exchanges_velocity() {
        let config = SimConfig {
            gravity: DVec2::ZERO,
            substeps: 1,
            restitution: None,
            ..SimConfig::default()
        };
        let mut world = World::new(config);
        let a = world.add_body(ball(0.2, DVec2::new(-0.25, 0.0), DVec2::new(5.0, 0.0)));
        let b = world.add_body(ball(0.2, DVec2::new(0.25, 0.0), DVec2::new(-5.0, 0.0)));

        let events = world.step(0.02);
        assert_eq!(events, vec![CollisionEvent::BallBall(a, b)]);
        assert!((world.body(a).unwrap().vel.x + 5.0).abs() < 1e-12);
        assert!((world.body(b).unwrap().vel.x - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_balls_stay_inside_rect_walls() {
        let config = SimConfig {
            gravity: DVec2::ZERO,
            walls: Walls::Rect(Bounds::from_size(4.0, 3.0)),
            ..SimConfig::default()
        };
        let mut world = World::new(config);
        world.add_body(ball(0.2, DVec2::new(2.0, 1.5), DVec2::new(7.0, -11.0)));
        world.add_body(ball(0.3, DVec2::new(1.0, 1.0), DVec2::new(-6.0, 4.0)));

        for _ in 0..600 {
            world.step(FRAME_DT);
        }
        for body in world.bodies() {
            assert!(body.pos.x >= body.radius() - 1e-9 && body.pos.x <= 4.0 - body.radius() + 1e-9);
            assert!(body.pos.y >= body.radius() - 1e-9 && body.pos.y <= 3.0 - body.radius() + 1e-9);
        }
    }

    #[test]
    fn test_elastic_billiard_conserves_energy() {
        let config = SimConfig {
            gravity: DVec2::ZERO,
            restitution: Some(1.0),
            walls: Walls::Rect(Bounds::from_size(10.0, 10.0)),
            ..SimConfig::default()
        };
        let mut world = World::new(config);
        world.add_body(ball(0.5, DVec2::new(2.0, 5.0), DVec2::new(3.0, 0.5)));
        world.add_body(ball(0.5, DVec2::new(8.0, 5.2), DVec2::new(-3.0, 0.0)));
        world.add_body(ball(0.5, DVec2::new(5.0, 2.0), DVec2::new(0.0, 4.0)));
        let before = world.kinetic_energy();

        for _ in 0..300 {
            world.step(FRAME_DT);
        }
        assert!((world.kinetic_energy() - before).abs() < 1e-9 * before);
    }

    #[test]
    fn test_bumper_scores() {
        let config = SimConfig {
            gravity: DVec2::ZERO,
            substeps: 4,
            ..SimConfig::default()
        };
        let mut world = World::new(config);
        world.obstacles.push(Obstacle::new(0.1, DVec2::ZERO, 2.0));
        let id = world.add_body(ball(0.03, DVec2::new(0.3, 0.0), DVec2::new(-3.0, 0.0)));

        let mut events = Vec::new();
        for _ in 0..10 {
            events.extend(world.step(FRAME_DT));
        }
        assert_eq!(world.score(), 1);
        assert!(events.contains(&CollisionEvent::Obstacle(id, 0)));
        assert!((world.body(id).unwrap().vel.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_flipper_input_by_source() {
        let mut world = World::new(SimConfig::pinball());
        world.flippers.push(Flipper::new(0.03, DVec2::new(0.25, 0.22), 0.2, -0.5, 1.0, 10.0));
        world.flippers.push(Flipper::new(0.03, DVec2::new(0.74, 0.22), 0.2, 3.64, -1.0, 10.0));

        assert!(world.hold_flipper(0, InputSource(3)));
        assert!(world.hold_flipper(1, InputSource(4)));
        assert!(!world.activate_flipper(5, true));

        world.release_input(InputSource(3));
        assert_eq!(world.flipper_activated(0), Some(false));
        assert_eq!(world.flipper_activated(1), Some(true));
        assert_eq!(world.flipper_activated(2), None);

        world.step(0.05);
        assert!(world.flippers[1].rotation > 0.0);
        assert_eq!(world.flippers[0].rotation, 0.0);
    }

    #[test]
    fn test_polygon_walls_contain_fast_ball() {
        let square = Boundary::new(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
        ])
        .unwrap();
        let config = SimConfig {
            gravity: DVec2::new(0.0, -10.0),
            walls: Walls::Polygon(square),
            ..SimConfig::default()
        };
        let mut world = World::new(config);
        world.add_body(ball(0.1, DVec2::new(1.0, 1.0), DVec2::new(4.0, 3.0)).with_restitution(0.8));

        for _ in 0..600 {
            world.step(FRAME_DT);
        }
        let body = &world.bodies()[0];
        assert!(body.pos.x > 0.0 && body.pos.x < 2.0);
        assert!(body.pos.y > 0.0 && body.pos.y < 2.0);
    }

    #[test]
    fn test_determinism() {
        let build = || {
            let mut world = World::new(SimConfig::billiard());
            world.add_body(ball(0.5, DVec2::new(3.0, 3.0), DVec2::new(4.0, 1.0)));
            world.add_body(ball(0.7, DVec2::new(6.0, 3.5), DVec2::new(-2.0, 0.0)));
            world.add_body(ball(0.4, DVec2::new(9.0, 8.0), DVec2::new(-1.0, -3.0)));
            world
        };
        let mut w1 = build();
        let mut w2 = build();

        for _ in 0..120 {
            let e1 = w1.step(FRAME_DT);
            let e2 = w2.step(FRAME_DT);
            assert_eq!(e1, e2);
        }
        for (a, b) in w1.bodies().iter().zip(w2.bodies()) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.vel, b.vel);
        }
    }

    #[test]
    fn test_beads_stay_on_wire() {
        let wire = WireConstraint::new(DVec2::new(1.0, 1.0), 0.8).unwrap();
        let mut world = BeadWorld::new(&SimConfig::beads(), wire);
        for i in 0..4 {
            let angle = i as f64 * std::f64::consts::FRAC_PI_4;
            world.add_bead(Body::with_area_mass(0.05, wire.point_at(angle), DVec2::ZERO).unwrap());
        }

        for _ in 0..30 {
            world.step(FRAME_DT);
        }
        for bead in world.beads() {
            let r = (bead.body.pos - wire.center).length();
            assert!((r - wire.radius).abs() < 0.05, "bead drifted to r={r}");
        }
        assert!(world.constraint_force() > 0.0);
    }

    #[test]
    fn test_bead_world_runs_analytic_reference() {
        let wire = WireConstraint::new(DVec2::ZERO, 0.8).unwrap();
        let mut world = BeadWorld::new(&SimConfig::beads(), wire);
        world.add_bead(Body::new(0.1, 1.0, wire.point_at(0.0), DVec2::ZERO).unwrap());
        world.set_analytic(Some(AnalyticBead::new(0.8, std::f64::consts::FRAC_PI_2)));

        for _ in 0..20 {
            world.step(FRAME_DT);
        }
        let analytic = world.analytic().unwrap();
        let diff = (world.beads()[0].body.pos - (wire.center + analytic.position())).length();
        assert!(diff < 1e-2);
        assert!(world.analytic_force() > 0.0);
    }
}
