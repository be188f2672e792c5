//! Collision detection and response
//!
//! Every resolver works on positions after integration: it detects overlap,
//! pushes the ball out along the contact normal, then rewrites only the
//! normal component of the velocity. Coincident centres have no defined
//! normal and are skipped.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use super::flipper::Flipper;
use super::state::{Body, BodyId, Boundary, Bounds, Bounds3, Obstacle};
use crate::{closest_point_on_segment, perp};

/// A contact resolved during a substep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionEvent {
    BallBall(BodyId, BodyId),
    /// Ball hit the obstacle at this index (scores a point)
    Obstacle(BodyId, usize),
    Flipper(BodyId, usize),
    Wall(BodyId),
}

/// Resolve overlap between two balls
///
/// Each ball is pushed out by half the penetration regardless of mass. The
/// normal velocities follow the 1-D restitution law; tangential velocity is
/// untouched. `restitution` overrides the default `min(e_a, e_b)`.
///
/// Only approaching balls get a velocity response. A pair that is already
/// separating at exact contact is left alone, so resolving twice is a no-op.
pub fn ball_ball(a: &mut Body, b: &mut Body, restitution: Option<f64>) -> bool {
    let dir = b.pos - a.pos;
    let d = dir.length();
    if d == 0.0 || d > a.radius() + b.radius() {
        return false;
    }
    let dir = dir / d;

    let v1 = a.vel.dot(dir);
    let v2 = b.vel.dot(dir);
    let approaching = v2 - v1 < 0.0;
    let corr = (a.radius() + b.radius() - d) / 2.0;
    if !approaching && corr <= 0.0 {
        return false;
    }

    a.pos -= dir * corr;
    b.pos += dir * corr;
    if !approaching {
        return true;
    }

    let e = restitution
        .map(|e| e.clamp(0.0, 1.0))
        .unwrap_or_else(|| a.restitution().min(b.restitution()));
    let m1 = a.mass();
    let m2 = b.mass();

    let new_v1 = (m1 * v1 + m2 * v2 - m2 * (v1 - v2) * e) / (m1 + m2);
    let new_v2 = (m1 * v1 + m2 * v2 - m1 * (v2 - v1) * e) / (m1 + m2);

    a.vel += dir * (new_v1 - v1);
    b.vel += dir * (new_v2 - v2);
    true
}

/// Resolve a ball against a static bumper
///
/// The ball is pushed fully out and leaves along the normal at the bumper's
/// push velocity, whatever its incoming speed.
pub fn ball_obstacle(ball: &mut Body, obstacle: &Obstacle) -> bool {
    let dir = ball.pos - obstacle.pos;
    let d = dir.length();
    if d == 0.0 || d > ball.radius() + obstacle.radius {
        return false;
    }
    let dir = dir / d;

    let corr = ball.radius() + obstacle.radius - d;
    ball.pos += dir * corr;

    let v = ball.vel.dot(dir);
    ball.vel += dir * (obstacle.push_velocity - v);
    true
}

/// Resolve a ball against a moving flipper
///
/// The ball's normal velocity is set to the flipper surface's normal velocity
/// at the contact point: a driven contact without restitution.
pub fn ball_flipper(ball: &mut Body, flipper: &Flipper) -> bool {
    let closest = closest_point_on_segment(ball.pos, flipper.pos, flipper.tip());
    let dir = ball.pos - closest;
    let d = dir.length();
    if d == 0.0 || d > ball.radius() + flipper.radius {
        return false;
    }
    let dir = dir / d;

    let corr = ball.radius() + flipper.radius - d;
    ball.pos += dir * corr;

    let lever = closest + dir * flipper.radius - flipper.pos;
    let surface_vel = perp(lever) * flipper.current_angular_velocity;

    let v = ball.vel.dot(dir);
    let v_new = surface_vel.dot(dir);
    ball.vel += dir * (v_new - v);
    true
}

/// Resolve a ball against the closest edge of a closed boundary
///
/// Edge normals are `perp(b - a)`, which face inward for the
/// counter-clockwise winding `Boundary` guarantees. A ball whose centre has
/// crossed the closest edge is moved back in by `dist + radius` in one jump;
/// there is no continuous detection, so a fast ball can still tunnel.
pub fn ball_boundary(ball: &mut Body, boundary: &Boundary) -> bool {
    let mut closest = DVec2::ZERO;
    let mut normal = DVec2::ZERO;
    let mut min_dist = f64::INFINITY;

    for (a, b) in boundary.edges() {
        let c = closest_point_on_segment(ball.pos, a, b);
        let dist = (ball.pos - c).length();
        if dist < min_dist {
            min_dist = dist;
            closest = c;
            normal = perp(b - a);
        }
    }

    let mut d = ball.pos - closest;
    let mut dist = d.length();
    if dist == 0.0 {
        d = normal;
        dist = normal.length();
        if dist == 0.0 {
            return false;
        }
    }
    let d = d / dist;

    let inward = if d.dot(normal) >= 0.0 {
        if dist > ball.radius() {
            return false;
        }
        ball.pos += d * (ball.radius() - dist);
        d
    } else {
        ball.pos += d * -(dist + ball.radius());
        -d
    };

    // The bounce speed is |v|·e even if the ball was already heading inward
    let v = ball.vel.dot(inward);
    let v_new = v.abs() * ball.restitution();
    ball.vel += inward * (v_new - v);
    true
}

/// Keep a ball inside an axis-aligned rectangle
///
/// Position is clamped so the ball touches the wall and the offending
/// velocity component is reflected, scaled by the ball's restitution.
pub fn ball_bounds(ball: &mut Body, bounds: &Bounds) -> bool {
    let r = ball.radius();
    let e = ball.restitution();
    let mut hit = false;

    if ball.pos.x - r < bounds.min.x {
        ball.pos.x = bounds.min.x + r;
        ball.vel.x = -ball.vel.x * e;
        hit = true;
    }
    if ball.pos.x + r > bounds.max.x {
        ball.pos.x = bounds.max.x - r;
        ball.vel.x = -ball.vel.x * e;
        hit = true;
    }
    if ball.pos.y - r < bounds.min.y {
        ball.pos.y = bounds.min.y + r;
        ball.vel.y = -ball.vel.y * e;
        hit = true;
    }
    if ball.pos.y + r > bounds.max.y {
        ball.pos.y = bounds.max.y - r;
        ball.vel.y = -ball.vel.y * e;
        hit = true;
    }
    hit
}

/// Keep a 3D ball inside x/z walls and above the floor (perfect reflection)
pub fn bounds3_reflect(pos: &mut DVec3, vel: &mut DVec3, radius: f64, bounds: &Bounds3) -> bool {
    let mut hit = false;

    if pos.x - radius < bounds.x_min {
        pos.x = bounds.x_min + radius;
        vel.x = -vel.x;
        hit = true;
    }
    if pos.x + radius > bounds.x_max {
        pos.x = bounds.x_max - radius;
        vel.x = -vel.x;
        hit = true;
    }
    if pos.z - radius < bounds.z_min {
        pos.z = bounds.z_min + radius;
        vel.z = -vel.z;
        hit = true;
    }
    if pos.z + radius > bounds.z_max {
        pos.z = bounds.z_max - radius;
        vel.z = -vel.z;
        hit = true;
    }
    if pos.y - radius < bounds.y_min {
        pos.y = bounds.y_min + radius;
        vel.y = -vel.y;
        hit = true;
    }
    hit
}
