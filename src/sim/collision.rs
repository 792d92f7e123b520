//! Collision detection and response for boxes and the ball
//!
//! Everything in the field is an axis-aligned box except the ball, which is a
//! circle. Ball contacts snap their normal to the box face with the least
//! penetration, so a bounce always flips exactly one velocity component.

use glam::Vec2;

/// Axis-aligned box given by centre and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size / 2.0,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        let gap = (self.center - other.center).abs() - (self.half + other.half);
        gap.x < 0.0 && gap.y < 0.0
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the box to the ball centre
    pub point: Vec2,
    /// Face normal pointing toward the ball
    pub normal: Vec2,
    /// Distance to push the ball along `normal` to separate
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a circular ball against a box
pub fn ball_box_collision(ball_pos: Vec2, ball_radius: f32, bx: &Aabb) -> CollisionResult {
    let closest = ball_pos.clamp(bx.min(), bx.max());
    if (ball_pos - closest).length_squared() > ball_radius * ball_radius {
        return CollisionResult::miss();
    }

    let rel = ball_pos - bx.center;
    let overlap = bx.half + Vec2::splat(ball_radius) - rel.abs();
    let (normal, penetration) = if overlap.x < overlap.y {
        (Vec2::new(rel.x.signum(), 0.0), overlap.x)
    } else {
        (Vec2::new(0.0, rel.y.signum()), overlap.y)
    };

    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration,
    }
}

/// Reflect velocity off a surface with given normal
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Unit direction for an angle in degrees measured from straight up
/// (negative leans left, positive leans right; y grows downward)
pub fn direction_from_vertical(angle_deg: f32) -> Vec2 {
    let rad = (angle_deg - 90.0).to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Paddle bounce direction: horizontal offset from paddle centre, in pixels,
/// maps one-to-one to degrees, clamped to `max_angle`
pub fn paddle_bounce_direction(offset: f32, max_angle: f32) -> Vec2 {
    direction_from_vertical(offset.clamp(-max_angle, max_angle))
}

/// Kinds of contact the simulation resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionPair {
    BallPaddle,
    BallBrick,
    BulletBrick,
    BombBrick,
}

/// One detected overlap: pair kind plus the two entity ids involved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Contact {
    pub pair: CollisionPair,
    pub source: u32,
    pub target: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brick() -> Aabb {
        Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(80.0, 28.0))
    }

    #[test]
    fn test_ball_box_collision_bottom_face() {
        let result = ball_box_collision(Vec2::new(100.0, 120.0), 8.0, &brick());
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, 1.0));
        assert!((result.penetration - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_ball_box_collision_side_face() {
        let result = ball_box_collision(Vec2::new(146.0, 100.0), 8.0, &brick());
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_ball_box_collision_miss() {
        assert!(!ball_box_collision(Vec2::new(100.0, 130.0), 8.0, &brick()).hit);
        // Near the corner but outside the radius
        assert!(!ball_box_collision(Vec2::new(147.0, 121.0), 8.0, &brick()).hit);
    }

    #[test]
    fn test_reflect_velocity() {
        let vel = Vec2::new(3.0, -4.0);
        let reflected = reflect_velocity(vel, Vec2::new(0.0, 1.0));
        assert_eq!(reflected, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_aabb_overlap() {
        let a = brick();
        assert!(a.overlaps(&Aabb::new(Vec2::new(140.0, 100.0), Vec2::new(4.0, 12.0))));
        assert!(!a.overlaps(&Aabb::new(Vec2::new(143.0, 100.0), Vec2::new(4.0, 12.0))));
    }

    #[test]
    fn test_paddle_bounce_direction() {
        let straight = paddle_bounce_direction(0.0, 60.0);
        assert!(straight.x.abs() < 1e-6);
        assert!((straight.y + 1.0).abs() < 1e-6);

        // Offsets beyond the limit clamp to 60 degrees
        let wide = paddle_bounce_direction(500.0, 60.0);
        let angle = wide.y.atan2(wide.x).to_degrees();
        assert!((angle + 30.0).abs() < 1e-3);
    }
}
