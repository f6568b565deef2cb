//! Sweep-test abstraction consumed by the movement simulator.
//!
//! The simulator never intersects geometry itself; it asks a [`SweepCollider`]
//! whether a motion is possible and what surface blocked it. Servers, clients
//! and tests all plug in the same analytic world implementation so the
//! simulation stays deterministic across roles.

use crate::transform::Transform;
use glam::Vec3;

/// Axis-aligned collision volume of a character, relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionShape {
    pub mins: Vec3,
    pub maxs: Vec3,
}

impl CollisionShape {
    /// Standing player volume: 0.8 units wide, 1.8 tall, feet at the origin.
    pub fn character() -> Self {
        Self {
            mins: Vec3::new(-0.4, 0.0, -0.4),
            maxs: Vec3::new(0.4, 1.8, 0.4),
        }
    }

    pub fn world_min(&self, origin: Vec3) -> Vec3 {
        origin + self.mins
    }

    pub fn world_max(&self, origin: Vec3) -> Vec3 {
        origin + self.maxs
    }
}

/// Outcome of sweeping a shape along a motion vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub collided: bool,
    /// Unit surface normal at the impact point; zero when nothing was hit.
    pub normal: Vec3,
    /// The portion of the motion that was performed.
    pub travel: Vec3,
    /// The portion of the motion that was blocked.
    pub remainder: Vec3,
}

impl Sweep {
    pub fn clear(motion: Vec3) -> Self {
        Self {
            collided: false,
            normal: Vec3::ZERO,
            travel: motion,
            remainder: Vec3::ZERO,
        }
    }

    pub fn blocked(normal: Vec3, travel: Vec3, remainder: Vec3) -> Self {
        Self {
            collided: true,
            normal,
            travel,
            remainder,
        }
    }
}

/// Result of a full slide move: where the body ended up, the velocity that
/// survived the collisions, and the contact flags for the next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slide {
    pub origin: Vec3,
    pub velocity: Vec3,
    pub on_floor: bool,
    pub on_ceiling: bool,
    pub floor_normal: Vec3,
}

/// Project `v` onto the plane with unit normal `n`.
pub fn slide(v: Vec3, n: Vec3) -> Vec3 {
    v - n * v.dot(n)
}

/// The motion-query primitive the simulator is written against.
///
/// Implementors only need [`SweepCollider::sweep`]; the slide loop is derived
/// from it and shared by every world.
pub trait SweepCollider {
    /// Sweeps `shape` from `from` along `motion`, reporting the first contact.
    fn sweep(&self, shape: &CollisionShape, from: &Transform, motion: Vec3) -> Sweep;

    /// Moves by `velocity * dt`, sliding along whatever it hits, then snaps
    /// to the floor along `snap`. Surfaces within `floor_max_angle` radians
    /// of `up` count as floor, surfaces opposing `up` as ceiling.
    #[allow(clippy::too_many_arguments)]
    fn move_and_slide(
        &self,
        shape: &CollisionShape,
        from: &Transform,
        velocity: Vec3,
        snap: Vec3,
        up: Vec3,
        max_slides: u32,
        floor_max_angle: f32,
        dt: f32,
    ) -> Slide {
        let mut origin = from.origin;
        let mut remaining = velocity * dt;
        let mut vel = velocity;
        let mut on_floor = false;
        let mut on_ceiling = false;
        let mut floor_normal = up;

        for _ in 0..max_slides {
            if remaining.length_squared() < 1e-12 {
                break;
            }
            let probe = Transform::from_origin(origin);
            let hit = self.sweep(shape, &probe, remaining);
            origin += hit.travel;
            if !hit.collided {
                break;
            }
            if hit.normal.angle_between(up) <= floor_max_angle {
                on_floor = true;
                floor_normal = hit.normal;
            } else if hit.normal.angle_between(-up) <= floor_max_angle {
                on_ceiling = true;
            }
            remaining = slide(hit.remainder, hit.normal);
            vel = slide(vel, hit.normal);
        }

        // Snap keeps the body glued to sloped ground. Skipped while moving
        // away from the floor so a jump can actually leave it.
        if snap.length_squared() > 0.0 && velocity.dot(up) <= 0.0 {
            let probe = Transform::from_origin(origin);
            let hit = self.sweep(shape, &probe, snap);
            if hit.collided && hit.normal.angle_between(up) <= floor_max_angle {
                origin += hit.travel;
                on_floor = true;
                floor_normal = hit.normal;
            }
        }

        Slide {
            origin,
            velocity: vel,
            on_floor,
            on_ceiling,
            floor_normal,
        }
    }
}
