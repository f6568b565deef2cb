//! Analytic collision world made of a floor plane and axis-aligned blocks.
//!
//! Both the authoritative server and the predicting client construct the
//! same arena, so a replayed input sequence produces bit-identical motion on
//! either side.

use crate::collide::{CollisionShape, Sweep, SweepCollider};
use crate::transform::Transform;
use glam::Vec3;

/// Distance kept between a swept shape and the surface it hit, so that
/// follow-up sweeps start outside the obstacle.
const SKIN: f32 = 1.0e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Grows this box by the extents of a moving shape, reducing the swept
    /// shape to a point sweep against the expanded box.
    fn expand_for(&self, shape: &CollisionShape) -> Aabb {
        Aabb {
            min: self.min - shape.maxs,
            max: self.max - shape.mins,
        }
    }

    fn contains(&self, p: Vec3) -> bool {
        p.x > self.min.x
            && p.x < self.max.x
            && p.y > self.min.y
            && p.y < self.max.y
            && p.z > self.min.z
            && p.z < self.max.z
    }
}

/// Static world geometry: an infinite floor plane plus solid blocks.
#[derive(Debug, Clone)]
pub struct BoxWorld {
    pub floor_y: f32,
    pub blocks: Vec<Aabb>,
}

impl BoxWorld {
    pub fn flat(floor_y: f32) -> Self {
        Self {
            floor_y,
            blocks: Vec::new(),
        }
    }

    /// The arena every role simulates: flat ground, a two-step staircase and
    /// a tall wall. Server and client must agree on this geometry.
    pub fn arena() -> Self {
        Self {
            floor_y: 0.0,
            blocks: vec![
                // Staircase: two 0.3-high steps leading up to a platform.
                Aabb::new(Vec3::new(4.0, 0.0, -2.0), Vec3::new(8.0, 0.3, 2.0)),
                Aabb::new(Vec3::new(5.0, 0.0, -2.0), Vec3::new(8.0, 0.6, 2.0)),
                // Boundary wall.
                Aabb::new(Vec3::new(-8.4, 0.0, -8.0), Vec3::new(-8.0, 3.0, 8.0)),
            ],
        }
    }

    pub fn with_block(mut self, block: Aabb) -> Self {
        self.blocks.push(block);
        self
    }

    /// Deterministic spawn location for a player id.
    pub fn spawn_point(&self, id: u32) -> Vec3 {
        Vec3::new(-2.0 + (id % 4) as f32 * 1.5, self.floor_y, (id % 3) as f32)
    }

    fn sweep_floor(&self, shape: &CollisionShape, origin: Vec3, motion: Vec3) -> Option<f32> {
        if motion.y >= 0.0 {
            return None;
        }
        let bottom = origin.y + shape.mins.y;
        if bottom < self.floor_y {
            // Embedded below the floor; report an immediate contact.
            return Some(0.0);
        }
        let t = (self.floor_y - bottom) / motion.y;
        (t <= 1.0).then_some(t)
    }

    /// Slab test of a point against an expanded block. Returns the entry
    /// fraction and surface normal.
    fn sweep_box(b: &Aabb, origin: Vec3, motion: Vec3) -> Option<(f32, Vec3)> {
        if b.contains(origin) {
            // Started penetrating: push out along the axis of least depth.
            let mut depth = f32::INFINITY;
            let mut normal = Vec3::ZERO;
            for i in 0..3 {
                let to_min = origin[i] - b.min[i];
                let to_max = b.max[i] - origin[i];
                if to_min < depth {
                    depth = to_min;
                    normal = -Vec3::from(AXES[i]);
                }
                if to_max < depth {
                    depth = to_max;
                    normal = Vec3::from(AXES[i]);
                }
            }
            return Some((0.0, normal));
        }

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        let mut axis = 0usize;
        for i in 0..3 {
            if motion[i].abs() < 1e-12 {
                if origin[i] < b.min[i] || origin[i] > b.max[i] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / motion[i];
            let mut t1 = (b.min[i] - origin[i]) * inv;
            let mut t2 = (b.max[i] - origin[i]) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            if t1 > t_near {
                t_near = t1;
                axis = i;
            }
            t_far = t_far.min(t2);
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 || t_near > 1.0 || t_near < 0.0 {
            return None;
        }
        let mut normal = Vec3::ZERO;
        normal[axis] = -motion[axis].signum();
        Some((t_near, normal))
    }
}

const AXES: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

impl SweepCollider for BoxWorld {
    fn sweep(&self, shape: &CollisionShape, from: &Transform, motion: Vec3) -> Sweep {
        let origin = from.origin;
        if !motion.is_finite() || motion.length_squared() == 0.0 {
            return Sweep::clear(Vec3::ZERO);
        }

        let mut best_t = f32::INFINITY;
        let mut best_normal = Vec3::ZERO;

        if let Some(t) = self.sweep_floor(shape, origin, motion) {
            best_t = t;
            best_normal = Vec3::Y;
        }

        for block in &self.blocks {
            let expanded = block.expand_for(shape);
            if let Some((t, normal)) = Self::sweep_box(&expanded, origin, motion) {
                if t < best_t {
                    best_t = t;
                    best_normal = normal;
                }
            }
        }

        if !best_t.is_finite() {
            return Sweep::clear(motion);
        }

        // Back the contact off by a skin distance so the next sweep does not
        // start inside the surface.
        let length = motion.length();
        let t = ((best_t * length - SKIN).max(0.0)) / length;
        let travel = motion * t;
        Sweep::blocked(best_normal, travel, motion - travel)
    }
}
