use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A rigid transform: translation plus rotation. Scale is never needed for
/// character movement, so it is intentionally absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub origin: Vec3,
    #[serde(default)]
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        origin: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn from_origin(origin: Vec3) -> Self {
        Self {
            origin,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn with_origin(self, origin: Vec3) -> Self {
        Self { origin, ..self }
    }

    /// Yaw (rotation around the vertical axis) in radians.
    pub fn yaw(&self) -> f32 {
        self.rotation.to_euler(EulerRot::YXZ).0
    }

    /// Pitch (rotation around the sideways axis) in radians.
    pub fn pitch(&self) -> f32 {
        self.rotation.to_euler(EulerRot::YXZ).1
    }

    /// Component-wise interpolation: lerp for the origin, slerp for the
    /// rotation. `weight` is expected in [0, 1] but is not clamped here.
    pub fn interpolate(&self, other: &Transform, weight: f32) -> Transform {
        Transform {
            origin: self.origin.lerp(other.origin, weight),
            rotation: self.rotation.slerp(other.rotation, weight),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.origin.is_finite() && self.rotation.is_finite()
    }
}
