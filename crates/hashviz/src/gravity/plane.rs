use glam::{Quat, Vec3};

use super::{GravitySource, STANDARD_GRAVITY};

/// Pulls along the plane's down axis.
///
/// Full strength on and below the plane, fading linearly to zero at `range`
/// above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityPlane {
    position: Vec3,
    up: Vec3,
    gravity: f32,
    range: f32,
}

impl GravityPlane {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            up: rotation * Vec3::Y,
            gravity: STANDARD_GRAVITY,
            range: 1.0,
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Negative ranges are clamped to zero.
    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range.max(0.0);
        self
    }

    pub fn range(&self) -> f32 {
        self.range
    }
}

impl GravitySource for GravityPlane {
    fn gravity(&self, position: Vec3) -> Vec3 {
        let distance = self.up.dot(position - self.position);
        if distance > self.range {
            return Vec3::ZERO;
        }

        let mut g = -self.gravity;
        if distance > 0.0 {
            g *= 1.0 - distance / self.range;
        }
        g * self.up
    }
}
