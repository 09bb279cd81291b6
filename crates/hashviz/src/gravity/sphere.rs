use glam::Vec3;

use super::{falloff_factor, GravitySource, STANDARD_GRAVITY};

/// Pulls toward a center, within a shell.
///
/// No gravity inside `inner_falloff_radius` nor beyond `outer_falloff_radius`.
/// Strength ramps up linearly from `inner_falloff_radius` to `inner_radius`, is
/// constant up to `outer_radius` and ramps down to `outer_falloff_radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravitySphere {
    center: Vec3,
    gravity: f32,
    inner_falloff_radius: f32,
    inner_radius: f32,
    outer_radius: f32,
    outer_falloff_radius: f32,
    inner_falloff_factor: f32,
    outer_falloff_factor: f32,
}

impl GravitySphere {
    pub fn new(center: Vec3) -> Self {
        Self {
            center,
            gravity: STANDARD_GRAVITY,
            inner_falloff_radius: 0.0,
            inner_radius: 0.0,
            outer_radius: 0.0,
            outer_falloff_radius: 0.0,
            inner_falloff_factor: 0.0,
            outer_falloff_factor: 0.0,
        }
        .with_radii(1.0, 5.0, 10.0, 15.0)
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Radii are clamped so that each one is at least the previous one.
    pub fn with_radii(
        mut self,
        inner_falloff_radius: f32,
        inner_radius: f32,
        outer_radius: f32,
        outer_falloff_radius: f32,
    ) -> Self {
        self.inner_falloff_radius = inner_falloff_radius.max(0.0);
        self.inner_radius = inner_radius.max(self.inner_falloff_radius);
        self.outer_radius = outer_radius.max(self.inner_radius);
        self.outer_falloff_radius = outer_falloff_radius.max(self.outer_radius);

        self.inner_falloff_factor = falloff_factor(self.inner_radius - self.inner_falloff_radius);
        self.outer_falloff_factor = falloff_factor(self.outer_falloff_radius - self.outer_radius);
        self
    }

    pub fn radii(&self) -> [f32; 4] {
        [
            self.inner_falloff_radius,
            self.inner_radius,
            self.outer_radius,
            self.outer_falloff_radius,
        ]
    }
}

impl GravitySource for GravitySphere {
    fn gravity(&self, position: Vec3) -> Vec3 {
        let vector = self.center - position;
        let distance = vector.length();
        if distance > self.outer_falloff_radius
            || distance < self.inner_falloff_radius
            || distance == 0.0
        {
            return Vec3::ZERO;
        }

        let mut g = self.gravity / distance;
        if distance > self.outer_radius {
            g *= 1.0 - (distance - self.outer_radius) * self.outer_falloff_factor;
        } else if distance < self.inner_radius {
            g *= 1.0 - (self.inner_radius - distance) * self.inner_falloff_factor;
        }
        g * vector
    }
}
