use glam::{Quat, Vec3};

use super::{falloff_factor, GravitySource, STANDARD_GRAVITY};

/// Distances of a [GravityBox] shell, measured from the box faces.
///
/// Inside the box gravity is normal to the nearest face, pointing away from it:
/// full strength within `inner` of it, fading to zero at `inner_falloff`. Outside it pulls toward the
/// nearest point of the box: full strength up to `outer`, fading to zero at
/// `outer_falloff`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxDistances {
    pub inner: f32,
    pub inner_falloff: f32,
    pub outer: f32,
    pub outer_falloff: f32,
}

impl Default for BoxDistances {
    fn default() -> Self {
        Self {
            inner: 0.0,
            inner_falloff: 0.0,
            outer: 0.0,
            outer_falloff: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityBox {
    position: Vec3,
    rotation: Quat,
    gravity: f32,
    /// Half extents
    boundary: Vec3,
    distances: BoxDistances,
    inner_falloff_factor: f32,
    outer_falloff_factor: f32,
}

impl GravityBox {
    pub fn new(position: Vec3, rotation: Quat, boundary: Vec3) -> Self {
        Self {
            position,
            rotation,
            gravity: STANDARD_GRAVITY,
            boundary: Vec3::ZERO,
            distances: BoxDistances::default(),
            inner_falloff_factor: 0.0,
            outer_falloff_factor: 0.0,
        }
        .with_boundary(boundary)
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_boundary(mut self, boundary: Vec3) -> Self {
        self.boundary = boundary.max(Vec3::ZERO);
        self.with_distances(self.distances)
    }

    /// Inner distances can not exceed the smallest half extent, falloffs are at
    /// least their band start.
    pub fn with_distances(mut self, distances: BoxDistances) -> Self {
        let max_inner = self.boundary.min_element();
        let inner = distances.inner.max(0.0).min(max_inner);
        let inner_falloff = distances.inner_falloff.min(max_inner).max(inner);
        let outer = distances.outer.max(0.0);
        let outer_falloff = distances.outer_falloff.max(outer);

        self.distances = BoxDistances {
            inner,
            inner_falloff,
            outer,
            outer_falloff,
        };
        self.inner_falloff_factor = falloff_factor(inner_falloff - inner);
        self.outer_falloff_factor = falloff_factor(outer_falloff - outer);
        self
    }

    pub fn distances(&self) -> BoxDistances {
        self.distances
    }

    fn inner_component(&self, coordinate: f32, distance: f32) -> f32 {
        if distance > self.distances.inner_falloff {
            return 0.0;
        }

        let mut g = self.gravity;
        if distance > self.distances.inner {
            g *= 1.0 - (distance - self.distances.inner) * self.inner_falloff_factor;
        }
        if coordinate > 0.0 {
            -g
        } else {
            g
        }
    }
}

impl GravitySource for GravityBox {
    fn gravity(&self, position: Vec3) -> Vec3 {
        let local = self.rotation.inverse() * (position - self.position);
        let b = self.boundary;

        // Offset back to the box along every axis the point is outside of
        let mut vector = Vec3::ZERO;
        let mut outside = 0;
        for axis in 0..3 {
            if local[axis] > b[axis] {
                vector[axis] = b[axis] - local[axis];
                outside += 1;
            } else if local[axis] < -b[axis] {
                vector[axis] = -b[axis] - local[axis];
                outside += 1;
            }
        }

        if outside > 0 {
            let distance = if outside == 1 {
                (vector.x + vector.y + vector.z).abs()
            } else {
                vector.length()
            };
            if distance > self.distances.outer_falloff {
                return Vec3::ZERO;
            }

            let mut g = self.gravity / distance;
            if distance > self.distances.outer {
                g *= 1.0 - (distance - self.distances.outer) * self.outer_falloff_factor;
            }
            return self.rotation * (g * vector);
        }

        let distances = b - local.abs();
        let mut vector = Vec3::ZERO;
        if distances.x < distances.y {
            if distances.x < distances.z {
                vector.x = self.inner_component(local.x, distances.x);
            } else {
                vector.z = self.inner_component(local.z, distances.z);
            }
        } else if distances.y < distances.z {
            vector.y = self.inner_component(local.y, distances.y);
        } else {
            vector.z = self.inner_component(local.z, distances.z);
        }
        self.rotation * vector
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::{BoxDistances, GravityBox};
    use crate::gravity::GravitySource;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    fn cube() -> GravityBox {
        GravityBox::new(Vec3::ZERO, Quat::IDENTITY, Vec3::splat(10.0))
            .with_gravity(10.0)
            .with_distances(BoxDistances {
                inner: 1.0,
                inner_falloff: 3.0,
                outer: 2.0,
                outer_falloff: 6.0,
            })
    }

    #[test]
    fn inside_follows_nearest_face() {
        let cube = cube();
        assert_eq!(cube.gravity(Vec3::new(0.0, 9.5, 0.0)), Vec3::new(0.0, -10.0, 0.0));
        assert_eq!(cube.gravity(Vec3::new(-9.5, 0.0, 1.0)), Vec3::new(10.0, 0.0, 0.0));
        // Halfway through the inner falloff band
        assert!(close(cube.gravity(Vec3::new(0.0, 0.0, 8.0)), Vec3::new(0.0, 0.0, -5.0)));
        // Deep inside
        assert_eq!(cube.gravity(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn outside_pulls_back_to_box() {
        let cube = cube();
        // Facing a face
        assert!(close(cube.gravity(Vec3::new(11.0, 0.0, 0.0)), Vec3::new(-10.0, 0.0, 0.0)));
        // Halfway through the outer falloff band
        assert!(close(cube.gravity(Vec3::new(0.0, -14.0, 0.0)), Vec3::new(0.0, 5.0, 0.0)));
        assert_eq!(cube.gravity(Vec3::new(0.0, 0.0, 17.0)), Vec3::ZERO);
        // Past an edge, pulled diagonally
        let g = cube.gravity(Vec3::new(11.0, 11.0, 0.0));
        assert!(close(g.normalize(), Vec3::new(-1.0, -1.0, 0.0).normalize()));
        assert!((g.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn rotation_is_applied_both_ways() {
        let rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let cube = GravityBox::new(Vec3::new(5.0, 0.0, 0.0), rotation, Vec3::new(1.0, 4.0, 4.0))
            .with_distances(BoxDistances {
                inner: 0.5,
                inner_falloff: 0.5,
                outer: 1.0,
                outer_falloff: 1.0,
            });
        // The thin local x axis now lies along world y
        let g = cube.gravity(Vec3::new(5.0, 0.8, 0.0));
        assert!(close(g, Vec3::new(0.0, -9.81, 0.0)));
        let g = cube.gravity(Vec3::new(5.0, -1.5, 0.0));
        assert!(close(g, Vec3::new(0.0, 9.81, 0.0)));
    }

    #[test]
    fn distances_are_clamped() {
        let cube = GravityBox::new(Vec3::ZERO, Quat::IDENTITY, Vec3::new(2.0, -1.0, 3.0))
            .with_distances(BoxDistances {
                inner: 5.0,
                inner_falloff: 1.0,
                outer: 3.0,
                outer_falloff: 1.0,
            });
        assert_eq!(
            cube.distances(),
            BoxDistances {
                inner: 0.0,
                inner_falloff: 0.0,
                outer: 3.0,
                outer_falloff: 3.0,
            }
        );
        assert!(cube.gravity(Vec3::new(0.0, 2.0, 0.0)).is_finite());
    }
}
