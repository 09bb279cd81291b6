use glam::{Vec2, Vec3, Vec4};

use super::{Point, Point4, Surface};
use crate::math::lanes::Float4x3;

/// Unit square in the XZ plane, centered on the origin, facing +Y.
#[derive(Debug, Default, Clone, Copy)]
pub struct Plane;

impl Surface for Plane {
    fn point(&self, uv: Vec2) -> Point {
        Point {
            position: Vec3::new(uv.x - 0.5, 0.0, uv.y - 0.5),
            normal: Vec3::Y,
        }
    }

    fn point4(&self, u: Vec4, v: Vec4) -> Point4 {
        Point4 {
            positions: Float4x3::new(u - 0.5, Vec4::ZERO, v - 0.5),
            normals: Float4x3::splat(Vec3::Y),
        }
    }
}
