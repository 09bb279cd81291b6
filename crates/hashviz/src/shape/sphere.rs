use glam::{Vec2, Vec3, Vec4};

use super::{Point, Point4, Surface};
use crate::math::{
    float::FloatAsExt,
    lanes::{map4, Float4x3},
};

/// Unit sphere, obtained by folding the UV square onto an octahedron and
/// projecting it outward.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sphere;

/// `1 / sqrt(l)`, or zero when `l` is too small to be normalized
fn inv_length(length_squared: f32) -> f32 {
    length_squared
        .into_non_zero(f32::MIN_POSITIVE)
        .map_or(0.0, |l| 1.0 / l.sqrt())
}

/// Octahedral fold of one coordinate: move by `offset` toward the far side.
fn fold(c: f32, offset: f32) -> f32 {
    if c < 0.0 {
        c + offset
    } else {
        c - offset
    }
}

impl Surface for Sphere {
    fn point(&self, uv: Vec2) -> Point {
        let x = uv.x - 0.5;
        let y = uv.y - 0.5;
        let z = 0.5 - x.abs() - y.abs();
        let offset = (-z).max(0.0);
        let p = Vec3::new(fold(x, offset), fold(y, offset), z);

        let scale = inv_length(p.x * p.x + p.y * p.y + p.z * p.z);
        let position = if scale > 0.0 { p * scale } else { Vec3::Z };
        Point {
            position,
            normal: position,
        }
    }

    fn point4(&self, u: Vec4, v: Vec4) -> Point4 {
        let x = u - 0.5;
        let y = v - 0.5;
        let z = 0.5 - x.abs() - y.abs();
        let offset = (-z).max(Vec4::ZERO);
        let x = Vec4::select(x.cmplt(Vec4::ZERO), x + offset, x - offset);
        let y = Vec4::select(y.cmplt(Vec4::ZERO), y + offset, y - offset);
        let p = Float4x3::new(x, y, z);

        let scale = map4(p.length_squared(), inv_length);
        let degenerate = scale.cmpeq(Vec4::ZERO);
        let positions = Float4x3::new(
            Vec4::select(degenerate, Vec4::ZERO, p.x * scale),
            Vec4::select(degenerate, Vec4::ZERO, p.y * scale),
            Vec4::select(degenerate, Vec4::ONE, p.z * scale),
        );
        Point4 {
            positions,
            normals: positions,
        }
    }
}
