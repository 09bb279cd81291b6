use std::f32::consts::TAU;

use glam::{Vec2, Vec3, Vec4};

use super::{Point, Point4, Surface};
use crate::math::lanes::{map4, Float4x3};

/// Ring torus around the Y axis.
#[derive(Debug, Default, Clone, Copy)]
pub struct Torus;

impl Torus {
    /// Major radius
    pub const R1: f32 = 0.375;
    /// Minor radius
    pub const R2: f32 = 0.125;
}

impl Surface for Torus {
    fn point(&self, uv: Vec2) -> Point {
        let (su, cu) = ((TAU * uv.x).sin(), (TAU * uv.x).cos());
        let (sv, cv) = ((TAU * uv.y).sin(), (TAU * uv.y).cos());

        let s = Self::R1 + Self::R2 * cv;
        let position = Vec3::new(s * su, Self::R2 * sv, s * cu);
        // Remove the major circle, what is left points away from the tube center
        let normal = Vec3::new(
            position.x - Self::R1 * su,
            position.y,
            position.z - Self::R1 * cu,
        ) * (1.0 / Self::R2);

        Point { position, normal }
    }

    fn point4(&self, u: Vec4, v: Vec4) -> Point4 {
        let (su, cu) = (map4(TAU * u, f32::sin), map4(TAU * u, f32::cos));
        let (sv, cv) = (map4(TAU * v, f32::sin), map4(TAU * v, f32::cos));

        let s = Self::R1 + Self::R2 * cv;
        let positions = Float4x3::new(s * su, Self::R2 * sv, s * cu);
        let inv_r2 = 1.0 / Self::R2;
        let normals = Float4x3::new(
            (positions.x - Self::R1 * su) * inv_r2,
            positions.y * inv_r2,
            (positions.z - Self::R1 * cu) * inv_r2,
        );

        Point4 { positions, normals }
    }
}
