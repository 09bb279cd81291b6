//! Parametric surfaces sampled by the generator.
//!
//! - [Plane], [Sphere] and [Torus] are true surfaces: they map a UV coordinate in
//!   `[0, 1]²` to a position and a unit normal.
//! - [Shape::Function] and [Shape::Morph] evaluate the animated height fields and
//!   volumes of [crate::function] over `[-1, 1]²`. They have no normal.
//!
//! Every surface has a four-lane form that must agree bit for bit with the scalar form.

pub mod plane;
pub mod sphere;
pub mod torus;

pub use plane::Plane;
pub use sphere::Sphere;
pub use torus::Torus;

use glam::{Vec2, Vec3, Vec4};

use crate::{
    function::{self, FunctionName},
    math::lanes::{Float4x3, LANES},
    Error, Result,
};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Four points, per axis
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point4 {
    pub positions: Float4x3,
    pub normals: Float4x3,
}

impl Point4 {
    pub fn lane(&self, k: usize) -> Point {
        Point {
            position: self.positions.lane(k),
            normal: self.normals.lane(k),
        }
    }
}

pub trait Surface {
    fn point(&self, uv: Vec2) -> Point;

    /// Four points at once, lane `k` at `(u[k], v[k])`.
    fn point4(&self, u: Vec4, v: Vec4) -> Point4;
}

/// Which coordinates of a quantized position are fed to the hash, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatticeAxes {
    /// x then z
    Xz,
    /// x, y then z
    Xyz,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Shape {
    #[default]
    Plane,
    Sphere,
    Torus,
    Function(FunctionName),
    Morph {
        from: FunctionName,
        to: FunctionName,
        progress: f32,
    },
}

/// Function surfaces are laid over `[-1, 1]²`.
#[inline]
fn function_domain(c: f32) -> f32 {
    2.0 * c - 1.0
}

impl Shape {
    /// Number of shapes selectable by index: the three surfaces then every function.
    pub const COUNT: usize = 3 + FunctionName::COUNT;

    pub fn point(&self, uv: Vec2, time: f32) -> Point {
        match *self {
            Shape::Plane => Plane.point(uv),
            Shape::Sphere => Sphere.point(uv),
            Shape::Torus => Torus.point(uv),
            Shape::Function(f) => Point {
                position: f.evaluate(function_domain(uv.x), function_domain(uv.y), time),
                normal: Vec3::ZERO,
            },
            Shape::Morph { from, to, progress } => Point {
                position: function::morph(
                    function_domain(uv.x),
                    function_domain(uv.y),
                    time,
                    from,
                    to,
                    progress,
                ),
                normal: Vec3::ZERO,
            },
        }
    }

    pub fn point4(&self, u: Vec4, v: Vec4, time: f32) -> Point4 {
        match *self {
            Shape::Plane => Plane.point4(u, v),
            Shape::Sphere => Sphere.point4(u, v),
            Shape::Torus => Torus.point4(u, v),
            Shape::Function(_) | Shape::Morph { .. } => {
                // Transcendental functions have no lane form, evaluate lane by lane
                let points: [Point; LANES] =
                    std::array::from_fn(|k| self.point(Vec2::new(u[k], v[k]), time));
                Point4 {
                    positions: Float4x3::from_lanes(points.map(|p| p.position)),
                    normals: Float4x3::ZERO,
                }
            }
        }
    }

    pub fn has_normals(&self) -> bool {
        matches!(self, Shape::Plane | Shape::Sphere | Shape::Torus)
    }

    /// Flat shapes only need the two horizontal axes to tell cells apart.
    pub fn lattice_axes(&self) -> LatticeAxes {
        match self {
            Shape::Plane => LatticeAxes::Xz,
            _ => LatticeAxes::Xyz,
        }
    }
}

impl TryFrom<usize> for Shape {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        match index {
            0 => Ok(Shape::Plane),
            1 => Ok(Shape::Sphere),
            2 => Ok(Shape::Torus),
            i => FunctionName::try_from(i - 3)
                .map(Shape::Function)
                .map_err(|_| Error::UnknownShape { index }),
        }
    }
}
