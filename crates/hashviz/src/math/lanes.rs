//! Four-wide structure-of-arrays types.
//!
//! Every lane operation is the exact scalar operation applied to each lane, so a
//! lane result is always bit-identical to the scalar computation on that lane.

use std::ops::{BitAnd, BitXor, Shr};

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// Number of lanes processed together.
pub const LANES: usize = 4;

/// Four unsigned integers with wrapping arithmetic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct U32x4(pub [u32; LANES]);

impl U32x4 {
    pub const ZERO: Self = Self::splat(0);

    pub const fn splat(v: u32) -> Self {
        Self([v; LANES])
    }

    /// Reinterprets signed lanes as unsigned, two's complement.
    pub fn from_i32(v: [i32; LANES]) -> Self {
        Self(v.map(|x| x as u32))
    }

    pub fn to_array(self) -> [u32; LANES] {
        self.0
    }

    pub fn lane(self, k: usize) -> u32 {
        self.0[k]
    }

    pub fn map(self, f: impl Fn(u32) -> u32) -> Self {
        Self(self.0.map(f))
    }

    fn zip_with(self, rhs: Self, f: impl Fn(u32, u32) -> u32) -> Self {
        Self(std::array::from_fn(|k| f(self.0[k], rhs.0[k])))
    }

    pub fn wrapping_add(self, rhs: Self) -> Self {
        self.zip_with(rhs, u32::wrapping_add)
    }

    pub fn wrapping_mul(self, rhs: Self) -> Self {
        self.zip_with(rhs, u32::wrapping_mul)
    }

    pub fn rotate_left(self, steps: u32) -> Self {
        self.map(|x| x.rotate_left(steps))
    }
}

impl BitXor for U32x4 {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a ^ b)
    }
}

impl BitAnd<u32> for U32x4 {
    type Output = Self;

    fn bitand(self, rhs: u32) -> Self::Output {
        self.map(|x| x & rhs)
    }
}

impl Shr<u32> for U32x4 {
    type Output = Self;

    fn shr(self, rhs: u32) -> Self::Output {
        self.map(|x| x >> rhs)
    }
}

impl From<[u32; LANES]> for U32x4 {
    fn from(v: [u32; LANES]) -> Self {
        Self(v)
    }
}

/// Applies `f` to every lane of `v`.
#[inline]
pub fn map4(v: Vec4, f: impl Fn(f32) -> f32) -> Vec4 {
    Vec4::from_array(v.to_array().map(f))
}

/// Four 3D vectors stored per axis: `x` holds the x coordinate of all four lanes.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Float4x3 {
    pub x: Vec4,
    pub y: Vec4,
    pub z: Vec4,
}

impl Float4x3 {
    pub const ZERO: Self = Self {
        x: Vec4::ZERO,
        y: Vec4::ZERO,
        z: Vec4::ZERO,
    };

    pub fn new(x: Vec4, y: Vec4, z: Vec4) -> Self {
        Self { x, y, z }
    }

    /// The same vector in all four lanes
    pub fn splat(v: Vec3) -> Self {
        Self {
            x: Vec4::splat(v.x),
            y: Vec4::splat(v.y),
            z: Vec4::splat(v.z),
        }
    }

    pub fn from_lanes(v: [Vec3; LANES]) -> Self {
        Self {
            x: Vec4::new(v[0].x, v[1].x, v[2].x, v[3].x),
            y: Vec4::new(v[0].y, v[1].y, v[2].y, v[3].y),
            z: Vec4::new(v[0].z, v[1].z, v[2].z, v[3].z),
        }
    }

    pub fn lane(&self, k: usize) -> Vec3 {
        Vec3::new(self.x[k], self.y[k], self.z[k])
    }

    /// Transposes back to four separate vectors.
    pub fn lanes(&self) -> [Vec3; LANES] {
        std::array::from_fn(|k| self.lane(k))
    }

    /// Per lane `x * x + y * y + z * z`, summed left to right like the scalar path.
    pub fn length_squared(&self) -> Vec4 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Floors every lane and converts to integer lattice coordinates, one array per axis.
    pub fn floor_to_i32(&self) -> [[i32; LANES]; 3] {
        let floor = |v: Vec4| v.to_array().map(|c| c.floor() as i32);
        [floor(self.x), floor(self.y), floor(self.z)]
    }
}
