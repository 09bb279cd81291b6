use glam::Vec4;

use super::{SmallXXHash, PRIME_A, PRIME_B, PRIME_C, PRIME_D, PRIME_E};
use crate::math::lanes::{U32x4, LANES};

/// Four [SmallXXHash] states advanced in lockstep.
///
/// Lane `k` of any chain of calls is bit-identical to the same chain run on a
/// scalar [SmallXXHash] with lane `k`'s inputs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SmallXXHash4 {
    accumulator: U32x4,
}

impl SmallXXHash4 {
    /// Every lane starts from the same seed.
    pub fn seed(seed: i32) -> Self {
        Self {
            accumulator: U32x4::splat(seed as u32).wrapping_add(U32x4::splat(PRIME_E)),
        }
    }

    #[inline]
    pub fn eat(self, data: [i32; LANES]) -> Self {
        let acc = self
            .accumulator
            .wrapping_add(U32x4::from_i32(data).wrapping_mul(U32x4::splat(PRIME_C)));
        Self {
            accumulator: acc.rotate_left(17).wrapping_mul(U32x4::splat(PRIME_D)),
        }
    }

    #[inline]
    pub fn eat_byte(self, data: [u8; LANES]) -> Self {
        let data = U32x4(data.map(u32::from));
        let acc = self
            .accumulator
            .wrapping_add(data.wrapping_mul(U32x4::splat(PRIME_E)));
        Self {
            accumulator: acc.rotate_left(11).wrapping_mul(U32x4::splat(PRIME_A)),
        }
    }

    pub fn offset(self, by: u32) -> Self {
        Self {
            accumulator: self.accumulator.wrapping_add(U32x4::splat(by)),
        }
    }

    /// The scalar state of one lane
    pub fn lane(self, k: usize) -> SmallXXHash {
        SmallXXHash::from_accumulator(self.accumulator.lane(k))
    }

    #[inline]
    pub fn get(self) -> U32x4 {
        let mut a = self.accumulator;
        a = a ^ (a >> 15);
        a = a.wrapping_mul(U32x4::splat(PRIME_B));
        a = a ^ (a >> 13);
        a = a.wrapping_mul(U32x4::splat(PRIME_C));
        a ^ (a >> 16)
    }

    pub fn bytes_a(self) -> U32x4 {
        self.get() & 255
    }
    pub fn bytes_b(self) -> U32x4 {
        (self.get() >> 8) & 255
    }
    pub fn bytes_c(self) -> U32x4 {
        (self.get() >> 16) & 255
    }
    pub fn bytes_d(self) -> U32x4 {
        self.get() >> 24
    }

    pub fn floats01_a(self) -> Vec4 {
        to_floats01(self.bytes_a())
    }
    pub fn floats01_b(self) -> Vec4 {
        to_floats01(self.bytes_b())
    }
    pub fn floats01_c(self) -> Vec4 {
        to_floats01(self.bytes_c())
    }
    pub fn floats01_d(self) -> Vec4 {
        to_floats01(self.bytes_d())
    }
}

fn to_floats01(bytes: U32x4) -> Vec4 {
    Vec4::from_array(bytes.0.map(|b| b as f32 * (1.0 / 255.0)))
}

impl From<SmallXXHash> for SmallXXHash4 {
    fn from(hash: SmallXXHash) -> Self {
        Self {
            accumulator: U32x4::splat(hash.accumulator()),
        }
    }
}
