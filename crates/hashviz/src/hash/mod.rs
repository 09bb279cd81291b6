//! A small xxHash32-style hash for integer coordinates.
//!
//! Unlike a streaming hasher, the state is a plain value: [SmallXXHash::eat]
//! returns a new state and reading the final hash with [SmallXXHash::get] does not
//! consume it, so one seeded state can be shared by many samples.

pub mod lanes;

pub use lanes::SmallXXHash4;

pub(crate) const PRIME_A: u32 = 0b1001_1110_0011_0111_0111_1001_1011_0001;
pub(crate) const PRIME_B: u32 = 0b1000_0101_1110_1011_1100_1010_0111_0111;
pub(crate) const PRIME_C: u32 = 0b1100_0010_1011_0010_1010_1110_0011_1101;
pub(crate) const PRIME_D: u32 = 0b0010_0111_1101_0100_1110_1011_0010_1111;
pub(crate) const PRIME_E: u32 = 0b0001_0110_0101_0110_0110_0111_1011_0001;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SmallXXHash {
    accumulator: u32,
}

impl SmallXXHash {
    pub const fn seed(seed: i32) -> Self {
        Self {
            accumulator: (seed as u32).wrapping_add(PRIME_E),
        }
    }

    /// Folds one integer coordinate into the state.
    #[inline]
    pub const fn eat(self, data: i32) -> Self {
        let acc = self
            .accumulator
            .wrapping_add((data as u32).wrapping_mul(PRIME_C));
        Self {
            accumulator: acc.rotate_left(17).wrapping_mul(PRIME_D),
        }
    }

    /// Folds a single byte, using the shorter xxHash byte round.
    #[inline]
    pub const fn eat_byte(self, data: u8) -> Self {
        let acc = self
            .accumulator
            .wrapping_add((data as u32).wrapping_mul(PRIME_E));
        Self {
            accumulator: acc.rotate_left(11).wrapping_mul(PRIME_A),
        }
    }

    /// Offsets the accumulator, used to derive sibling hashes from one state.
    pub const fn offset(self, by: u32) -> Self {
        Self {
            accumulator: self.accumulator.wrapping_add(by),
        }
    }

    pub(crate) const fn from_accumulator(accumulator: u32) -> Self {
        Self { accumulator }
    }

    pub const fn accumulator(self) -> u32 {
        self.accumulator
    }

    /// Final avalanche.
    #[inline]
    pub const fn get(self) -> u32 {
        avalanche(self.accumulator)
    }

    pub const fn bytes_a(self) -> u32 {
        self.get() & 255
    }
    pub const fn bytes_b(self) -> u32 {
        (self.get() >> 8) & 255
    }
    pub const fn bytes_c(self) -> u32 {
        (self.get() >> 16) & 255
    }
    pub const fn bytes_d(self) -> u32 {
        self.get() >> 24
    }

    pub fn floats01_a(self) -> f32 {
        self.bytes_a() as f32 * (1.0 / 255.0)
    }
    pub fn floats01_b(self) -> f32 {
        self.bytes_b() as f32 * (1.0 / 255.0)
    }
    pub fn floats01_c(self) -> f32 {
        self.bytes_c() as f32 * (1.0 / 255.0)
    }
    pub fn floats01_d(self) -> f32 {
        self.bytes_d() as f32 * (1.0 / 255.0)
    }
}

#[inline]
pub(crate) const fn avalanche(mut a: u32) -> u32 {
    a ^= a >> 15;
    a = a.wrapping_mul(PRIME_B);
    a ^= a >> 13;
    a = a.wrapping_mul(PRIME_C);
    a ^= a >> 16;
    a
}

impl From<SmallXXHash> for u32 {
    fn from(hash: SmallXXHash) -> Self {
        hash.get()
    }
}
