use glam::{Vec2, Vec4};

use crate::{
    math::lanes::LANES,
    Error, Result,
};

/// Maps the sample indices of a `resolution × resolution` grid to UV coordinates.
///
/// Sample `i` sits at column `x = i % resolution` and row `z = i / resolution`,
/// its UV is the center of that cell: `((x + 0.5) / resolution, (z + 0.5) / resolution)`,
/// so no sample ever lands on the border of the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSampler {
    resolution: u32,
    sample_count: u32,
}

impl GridSampler {
    pub fn new(resolution: u32) -> Result<Self> {
        if resolution == 0 {
            return Err(Error::InvalidResolution { resolution });
        }
        let sample_count = resolution
            .checked_mul(resolution)
            .ok_or(Error::ResolutionTooLarge { resolution })?;

        Ok(Self {
            resolution,
            sample_count,
        })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count as usize
    }

    /// Number of lane groups, the last one may be partially filled
    pub fn group_count(&self) -> usize {
        self.sample_count().div_ceil(LANES)
    }

    /// Sample count rounded up to whole lane groups
    pub fn padded_len(&self) -> usize {
        self.group_count() * LANES
    }

    pub fn coords(&self, i: u32) -> (u32, u32) {
        (i % self.resolution, i / self.resolution)
    }

    pub fn uv(&self, i: u32) -> Vec2 {
        let (x, z) = self.coords(i);
        let resolution = self.resolution as f32;
        Vec2::new(
            (x as f32 + 0.5) / resolution,
            (z as f32 + 0.5) / resolution,
        )
    }

    /// Sample indices of a lane group.
    ///
    /// Lanes past the last sample repeat the last sample, so padding always
    /// evaluates a real, finite point.
    pub fn group_indices(&self, group: usize) -> [u32; LANES] {
        let last = self.sample_count - 1;
        std::array::from_fn(|k| u32::min((group * LANES + k) as u32, last))
    }

    /// UVs of a lane group, per axis.
    pub fn uv4(&self, group: usize) -> (Vec4, Vec4) {
        let coords = self.group_indices(group).map(|i| self.coords(i));
        let x = Vec4::from_array(coords.map(|(x, _)| x as f32));
        let z = Vec4::from_array(coords.map(|(_, z)| z as f32));
        let resolution = self.resolution as f32;
        ((x + 0.5) / resolution, (z + 0.5) / resolution)
    }
}
