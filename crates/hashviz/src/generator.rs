//! Generation of a full snapshot: positions, normals and hashes for every sample.
//!
//! A pass runs three stages, each one finishing on every worker before the next
//! one starts:
//! 1. evaluate the shape for every lane group,
//! 2. move positions and normals through the domain transform,
//! 3. quantize the placed positions in hash space and hash them.

use glam::Vec3;

use crate::{
    batch::{Batcher, ExecutionMode},
    counter,
    hash::{SmallXXHash, SmallXXHash4},
    math::{
        lanes::{Float4x3, LANES},
        transform::{DomainTransform, SpaceTrs},
    },
    sampler::GridSampler,
    shape::{LatticeAxes, Point4, Shape},
    timed_scope_accumulate,
    utils::timer::{format_elapsed, timed_scope},
    Result,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    pub shape: Shape,
    /// Samples along one side of the grid
    pub resolution: u32,
    pub seed: i32,
    /// Placement of the shape
    pub domain: SpaceTrs,
    /// Hash space: placed positions go through it before being floored
    pub lattice: SpaceTrs,
    /// Overrides [Shape::lattice_axes]
    pub lattice_axes: Option<LatticeAxes>,
    pub time: f32,
    pub execution_mode: ExecutionMode,
    /// Lane groups per worker batch, defaults to the resolution
    pub batch_size: Option<u32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorBuilder::default().build()
    }
}

impl GeneratorConfig {
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::default()
    }

    pub fn lattice_axes(&self) -> LatticeAxes {
        self.lattice_axes
            .unwrap_or_else(|| self.shape.lattice_axes())
    }
}

pub struct GeneratorBuilder {
    config: GeneratorConfig,
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self {
            config: GeneratorConfig {
                shape: Shape::Plane,
                resolution: 16,
                seed: 0,
                domain: SpaceTrs::IDENTITY,
                lattice: SpaceTrs::IDENTITY,
                lattice_axes: None,
                time: 0.0,
                execution_mode: ExecutionMode::Multithreaded,
                batch_size: None,
            },
        }
    }
}

impl GeneratorBuilder {
    pub fn shape(mut self, shape: Shape) -> Self {
        self.config.shape = shape;
        self
    }
    pub fn resolution(mut self, resolution: u32) -> Self {
        self.config.resolution = resolution;
        self
    }
    pub fn seed(mut self, seed: i32) -> Self {
        self.config.seed = seed;
        self
    }
    pub fn domain(mut self, domain: SpaceTrs) -> Self {
        self.config.domain = domain;
        self
    }
    pub fn lattice(mut self, lattice: SpaceTrs) -> Self {
        self.config.lattice = lattice;
        self
    }
    pub fn lattice_axes(mut self, axes: LatticeAxes) -> Self {
        self.config.lattice_axes = Some(axes);
        self
    }
    pub fn time(mut self, time: f32) -> Self {
        self.config.time = time;
        self
    }
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.execution_mode = mode;
        self
    }
    pub fn batch_size(mut self, batch_size: u32) -> Self {
        self.config.batch_size = Some(batch_size);
        self
    }

    pub fn build(self) -> GeneratorConfig {
        self.config
    }
}

/// Output of one generation pass.
///
/// Buffers are stored in lane groups and padded to a multiple of four samples;
/// the accessors only expose the first [Snapshot::len] samples, in sample order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Snapshot {
    positions: Vec<[Vec3; LANES]>,
    normals: Vec<[Vec3; LANES]>,
    hashes: Vec<[u32; LANES]>,
    len: usize,
    resolution: u32,
    has_normals: bool,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Whether the sampled shape defines normals, otherwise they are all zero.
    pub fn has_normals(&self) -> bool {
        self.has_normals
    }

    pub fn positions(&self) -> &[Vec3] {
        &bytemuck::cast_slice::<_, Vec3>(&self.positions)[..self.len]
    }

    pub fn normals(&self) -> &[Vec3] {
        &bytemuck::cast_slice::<_, Vec3>(&self.normals)[..self.len]
    }

    pub fn hashes(&self) -> &[u32] {
        &bytemuck::cast_slice::<_, u32>(&self.hashes)[..self.len]
    }

    /// Tightly packed `f32` triples, native endianness
    pub fn positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.positions())
    }

    pub fn normals_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.normals())
    }

    pub fn hashes_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.hashes())
    }

    /// Resizes the lane buffers, keeping their allocation when the size is unchanged.
    fn prepare(&mut self, sampler: &GridSampler, has_normals: bool) {
        let groups = sampler.group_count();
        self.positions.resize(groups, [Vec3::ZERO; LANES]);
        self.normals.resize(groups, [Vec3::ZERO; LANES]);
        self.hashes.resize(groups, [0; LANES]);
        self.len = sampler.sample_count();
        self.resolution = sampler.resolution();
        self.has_normals = has_normals;
    }
}

/// Drives the three generation stages over lane groups.
///
/// It owns the intermediate shape buffer so that repeated passes do not allocate.
#[derive(Debug, Default)]
pub struct BatchSampler {
    points: Vec<Point4>,
}

impl BatchSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a fresh snapshot.
    pub fn generate(&mut self, config: &GeneratorConfig) -> Result<Snapshot> {
        let mut snapshot = Snapshot::default();
        self.generate_into(config, &mut snapshot)?;
        Ok(snapshot)
    }

    /// Generates into an existing snapshot, reusing its buffers.
    ///
    /// The configuration is validated before anything is written: on error
    /// `snapshot` is left untouched.
    pub fn generate_into(&mut self, config: &GeneratorConfig, snapshot: &mut Snapshot) -> Result<()> {
        let sampler = GridSampler::new(config.resolution)?;

        let timed = timed_scope(|| {
            let batcher = Batcher::new(
                sampler.group_count(),
                config.batch_size.unwrap_or(config.resolution) as usize,
            );
            self.points.resize(sampler.group_count(), Point4::default());
            snapshot.prepare(&sampler, config.shape.has_normals());

            timed_scope_accumulate!("Shape stage", || {
                shape_stage(&batcher, config, &sampler, &mut self.points)
            });
            timed_scope_accumulate!("Transform stage", || {
                transform_stage(&batcher, config, &self.points, snapshot)
            });
            timed_scope_accumulate!("Hash stage", || hash_stage(&batcher, config, snapshot));

            counter!("Generation passes");
            counter!("Lane groups", sampler.group_count());
            counter!("Samples", sampler.sample_count());
        });

        log::debug!(
            "generated {:?} at resolution {} (seed {}, {} samples) in {}",
            config.shape,
            config.resolution,
            config.seed,
            snapshot.len(),
            format_elapsed(timed.elapsed)
        );
        Ok(())
    }
}

fn shape_stage(
    batcher: &Batcher,
    config: &GeneratorConfig,
    sampler: &GridSampler,
    points: &mut [Point4],
) {
    let shape = config.shape;
    let time = config.time;
    batcher.run(config.execution_mode, points, |batch, out| {
        log::trace!("shape stage on {batch:?}");
        for (point, group) in out.iter_mut().zip(batch.groups()) {
            let (u, v) = sampler.uv4(group);
            *point = shape.point4(u, v, time);
        }
    });
}

fn transform_stage(
    batcher: &Batcher,
    config: &GeneratorConfig,
    points: &[Point4],
    snapshot: &mut Snapshot,
) {
    let domain: DomainTransform = config.domain.domain_transform();
    batcher.run2(
        config.execution_mode,
        &mut snapshot.positions,
        &mut snapshot.normals,
        |batch, positions, normals| {
            log::trace!("transform stage on {batch:?}");
            let points = &points[batch.groups()];
            for ((point, position), normal) in points.iter().zip(positions).zip(normals) {
                *position = domain.transform_points4(&point.positions).lanes();
                *normal = domain.transform_normals4(&point.normals).lanes();
            }
        },
    );
}

fn hash_stage(batcher: &Batcher, config: &GeneratorConfig, snapshot: &mut Snapshot) {
    let lattice = config.lattice.domain_transform();
    let axes = config.lattice_axes();
    let seed = SmallXXHash4::seed(config.seed);
    let positions = &snapshot.positions;
    batcher.run(config.execution_mode, &mut snapshot.hashes, |batch, hashes| {
        log::trace!("hash stage on {batch:?}");
        for (hash, group) in hashes.iter_mut().zip(batch.groups()) {
            let p = lattice.transform_points4(&Float4x3::from_lanes(positions[group]));
            let [x, y, z] = p.floor_to_i32();
            let h = match axes {
                LatticeAxes::Xz => seed.eat(x).eat(z),
                LatticeAxes::Xyz => seed.eat(x).eat(y).eat(z),
            };
            *hash = h.get().to_array();
        }
    });
}

/// Hash of a single placed position, as computed by the hash stage.
pub fn hash_position(config: &GeneratorConfig, position: Vec3) -> u32 {
    let p = config.lattice.domain_transform().transform_point(position);
    let [x, y, z] = p.to_array().map(|c| c.floor() as i32);
    let seed = SmallXXHash::seed(config.seed);
    let hash = match config.lattice_axes() {
        LatticeAxes::Xz => seed.eat(x).eat(z),
        LatticeAxes::Xyz => seed.eat(x).eat(y).eat(z),
    };
    hash.get()
}

/// One shot generation with a throwaway [BatchSampler].
pub fn generate(config: &GeneratorConfig) -> Result<Snapshot> {
    BatchSampler::new().generate(config)
}
