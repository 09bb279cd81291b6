//! A self-similar tree of parts. Every part carries five children at half its
//! scale: one on top and four around it. Children spin around their own up
//! axis and sag towards the ground the more they lean sideways.
//!
//! Levels are updated in order. A level only starts once its parent level is
//! complete, and its parts are updated in parallel, one family per batch.

use glam::{Mat3, Quat, Vec3};
use rand::{Rng as _, SeedableRng};

use crate::{
    batch::{Batcher, ExecutionMode},
    math::transform::{Affine3x4, SpaceTrs},
    Error, Result,
};

pub const CHILD_COUNT: usize = 5;
pub const MAX_DEPTH: u32 = 8;

/// Distance between a child and its parent, in units of the child scale.
const CHILD_OFFSET: f32 = 1.5;

/// Orientation of each child relative to its parent: up, right, left, front, back.
fn child_rotation(child: usize) -> Quat {
    use std::f32::consts::FRAC_PI_2;
    match child % CHILD_COUNT {
        0 => Quat::IDENTITY,
        1 => Quat::from_rotation_z(-FRAC_PI_2),
        2 => Quat::from_rotation_z(FRAC_PI_2),
        3 => Quat::from_rotation_x(FRAC_PI_2),
        _ => Quat::from_rotation_x(-FRAC_PI_2),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalConfig {
    /// Number of levels, the root included
    pub depth: u32,
    /// Bounds of the per part maximum sag angle, in degrees
    pub max_sag_angle: [f32; 2],
    /// Bounds of the per part spin speed, in degrees per second
    pub spin_speed: [f32; 2],
    pub reverse_spin_chance: f32,
    pub seed: u64,
    pub execution_mode: ExecutionMode,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            max_sag_angle: [15.0, 25.0],
            spin_speed: [20.0, 25.0],
            reverse_spin_chance: 0.25,
            seed: 0,
            execution_mode: ExecutionMode::Multithreaded,
        }
    }
}

impl FractalConfig {
    fn validate(&self) -> Result<()> {
        if !(1..=MAX_DEPTH).contains(&self.depth) {
            return Err(Error::InvalidFractalDepth { depth: self.depth });
        }

        let finite = |name: &'static str, value: f32| {
            value
                .is_finite()
                .then_some(())
                .ok_or(Error::InvalidFractalParameter { name, value })
        };
        for value in self.max_sag_angle {
            finite("max sag angle", value)?;
        }
        for value in self.spin_speed {
            finite("spin speed", value)?;
        }
        if !(0.0..=1.0).contains(&self.reverse_spin_chance) {
            return Err(Error::InvalidFractalParameter {
                name: "reverse spin chance",
                value: self.reverse_spin_chance,
            });
        }
        Ok(())
    }
}

/// Uniform pick between `a` and `b`, in either order.
fn pick(rng: &mut crate::Rng, [a, b]: [f32; 2]) -> f32 {
    a + (b - a) * rng.gen::<f32>()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalPart {
    pub world_position: Vec3,
    /// Orientation relative to the parent
    pub rotation: Quat,
    pub world_rotation: Quat,
    /// Radians
    pub max_sag_angle: f32,
    /// Radians
    pub spin_angle: f32,
    /// Radians per second
    pub spin_velocity: f32,
}

impl FractalPart {
    fn new(child: usize, config: &FractalConfig, rng: &mut crate::Rng) -> Self {
        let max_sag_angle = pick(rng, config.max_sag_angle).to_radians();
        let direction = if rng.gen::<f32>() < config.reverse_spin_chance {
            -1.0
        } else {
            1.0
        };
        let spin_velocity = direction * pick(rng, config.spin_speed).to_radians();

        Self {
            world_position: Vec3::ZERO,
            rotation: child_rotation(child),
            world_rotation: Quat::IDENTITY,
            max_sag_angle,
            spin_angle: 0.0,
            spin_velocity,
        }
    }

    /// Places the part relative to its updated parent, `scale` being the part's own scale.
    fn follow(&mut self, parent: &FractalPart, scale: f32, dt: f32) {
        self.spin_angle += self.spin_velocity * dt;

        let up_axis = parent.world_rotation * self.rotation * Vec3::Y;
        let sag_axis = Vec3::Y.cross(up_axis);
        let sag_magnitude = sag_axis.length();
        let base_rotation = if sag_magnitude > 0.0 {
            let sag = Quat::from_axis_angle(
                sag_axis / sag_magnitude,
                self.max_sag_angle * sag_magnitude,
            );
            sag * parent.world_rotation
        } else {
            parent.world_rotation
        };

        self.world_rotation =
            base_rotation * (self.rotation * Quat::from_rotation_y(self.spin_angle));
        self.world_position =
            parent.world_position + self.world_rotation * Vec3::new(0.0, CHILD_OFFSET * scale, 0.0);
    }

    /// Uniformly scaled rotation followed by the world position.
    pub fn matrix(&self, scale: f32) -> Affine3x4 {
        let r = Mat3::from_quat(self.world_rotation) * scale;
        Affine3x4 {
            cols: [r.x_axis, r.y_axis, r.z_axis, self.world_position],
        }
    }
}

/// The parts of every level with their latest matrices. Level `l` holds `5^l` parts,
/// the parent of part `i` is part `i / 5` of the level above.
#[derive(Debug, Clone)]
pub struct Fractal {
    config: FractalConfig,
    parts: Vec<Vec<FractalPart>>,
    matrices: Vec<Vec<Affine3x4>>,
}

impl Fractal {
    pub fn new(config: FractalConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = crate::Rng::seed_from_u64(config.seed);

        let parts: Vec<Vec<FractalPart>> = (0..config.depth)
            .map(|level| {
                let len = CHILD_COUNT.pow(level);
                (0..len)
                    .map(|i| FractalPart::new(i, &config, &mut rng))
                    .collect()
            })
            .collect();
        let matrices = parts
            .iter()
            .map(|level| vec![Affine3x4::IDENTITY; level.len()])
            .collect();

        log::debug!(
            "fractal of depth {} with {} parts",
            config.depth,
            parts.iter().map(Vec::len).sum::<usize>()
        );
        Ok(Self {
            config,
            parts,
            matrices,
        })
    }

    pub fn config(&self) -> &FractalConfig {
        &self.config
    }

    pub fn depth(&self) -> usize {
        self.parts.len()
    }

    pub fn part_count(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }

    pub fn levels(&self) -> &[Vec<FractalPart>] {
        &self.parts
    }

    /// One matrix per part, level by level.
    pub fn matrices(&self) -> &[Vec<Affine3x4>] {
        &self.matrices
    }

    /// Advances every part by `dt` seconds under the root placement `root`.
    ///
    /// Only the x component of the root scale is used. Negative or non-finite
    /// steps are ignored.
    pub fn update(&mut self, root: &SpaceTrs, dt: f32) {
        if !(dt.is_finite() && dt >= 0.0) {
            log::warn!("ignoring invalid fractal step {dt}");
            return;
        }

        let mut scale = root.scale.x;
        let root_part = &mut self.parts[0][0];
        root_part.spin_angle += root_part.spin_velocity * dt;
        root_part.world_rotation = root.rotation_quat()
            * (root_part.rotation * Quat::from_rotation_y(root_part.spin_angle));
        root_part.world_position = root.translation;
        self.matrices[0][0] = root_part.matrix(scale);

        for level in 1..self.parts.len() {
            scale *= 0.5;
            let (done, rest) = self.parts.split_at_mut(level);
            let parents = &done[level - 1];
            let parts = &mut rest[0];

            Batcher::new(parts.len(), CHILD_COUNT).run2(
                self.config.execution_mode,
                parts,
                &mut self.matrices[level],
                |batch, parts, matrices| {
                    let parent = &parents[batch.start / CHILD_COUNT];
                    for (part, matrix) in parts.iter_mut().zip(matrices) {
                        part.follow(parent, scale, dt);
                        *matrix = part.matrix(scale);
                    }
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::{Fractal, FractalConfig, CHILD_COUNT};
    use crate::{batch::ExecutionMode, math::transform::SpaceTrs, Error};

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-4
    }

    fn still(depth: u32) -> FractalConfig {
        FractalConfig {
            depth,
            max_sag_angle: [0.0, 0.0],
            spin_speed: [0.0, 0.0],
            ..Default::default()
        }
    }

    #[test]
    fn levels_grow_by_five() {
        let fractal = Fractal::new(FractalConfig::default()).unwrap();
        assert_eq!(fractal.depth(), 4);
        for (level, parts) in fractal.levels().iter().enumerate() {
            assert_eq!(parts.len(), CHILD_COUNT.pow(level as u32));
            assert_eq!(fractal.matrices()[level].len(), parts.len());
        }
        assert_eq!(fractal.part_count(), 1 + 5 + 25 + 125);
    }

    #[test]
    fn root_and_first_level_placement() {
        let mut fractal = Fractal::new(still(2)).unwrap();
        let root = SpaceTrs {
            translation: Vec3::new(1.0, 2.0, 3.0),
            scale: Vec3::splat(2.0),
            ..SpaceTrs::IDENTITY
        };
        fractal.update(&root, 0.0);

        let m = fractal.matrices()[0][0];
        assert!(close(m.cols[0], Vec3::new(2.0, 0.0, 0.0)));
        assert!(close(m.cols[1], Vec3::new(0.0, 2.0, 0.0)));
        assert!(close(m.cols[2], Vec3::new(0.0, 0.0, 2.0)));
        assert_eq!(m.cols[3], root.translation);

        let children: Vec<Vec3> = fractal.levels()[1]
            .iter()
            .map(|p| p.world_position - root.translation)
            .collect();
        let expected = [
            Vec3::new(0.0, 1.5, 0.0),
            Vec3::new(1.5, 0.0, 0.0),
            Vec3::new(-1.5, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.5),
            Vec3::new(0.0, 0.0, -1.5),
        ];
        for (got, want) in children.iter().zip(expected) {
            assert!(close(*got, want), "{got} != {want}");
        }
        // Children are drawn at half the root scale.
        assert!(close(fractal.matrices()[1][0].cols[1], Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn without_sag_the_tree_is_mirror_symmetric() {
        let mut fractal = Fractal::new(still(3)).unwrap();
        fractal.update(&SpaceTrs::IDENTITY, 0.5);

        for parts in fractal.levels() {
            for part in parts {
                let p = part.world_position;
                for mirrored in [p * Vec3::new(-1.0, 1.0, 1.0), p * Vec3::new(1.0, 1.0, -1.0)] {
                    assert!(
                        parts.iter().any(|q| close(q.world_position, mirrored)),
                        "{p} has no mirror"
                    );
                }
            }
        }
    }

    #[test]
    fn side_children_sag_below_their_parent() {
        let config = FractalConfig {
            max_sag_angle: [30.0, 30.0],
            ..still(2)
        };
        let mut fractal = Fractal::new(config).unwrap();
        fractal.update(&SpaceTrs::IDENTITY, 0.1);

        let level = &fractal.levels()[1];
        assert!(level[0].world_position.y > 0.0);
        for side in &level[1..] {
            assert!(side.world_position.y < 0.0, "{}", side.world_position);
        }
        let sagged = level[1].world_position;
        let angle = (-sagged.y).atan2(sagged.x);
        assert!((angle - 30f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn spin_accumulates_over_updates() {
        let config = FractalConfig {
            spin_speed: [90.0, 90.0],
            reverse_spin_chance: 0.0,
            ..still(1)
        };
        let mut fractal = Fractal::new(config).unwrap();
        fractal.update(&SpaceTrs::IDENTITY, 0.5);
        fractal.update(&SpaceTrs::IDENTITY, 0.5);
        let x = fractal.matrices()[0][0].cols[0];
        assert!(close(x, Vec3::new(0.0, 0.0, -1.0)), "{x}");
    }

    #[test]
    fn execution_modes_agree() {
        let config = FractalConfig {
            depth: 5,
            seed: 7,
            ..Default::default()
        };
        let mut multi = Fractal::new(config).unwrap();
        let mut mono = Fractal::new(FractalConfig {
            execution_mode: ExecutionMode::Monothreaded,
            ..config
        })
        .unwrap();
        let root = SpaceTrs {
            rotation: Vec3::new(10.0, 20.0, 30.0),
            ..SpaceTrs::IDENTITY
        };
        for _ in 0..3 {
            multi.update(&root, 1.0 / 60.0);
            mono.update(&root, 1.0 / 60.0);
        }
        assert_eq!(multi.matrices(), mono.matrices());
    }

    #[test]
    fn invalid_step_leaves_parts_untouched() {
        let mut fractal = Fractal::new(FractalConfig::default()).unwrap();
        fractal.update(&SpaceTrs::IDENTITY, 0.1);
        let before = fractal.matrices().to_vec();
        fractal.update(&SpaceTrs::IDENTITY, f32::NAN);
        fractal.update(&SpaceTrs::IDENTITY, -1.0);
        assert_eq!(fractal.matrices(), &before[..]);
    }

    #[test]
    fn rejects_bad_configs() {
        assert_eq!(
            Fractal::new(still(0)).unwrap_err(),
            Error::InvalidFractalDepth { depth: 0 }
        );
        assert!(Fractal::new(still(9)).is_err());
        assert!(Fractal::new(FractalConfig {
            reverse_spin_chance: 1.5,
            ..Default::default()
        })
        .is_err());
        assert!(Fractal::new(FractalConfig {
            spin_speed: [f32::NAN, 1.0],
            ..Default::default()
        })
        .is_err());
    }
}
