//! Custom gravity: several sources summed into one acceleration field.
//!
//! Sources live in an explicit [GravityWorld] owned by the caller.

mod cuboid;
mod plane;
mod sphere;

pub use cuboid::{BoxDistances, GravityBox};
pub use plane::GravityPlane;
pub use sphere::GravitySphere;

use glam::Vec3;
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use crate::{counter, math::float::Vec3AsNonZero, Error, Result};

/// Gravity below this magnitude has no meaningful direction.
const UP_EPSILON: f32 = 1e-6;

/// Standard gravity in m/s², the default strength of every source
pub const STANDARD_GRAVITY: f32 = 9.81;

pub trait GravitySource: Sync + Send {
    /// Acceleration contributed by this source at `position`, in world space.
    fn gravity(&self, position: Vec3) -> Vec3;
}

/// Handle returned by [GravityWorld::register].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

struct SourceEntry {
    id: SourceId,
    source: Box<dyn GravitySource>,
}

impl std::fmt::Debug for SourceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceEntry")
            .field("id", &self.id)
            .field("source", &"<gravity source>")
            .finish()
    }
}

/// Registered gravity sources, summed in registration order.
#[derive(Debug, Default)]
pub struct GravityWorld {
    sources: Vec<SourceEntry>,
    next_id: u32,
}

impl GravityWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn register<S: GravitySource + 'static>(&mut self, source: S) -> SourceId {
        let id = SourceId(self.next_id);
        self.next_id += 1;
        self.sources.push(SourceEntry {
            id,
            source: Box::new(source),
        });
        log::debug!("registered gravity source {}", id.0);
        id
    }

    /// Removes a source and gives it back.
    pub fn unregister(&mut self, id: SourceId) -> Result<Box<dyn GravitySource>> {
        let idx = self
            .sources
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(Error::UnknownGravitySource { id: id.0 })?;
        log::debug!("unregistered gravity source {}", id.0);
        Ok(self.sources.remove(idx).source)
    }

    pub fn gravity(&self, position: Vec3) -> Vec3 {
        counter!("Gravity queries");
        self.sources
            .iter()
            .fold(Vec3::ZERO, |g, entry| g + entry.source.gravity(position))
    }

    /// Gravity and the matching up axis.
    pub fn gravity_with_up(&self, position: Vec3) -> (Vec3, Vec3) {
        let g = self.gravity(position);
        (g, up_from_gravity(g))
    }

    /// Opposite of the gravity direction, zero where there is no gravity.
    pub fn up_axis(&self, position: Vec3) -> Vec3 {
        up_from_gravity(self.gravity(position))
    }

    /// Gravity at many positions at once, in parallel.
    pub fn gravity_batch(&self, positions: &[Vec3]) -> Vec<Vec3> {
        positions.par_iter().map(|&p| self.gravity(p)).collect()
    }
}

fn up_from_gravity(g: Vec3) -> Vec3 {
    g.into_non_zero(UP_EPSILON)
        .map(|g| -g.normalize())
        .unwrap_or(Vec3::ZERO)
}

/// `1 / width`, or zero for an empty falloff band that can never be entered.
fn falloff_factor(width: f32) -> f32 {
    if width > 0.0 {
        1.0 / width
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::{GravityPlane, GravitySource, GravitySphere, GravityWorld, SourceId};
    use crate::Error;

    struct Constant(Vec3);

    impl GravitySource for Constant {
        fn gravity(&self, _: Vec3) -> Vec3 {
            self.0
        }
    }

    #[test]
    fn empty_world() {
        let world = GravityWorld::new();
        assert!(world.is_empty());
        assert_eq!(world.gravity(Vec3::ONE), Vec3::ZERO);
        assert_eq!(world.gravity_with_up(Vec3::ONE), (Vec3::ZERO, Vec3::ZERO));
        assert_eq!(world.up_axis(Vec3::ONE), Vec3::ZERO);
    }

    #[test]
    fn sources_add_up() {
        let mut world = GravityWorld::new();
        world.register(Constant(Vec3::new(0.0, -2.0, 0.0)));
        let b = world.register(Constant(Vec3::new(0.0, -3.0, 4.0)));
        assert_eq!(world.len(), 2);

        let (g, up) = world.gravity_with_up(Vec3::ZERO);
        assert_eq!(g, Vec3::new(0.0, -5.0, 4.0));
        assert!((up - -g.normalize()).length() < 1e-6);
        assert!((up.length() - 1.0).abs() < 1e-6);

        let removed = world.unregister(b).unwrap();
        assert_eq!(removed.gravity(Vec3::ZERO), Vec3::new(0.0, -3.0, 4.0));
        assert_eq!(world.up_axis(Vec3::ZERO), Vec3::Y);
    }

    #[test]
    fn cancelling_sources_have_no_up() {
        let mut world = GravityWorld::new();
        world.register(Constant(Vec3::X));
        world.register(Constant(-Vec3::X));
        assert_eq!(world.up_axis(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn unknown_source() {
        let mut world = GravityWorld::new();
        let id = world.register(Constant(Vec3::X));
        world.unregister(id).unwrap();
        assert!(world.unregister(id).is_err());
        assert!(matches!(
            world.unregister(SourceId(42)),
            Err(Error::UnknownGravitySource { id: 42 })
        ));
    }

    #[test]
    fn ids_are_not_reused() {
        let mut world = GravityWorld::new();
        let a = world.register(Constant(Vec3::X));
        world.unregister(a).unwrap();
        let b = world.register(Constant(Vec3::X));
        assert_ne!(a, b);
    }

    #[test]
    fn batch_matches_single_queries() {
        let mut world = GravityWorld::new();
        world.register(GravitySphere::new(Vec3::new(0.0, -12.0, 0.0)));
        world.register(GravityPlane::new(Vec3::ZERO, Quat::from_rotation_x(0.3)).with_range(4.0));

        let positions: Vec<_> = (0..500)
            .map(|i| Vec3::new(i as f32 * 0.1 - 25.0, (i % 17) as f32 - 8.0, 0.5))
            .collect();
        let batch = world.gravity_batch(&positions);
        assert_eq!(batch.len(), positions.len());
        for (p, g) in positions.iter().zip(batch) {
            assert_eq!(g, world.gravity(*p));
        }
    }
}
