//! Animated closed-form surfaces over `(u, v) ∈ [-1, 1]²` and time `t`.

pub mod timeline;

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;

use crate::{math::float::smoothstep, Error, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionName {
    #[default]
    Wave,
    MultiWave,
    Ripple,
    Sphere,
    Torus,
    Knot,
}

impl FunctionName {
    pub const ALL: [FunctionName; 6] = [
        FunctionName::Wave,
        FunctionName::MultiWave,
        FunctionName::Ripple,
        FunctionName::Sphere,
        FunctionName::Torus,
        FunctionName::Knot,
    ];
    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn evaluate(self, u: f32, v: f32, t: f32) -> Vec3 {
        match self {
            FunctionName::Wave => wave(u, v, t),
            FunctionName::MultiWave => multi_wave(u, v, t),
            FunctionName::Ripple => ripple(u, v, t),
            FunctionName::Sphere => sphere(u, v, t),
            FunctionName::Torus => torus(u, v, t),
            FunctionName::Knot => knot(u, v, t),
        }
    }

    /// The following function, wrapping around to the first one.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    /// A function picked uniformly among all the others.
    pub fn random_other_than<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        // Draw among COUNT - 1 slots, the current one maps to the first function
        let choice = Self::ALL[rng.gen_range(1..Self::COUNT)];
        if choice == self {
            Self::ALL[0]
        } else {
            choice
        }
    }
}

impl TryFrom<usize> for FunctionName {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::UnknownFunction { index })
    }
}

/// Blends two functions with a smoothstep eased, unclamped `progress`.
///
/// `progress == 0` gives exactly `from` and `progress == 1` exactly `to`.
pub fn morph(u: f32, v: f32, t: f32, from: FunctionName, to: FunctionName, progress: f32) -> Vec3 {
    let s = smoothstep(progress);
    // Weighted sum rather than `a + (b - a) * s`, so both endpoints are exact
    from.evaluate(u, v, t) * (1.0 - s) + to.evaluate(u, v, t) * s
}

fn wave(u: f32, v: f32, t: f32) -> Vec3 {
    Vec3::new(u, (PI * (u + v + t)).sin(), v)
}

fn multi_wave(u: f32, v: f32, t: f32) -> Vec3 {
    let mut y = (PI * (u + 0.5 * t)).sin();
    y += 0.5 * (2.0 * PI * (v + t)).sin();
    y += (PI * (u + v + 0.25 * t)).sin();
    y *= 1.0 / 2.5;
    Vec3::new(u, y, v)
}

fn ripple(u: f32, v: f32, t: f32) -> Vec3 {
    let d = (u * u + v * v).sqrt();
    let y = (PI * (4.0 * d - t)).sin() / (1.0 + 10.0 * d);
    Vec3::new(u, y, v)
}

fn sphere(u: f32, v: f32, t: f32) -> Vec3 {
    let r = 0.9 + 0.1 * (PI * (6.0 * u + 4.0 * v + t)).sin();
    let s = r * (0.5 * PI * v).cos();
    Vec3::new(s * (PI * u).sin(), r * (0.5 * PI * v).sin(), s * (PI * u).cos())
}

fn torus(u: f32, v: f32, t: f32) -> Vec3 {
    let r1 = 0.7 + 0.1 * (PI * (6.0 * u + 0.5 * t)).sin();
    let r2 = 0.15 + 0.05 * (PI * (8.0 * u + 4.0 * v + 2.0 * t)).sin();
    let s = r2 * (PI * v).cos() + r1;
    Vec3::new(s * (PI * u).sin(), r2 * (PI * v).sin(), s * (PI * u).cos())
}

fn knot(u: f32, _v: f32, t: f32) -> Vec3 {
    let u = u * PI + (0.5 * t).sin();
    Vec3::new(
        u.sin() + 2.0 * (2.0 * u).sin(),
        u.cos() - 2.0 * (2.0 * u).cos(),
        -(3.0 * u).sin(),
    )
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use rand::{Rng, SeedableRng};

    use super::{morph, FunctionName};
    use crate::Error;

    #[test]
    fn closed_forms() {
        let (u, v, t) = (0.3, -0.2, 1.7);
        let wave = FunctionName::Wave.evaluate(u, v, t);
        assert_eq!(wave.x, u);
        assert_eq!(wave.z, v);
        assert_eq!(wave.y, (PI * (u + v + t)).sin());

        let d = (u * u + v * v).sqrt();
        let ripple = FunctionName::Ripple.evaluate(u, v, t);
        assert!((ripple.y - (PI * (4.0 * d - t)).sin() / (1.0 + 10.0 * d)).abs() < 1e-6);

        let multi = FunctionName::MultiWave.evaluate(u, v, t);
        let expected = ((PI * (u + 0.5 * t)).sin()
            + 0.5 * (2.0 * PI * (v + t)).sin()
            + (PI * (u + v + 0.25 * t)).sin())
            / 2.5;
        assert!((multi.y - expected).abs() < 1e-6);
    }

    #[test]
    fn knot_at_origin() {
        let p = FunctionName::Knot.evaluate(0.0, 0.5, 0.0);
        assert!((p - glam::Vec3::new(0.0, -1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn sphere_radius_stays_in_band() {
        let mut rng = crate::Rng::seed_from_u64(11);
        for _ in 0..1000 {
            let (u, v, t) = (rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen());
            let r = FunctionName::Sphere.evaluate(u, v, t).length();
            assert!((0.8 - 1e-5..=1.0 + 1e-5).contains(&r));
        }
    }

    #[test]
    fn morph_endpoints_are_exact() {
        let mut rng = crate::Rng::seed_from_u64(5);
        for _ in 0..200 {
            let (u, v, t) = (rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(0.0..20.0));
            for from in FunctionName::ALL {
                for to in FunctionName::ALL {
                    assert_eq!(morph(u, v, t, from, to, 0.0), from.evaluate(u, v, t));
                    assert_eq!(morph(u, v, t, from, to, 1.0), to.evaluate(u, v, t));
                }
            }
        }
    }

    #[test]
    fn morph_is_unclamped() {
        let (u, v, t) = (0.1, 0.2, 0.3);
        let a = FunctionName::Wave.evaluate(u, v, t);
        let b = FunctionName::Ripple.evaluate(u, v, t);
        let over = morph(u, v, t, FunctionName::Wave, FunctionName::Ripple, 1.5);
        let s = 1.5 * 1.5 * (3.0 - 2.0 * 1.5);
        assert!((over - (a * (1.0 - s) + b * s)).length() < 1e-6);
    }

    #[test]
    fn cycling_returns_home() {
        for start in FunctionName::ALL {
            let mut name = start;
            for _ in 0..FunctionName::COUNT {
                name = name.next();
            }
            assert_eq!(name, start);
        }
        assert_eq!(FunctionName::Knot.next(), FunctionName::Wave);
    }

    #[test]
    fn random_never_repeats_and_reaches_all_others() {
        let mut rng = crate::Rng::seed_from_u64(3);
        for current in FunctionName::ALL {
            let mut seen = [0u32; FunctionName::COUNT];
            for _ in 0..6000 {
                let next = current.random_other_than(&mut rng);
                assert_ne!(next, current);
                seen[next.index()] += 1;
            }
            for (i, &count) in seen.iter().enumerate() {
                if i != current.index() {
                    // ~1200 expected for each of the 5 others
                    assert!((900..1500).contains(&count), "{current:?} -> {i}: {count}");
                }
            }
        }
    }

    #[test]
    fn selection_by_index() {
        assert_eq!(FunctionName::try_from(2), Ok(FunctionName::Ripple));
        assert_eq!(
            FunctionName::try_from(6),
            Err(Error::UnknownFunction { index: 6 })
        );
    }
}
