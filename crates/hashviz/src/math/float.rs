use glam::Vec3;

pub trait FloatAsExt: Sized {
    /// Returns `Some(f)` if f is far enough from zero (further than `eps`) else returns None
    ///
    /// Returns None for NaN and Some(f) for +/- infty
    fn into_non_zero(self, eps: Self) -> Option<Self>;

    /// Returns `Some(f)` is f is finite else returns None
    ///
    /// Returns None for NaN and +/- infty
    fn into_finite(self) -> Option<Self>;
}

impl FloatAsExt for f32 {
    fn into_non_zero(self, eps: Self) -> Option<f32> {
        (self.abs() > eps).then_some(self)
    }

    fn into_finite(self) -> Option<f32> {
        self.is_finite().then_some(self)
    }
}

pub trait Vec3AsNonZero: Sized {
    fn into_non_zero(self, eps: f32) -> Option<Self>;
}

impl Vec3AsNonZero for Vec3 {
    fn into_non_zero(self, eps: f32) -> Option<Self> {
        self.length_squared().into_non_zero(eps * eps).and(Some(self))
    }
}

/// Hermite easing `3p² - 2p³`, unclamped.
#[inline]
pub fn smoothstep(p: f32) -> f32 {
    p * p * (3.0 - 2.0 * p)
}
