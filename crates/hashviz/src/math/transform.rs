use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

use super::{float::FloatAsExt, lanes::Float4x3};
use crate::utils::log_once::warn_once;

/// Represents a placement as translation + rotation + scale
///
/// `rotation` holds Euler angles in degrees, applied around Z, then X, then Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceTrs {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for SpaceTrs {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl SpaceTrs {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn from_scale(scale: f32) -> Self {
        Self {
            scale: Vec3::splat(scale),
            ..Self::IDENTITY
        }
    }

    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.rotation.y.to_radians(),
            self.rotation.x.to_radians(),
            self.rotation.z.to_radians(),
        )
    }

    pub fn into_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.translation)
    }

    pub fn domain_transform(&self) -> DomainTransform {
        DomainTransform::from_matrix(self.into_matrix())
    }
}

/// An affine map stored as the top three rows of a 4x4 matrix:
/// `cols[0..3]` is the linear part and `cols[3]` the translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine3x4 {
    pub cols: [Vec3; 4],
}

impl Affine3x4 {
    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z, Vec3::ZERO],
    };

    pub fn from_mat4(m: Mat4) -> Self {
        Self {
            cols: [
                m.x_axis.truncate(),
                m.y_axis.truncate(),
                m.z_axis.truncate(),
                m.w_axis.truncate(),
            ],
        }
    }

    pub fn from_mat3(m: Mat3) -> Self {
        Self {
            cols: [m.x_axis, m.y_axis, m.z_axis, Vec3::ZERO],
        }
    }

    pub fn linear(&self) -> Mat3 {
        Mat3::from_cols(self.cols[0], self.cols[1], self.cols[2])
    }

    // The lane versions below evaluate the exact same expressions per lane.

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let [c0, c1, c2, c3] = self.cols;
        Vec3::new(
            c0.x * p.x + c1.x * p.y + c2.x * p.z + c3.x,
            c0.y * p.x + c1.y * p.y + c2.y * p.z + c3.y,
            c0.z * p.x + c1.z * p.y + c2.z * p.z + c3.z,
        )
    }

    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let [c0, c1, c2, _] = self.cols;
        Vec3::new(
            c0.x * v.x + c1.x * v.y + c2.x * v.z,
            c0.y * v.x + c1.y * v.y + c2.y * v.z,
            c0.z * v.x + c1.z * v.y + c2.z * v.z,
        )
    }

    pub fn transform_points4(&self, p: &Float4x3) -> Float4x3 {
        let [c0, c1, c2, c3] = self.cols;
        Float4x3 {
            x: c0.x * p.x + c1.x * p.y + c2.x * p.z + c3.x,
            y: c0.y * p.x + c1.y * p.y + c2.y * p.z + c3.y,
            z: c0.z * p.x + c1.z * p.y + c2.z * p.z + c3.z,
        }
    }

    pub fn transform_vectors4(&self, v: &Float4x3) -> Float4x3 {
        let [c0, c1, c2, _] = self.cols;
        Float4x3 {
            x: c0.x * v.x + c1.x * v.y + c2.x * v.z,
            y: c0.y * v.x + c1.y * v.y + c2.y * v.z,
            z: c0.z * v.x + c1.z * v.y + c2.z * v.z,
        }
    }
}

/// The position transform of a domain and its inverse-transpose, used for normals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainTransform {
    pub positions: Affine3x4,
    pub normals: Affine3x4,
}

impl Default for DomainTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl DomainTransform {
    pub const IDENTITY: Self = Self {
        positions: Affine3x4::IDENTITY,
        normals: Affine3x4::IDENTITY,
    };

    pub fn from_matrix(m: Mat4) -> Self {
        let positions = Affine3x4::from_mat4(m);
        let linear = positions.linear();

        // Cofactor matrix: the inverse-transpose scaled by the determinant.
        let [a, b, c] = [linear.x_axis, linear.y_axis, linear.z_axis];
        let cofactor = Mat3::from_cols(b.cross(c), c.cross(a), a.cross(b));

        let det = linear.determinant();
        let normals = match det.recip().into_finite() {
            Some(inv_det) => cofactor * inv_det,
            // Tiny but nonzero: keep the orientation, normals get normalized afterwards.
            None if det != 0.0 => cofactor * det.signum(),
            None => {
                warn_once!("domain transform is singular, normals use its cofactor matrix");
                cofactor
            }
        };
        let normals = Affine3x4::from_mat3(normals);

        Self { positions, normals }
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.positions.transform_point(p)
    }

    /// Transforms a normal and renormalizes it. The zero vector stays zero.
    pub fn transform_normal(&self, n: Vec3) -> Vec3 {
        self.normals.transform_vector(n).normalize_or_zero()
    }

    pub fn transform_points4(&self, p: &Float4x3) -> Float4x3 {
        self.positions.transform_points4(p)
    }

    pub fn transform_normals4(&self, n: &Float4x3) -> Float4x3 {
        let t = self.normals.transform_vectors4(n);
        Float4x3::from_lanes(t.lanes().map(Vec3::normalize_or_zero))
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::{DomainTransform, SpaceTrs};
    use crate::math::lanes::Float4x3;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-5
    }

    #[test]
    fn identity() {
        let t = SpaceTrs::IDENTITY.domain_transform();
        let p = Vec3::new(0.3, -2.0, 5.0);
        assert_eq!(t.transform_point(p), p);
        assert_eq!(t.transform_normal(Vec3::Y), Vec3::Y);
    }

    #[test]
    fn matches_glam() {
        let trs = SpaceTrs {
            translation: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(30.0, 45.0, 60.0),
            scale: Vec3::new(2.0, 0.5, 1.5),
        };
        let m = trs.into_matrix();
        let t = DomainTransform::from_matrix(m);
        let p = Vec3::new(0.25, -0.5, 0.75);
        assert!(close(t.transform_point(p), m.transform_point3(p)));
    }

    #[test]
    fn euler_order_is_z_then_x_then_y() {
        let trs = SpaceTrs {
            rotation: Vec3::new(90.0, 90.0, 0.0),
            ..SpaceTrs::IDENTITY
        };
        // X by 90 sends +Y to +Z, then Y by 90 sends +Z to +X.
        let t = trs.domain_transform();
        assert!(close(t.transform_point(Vec3::Y), Vec3::X));
    }

    #[test]
    fn normals_stay_perpendicular_under_non_uniform_scale() {
        let trs = SpaceTrs {
            scale: Vec3::new(4.0, 1.0, 1.0),
            ..SpaceTrs::IDENTITY
        };
        let t = trs.domain_transform();
        let tangent = Vec3::new(1.0, -1.0, 0.0);
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        let n = t.transform_normal(normal);
        let tan = t.positions.transform_vector(tangent);
        assert!(n.dot(tan).abs() < 1e-5);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn singular_scale_keeps_finite_normals() {
        let trs = SpaceTrs {
            scale: Vec3::new(1.0, 0.0, 1.0),
            ..SpaceTrs::IDENTITY
        };
        let t = trs.domain_transform();
        let n = t.transform_normal(Vec3::Y);
        assert!(n.is_finite());
        assert!(close(n, Vec3::Y));
    }

    #[test]
    fn mirrored_small_scales_keep_normal_orientation() {
        for s in [1.0, 0.01, 0.004, 0.001, 1e-4] {
            let m = Mat4::from_scale(Vec3::new(-s, s, s));
            let t = DomainTransform::from_matrix(m);
            let expected = m.inverse().transpose().transform_vector3(Vec3::Y).normalize();
            let n = t.transform_normal(Vec3::Y);
            assert!(close(n, expected), "scale {s}: {n} != {expected}");
            assert!(n.dot(Vec3::Y) > 0.0, "scale {s} flipped the normal");

            let x = t.transform_normal(Vec3::X);
            assert!(close(x, -Vec3::X), "scale {s}: {x}");
        }
    }

    #[test]
    fn lanes_match_scalar() {
        let t = DomainTransform::from_matrix(
            Mat4::from_rotation_y(0.3) * Mat4::from_scale(Vec3::new(1.0, 2.0, 3.0)),
        );
        let points = [
            Vec3::new(0.1, 0.2, 0.3),
            Vec3::new(-1.0, 0.5, 2.0),
            Vec3::ZERO,
            Vec3::new(7.0, -3.0, 0.25),
        ];
        let lanes = Float4x3::from_lanes(points);
        let p4 = t.transform_points4(&lanes).lanes();
        let n4 = t.transform_normals4(&lanes).lanes();
        for k in 0..4 {
            assert_eq!(p4[k], t.transform_point(points[k]));
            assert_eq!(n4[k], t.transform_normal(points[k]));
        }
    }
}
