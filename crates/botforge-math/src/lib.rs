#![warn(missing_docs)]

//! Math types for the botforge renderer adapter.
//!
//! Thin wrappers around nalgebra providing the affine transforms needed to
//! turn a tree of local translate/rotate/scale records into world-space
//! matrices, plus tolerance helpers for comparing the results.

use nalgebra::{Matrix4, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Non-uniform scale by `(sx, sy, sz)`.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = sx;
        m[(1, 1)] = sy;
        m[(2, 2)] = sz;
        Self { matrix: m }
    }

    /// Reflection across the YZ plane (negate X).
    pub fn reflection_x() -> Self {
        Self::scale(-1.0, 1.0, 1.0)
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Euler rotation in XYZ order, composed as `Rx * Ry * Rz`.
    pub fn rotation_xyz(x: f64, y: f64, z: f64) -> Self {
        Self::rotation_x(x)
            .then(&Self::rotation_y(y))
            .then(&Self::rotation_z(z))
    }

    /// Translate-rotate-scale composition `T * R * S`.
    ///
    /// This is the local matrix of a scene node: scale first, then rotate,
    /// then translate into the parent frame.
    pub fn from_trs(translation: [f64; 3], rotation: [f64; 3], scale: [f64; 3]) -> Self {
        Self::translation(translation[0], translation[1], translation[2])
            .then(&Self::rotation_xyz(rotation[0], rotation[1], rotation[2]))
            .then(&Self::scale(scale[0], scale[1], scale[2]))
    }

    /// Compose: `self` then `other` (self * other).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Translation column of the matrix (where the local origin lands).
    pub fn origin(&self) -> Point3 {
        Point3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// Determinant of the linear part; negative for mirrored frames.
    pub fn determinant(&self) -> f64 {
        self.matrix.fixed_view::<3, 3>(0, 0).clone_owned().determinant()
    }

    /// Whether every matrix entry is finite.
    pub fn is_finite(&self) -> bool {
        self.matrix.iter().all(|v| v.is_finite())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in scene units.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-9 scene units).
    pub const DEFAULT: Self = Self { linear: 1e-9 };

    /// Check if two transforms agree entry by entry.
    pub fn transforms_equal(&self, a: &Transform, b: &Transform) -> bool {
        a.matrix
            .iter()
            .zip(b.matrix.iter())
            .all(|(x, y)| (x - y).abs() < self.linear)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        let result = t.apply_point(&p);
        assert!((result - p).norm() < 1e-12);
    }

    #[test]
    fn test_translation() {
        let t = Transform::translation(10.0, 20.0, 30.0);
        let p = Point3::new(1.0, 2.0, 3.0);
        let result = t.apply_point(&p);
        assert_relative_eq!(result.x, 11.0);
        assert_relative_eq!(result.y, 22.0);
        assert_relative_eq!(result.z, 33.0);
    }

    #[test]
    fn test_rotation_z_90() {
        let t = Transform::rotation_z(PI / 2.0);
        let p = Point3::new(1.0, 0.0, 0.0);
        let result = t.apply_point(&p);
        assert!(result.x.abs() < 1e-12);
        assert_relative_eq!(result.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_trs_applies_scale_first() {
        // scale (2,1,1), rotate 90° about Z, then move up by 1:
        // (1,0,0) -> (2,0,0) -> (0,2,0) -> (0,3,0)
        let t = Transform::from_trs([0.0, 1.0, 0.0], [0.0, 0.0, PI / 2.0], [2.0, 1.0, 1.0]);
        let result = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(result.x.abs() < 1e-12);
        assert_relative_eq!(result.y, 3.0, epsilon = 1e-12);
        assert_relative_eq!(t.origin().y, 1.0);
    }

    #[test]
    fn test_compose() {
        // then() is self * other, so t2.then(&t1) applies t1 first:
        // (0,0,0) translated to (1,0,0), then scaled to (2,0,0).
        let t1 = Transform::translation(1.0, 0.0, 0.0);
        let t2 = Transform::scale(2.0, 2.0, 2.0);
        let result = t2.then(&t1).apply_point(&Point3::origin());
        assert_relative_eq!(result.x, 2.0);
    }

    #[test]
    fn test_reflection_conjugates_rotation() {
        // M * R(a, b, c) * M == R(a, -b, -c) for the X reflection M.
        let m = Transform::reflection_x();
        let r = Transform::rotation_xyz(0.3, 0.7, -1.1);
        let conj = m.then(&r).then(&m);
        let expected = Transform::rotation_xyz(0.3, -0.7, 1.1);
        assert!(Tolerance::DEFAULT.transforms_equal(&conj, &expected));
        assert!(m.determinant() < 0.0);
        assert_relative_eq!(conj.determinant(), 1.0, epsilon = 1e-12);
    }
}
