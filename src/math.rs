//! Vector and matrix helpers
//!
//! Addition, subtraction, scaling, dot and cross products come straight from
//! glam's `DVec3` operators. This module adds the pieces glam leaves to the
//! caller: tolerance comparisons, fallible normalization, row-major matrix
//! construction and the axis-angle rotation matrix.

use glam::{DMat3, DVec3};

use crate::consts::EPSILON;
use crate::error::{PhysicsError, Result};

pub const X_AXIS: DVec3 = DVec3::X;
pub const Y_AXIS: DVec3 = DVec3::Y;
pub const Z_AXIS: DVec3 = DVec3::Z;

/// True if `a` and `b` are within [`EPSILON`] of each other
#[inline]
pub fn almost_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

#[inline]
pub fn is_near_zero(x: f64) -> bool {
    x.abs() < EPSILON
}

/// Scale `v` to unit length
///
/// Fails with [`PhysicsError::DegenerateVector`] when `|v| < EPSILON`, where
/// the direction is numerically meaningless.
pub fn normalize(v: DVec3) -> Result<DVec3> {
    let len = v.length();
    if len < EPSILON {
        return Err(PhysicsError::degenerate(v));
    }
    Ok(v / len)
}

#[inline]
pub fn distance_squared(a: DVec3, b: DVec3) -> f64 {
    (b - a).length_squared()
}

/// Matrix-vector product `m · v`
#[inline]
pub fn apply_matrix(v: DVec3, m: &DMat3) -> DVec3 {
    *m * v
}

/// Transpose of `m`; for a rotation this is also its inverse
#[inline]
pub fn transpose(m: &DMat3) -> DMat3 {
    m.transpose()
}

/// Build a matrix from rows, the way the formulas are written on paper
///
/// glam stores matrices column-major, so the rows become the columns of the
/// transpose.
pub fn from_rows(rows: [[f64; 3]; 3]) -> DMat3 {
    DMat3::from_cols_array_2d(&rows).transpose()
}

#[inline]
pub fn determinant(m: &DMat3) -> f64 {
    m.determinant()
}

/// Rodrigues rotation about a unit `axis`, given the angle as `(cos, sin)`
///
/// `R = cos·I + sin·[a]× + (1 - cos)·(a ⊗ a)`
pub fn axis_angle(axis: DVec3, cos: f64, sin: f64) -> DMat3 {
    let DVec3 { x, y, z } = axis;
    let t = 1.0 - cos;

    from_rows([
        [cos + x * x * t, x * y * t - z * sin, x * z * t + y * sin],
        [y * x * t + z * sin, cos + y * y * t, y * z * t - x * sin],
        [z * x * t - y * sin, z * y * t + x * sin, cos + z * z * t],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rejects_zero() {
        assert!(normalize(DVec3::ZERO).is_err());
        assert!(normalize(DVec3::splat(EPSILON / 10.0)).is_err());

        let n = normalize(DVec3::new(3.0, 0.0, 4.0)).unwrap();
        assert!(almost_eq(n.length(), 1.0));
        assert!(almost_eq(n.x, 0.6));
        assert!(almost_eq(n.z, 0.8));
    }

    #[test]
    fn test_from_rows_is_row_major() {
        let m = from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let v = apply_matrix(DVec3::new(1.0, 0.0, 0.0), &m);
        // First column of the written matrix
        assert_eq!(v, DVec3::new(1.0, 4.0, 7.0));

        let v = apply_matrix(DVec3::new(1.0, 1.0, 1.0), &m);
        assert_eq!(v, DVec3::new(6.0, 15.0, 24.0));
    }

    #[test]
    fn test_transpose_swaps_rows_and_columns() {
        let m = from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let t = transpose(&m);
        assert_eq!(t, from_rows([[1.0, 4.0, 7.0], [2.0, 5.0, 8.0], [3.0, 6.0, 9.0]]));
    }

    #[test]
    fn test_determinant_of_known_rotations() {
        assert!(almost_eq(determinant(&DMat3::IDENTITY), 1.0));
        let quarter_turn_x = from_rows([[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]]);
        assert!(almost_eq(determinant(&quarter_turn_x), 1.0));
        let c = (std::f64::consts::PI / 6.0).cos();
        let tilted = from_rows([[1.0, 0.0, 0.0], [0.0, c, -0.5], [0.0, 0.5, c]]);
        assert!(almost_eq(determinant(&tilted), 1.0));
    }

    #[test]
    fn test_axis_angle_quarter_turn() {
        // 90° about Z takes X to Y
        let r = axis_angle(Z_AXIS, 0.0, 1.0);
        let v = apply_matrix(X_AXIS, &r);
        assert!(almost_eq(v.x, 0.0));
        assert!(almost_eq(v.y, 1.0));
        assert!(almost_eq(v.z, 0.0));
    }

    #[test]
    fn test_axis_angle_zero_angle_is_identity() {
        let r = axis_angle(Y_AXIS, 1.0, 0.0);
        assert_eq!(r, DMat3::IDENTITY);
    }
}
