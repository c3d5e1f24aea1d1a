use std::ops::{Index, Mul, MulAssign, Neg};

use crate::{approx::ApproxEq, Number, Quaternion, Vector3};

/// Coefficient access in storage order (`x`, `y`, `z`, `w`).
impl<T> Index<usize> for Quaternion<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.coeffs[index]
    }
}

/// Hamilton product.
///
/// The product `a * b` represents the rotation `b` followed by `a`.
impl<T: Number> Mul for Quaternion<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let (w1, x1, y1, z1) = (self.w(), self.x(), self.y(), self.z());
        let (w2, x2, y2, z2) = (rhs.w(), rhs.x(), rhs.y(), rhs.z());
        Quaternion::new(
            w1 * w2 - x1 * x2 - y1 * y2 - z1 * z2,
            w1 * x2 + x1 * w2 + y1 * z2 - z1 * y2,
            w1 * y2 - x1 * z2 + y1 * w2 + z1 * x2,
            w1 * z2 + x1 * y2 - y1 * x2 + z1 * w2,
        )
    }
}

impl<T: Number> MulAssign for Quaternion<T> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

/// Rotates a [`Vector3`] by a unit quaternion.
///
/// ```
/// # use embedded_math::*;
/// let q = Quaterniond::from_rotation_x(std::f64::consts::FRAC_PI_2);
/// let v = q * vec3(0.0, 1.0, 0.0);
/// assert!(v.is_approx_eps(&vec3(0.0, 0.0, 1.0), 1e-12));
/// ```
impl<T: Number> Mul<Vector3<T>> for Quaternion<T> {
    type Output = Vector3<T>;

    fn mul(self, rhs: Vector3<T>) -> Self::Output {
        let pure = Quaternion::new(T::ZERO, rhs.x(), rhs.y(), rhs.z());
        (self * pure * self.conjugate()).vec()
    }
}

impl<T: Neg<Output = T>> Neg for Quaternion<T> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Quaternion {
            coeffs: -self.coeffs,
        }
    }
}

impl<T: ApproxEq> ApproxEq for Quaternion<T> {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
        self.coeffs.abs_diff_eq(&other.coeffs, abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &Self, rel_tolerance: Self::Tolerance) -> bool {
        self.coeffs.rel_diff_eq(&other.coeffs, rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &Self, ulps_tolerance: u32) -> bool {
        self.coeffs.ulps_diff_eq(&other.coeffs, ulps_tolerance)
    }
}
