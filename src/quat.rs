mod ops;

use std::fmt;

use crate::{vec3, vec4, Matrix3, Number, One, Real, Vector3, Vector4, Zero};

/// A quaternion with [`f32`] components.
pub type Quaternionf = Quaternion<f32>;
/// A quaternion with [`f64`] components.
pub type Quaterniond = Quaternion<f64>;

/// A quaternion consisting of 3 imaginary numbers and a real number.
///
/// Unit-length quaternions ("*versors*") are commonly used to represent rotations in 3D space.
///
/// The components are stored like a 4-dimensional vector in `x`, `y`, `z`, `w` order, where `w`
/// is the real part. Note that [`Quaternion::new`] takes its arguments in `w`, `x`, `y`, `z`
/// order instead, matching the usual mathematical notation `w + xi + yj + zk`.
///
/// ```
/// # use embedded_math::*;
/// let q = Quaternion::new(1, 2, 3, 4);
/// assert_eq!(q.w(), 1);
/// assert_eq!(q.x(), 2);
/// assert_eq!(q.coeffs(), vec4(2, 3, 4, 1));
/// ```
///
/// Multiplying two quaternions composes their rotations (`a * b` applies `b` first), and
/// multiplying a quaternion with a [`Vector3`] rotates the vector.
#[derive(Clone, Copy, Hash, PartialEq, Default)]
pub struct Quaternion<T> {
    coeffs: Vector4<T>,
}

impl<T: Zero + One> Quaternion<T> {
    /// The multiplicative identity.
    ///
    /// This is a unit quaternion that will not change a vector it is multiplied with.
    pub const IDENTITY: Self = Self {
        coeffs: vec4(T::ZERO, T::ZERO, T::ZERO, T::ONE),
    };
}

impl<T> Quaternion<T> {
    /// Creates a quaternion from its real part `w` and its imaginary parts `x`, `y` and `z`.
    #[inline]
    pub const fn new(w: T, x: T, y: T, z: T) -> Self {
        Self {
            coeffs: vec4(x, y, z, w),
        }
    }

    /// Creates a quaternion from a 4-dimensional [`Vector`](crate::Vector) in storage order
    /// (`x`, `y`, `z`, `w`).
    #[inline]
    pub const fn from_coeffs(coeffs: Vector4<T>) -> Self {
        Self { coeffs }
    }
}

impl<T: Copy> Quaternion<T> {
    /// Returns the coefficients in storage order (`x`, `y`, `z`, `w`).
    #[inline]
    pub fn coeffs(&self) -> Vector4<T> {
        self.coeffs
    }

    /// Returns the imaginary (vector) part.
    #[inline]
    pub fn vec(&self) -> Vector3<T> {
        self.coeffs.head::<3>()
    }

    #[inline]
    pub fn x(&self) -> T {
        self.coeffs.x()
    }

    #[inline]
    pub fn y(&self) -> T {
        self.coeffs.y()
    }

    #[inline]
    pub fn z(&self) -> T {
        self.coeffs.z()
    }

    /// Returns the real part.
    #[inline]
    pub fn w(&self) -> T {
        self.coeffs.w()
    }
}

impl<T> Quaternion<T> {
    #[inline]
    pub fn x_mut(&mut self) -> &mut T {
        self.coeffs.x_mut()
    }

    #[inline]
    pub fn y_mut(&mut self) -> &mut T {
        self.coeffs.y_mut()
    }

    #[inline]
    pub fn z_mut(&mut self) -> &mut T {
        self.coeffs.z_mut()
    }

    #[inline]
    pub fn w_mut(&mut self) -> &mut T {
        self.coeffs.w_mut()
    }
}

impl<T: Zero + One + Copy> Quaternion<T> {
    /// Returns [`Quaternion::IDENTITY`].
    #[inline]
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Overwrites `self` with [`Quaternion::IDENTITY`].
    pub fn set_identity(&mut self) {
        *self = Self::IDENTITY;
    }
}

impl<T: Number> Quaternion<T> {
    /// Returns the conjugate of this quaternion (the imaginary parts negated).
    ///
    /// For unit quaternions, this is the inverse rotation.
    pub fn conjugate(&self) -> Self {
        Self::new(self.w(), -self.x(), -self.y(), -self.z())
    }

    /// Returns the 4-dimensional dot product of `self` and `other`.
    pub fn dot(&self, other: &Self) -> T {
        self.coeffs.dot(other.coeffs)
    }

    /// Returns the squared norm of this quaternion.
    ///
    /// If the norm is not equal to one, multiplying a vector with this quaternion will scale the
    /// vector in addition to rotating it.
    pub fn norm_squared(&self) -> T {
        self.coeffs.norm_squared()
    }

    /// Builds the 3x3 rotation matrix equivalent to this quaternion.
    ///
    /// The quaternion is assumed to have unit norm; it is not normalized first.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let rot = Quaterniond::from_rotation_z(std::f64::consts::FRAC_PI_2).to_rotation_matrix();
    /// assert!((rot * vec3(1.0, 0.0, 0.0)).is_approx_eps(&vec3(0.0, 1.0, 0.0), 1e-12));
    /// ```
    pub fn to_rotation_matrix(&self) -> Matrix3<T> {
        let (x, y, z, w) = (self.x(), self.y(), self.z(), self.w());
        let one = T::ONE;
        let two = T::ONE + T::ONE;
        Matrix3::from_rows([
            [
                one - two * (y * y + z * z),
                two * (x * y - w * z),
                two * (x * z + w * y),
            ],
            [
                two * (x * y + w * z),
                one - two * (x * x + z * z),
                two * (y * z - w * x),
            ],
            [
                two * (x * z - w * y),
                two * (y * z + w * x),
                one - two * (x * x + y * y),
            ],
        ])
    }
}

impl<T: Real> Quaternion<T> {
    /// Creates a quaternion rotating by `radians` around the X axis.
    pub fn from_rotation_x(radians: T) -> Self {
        let (sin, cos) = (radians * T::HALF).sin_cos();
        Self::new(cos, sin, T::ZERO, T::ZERO)
    }

    /// Creates a quaternion rotating by `radians` around the Y axis.
    pub fn from_rotation_y(radians: T) -> Self {
        let (sin, cos) = (radians * T::HALF).sin_cos();
        Self::new(cos, T::ZERO, sin, T::ZERO)
    }

    /// Creates a quaternion rotating by `radians` around the Z axis.
    pub fn from_rotation_z(radians: T) -> Self {
        let (sin, cos) = (radians * T::HALF).sin_cos();
        Self::new(cos, T::ZERO, T::ZERO, sin)
    }

    /// Creates a quaternion rotating by `angle` radians around `axis`.
    ///
    /// `axis` has to be normalized, otherwise the result is not a unit quaternion.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let q = Quaterniond::from_angle_axis(0.5, vec3(0.0, 1.0, 0.0));
    /// assert!(q.is_approx(&Quaternion::from_rotation_y(0.5)));
    /// ```
    pub fn from_angle_axis(angle: T, axis: Vector3<T>) -> Self {
        let (sin, cos) = (angle * T::HALF).sin_cos();
        let v = axis * sin;
        Self::new(cos, v.x(), v.y(), v.z())
    }

    /// Creates a quaternion from roll (X), pitch (Y) and yaw (Z) angles in radians.
    ///
    /// The rotations are applied in X, Y, Z order, so this computes
    /// `from_rotation_z(yaw) * from_rotation_y(pitch) * from_rotation_x(roll)`. This is the
    /// inverse of [`Quaternion::to_euler_angles`].
    #[doc(alias = "euler")]
    pub fn from_euler_angles(roll: T, pitch: T, yaw: T) -> Self {
        Self::from_rotation_z(yaw) * Self::from_rotation_y(pitch) * Self::from_rotation_x(roll)
    }

    /// Converts a 3x3 rotation matrix to a unit quaternion.
    ///
    /// The branch is picked by the trace of the matrix and, if that is not positive, by its
    /// largest diagonal element, to avoid dividing by small numbers. The result is normalized.
    pub fn from_rotation_matrix(m: &Matrix3<T>) -> Self {
        let two = T::ONE + T::ONE;
        let four = two * two;
        let m = |row: usize, col: usize| m[(row, col)];
        let trace = m(0, 0) + m(1, 1) + m(2, 2);

        let q = if trace > T::ZERO {
            let s = two * (trace + T::ONE).sqrt();
            Self::new(
                s / four,
                (m(2, 1) - m(1, 2)) / s,
                (m(0, 2) - m(2, 0)) / s,
                (m(1, 0) - m(0, 1)) / s,
            )
        } else if m(0, 0) > m(1, 1) && m(0, 0) > m(2, 2) {
            let s = two * (T::ONE + m(0, 0) - m(1, 1) - m(2, 2)).sqrt();
            Self::new(
                (m(2, 1) - m(1, 2)) / s,
                s / four,
                (m(0, 1) + m(1, 0)) / s,
                (m(0, 2) + m(2, 0)) / s,
            )
        } else if m(1, 1) > m(2, 2) {
            let s = two * (T::ONE + m(1, 1) - m(0, 0) - m(2, 2)).sqrt();
            Self::new(
                (m(0, 2) - m(2, 0)) / s,
                (m(0, 1) + m(1, 0)) / s,
                s / four,
                (m(1, 2) + m(2, 1)) / s,
            )
        } else {
            let s = two * (T::ONE + m(2, 2) - m(0, 0) - m(1, 1)).sqrt();
            Self::new(
                (m(1, 0) - m(0, 1)) / s,
                (m(0, 2) + m(2, 0)) / s,
                (m(1, 2) + m(2, 1)) / s,
                s / four,
            )
        };
        q.normalized()
    }

    /// Returns the norm (length) of this quaternion.
    #[doc(alias = "length", alias = "magnitude")]
    pub fn norm(&self) -> T {
        self.coeffs.norm()
    }

    /// Returns a copy of this quaternion scaled to unit norm.
    ///
    /// Like [`Matrix::normalized`](crate::Matrix::normalized), this is not guarded against a
    /// zero quaternion.
    pub fn normalized(self) -> Self {
        Self::from_coeffs(self.coeffs.normalized())
    }

    /// Scales this quaternion to unit norm in place.
    pub fn normalize(&mut self) {
        self.coeffs.normalize();
    }

    /// Returns the normalized conjugate of this quaternion.
    ///
    /// For unit quaternions, this is the multiplicative inverse (and thus the inverse rotation).
    /// For other quaternions it is not: the true inverse is the conjugate divided by the
    /// *squared* norm, while this divides by the norm.
    pub fn inverse(&self) -> Self {
        self.conjugate().normalized()
    }

    /// Returns whether the coefficients of `self` and `other` are within a Euclidean distance of
    /// [`Real::EPSILON`].
    ///
    /// `q` and `-q` represent the same rotation, but are not considered approximately equal.
    pub fn is_approx(&self, other: &Self) -> bool {
        self.coeffs.is_approx(&other.coeffs)
    }

    /// Returns whether the coefficients of `self` and `other` are within a Euclidean distance of
    /// `epsilon`.
    pub fn is_approx_eps(&self, other: &Self, epsilon: T) -> bool {
        self.coeffs.is_approx_eps(&other.coeffs, epsilon)
    }

    /// Converts this unit quaternion to roll (X), pitch (Y) and yaw (Z) angles in radians.
    ///
    /// The returned vector holds `(roll, pitch, yaw)`, such that
    /// [`Quaternion::from_euler_angles`] recreates the rotation.
    ///
    /// When the pitch comes within [`Real::EPSILON`] of ±90°, roll and yaw rotate around the
    /// same axis (gimbal lock). In that case the whole rotation around that axis is reported as
    /// yaw and roll is 0.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let q = Quaterniond::from_euler_angles(0.1, 0.2, 0.3);
    /// assert!(q.to_euler_angles().is_approx_eps(&vec3(0.1, 0.2, 0.3), 1e-12));
    /// ```
    pub fn to_euler_angles(&self) -> Vector3<T> {
        let (x, y, z, w) = (self.x(), self.y(), self.z(), self.w());
        let one = T::ONE;
        let two = T::ONE + T::ONE;
        let half_pi = T::PI * T::HALF;
        let threshold = T::HALF - T::EPSILON;

        let test = w * y - z * x;
        if test > threshold {
            // North pole.
            vec3(T::ZERO, half_pi, -two * x.atan2(w))
        } else if test < -threshold {
            // South pole.
            vec3(T::ZERO, -half_pi, two * x.atan2(w))
        } else {
            let roll = (two * (w * x + y * z)).atan2(one - two * (x * x + y * y));
            let pitch = (two * test).clamp(-one, one).asin();
            let yaw = (two * (w * z + x * y)).atan2(one - two * (y * y + z * z));
            vec3(roll, pitch, yaw)
        }
    }
}

impl<T: Real> From<Matrix3<T>> for Quaternion<T> {
    fn from(m: Matrix3<T>) -> Self {
        Self::from_rotation_matrix(&m)
    }
}

impl<T: fmt::Debug> fmt::Debug for Quaternion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z, w] = &self.coeffs.0[0];
        f.debug_struct("Quaternion")
            .field("w", w)
            .field("x", x)
            .field("y", y)
            .field("z", z)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use crate::{assert_approx_eq, Matrix3d, Quaternionf, Vector4d};

    use super::*;

    #[test]
    fn constructor_order() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q.w(), 1.0);
        assert_eq!(q.x(), 2.0);
        assert_eq!(q.y(), 3.0);
        assert_eq!(q.z(), 4.0);
        assert_eq!(q.vec(), vec3(2.0, 3.0, 4.0));
        assert_eq!(q[0], 2.0);
        assert_eq!(q[3], 1.0);
        assert_eq!(Quaternion::from_coeffs(vec4(2.0, 3.0, 4.0, 1.0)), q);

        let mut q = Quaterniond::default();
        assert_eq!(q.coeffs(), Vector4d::ZERO);
        *q.w_mut() = 5.0;
        *q.y_mut() = -1.0;
        assert_eq!(q, Quaternion::new(5.0, 0.0, -1.0, 0.0));
        q.set_identity();
        assert_eq!(q, Quaternion::IDENTITY);
    }

    #[test]
    fn debug() {
        assert_eq!(
            format!("{:?}", Quaternion::new(1, 2, 3, 4)),
            "Quaternion { w: 1, x: 2, y: 3, z: 4 }"
        );
    }

    #[test]
    fn conjugate_and_inverse() {
        let q = Quaternionf::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q.conjugate(), Quaternion::new(1.0, -2.0, -3.0, -4.0));

        let norm = q.norm();
        let expected = Quaternion::new(1.0 / norm, -2.0 / norm, -3.0 / norm, -4.0 / norm);
        assert_approx_eq!(q.inverse(), expected).abs(1e-6);

        let unit = Quaterniond::from_euler_angles(0.3, -0.2, 1.1);
        assert!((unit * unit.inverse()).is_approx_eps(&Quaternion::IDENTITY, 1e-12));
    }

    #[test]
    fn norm() {
        let mut q = Quaterniond::new(0.0, 3.0, 0.0, 4.0);
        assert_eq!(q.norm_squared(), 25.0);
        assert_eq!(q.norm(), 5.0);
        q.normalize();
        assert_eq!(q, Quaternion::new(0.0, 0.6, 0.0, 0.8));
        assert_eq!(q.dot(&q), 1.0);
    }

    #[test]
    fn identity_rotation_matrix() {
        assert_eq!(
            Quaterniond::IDENTITY.to_rotation_matrix(),
            Matrix3d::identity()
        );
        assert_eq!(
            Quaterniond::from_rotation_matrix(&Matrix3d::identity()),
            Quaterniond::identity()
        );
    }

    #[test]
    fn rotation_matrix_round_trip() {
        // Each of these takes a different branch of `from_rotation_matrix`.
        let rotations = [
            Quaterniond::from_euler_angles(0.3, 0.2, 0.1),
            Quaterniond::from_rotation_x(PI),
            Quaterniond::from_rotation_y(PI),
            Quaterniond::from_rotation_z(PI),
            Quaterniond::from_angle_axis(3.0, vec3(1.0, 1.0, 1.0).normalized()),
        ];
        for q in rotations {
            let back = Quaternion::from(q.to_rotation_matrix());
            // `q` and `-q` are the same rotation.
            let same = back.is_approx_eps(&q, 1e-9) || back.is_approx_eps(&-q, 1e-9);
            assert!(same, "{q:?} came back as {back:?}");
        }
    }

    #[test]
    fn euler_round_trip() {
        let q = Quaterniond::from_euler_angles(-0.4, 0.7, 2.5);
        assert_approx_eq!(q.to_euler_angles(), vec3(-0.4, 0.7, 2.5)).abs(1e-12);
    }

    #[test]
    fn euler_gimbal_lock() {
        let north = Quaterniond::from_euler_angles(0.0, FRAC_PI_2, 0.6).to_euler_angles();
        assert_approx_eq!(north, vec3(0.0, FRAC_PI_2, 0.6)).abs(1e-9);

        let south = Quaterniond::from_euler_angles(0.0, -FRAC_PI_2, 0.6).to_euler_angles();
        assert_approx_eq!(south, vec3(0.0, -FRAC_PI_2, 0.6)).abs(1e-9);
    }

    #[test]
    fn euler_matches_matrix_extraction() {
        let q = Quaterniond::from_euler_angles(0.25, -0.5, 1.0);
        let angles = q.to_rotation_matrix().euler_angles(2, 1, 0);
        // The matrix extraction reports yaw, pitch, roll.
        assert_approx_eq!(angles, vec3(1.0, -0.5, 0.25)).abs(1e-12);
    }
}
