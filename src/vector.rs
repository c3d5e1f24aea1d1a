//! Vector-shaped operations on [`Matrix`].

use crate::{
    matrix::{Holds, Shape},
    Matrix, Number, One, Zero,
};

/// An `N`-element column vector storing elements of type `T`.
///
/// This is just a single-column [`Matrix`]. Operations that only make sense for vectors (named
/// component access, unit vectors, cross products) are also available on row vectors
/// (`Matrix<T, 1, N>`) unless noted otherwise.
pub type Vector<T, const N: usize> = Matrix<T, N, 1>;
/// A 2-dimensional vector.
pub type Vector2<T> = Vector<T, 2>;
/// A 2-dimensional vector with [`f32`] elements.
pub type Vector2f = Vector2<f32>;
/// A 2-dimensional vector with [`f64`] elements.
pub type Vector2d = Vector2<f64>;
/// A 3-dimensional vector.
pub type Vector3<T> = Vector<T, 3>;
/// A 3-dimensional vector with [`f32`] elements.
pub type Vector3f = Vector3<f32>;
/// A 3-dimensional vector with [`f64`] elements.
pub type Vector3d = Vector3<f64>;
/// A 4-dimensional vector.
pub type Vector4<T> = Vector<T, 4>;
/// A 4-dimensional vector with [`f32`] elements.
pub type Vector4f = Vector4<f32>;
/// A 4-dimensional vector with [`f64`] elements.
pub type Vector4d = Vector4<f64>;

/// Creates a 2-dimensional column vector.
pub const fn vec2<T>(x: T, y: T) -> Vector2<T> {
    Matrix::from_columns([[x, y]])
}

/// Creates a 3-dimensional column vector.
pub const fn vec3<T>(x: T, y: T, z: T) -> Vector3<T> {
    Matrix::from_columns([[x, y, z]])
}

/// Creates a 4-dimensional column vector.
pub const fn vec4<T>(x: T, y: T, z: T, w: T) -> Vector4<T> {
    Matrix::from_columns([[x, y, z, w]])
}

macro_rules! components {
    ($($index:literal => $get:ident, $get_mut:ident;)+) => {
        /// Named component access.
        ///
        /// These methods only compile for row or column vectors that are long enough to have the
        /// requested component.
        impl<T, const R: usize, const C: usize> Matrix<T, R, C> {
            $(
                #[doc = concat!("Returns component ", stringify!($index), " of this vector.")]
                #[inline]
                pub fn $get(&self) -> T
                where
                    T: Copy,
                {
                    let () = Shape::<R, C>::IS_VECTOR;
                    let () = Holds::<{ $index + 1 }, R, C>::IN_BUFFER;
                    self.as_slice()[$index]
                }

                #[doc = concat!("Returns a mutable reference to component ", stringify!($index), " of this vector.")]
                #[inline]
                pub fn $get_mut(&mut self) -> &mut T {
                    let () = Shape::<R, C>::IS_VECTOR;
                    let () = Holds::<{ $index + 1 }, R, C>::IN_BUFFER;
                    &mut self.as_mut_slice()[$index]
                }
            )+
        }
    };
}

components! {
    0 => x, x_mut;
    1 => y, y_mut;
    2 => z, z_mut;
    3 => w, w_mut;
}

impl<T: Zero + One + Copy, const R: usize, const C: usize> Matrix<T, R, C> {
    fn unit(axis: usize) -> Self {
        let () = Shape::<R, C>::IS_VECTOR;
        let () = Holds::<3, R, C>::IN_BUFFER;
        let mut this = Self::ZERO;
        this.as_mut_slice()[axis] = T::ONE;
        this
    }

    /// Returns a unit vector pointing in the X direction.
    ///
    /// Only compiles for vectors with at least 3 components.
    ///
    /// ```
    /// # use embedded_math::*;
    /// assert_eq!(Vector3::<i32>::unit_x(), vec3(1, 0, 0));
    /// assert_eq!(Vector4::<i32>::unit_x(), vec4(1, 0, 0, 0));
    /// ```
    pub fn unit_x() -> Self {
        Self::unit(0)
    }

    /// Returns a unit vector pointing in the Y direction.
    ///
    /// Only compiles for vectors with at least 3 components.
    pub fn unit_y() -> Self {
        Self::unit(1)
    }

    /// Returns a unit vector pointing in the Z direction.
    ///
    /// Only compiles for vectors with at least 3 components.
    pub fn unit_z() -> Self {
        Self::unit(2)
    }
}

impl<T: Zero + Copy, const N: usize> Vector<T, N> {
    /// Returns the square matrix that has this vector on its diagonal.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let m = vec2(2.0, 3.0).as_diagonal() * vec2(1.0, 1.0);
    /// assert_eq!(m, vec2(2.0, 3.0));
    /// ```
    pub fn as_diagonal(&self) -> Matrix<T, N, N> {
        Matrix::from_diagonal(*self)
    }
}

impl<T: Number> Vector2<T> {
    /// Computes the 2D cross product (the "perp dot product") of `self` and `other`.
    ///
    /// This is the Z component of the 3D cross product of both vectors extended with `z = 0`. Its
    /// sign tells whether `other` lies counter-clockwise (positive) or clockwise (negative) of
    /// `self`.
    ///
    /// ```
    /// # use embedded_math::*;
    /// assert_eq!(vec2(1, 0).cross(vec2(0, 1)), 1);
    /// assert_eq!(vec2(0, 1).cross(vec2(1, 0)), -1);
    /// ```
    pub fn cross(self, other: Self) -> T {
        self.x() * other.y() - self.y() * other.x()
    }
}

impl<T: Number> Vector3<T> {
    /// Computes the cross product of `self` and `other`.
    ///
    /// ```
    /// # use embedded_math::*;
    /// assert_eq!(vec3(1, 2, 3).cross(vec3(4, 5, 6)), vec3(-3, 6, -3));
    /// ```
    pub fn cross(self, other: Self) -> Self {
        let [a1, a2, a3] = self.0[0];
        let [b1, b2, b3] = other.0[0];
        vec3(a2 * b3 - a3 * b2, a3 * b1 - a1 * b3, a1 * b2 - a2 * b1)
    }
}
