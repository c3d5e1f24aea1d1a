use std::{array, fmt};

use crate::{
    error::SingularMatrixError, lu::PartialPivLu, Number, One, Real, Vector, Vector3, Zero,
};

mod kernels;
mod ops;

/// A 2x2 matrix.
pub type Matrix2<T> = Matrix<T, 2, 2>;
/// A 2x2 matrix with [`f32`] elements.
pub type Matrix2f = Matrix2<f32>;
/// A 2x2 matrix with [`f64`] elements.
pub type Matrix2d = Matrix2<f64>;
/// A 3x3 matrix.
pub type Matrix3<T> = Matrix<T, 3, 3>;
/// A 3x3 matrix with [`f32`] elements.
pub type Matrix3f = Matrix3<f32>;
/// A 3x3 matrix with [`f64`] elements.
pub type Matrix3d = Matrix3<f64>;
/// A 4x4 matrix.
pub type Matrix4<T> = Matrix<T, 4, 4>;
/// A 4x4 matrix with [`f32`] elements.
pub type Matrix4f = Matrix4<f32>;
/// A 4x4 matrix with [`f64`] elements.
pub type Matrix4d = Matrix4<f64>;

/// A column-major matrix with `R` rows and `C` columns, and element type `T`.
///
/// Vectors are matrices too: [`Vector<T, N>`] is an alias for `Matrix<T, N, 1>`, so everything
/// documented here applies to them as well.
///
/// # Layout
///
/// The `R * C` elements are stored in one contiguous, unpadded buffer, column after column. The
/// element at `(row, col)` lives at linear index `col * R + row`. [`Matrix::as_slice`] and
/// [`Matrix::as_ptr`] expose that buffer, and [`bytemuck::Pod`] is implemented when `T` allows
/// it.
///
/// # Construction
///
/// - [`Matrix::ZERO`], [`Matrix::zero`] and the [`Default`] impl create an all-zero matrix.
/// - [`Matrix::splat`] broadcasts one value; [`Matrix::ones`] is a shorthand for `splat(1)`.
/// - [`Matrix::new2`], [`Matrix::new3`] and [`Matrix::new4`] write 2, 3 or 4 elements into the
///   start of the buffer and zero the rest.
/// - [`Matrix::from_rows`] and [`Matrix::from_columns`] take nested arrays.
/// - [`Matrix::from_fn`] invokes a closure with the row and column of each element.
/// - [`Matrix::identity`] and [`Matrix::from_diagonal`] build (possibly non-square) diagonal
///   matrices.
/// - [`Matrix::from_view`] copies the contents of a [`ViewRef`](crate::ViewRef).
///
/// # Element Access
///
/// [`Matrix`] implements [`Index`] and [`IndexMut`] for `(row, col)` tuples and for linear
/// `usize` indices in storage order. Indices are 0-based.
///
/// ```
/// # use embedded_math::*;
/// let mut mat = Matrix::from_rows([
///     [0, 1],
///     [2, 3],
/// ]);
/// mat[(0, 0)] = 4;
/// assert_eq!(mat[(0, 0)], 4);
/// assert_eq!(mat[(0, 1)], 1);
///
/// // Column-major: linear index 1 is the second element of the first column.
/// assert_eq!(mat[1], 2);
/// ```
///
/// Indexing out of bounds panics. [`Matrix::get`] and [`Matrix::get_mut`] return [`Option`]s
/// instead.
///
/// [`Index`]: std::ops::Index
/// [`IndexMut`]: std::ops::IndexMut
#[derive(Clone, Copy, Hash)]
#[repr(transparent)]
pub struct Matrix<T, const R: usize, const C: usize>(pub(crate) [[T; R]; C]);

unsafe impl<T: bytemuck::Zeroable, const R: usize, const C: usize> bytemuck::Zeroable
    for Matrix<T, R, C>
{
}
unsafe impl<T: bytemuck::Pod, const R: usize, const C: usize> bytemuck::Pod for Matrix<T, R, C> {}

/// Compile-time shape checks.
///
/// A method that references one of these constants fails to build (when instantiated) for
/// shapes the check rejects.
pub(crate) struct Shape<const R: usize, const C: usize>;

impl<const R: usize, const C: usize> Shape<R, C> {
    pub(crate) const MIN_DIMENSION: usize = if R > C { C } else { R };
    pub(crate) const MAX_DIMENSION: usize = if R > C { R } else { C };

    pub(crate) const IS_VECTOR: () = assert!(
        Self::MIN_DIMENSION == 1,
        "operation is only defined for row or column vectors"
    );
}

/// Checks that a shape can hold `N` components.
pub(crate) struct Holds<const N: usize, const R: usize, const C: usize>;

impl<const N: usize, const R: usize, const C: usize> Holds<N, R, C> {
    /// The largest dimension is at least `N`.
    pub(crate) const IN_DIMENSION: () = assert!(
        Shape::<R, C>::MAX_DIMENSION >= N,
        "matrix dimensions are too small for this many components"
    );

    /// The buffer has at least `N` elements.
    pub(crate) const IN_BUFFER: () = assert!(R * C >= N, "matrix has fewer than N elements");
}

impl<T, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Total number of elements (`R * C`).
    pub const SIZE: usize = R * C;

    /// Creates a [`Matrix`] from an array of columns.
    ///
    /// # Examples
    ///
    /// ```
    /// # use embedded_math::*;
    /// let rows = Matrix::from_rows([
    ///     [0, 1],
    ///     [2, 3],
    /// ]);
    /// let columns = Matrix::from_columns([
    ///     [0, 2],
    ///     [1, 3],
    /// ]);
    /// assert_eq!(rows, columns);
    /// ```
    #[inline]
    pub const fn from_columns(columns: [[T; R]; C]) -> Self {
        Self(columns)
    }

    /// Creates a [`Matrix`] from an array of rows.
    pub fn from_rows(rows: [[T; C]; R]) -> Self
    where
        T: Copy,
    {
        Matrix::from_columns(rows).transpose()
    }

    /// Creates a [`Matrix`] by invoking a closure with the position (row and column) of each
    /// element.
    ///
    /// # Examples
    ///
    /// ```
    /// # use embedded_math::*;
    /// let mat = Matrix::from_fn(|row, col| row * 10 + col);
    /// assert_eq!(mat, Matrix::from_rows([
    ///     [ 0,  1,  2],
    ///     [10, 11, 12],
    /// ]));
    /// ```
    pub fn from_fn<F>(mut cb: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        Self(array::from_fn(|col| array::from_fn(|row| cb(row, col))))
    }

    /// Applies a closure to each element, returning a new matrix.
    pub fn map<F, U>(self, mut f: F) -> Matrix<U, R, C>
    where
        F: FnMut(T) -> U,
    {
        Matrix(self.0.map(|column| column.map(&mut f)))
    }

    /// Swaps the rows and columns of this matrix.
    ///
    /// Element `(i, j)` of `self` becomes element `(j, i)` of the result.
    ///
    /// # Examples
    ///
    /// ```
    /// # use embedded_math::*;
    /// let mat = Matrix::from_rows([
    ///     [0, 1, 2],
    ///     [3, 4, 5],
    /// ]).transpose();
    /// assert_eq!(mat, Matrix::from_rows([
    ///     [0, 3],
    ///     [1, 4],
    ///     [2, 5],
    /// ]));
    /// ```
    pub fn transpose(self) -> Matrix<T, C, R>
    where
        T: Copy,
    {
        Matrix::from_fn(|row, col| self[(col, row)])
    }

    /// Returns a reference to the element at `(row, col)`, or [`None`] if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= R {
            return None;
        }
        self.0.get(col).map(|col| &col[row])
    }

    /// Returns a mutable reference to the element at `(row, col)`, or [`None`] if out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row >= R {
            return None;
        }
        self.0.get_mut(col).map(|col| &mut col[row])
    }

    /// Returns the underlying buffer, in column-major order.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let mat = Matrix::from_rows([
    ///     [1, 2],
    ///     [3, 4],
    /// ]);
    /// assert_eq!(mat.as_slice(), &[1, 3, 2, 4]);
    /// ```
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.0.as_flattened()
    }

    /// Returns the underlying buffer mutably, in column-major order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.0.as_flattened_mut()
    }

    /// Returns a raw pointer to the first element of the column-major buffer.
    ///
    /// The buffer holds [`Self::SIZE`] contiguous elements.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.as_slice().as_ptr()
    }

    /// Returns a mutable raw pointer to the first element of the column-major buffer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.as_mut_slice().as_mut_ptr()
    }

    /// Returns the columns of this matrix.
    #[inline]
    pub fn into_columns(self) -> [[T; R]; C] {
        self.0
    }

    /// Returns `self` unchanged.
    ///
    /// All operations in this crate are evaluated eagerly, so there is nothing left to evaluate.
    /// The method exists so that code written against expression-template libraries keeps
    /// compiling.
    #[inline]
    pub fn eval(self) -> Self {
        self
    }
}

impl<T: Copy, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Creates a matrix with every element set to `value`.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let v = Vector2f::splat(5.0);
    /// assert_eq!(v, vec2(5.0, 5.0));
    /// ```
    #[inline]
    pub fn splat(value: T) -> Self {
        Self([[value; R]; C])
    }

    /// Returns a vector holding the first `K` elements of the buffer.
    ///
    /// Fails to compile if `K` exceeds the number of elements.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let v = vec3(1, 2, 3);
    /// assert_eq!(v.head::<2>(), vec2(1, 2));
    /// ```
    pub fn head<const K: usize>(&self) -> Vector<T, K> {
        let () = Holds::<K, R, C>::IN_BUFFER;
        let data = self.as_slice();
        Vector::from_fn(|i, _| data[i])
    }

    /// Returns a vector holding the last `K` elements of the buffer.
    ///
    /// Fails to compile if `K` exceeds the number of elements.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let v = vec3(1, 2, 3);
    /// assert_eq!(v.tail::<2>(), vec2(2, 3));
    /// ```
    pub fn tail<const K: usize>(&self) -> Vector<T, K> {
        let () = Holds::<K, R, C>::IN_BUFFER;
        let data = self.as_slice();
        let start = data.len() - K;
        Vector::from_fn(|i, _| data[start + i])
    }
}

impl<T: Zero + Copy, const R: usize, const C: usize> Matrix<T, R, C> {
    /// A matrix with every element set to 0.
    pub const ZERO: Self = Self([[T::ZERO; R]; C]);

    /// Returns [`Matrix::ZERO`].
    #[inline]
    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Sets every element to 0.
    pub fn set_zero(&mut self) {
        *self = Self::ZERO;
    }

    /// Creates a matrix whose first two buffer elements are `a` and `b`, the rest being zero.
    ///
    /// Only compiles for shapes where the larger dimension is at least 2.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let v = Vector3::new2(1, 2);
    /// assert_eq!(v, vec3(1, 2, 0));
    /// ```
    pub fn new2(a: T, b: T) -> Self {
        let () = Holds::<2, R, C>::IN_DIMENSION;
        let mut this = Self::ZERO;
        this.as_mut_slice()[..2].copy_from_slice(&[a, b]);
        this
    }

    /// Creates a matrix whose first three buffer elements are `a`, `b` and `c`, the rest being
    /// zero.
    ///
    /// Only compiles for shapes where the larger dimension is at least 3.
    pub fn new3(a: T, b: T, c: T) -> Self {
        let () = Holds::<3, R, C>::IN_DIMENSION;
        let mut this = Self::ZERO;
        this.as_mut_slice()[..3].copy_from_slice(&[a, b, c]);
        this
    }

    /// Creates a matrix whose first four buffer elements are `a`, `b`, `c` and `d`, the rest
    /// being zero.
    ///
    /// Only compiles for shapes where the larger dimension is at least 4. In particular, a
    /// [`Matrix2`] cannot be built from a 4-element list; use [`Matrix::from_rows`] for that.
    pub fn new4(a: T, b: T, c: T, d: T) -> Self {
        let () = Holds::<4, R, C>::IN_DIMENSION;
        let mut this = Self::ZERO;
        this.as_mut_slice()[..4].copy_from_slice(&[a, b, c, d]);
        this
    }
}

impl<T: Zero + One + Copy, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Returns the identity matrix.
    ///
    /// The matrix has the value 1 on its diagonal and 0 everywhere else. For non-square shapes,
    /// the diagonal ends after `min(R, C)` elements.
    ///
    /// ```
    /// # use embedded_math::*;
    /// assert_eq!(Matrix::<i32, 2, 3>::identity(), Matrix::from_rows([
    ///     [1, 0, 0],
    ///     [0, 1, 0],
    /// ]));
    /// ```
    pub fn identity() -> Self {
        let mut this = Self::ZERO;
        this.set_identity();
        this
    }

    /// Overwrites `self` with the identity matrix.
    pub fn set_identity(&mut self) {
        *self = Self::ZERO;
        for i in 0..Shape::<R, C>::MIN_DIMENSION {
            self[(i, i)] = T::ONE;
        }
    }

    /// Returns a matrix with every element set to 1.
    #[inline]
    pub fn ones() -> Self {
        Self::splat(T::ONE)
    }
}

impl<T: Number, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Returns the *trace* of the matrix (the sum of all elements on the diagonal).
    ///
    /// Non-square matrices sum the first `min(R, C)` diagonal elements.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let diag = Matrix::from_diagonal(vec3(1, 2, 3));
    /// assert_eq!(diag.trace(), 1 + 2 + 3);
    /// assert_eq!(Matrix3f::identity().trace(), 3.0);
    /// ```
    pub fn trace(&self) -> T {
        (0..Shape::<R, C>::MIN_DIMENSION).fold(T::ZERO, |acc, i| acc + self[(i, i)])
    }

    /// Computes the sum of the element-wise products of `self` and `other`.
    ///
    /// For vectors, this is the dot product. For other shapes, the buffers are treated as flat
    /// lists of `R * C` numbers.
    ///
    /// ```
    /// # use embedded_math::*;
    /// assert_eq!(vec3(1, 2, 3).dot(vec3(4, 5, 6)), 32);
    /// ```
    pub fn dot(&self, other: Self) -> T {
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .fold(T::ZERO, |acc, (&a, &b)| acc + a * b)
    }

    /// Returns the sum of squares of all elements.
    pub fn norm_squared(&self) -> T {
        self.dot(*self)
    }

    /// Multiplies every element by `factor`.
    ///
    /// This is the named equivalent of `self * factor`.
    #[inline]
    pub fn scale(self, factor: T) -> Self {
        self * factor
    }

    /// Element-wise product of `self` and `other`.
    pub fn component_mul(&self, other: &Self) -> Self {
        Self::from_fn(|row, col| self[(row, col)] * other[(row, col)])
    }

    /// Computes the matrix product `self * rhs`.
    ///
    /// This is the named equivalent of the `*` operator. Products where all three dimensions are
    /// 1, 2, 3 or 4 use unrolled kernels; everything else goes through a generic loop.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let a = Matrix::from_rows([
    ///     [1, 2, 3],
    ///     [4, 5, 6],
    /// ]);
    /// let b = Matrix::from_rows([
    ///     [1, 0],
    ///     [0, 1],
    ///     [1, 1],
    /// ]);
    /// assert_eq!(a.matmul(&b), Matrix::from_rows([
    ///     [4, 5],
    ///     [10, 11],
    /// ]));
    /// ```
    pub fn matmul<const P: usize>(&self, rhs: &Matrix<T, C, P>) -> Matrix<T, R, P> {
        kernels::matmul(self, rhs)
    }
}

impl<T: Real, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Returns the Euclidean norm of all elements (the Frobenius norm for matrices).
    ///
    /// ```
    /// # use embedded_math::*;
    /// assert_eq!(vec2(3.0, 4.0).norm(), 5.0);
    /// ```
    #[doc(alias = "length")]
    pub fn norm(&self) -> T {
        self.norm_squared().sqrt()
    }

    /// Returns a copy of `self` divided by its [`norm`](Self::norm).
    ///
    /// The zero matrix has no direction: normalizing it divides by zero and yields `NaN`
    /// elements. Callers have to rule that case out themselves.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let z = vec3(0.0, 0.0, 4.0).normalized();
    /// assert_eq!(z, vec3(0.0, 0.0, 1.0));
    /// ```
    pub fn normalized(self) -> Self {
        self / self.norm()
    }

    /// Divides `self` by its [`norm`](Self::norm) in place.
    ///
    /// See [`Matrix::normalized`] for the behavior on zero input.
    pub fn normalize(&mut self) {
        *self = *self / self.norm();
    }

    /// Returns whether the Euclidean distance between `self` and `other` is at most
    /// [`Real::EPSILON`].
    ///
    /// The default tolerance is the [`f32`] machine epsilon for both floating-point types. Use
    /// [`Matrix::is_approx_eps`] to pick another one.
    pub fn is_approx(&self, other: &Self) -> bool {
        self.is_approx_eps(other, T::EPSILON)
    }

    /// Returns whether the Euclidean distance between `self` and `other` is at most `epsilon`.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let a = vec2(1.0, 1.0);
    /// assert!(a.is_approx_eps(&vec2(1.0, 1.001), 1e-2));
    /// assert!(!a.is_approx_eps(&vec2(1.0, 1.1), 1e-2));
    /// ```
    pub fn is_approx_eps(&self, other: &Self, epsilon: T) -> bool {
        (*self - *other).norm() <= epsilon
    }
}

impl<T, const N: usize> Matrix<T, N, N> {
    /// Returns a [`Vector`] holding the diagonal elements of this square matrix.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let mat = Matrix::from_rows([
    ///     [1, 2],
    ///     [3, 4],
    /// ]);
    /// assert_eq!(mat.diagonal(), vec2(1, 4));
    /// ```
    pub fn diagonal(&self) -> Vector<T, N>
    where
        T: Copy,
    {
        Vector::from_fn(|i, _| self[(i, i)])
    }

    /// Creates a square matrix from its diagonal.
    ///
    /// Elements outside the diagonal are zero.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let diag = Matrix::from_diagonal(vec3(1, 2, 3));
    /// assert_eq!(diag, Matrix::from_rows([
    ///     [1, 0, 0],
    ///     [0, 2, 0],
    ///     [0, 0, 3],
    /// ]));
    /// ```
    pub fn from_diagonal(diag: Vector<T, N>) -> Self
    where
        T: Zero + Copy,
    {
        let mut this = Self::ZERO;
        for i in 0..N {
            this[(i, i)] = diag[i];
        }
        this
    }
}

impl<T: Real, const N: usize> Matrix<T, N, N> {
    /// Returns the [determinant] of the matrix.
    ///
    /// Sizes up to 3x3 use the closed-form cofactor expansion; larger matrices are factored with
    /// [`PartialPivLu`].
    ///
    /// ```
    /// # use embedded_math::*;
    /// let m = Matrix::from_rows([
    ///     [-2.0, -1.0,  2.0],
    ///     [ 2.0,  1.0,  4.0],
    ///     [-3.0,  3.0, -1.0],
    /// ]);
    /// assert_eq!(m.determinant(), 54.0);
    /// ```
    ///
    /// [determinant]: https://en.wikipedia.org/wiki/Determinant
    pub fn determinant(&self) -> T {
        let m = |row: usize, col: usize| self[(row, col)];
        match N {
            1 => m(0, 0),
            2 => m(0, 0) * m(1, 1) - m(0, 1) * m(1, 0),
            3 => {
                m(0, 0) * (m(1, 1) * m(2, 2) - m(1, 2) * m(2, 1))
                    - m(0, 1) * (m(1, 0) * m(2, 2) - m(1, 2) * m(2, 0))
                    + m(0, 2) * (m(1, 0) * m(2, 1) - m(1, 1) * m(2, 0))
            }
            _ => self.partial_piv_lu().determinant(),
        }
    }

    /// Computes the inverse of this matrix, or the zero matrix if it is (nearly) singular.
    ///
    /// A matrix counts as singular when the absolute value of its determinant is below
    /// [`Real::EPSILON`]. Instead of panicking or returning an error, this method then returns
    /// [`Matrix::ZERO`]; use [`Matrix::try_inverse`] to observe the failure.
    ///
    /// Sizes up to 3x3 use closed forms; larger matrices go through [`PartialPivLu::inverse`].
    ///
    /// ```
    /// # use embedded_math::*;
    /// let m = Matrix2f::from_rows([
    ///     [4.0, 3.0],
    ///     [2.0, 1.0],
    /// ]);
    /// assert_eq!(m.inverse(), Matrix::from_rows([
    ///     [-0.5, 1.5],
    ///     [1.0, -2.0],
    /// ]));
    ///
    /// assert_eq!(Matrix2f::ones().inverse(), Matrix2f::ZERO);
    /// ```
    pub fn inverse(&self) -> Self {
        self.try_inverse().unwrap_or_else(|err| {
            log::debug!("{err}; substituting the zero matrix for its inverse");
            Self::ZERO
        })
    }

    /// Computes the inverse of this matrix, failing if it is (nearly) singular.
    ///
    /// Uses the same singularity test as [`Matrix::inverse`].
    ///
    /// ```
    /// # use embedded_math::*;
    /// assert!(Matrix3f::identity().try_inverse().is_ok());
    /// assert!(Matrix3f::ZERO.try_inverse().is_err());
    /// ```
    pub fn try_inverse(&self) -> Result<Self, SingularMatrixError<T>> {
        if N > 3 {
            return self.partial_piv_lu().try_inverse();
        }

        let det = self.determinant();
        if det.abs() < T::EPSILON {
            return Err(SingularMatrixError::new(det));
        }
        let inv_det = T::ONE / det;

        let m = |row: usize, col: usize| self[(row, col)];
        let inverse = match N {
            1 => Self::splat(inv_det),
            2 => Self::from_fn(|row, col| {
                let cofactor = m(1 - col, 1 - row);
                if row == col {
                    cofactor * inv_det
                } else {
                    -cofactor * inv_det
                }
            }),
            _ => Self::from_fn(|row, col| {
                // Transposed cofactor; the cyclic index order takes care of the sign.
                let (r1, r2) = ((col + 1) % 3, (col + 2) % 3);
                let (c1, c2) = ((row + 1) % 3, (row + 2) % 3);
                (m(r1, c1) * m(r2, c2) - m(r1, c2) * m(r2, c1)) * inv_det
            }),
        };
        Ok(inverse)
    }

    /// Computes the partial-pivoting LU decomposition of this matrix.
    ///
    /// See [`PartialPivLu`] for details.
    pub fn partial_piv_lu(&self) -> PartialPivLu<T, N> {
        PartialPivLu::new(self)
    }
}

impl<T: Real> Matrix3<T> {
    /// Extracts rotation angles from this rotation matrix.
    ///
    /// `a0`, `a1` and `a2` select the rotation axes (0 = X, 1 = Y, 2 = Z) such that
    /// `self = R_a0(angles[0]) * R_a1(angles[1]) * R_a2(angles[2])`. Both Tait-Bryan sequences
    /// (all axes distinct, eg. `(2, 1, 0)` for yaw-pitch-roll) and proper Euler sequences
    /// (`a0 == a2`, eg. `(2, 0, 2)`) are supported; `a1` must differ from its neighbours.
    ///
    /// # Limitations
    ///
    /// The first angle is returned as computed by `atan2` and is not folded into any canonical
    /// range, so a rotation may come back as a different (but equivalent) angle triple than the
    /// one it was built from. Near the singular configurations the split between the first and
    /// third angle is arbitrary.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let rot = Quaternion::from_rotation_z(0.3f64).to_rotation_matrix()
    ///     * Quaternion::from_rotation_y(0.2).to_rotation_matrix()
    ///     * Quaternion::from_rotation_x(0.1).to_rotation_matrix();
    /// let angles = rot.euler_angles(2, 1, 0);
    /// assert!(angles.is_approx_eps(&vec3(0.3, 0.2, 0.1), 1e-9));
    /// ```
    pub fn euler_angles(&self, a0: usize, a1: usize, a2: usize) -> Vector3<T> {
        let m = |row: usize, col: usize| self[(row, col)];
        let hypot = |a: T, b: T| (a * a + b * b).sqrt();

        let odd = (a0 + 1) % 3 != a1;
        let i = a0;
        let (j, k) = if odd {
            ((a0 + 2) % 3, (a0 + 1) % 3)
        } else {
            ((a0 + 1) % 3, (a0 + 2) % 3)
        };

        let (first, second, third);
        if a0 == a2 {
            first = m(j, i).atan2(m(k, i));
            second = hypot(m(j, i), m(k, i)).atan2(m(i, i));
            let (s1, c1) = first.sin_cos();
            third = (c1 * m(j, k) - s1 * m(k, k)).atan2(c1 * m(j, j) - s1 * m(k, j));
        } else {
            first = m(j, k).atan2(m(k, k));
            second = (-m(i, k)).atan2(hypot(m(i, i), m(i, j)));
            let (s1, c1) = first.sin_cos();
            third = (s1 * m(k, i) - c1 * m(j, i)).atan2(c1 * m(j, j) - s1 * m(k, j));
        }

        let angles = Vector3::from_columns([[first, second, third]]);
        if odd {
            angles
        } else {
            -angles
        }
    }
}

impl<T: fmt::Debug, const R: usize, const C: usize> fmt::Debug for Matrix<T, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct FormatRow<'a, T: fmt::Debug, const R: usize, const C: usize>(
            &'a Matrix<T, R, C>,
            usize,
        );
        impl<'a, T, const R: usize, const C: usize> fmt::Debug for FormatRow<'a, T, R, C>
        where
            T: fmt::Debug,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut list = f.debug_list();
                for col in 0..C {
                    list.entry(&self.0[(self.1, col)]);
                }
                list.finish()
            }
        }

        // Row by row, in natural writing order, regardless of the storage order.
        let mut list = f.debug_list();
        for row in 0..R {
            list.entry(&FormatRow(self, row));
        }
        list.finish()
    }
}

impl<T, const R: usize, const C: usize> Default for Matrix<T, R, C>
where
    T: Default,
{
    fn default() -> Self {
        Self::from_fn(|_, _| T::default())
    }
}

#[cfg(test)]
mod tests {
    use crate::{assert_approx_eq, vec2, vec3, Quaternion, Vector2f, Vector3f};

    use super::*;

    #[test]
    fn from_rows_columns() {
        assert_eq!(
            Matrix::<i32, 2, 3>::from_rows([[1, 2, 3], [4, 5, 6]]),
            Matrix::from_columns([[1, 4], [2, 5], [3, 6]]),
        );
    }

    #[test]
    fn column_major_indexing() {
        #[rustfmt::skip]
        let mat = Matrix::from_rows([
            [1, 2, 3],
            [4, 5, 6],
        ]);
        assert_eq!(mat.as_slice(), &[1, 4, 2, 5, 3, 6]);
        for row in 0..2 {
            for col in 0..3 {
                assert_eq!(mat[(row, col)], mat[col * 2 + row]);
            }
        }
        assert_eq!(mat.get(1, 2), Some(&6));
        assert_eq!(mat.get(2, 0), None);
        assert_eq!(mat.get(0, 3), None);
    }

    #[test]
    fn constructors() {
        let v = Vector2f::default();
        assert_eq!(v, vec2(0.0, 0.0));

        let v = Vector2f::splat(5.0);
        assert_eq!(v[0], 5.0);
        assert_eq!(v[1], 5.0);

        let copy = v;
        assert_eq!(copy, v);

        assert_eq!(Vector2f::ones(), vec2(1.0, 1.0));
        assert_eq!(Vector3f::new2(1.0, 2.0), vec3(1.0, 2.0, 0.0));
        assert_eq!(Vector3f::new3(1.0, 2.0, 3.0), vec3(1.0, 2.0, 3.0));

        // A 3x3 matrix filled from a 3-element list gets its first column written.
        #[rustfmt::skip]
        assert_eq!(Matrix3::new3(1, 2, 3), Matrix::from_rows([
            [1, 0, 0],
            [2, 0, 0],
            [3, 0, 0],
        ]));
    }

    #[test]
    fn set_zero_and_identity() {
        let mut v = Vector2f::splat(3.0);
        v.set_zero();
        assert_eq!(v, Vector2f::ZERO);

        let m = Matrix3f::identity();
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(m[(row, col)], if row == col { 1.0 } else { 0.0 });
            }
        }

        let mut m = Matrix::<f32, 3, 2>::splat(7.0);
        m.set_identity();
        #[rustfmt::skip]
        assert_eq!(m, Matrix::from_rows([
            [1.0, 0.0],
            [0.0, 1.0],
            [0.0, 0.0],
        ]));
    }

    #[test]
    fn head_tail() {
        let v = vec3(1.0, 2.0, 3.0);
        assert_eq!(v.head::<2>(), vec2(1.0, 2.0));
        assert_eq!(v.tail::<2>(), vec2(2.0, 3.0));

        // Linear order of a matrix is column-major.
        let m = Matrix::from_rows([[1, 2], [3, 4]]);
        assert_eq!(m.head::<3>(), vec3(1, 3, 2));
        assert_eq!(m.tail::<1>(), Vector::from_columns([[4]]));
    }

    #[test]
    fn fmt() {
        let mat = Matrix::from_rows([[0, 1], [2, 3]]);

        // Natural writing order (row-wise) for debug output.
        assert_eq!(format!("{:?}", mat), "[[0, 1], [2, 3]]");
        assert_eq!(
            format!("{:?}", Matrix2f::identity()),
            "[[1.0, 0.0], [0.0, 1.0]]"
        );
    }

    #[test]
    fn transpose_twice() {
        #[rustfmt::skip]
        let m = Matrix::from_rows([
            [1, 2, 3, 4],
            [5, 6, 7, 8],
        ]);
        assert_eq!(m.transpose().transpose(), m);

        let m2 = Matrix2f::from_rows([[1.0, 2.0], [3.0, 4.0]]).transpose();
        assert_eq!(m2[(0, 0)], 1.0);
        assert_eq!(m2[(0, 1)], 3.0);
        assert_eq!(m2[(1, 0)], 2.0);
        assert_eq!(m2[(1, 1)], 4.0);
    }

    #[test]
    fn norm() {
        assert_approx_eq!(vec3(3.0f32, 4.0, 12.0).norm(), 13.0).abs(1e-4);
        let n = vec3(3.0f32, 4.0, 12.0).normalized();
        assert_approx_eq!(n.norm(), 1.0).abs(1e-4);

        let mut m = Matrix2f::from_rows([[1.0, 1.0], [1.0, 1.0]]);
        assert_eq!(m.norm(), 2.0);
        m.normalize();
        assert_eq!(m, Matrix2f::splat(0.5));
    }

    #[test]
    fn normalize_zero_is_nan() {
        let v = Vector3f::ZERO.normalized();
        assert!(v.as_slice().iter().all(|e| e.is_nan()));
    }

    #[test]
    fn trace() {
        assert_eq!(Matrix3f::identity().trace(), 3.0);
        #[rustfmt::skip]
        let m = Matrix::from_rows([
            [1, 2, 3],
            [4, 5, 6],
        ]);
        assert_eq!(m.trace(), 1 + 5);
    }

    #[test]
    fn dot() {
        assert_approx_eq!(vec3(1.0f32, 2.0, 3.0).dot(vec3(4.0, 5.0, 6.0)), 32.0).abs(1e-4);
        assert_eq!(vec3(1, 3, -5).dot(vec3(4, -2, -1)), 3);

        let m = Matrix::from_rows([[1, 2], [3, 4]]);
        assert_eq!(m.dot(m), 1 + 4 + 9 + 16);
    }

    #[test]
    fn determinant() {
        assert_eq!(Matrix::<f32, 1, 1>::ZERO.determinant(), 0.0);
        assert_eq!(Matrix2f::ZERO.determinant(), 0.0);
        assert_eq!(Matrix3f::ZERO.determinant(), 0.0);
        assert_eq!(Matrix::<f32, 1, 1>::identity().determinant(), 1.0);
        assert_eq!(Matrix2f::identity().determinant(), 1.0);
        assert_eq!(Matrix3f::identity().determinant(), 1.0);

        #[rustfmt::skip]
        let testmat = Matrix3f::from_rows([
            [-2.0, -1.0,  2.0],
            [ 2.0,  1.0,  4.0],
            [-3.0,  3.0, -1.0],
        ]);
        assert_eq!(testmat.determinant(), 54.0);
        assert_eq!(testmat.transpose().determinant(), 54.0);
    }

    #[test]
    fn determinant_4x4() {
        #[rustfmt::skip]
        let m = Matrix4d::from_rows([
            [1.0,  2.0, 3.0, 4.0],
            [2.0,  3.0, 2.0, 5.0],
            [1.0,  2.0, 3.0, 2.0],
            [1.0, -1.0, 0.0, 2.0],
        ]);
        assert_approx_eq!(m.determinant(), -18.0).abs(1e-9);
        assert_approx_eq!(Matrix4d::identity().determinant(), 1.0);
    }

    #[test]
    fn inverse_2x2() {
        let m = Matrix2f::from_rows([[4.0, 3.0], [2.0, 1.0]]);
        let inv = m.inverse();
        assert_eq!(inv[(0, 0)], -0.5);
        assert_eq!(inv[(0, 1)], 1.5);
        assert_eq!(inv[(1, 0)], 1.0);
        assert_eq!(inv[(1, 1)], -2.0);
    }

    #[test]
    fn inverse_3x3() {
        #[rustfmt::skip]
        let m = Matrix3f::from_rows([
            [1.0, 2.0, 3.0],
            [0.0, 4.0, 5.0],
            [0.0, 0.0, 6.0],
        ]);
        assert!((m * m.inverse()).is_approx_eps(&Matrix3f::identity(), 1e-4));

        #[rustfmt::skip]
        let m = Matrix3d::from_rows([
            [1.0, 4.0, 0.0],
            [2.0, 0.0, 8.0],
            [3.0, 6.0, 9.0],
        ]);
        assert!((m.inverse() * m).is_approx_eps(&Matrix3d::identity(), 1e-12));
    }

    #[test]
    fn inverse_1x1() {
        let m = Matrix::<f32, 1, 1>::splat(4.0);
        assert_eq!(m.inverse(), Matrix::splat(0.25));
    }

    #[test]
    fn singular_inverse_is_zero() {
        #[rustfmt::skip]
        let m = Matrix3f::from_rows([
            [1.0, 2.0, 3.0],
            [2.0, 4.0, 6.0],
            [0.0, 1.0, 1.0],
        ]);
        assert_eq!(m.inverse(), Matrix3f::ZERO);
        let err = m.try_inverse().unwrap_err();
        assert_eq!(err.determinant(), 0.0);

        // The tolerance is the f32 epsilon even for f64 matrices.
        let tiny = Matrix2d::identity() * 1e-4;
        assert_eq!(tiny.inverse(), Matrix2d::ZERO);
    }

    fn real_ops<T: Real>() {
        let two = T::ONE + T::ONE;

        let mut v = Matrix::<T, 4, 1>::splat(T::ONE);
        v.normalize();
        assert_eq!(v, Matrix::splat(T::HALF));

        let (mut m, mut half) = (Matrix::<T, 4, 4>::ZERO, Matrix::<T, 4, 4>::ZERO);
        for i in 0..4 {
            m[(i, i)] = two;
            half[(i, i)] = T::HALF;
        }
        assert_eq!(m.inverse(), half);
        let lu = m.partial_piv_lu();
        assert_eq!(lu.inverse(), half);
        assert_eq!(lu.solve(&Matrix::<T, 4, 1>::splat(T::ONE)), Matrix::splat(T::HALF));

        // The singular fallbacks format the error into a log record.
        let zero = Matrix::<T, 4, 4>::ZERO;
        let lu = zero.partial_piv_lu();
        assert_eq!(zero.inverse(), zero);
        assert_eq!(lu.inverse(), zero);
        assert_eq!(lu.solve(&Matrix::<T, 4, 1>::splat(T::ONE)), Matrix::<T, 4, 1>::ZERO);
    }

    #[test]
    fn generic_over_real() {
        let _ = env_logger::builder().is_test(true).try_init();
        real_ops::<f32>();
        real_ops::<f64>();
    }

    #[test]
    fn euler_angles_xyz() {
        let rot = Quaternion::from_rotation_x(0.4f64).to_rotation_matrix()
            * Quaternion::from_rotation_y(-0.3).to_rotation_matrix()
            * Quaternion::from_rotation_z(0.2).to_rotation_matrix();
        let angles = rot.euler_angles(0, 1, 2);
        assert_approx_eq!(angles, vec3(0.4, -0.3, 0.2)).abs(1e-9);
    }

    #[test]
    fn euler_angles_proper() {
        let rot = Quaternion::from_rotation_z(0.5f64).to_rotation_matrix()
            * Quaternion::from_rotation_x(0.7).to_rotation_matrix()
            * Quaternion::from_rotation_z(0.2).to_rotation_matrix();
        let angles = rot.euler_angles(2, 0, 2);

        // The first angle is not range-corrected, so only the rotation itself is guaranteed to
        // round-trip.
        let rebuilt = Quaternion::from_rotation_z(angles[0]).to_rotation_matrix()
            * Quaternion::from_rotation_x(angles[1]).to_rotation_matrix()
            * Quaternion::from_rotation_z(angles[2]).to_rotation_matrix();
        assert!(rebuilt.is_approx_eps(&rot, 1e-9));
    }

    #[test]
    fn eval_is_identity() {
        let m = Matrix2f::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(m.eval(), m);
    }
}
