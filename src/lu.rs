//! LU decomposition with partial (column) pivoting.

use std::array;

use crate::{error::SingularMatrixError, Matrix, Real};

/// The LU decomposition `A * P = L * U` of a square matrix `A`.
///
/// - `L` is lower triangular with a unit diagonal.
/// - `U` is upper triangular.
/// - `P` is a column permutation, stored as a sequence of transpositions: in step `k` of the
///   factorization, column `k` was exchanged with column [`transpositions()[k]`] (which is `k`
///   itself if no exchange took place).
///
/// At step `k`, the pivot is the element of largest magnitude in row `k`, at or to the right of
/// the diagonal. If that element is zero, the step is skipped and the matrix is singular.
///
/// ```
/// # use embedded_math::*;
/// let a = Matrix3d::from_rows([
///     [1.0, 4.0, 0.0],
///     [2.0, 0.0, 8.0],
///     [3.0, 6.0, 9.0],
/// ]);
/// let lu = a.partial_piv_lu();
/// assert!(lu.reconstruct().is_approx_eps(&a, 1e-12));
/// assert!((a * lu.inverse()).is_approx_eps(&Matrix3d::identity(), 1e-12));
/// ```
///
/// [`transpositions()[k]`]: PartialPivLu::transpositions
#[derive(Debug, Clone, Copy)]
pub struct PartialPivLu<T, const N: usize> {
    l: Matrix<T, N, N>,
    u: Matrix<T, N, N>,
    transpositions: [usize; N],
    swaps: usize,
}

impl<T: Real, const N: usize> PartialPivLu<T, N> {
    /// Factors `matrix`.
    pub fn new(matrix: &Matrix<T, N, N>) -> Self {
        let mut work = *matrix;
        let mut l = Matrix::<T, N, N>::identity();
        let mut transpositions = array::from_fn(|k| k);
        let mut swaps = 0;

        for k in 0..N {
            let mut pivot_col = k;
            let mut pivot_abs = work[(k, k)].abs();
            for col in k + 1..N {
                let abs = work[(k, col)].abs();
                if abs > pivot_abs {
                    pivot_col = col;
                    pivot_abs = abs;
                }
            }

            if pivot_col != k {
                log::trace!("LU step {k}: exchanging columns {k} and {pivot_col}");
                let cells = work.as_cells();
                cells.col(k).swap(&cells.col(pivot_col));
                transpositions[k] = pivot_col;
                swaps += 1;
            }

            let pivot = work[(k, k)];
            if pivot == T::ZERO {
                continue;
            }

            let inv_pivot = T::ONE / pivot;
            for row in k + 1..N {
                let factor = work[(row, k)] * inv_pivot;
                l[(row, k)] = factor;
                for col in k..N {
                    work[(row, col)] = work[(row, col)] - factor * work[(k, col)];
                }
            }
        }

        let u = Matrix::from_fn(|row, col| if row > col { T::ZERO } else { work[(row, col)] });

        Self {
            l,
            u,
            transpositions,
            swaps,
        }
    }

    /// Returns the unit lower triangular factor `L`.
    pub fn matrix_l(&self) -> Matrix<T, N, N> {
        self.l
    }

    /// Returns the upper triangular factor `U`.
    pub fn matrix_u(&self) -> Matrix<T, N, N> {
        self.u
    }

    /// Returns the column transpositions performed during the factorization.
    ///
    /// Entry `k` holds the column that was exchanged with column `k` in step `k`.
    pub fn transpositions(&self) -> &[usize; N] {
        &self.transpositions
    }

    /// Returns the column permutation `P` as an index array.
    ///
    /// Column `j` of `A * P` is column `permutation()[j]` of `A`.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let a = Matrix2d::from_rows([
    ///     [1.0, 2.0],
    ///     [3.0, 4.0],
    /// ]);
    /// // Row 0 has its largest element in column 1, so the columns get exchanged.
    /// assert_eq!(a.partial_piv_lu().permutation(), [1, 0]);
    /// ```
    pub fn permutation(&self) -> [usize; N] {
        let mut perm = array::from_fn(|j| j);
        for (k, &t) in self.transpositions.iter().enumerate() {
            perm.swap(k, t);
        }
        perm
    }

    /// Returns the determinant of the decomposed matrix.
    ///
    /// This is the product of the diagonal of `U`, negated if an odd number of column exchanges
    /// took place.
    pub fn determinant(&self) -> T {
        let det = (0..N).fold(T::ONE, |acc, i| acc * self.u[(i, i)]);
        if self.swaps % 2 == 0 {
            det
        } else {
            -det
        }
    }

    /// Computes the inverse of the decomposed matrix, or the zero matrix if it is singular.
    ///
    /// The singularity test is the same as for [`Matrix::inverse`].
    pub fn inverse(&self) -> Matrix<T, N, N> {
        self.try_inverse().unwrap_or_else(|err| {
            log::debug!("{err}; substituting the zero matrix for its inverse");
            Matrix::ZERO
        })
    }

    /// Computes the inverse of the decomposed matrix.
    ///
    /// Returns an error if the absolute value of the determinant is below [`Real::EPSILON`].
    pub fn try_inverse(&self) -> Result<Matrix<T, N, N>, SingularMatrixError<T>> {
        self.check_invertible()?;

        // L⁻¹ by forward substitution; its diagonal stays 1.
        let mut l_inv = Matrix::<T, N, N>::identity();
        for j in 0..N {
            for i in j + 1..N {
                let sum = (j..i).fold(T::ZERO, |acc, k| acc + self.l[(i, k)] * l_inv[(k, j)]);
                l_inv[(i, j)] = -sum;
            }
        }

        // U⁻¹ by backward substitution, one column at a time.
        let mut u_inv = Matrix::<T, N, N>::ZERO;
        for j in 0..N {
            u_inv[(j, j)] = T::ONE / self.u[(j, j)];
            for i in (0..j).rev() {
                let sum = (i + 1..=j)
                    .fold(T::ZERO, |acc, k| acc + self.u[(i, k)] * u_inv[(k, j)]);
                u_inv[(i, j)] = -sum / self.u[(i, i)];
            }
        }

        // A⁻¹ = P * U⁻¹ * L⁻¹; applying P means replaying the exchanges on rows, last one first.
        let mut inverse = u_inv * l_inv;
        self.permute_rows(&mut inverse);
        Ok(inverse)
    }

    /// Solves `A * X = rhs` for `X`, returning the zero matrix if `A` is singular.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let a = Matrix2d::from_rows([
    ///     [2.0, 1.0],
    ///     [1.0, 3.0],
    /// ]);
    /// let x = a.partial_piv_lu().solve(&vec2(3.0, 5.0));
    /// assert!(x.is_approx_eps(&vec2(0.8, 1.4), 1e-12));
    /// ```
    pub fn solve<const K: usize>(&self, rhs: &Matrix<T, N, K>) -> Matrix<T, N, K> {
        self.try_solve(rhs).unwrap_or_else(|err| {
            log::debug!("{err}; substituting the zero matrix for the solution");
            Matrix::ZERO
        })
    }

    /// Solves `A * X = rhs` for `X`.
    ///
    /// Every column of `rhs` is treated as a separate right-hand side.
    pub fn try_solve<const K: usize>(
        &self,
        rhs: &Matrix<T, N, K>,
    ) -> Result<Matrix<T, N, K>, SingularMatrixError<T>> {
        self.check_invertible()?;

        let mut x = *rhs;
        for col in 0..K {
            // L * y = rhs
            for i in 0..N {
                let sum = (0..i).fold(T::ZERO, |acc, k| acc + self.l[(i, k)] * x[(k, col)]);
                x[(i, col)] = x[(i, col)] - sum;
            }
            // U * z = y
            for i in (0..N).rev() {
                let sum = (i + 1..N).fold(T::ZERO, |acc, k| acc + self.u[(i, k)] * x[(k, col)]);
                x[(i, col)] = (x[(i, col)] - sum) / self.u[(i, i)];
            }
        }

        self.permute_rows(&mut x);
        Ok(x)
    }

    /// Recomputes the decomposed matrix as `L * U * Pᵀ`.
    pub fn reconstruct(&self) -> Matrix<T, N, N> {
        let mut a = self.l * self.u;
        let cells = a.as_cells();
        for k in (0..N).rev() {
            let t = self.transpositions[k];
            if t != k {
                cells.col(k).swap(&cells.col(t));
            }
        }
        a
    }

    fn check_invertible(&self) -> Result<(), SingularMatrixError<T>> {
        let det = self.determinant();
        if det.abs() < T::EPSILON {
            return Err(SingularMatrixError::new(det));
        }
        Ok(())
    }

    /// Left-multiplies `m` by `P`.
    fn permute_rows<const K: usize>(&self, m: &mut Matrix<T, N, K>) {
        let cells = m.as_cells();
        for k in (0..N).rev() {
            let t = self.transpositions[k];
            if t != k {
                cells.row(k).swap(&cells.row(t));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{assert_approx_eq, vec4, Matrix2d, Matrix3d, Matrix4d, Matrix4f, Vector4d};

    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[rustfmt::skip]
    fn sample() -> Matrix4d {
        Matrix4d::from_rows([
            [1.0,  2.0, 3.0, 4.0],
            [2.0,  3.0, 2.0, 5.0],
            [1.0,  2.0, 3.0, 2.0],
            [1.0, -1.0, 0.0, 2.0],
        ])
    }

    #[test]
    fn factors_are_triangular() {
        init_logger();
        let lu = sample().partial_piv_lu();
        let (l, u) = (lu.matrix_l(), lu.matrix_u());
        for row in 0..4 {
            assert_eq!(l[(row, row)], 1.0);
            for col in row + 1..4 {
                assert_eq!(l[(row, col)], 0.0);
                assert_eq!(u[(col, row)], 0.0);
            }
        }
    }

    fn check_factors<const N: usize>(a: &Matrix<f64, N, N>) {
        let lu = a.partial_piv_lu();
        let (l, u) = (lu.matrix_l(), lu.matrix_u());
        for row in 0..N {
            assert_eq!(l[(row, row)], 1.0);
            for col in row + 1..N {
                assert_eq!(l[(row, col)], 0.0);
                assert_eq!(u[(col, row)], 0.0);
            }
        }
        assert_approx_eq!(lu.reconstruct(), *a).abs(1e-12);
        assert_approx_eq!(lu.determinant(), a.determinant()).abs(1e-12);
    }

    #[test]
    fn small_factors() {
        #[rustfmt::skip]
        let a = Matrix2d::from_rows([
            [0.0, 1.0],
            [2.0, 1.0],
        ]);
        check_factors(&a);
        let lu = a.partial_piv_lu();
        assert_eq!(lu.transpositions(), &[1, 1]);
        assert_eq!(lu.determinant(), -2.0);

        #[rustfmt::skip]
        let b = Matrix3d::from_rows([
            [1.0, 2.0, 2.0],
            [4.0, 4.0, 2.0],
            [4.0, 6.0, 4.0],
        ]);
        check_factors(&b);
        assert_approx_eq!(b.partial_piv_lu().determinant(), 4.0).abs(1e-12);
    }

    #[test]
    fn column_permutation() {
        let a = sample();
        let lu = a.partial_piv_lu();
        let perm = lu.permutation();

        let mut sorted = perm;
        sorted.sort_unstable();
        assert_eq!(sorted, [0, 1, 2, 3]);

        // A * P == L * U
        let ap = Matrix4d::from_fn(|row, col| a[(row, perm[col])]);
        assert_approx_eq!(ap, lu.matrix_l() * lu.matrix_u()).abs(1e-12);
        // Row 0 pivots on its largest element, the 4.0 in column 3.
        assert_eq!(lu.transpositions()[0], 3);
    }

    #[test]
    fn reconstruct() {
        let a = sample();
        assert_approx_eq!(a.partial_piv_lu().reconstruct(), a).abs(1e-12);

        let identity = Matrix4d::identity();
        let lu = identity.partial_piv_lu();
        assert_eq!(lu.transpositions(), &[0, 1, 2, 3]);
        assert_eq!(lu.reconstruct(), identity);
    }

    #[test]
    fn determinant_sign() {
        // One column exchange, so the sign of diag(U) has to be flipped.
        #[rustfmt::skip]
        let a = Matrix3d::from_rows([
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
        ]);
        let lu = a.partial_piv_lu();
        assert_eq!(lu.transpositions(), &[1, 1, 2]);
        assert_eq!(lu.determinant(), -1.0);
        assert_eq!(a.determinant(), -1.0);

        assert_approx_eq!(sample().partial_piv_lu().determinant(), -18.0).abs(1e-12);
    }

    #[test]
    fn inverse() {
        init_logger();
        let a = sample();
        let inv = a.partial_piv_lu().inverse();
        assert_approx_eq!(a * inv, Matrix4d::identity()).abs(1e-12);
        assert_approx_eq!(inv * a, Matrix4d::identity()).abs(1e-12);
        assert_approx_eq!(a.inverse(), inv).abs(1e-12);
    }

    #[test]
    fn inverse_f32() {
        let a = Matrix4f::from_fn(|row, col| if row == col { 2.0 } else { 0.5 });
        let inv = a.inverse();
        assert!((a * inv).is_approx_eps(&Matrix4f::identity(), 1e-5));
    }

    #[test]
    fn singular() {
        init_logger();
        #[rustfmt::skip]
        let a = Matrix4d::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [2.0, 4.0, 6.0, 8.0],
            [0.0, 1.0, 0.0, 1.0],
            [5.0, 0.0, 1.0, 0.0],
        ]);
        let lu = a.partial_piv_lu();
        assert_approx_eq!(lu.determinant(), 0.0).abs(1e-12);
        assert_eq!(lu.inverse(), Matrix4d::ZERO);
        assert!(lu.try_inverse().is_err());
        assert_eq!(lu.solve(&vec4(1.0, 2.0, 3.0, 4.0)), Vector4d::ZERO);

        let zero = Matrix4d::ZERO.partial_piv_lu();
        assert_eq!(zero.determinant(), 0.0);
        assert_eq!(zero.transpositions(), &[0, 1, 2, 3]);
        assert_eq!(zero.inverse(), Matrix4d::ZERO);
    }

    #[test]
    fn solve() {
        let a = sample();
        let x = vec4(1.0, -2.0, 0.5, 3.0);
        let b = a * x;
        let lu = a.partial_piv_lu();
        assert_approx_eq!(lu.solve(&b), x).abs(1e-12);

        // Multiple right-hand sides at once.
        let rhs = a * Matrix::<f64, 4, 2>::from_fn(|row, col| (row + col) as f64);
        let sol = lu.try_solve(&rhs).unwrap();
        assert_approx_eq!(sol, Matrix::from_fn(|row, col| (row + col) as f64)).abs(1e-12);
    }
}
