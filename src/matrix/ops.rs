//! Implementations of `std::ops`.

use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use crate::{approx::ApproxEq, traits::Number, Matrix};

impl<T, const R: usize, const C: usize> Index<(usize, usize)> for Matrix<T, R, C> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.0[col][row]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<(usize, usize)> for Matrix<T, R, C> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.0[col][row]
    }
}

/// Linear indexing in storage (column-major) order.
impl<T, const R: usize, const C: usize> Index<usize> for Matrix<T, R, C> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<usize> for Matrix<T, R, C> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.as_mut_slice()[index]
    }
}

// More general `PartialEq` impl than what the derive generates.
impl<T, U, const R: usize, const C: usize> PartialEq<Matrix<U, R, C>> for Matrix<T, R, C>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Matrix<U, R, C>) -> bool {
        self.0.eq(&other.0)
    }
}

impl<T, const R: usize, const C: usize> Eq for Matrix<T, R, C> where T: Eq {}

impl<T, const R: usize, const C: usize> ApproxEq for Matrix<T, R, C>
where
    T: ApproxEq,
{
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
        self.as_slice().abs_diff_eq(other.as_slice(), abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &Self, rel_tolerance: Self::Tolerance) -> bool {
        self.as_slice().rel_diff_eq(other.as_slice(), rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &Self, ulps_tolerance: u32) -> bool {
        self.as_slice().ulps_diff_eq(other.as_slice(), ulps_tolerance)
    }
}

impl<T, const R: usize, const C: usize> Neg for Matrix<T, R, C>
where
    T: Neg<Output = T>,
{
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.map(|elem| -elem)
    }
}

macro_rules! elementwise {
    ($($op:ident::$method:ident, $assign:ident::$assign_method:ident;)+) => {
        $(
            impl<T, const R: usize, const C: usize> $op for Matrix<T, R, C>
            where
                T: $op<Output = T> + Copy,
            {
                type Output = Self;

                fn $method(self, rhs: Self) -> Self::Output {
                    Matrix::from_fn(|row, col| self[(row, col)].$method(rhs[(row, col)]))
                }
            }

            impl<T, const R: usize, const C: usize> $assign for Matrix<T, R, C>
            where
                T: $assign + Copy,
            {
                fn $assign_method(&mut self, rhs: Self) {
                    for (lhs, rhs) in self.as_mut_slice().iter_mut().zip(rhs.as_slice()) {
                        lhs.$assign_method(*rhs);
                    }
                }
            }
        )+
    };
}

elementwise! {
    Add::add, AddAssign::add_assign;
    Sub::sub, SubAssign::sub_assign;
}

macro_rules! scalar {
    ($($op:ident::$method:ident, $assign:ident::$assign_method:ident;)+) => {
        $(
            impl<T, const R: usize, const C: usize> $op<T> for Matrix<T, R, C>
            where
                T: $op<Output = T> + Copy,
            {
                type Output = Self;

                fn $method(self, rhs: T) -> Self::Output {
                    self.map(|elem| elem.$method(rhs))
                }
            }

            impl<T, const R: usize, const C: usize> $assign<T> for Matrix<T, R, C>
            where
                T: $assign + Copy,
            {
                fn $assign_method(&mut self, rhs: T) {
                    for elem in self.as_mut_slice() {
                        elem.$assign_method(rhs);
                    }
                }
            }
        )+
    };
}

scalar! {
    Mul::mul, MulAssign::mul_assign;
    Div::div, DivAssign::div_assign;
}

// Scalar * Matrix, for the built-in types (a blanket impl over `T` is not allowed).
macro_rules! lhs_scalar_mul {
    ($($types:ty),+) => {
        $(
            impl<const R: usize, const C: usize> Mul<Matrix<$types, R, C>> for $types {
                type Output = Matrix<$types, R, C>;

                fn mul(self, rhs: Matrix<$types, R, C>) -> Self::Output {
                    rhs * self
                }
            }
        )+
    };
}

lhs_scalar_mul!(f32, f64, u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

/// Matrix * Matrix.
///
/// Also covers Matrix * Column Vector, since vectors are single-column matrices.
impl<T, const M: usize, const N: usize, const P: usize> Mul<Matrix<T, N, P>> for Matrix<T, M, N>
where
    T: Number,
{
    type Output = Matrix<T, M, P>;

    fn mul(self, rhs: Matrix<T, N, P>) -> Self::Output {
        self.matmul(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use crate::{vec2, vec3, Matrix2f, Matrix3f, Matrix4f, Vector3f};

    use super::*;

    #[test]
    fn add_sub_neg() {
        let a = Matrix2f::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix2f::from_rows([[5.0, 6.0], [7.0, 8.0]]);
        assert_eq!(a + b, Matrix2f::from_rows([[6.0, 8.0], [10.0, 12.0]]));
        assert_eq!(b - a, Matrix2f::splat(4.0));
        assert_eq!(-a, Matrix2f::from_rows([[-1.0, -2.0], [-3.0, -4.0]]));

        let mut c = a;
        c += b;
        c -= a;
        assert_eq!(c, b);
    }

    #[test]
    fn scalar() {
        let v = vec3(1.0f32, 2.0, 3.0);
        assert_eq!(v * 2.0, vec3(2.0, 4.0, 6.0));
        assert_eq!(2.0 * v, vec3(2.0, 4.0, 6.0));
        assert_eq!(v / 2.0, vec3(0.5, 1.0, 1.5));
        assert_eq!(3i32 * vec2(1, 2), vec2(3, 6));

        let mut w = v;
        w *= 4.0;
        w /= 2.0;
        assert_eq!(w, v * 2.0);
        assert_eq!(v.scale(2.0), v * 2.0);
    }

    #[test]
    fn component_mul() {
        let a = vec3(1, 2, 3);
        assert_eq!(a.component_mul(&vec3(4, 5, 6)), vec3(4, 10, 18));
    }

    #[test]
    fn matrix_vector_product() {
        #[rustfmt::skip]
        let m = Matrix::from_rows([
            [1, 2, 3],
            [4, 5, 6],
        ]);
        assert_eq!(m * vec3(1, 0, -1), vec2(-2, -2));

        let m = Matrix3f::identity();
        let v = vec3(1.0, 2.0, 3.0);
        assert_eq!(m * v, v);
        assert_eq!(v.transpose() * m, v.transpose());
    }

    #[test]
    fn matrix_product() {
        let id = Matrix2f::identity();
        let m = Matrix2f::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(m * id, m);
        assert_eq!(id * m, m);
        assert_eq!(m * m, Matrix2f::from_rows([[7.0, 10.0], [15.0, 22.0]]));

        #[rustfmt::skip]
        let a = Matrix4f::from_rows([
            [4.0, 3.0, 2.0, 1.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let b = Matrix4f::from_fn(|row, col| (row * 4 + col + 1) as f32);
        let p = a * b;
        assert_eq!(
            [p[(0, 0)], p[(0, 1)], p[(0, 2)], p[(0, 3)]],
            [50.0, 60.0, 70.0, 80.0],
        );
        assert_eq!(p[(1, 0)], b[(1, 0)]);
    }

    #[test]
    fn outer_product() {
        let col = vec3(1, 2, 3);
        let row = vec2(4, 5).transpose();
        #[rustfmt::skip]
        assert_eq!(col * row, Matrix::from_rows([
            [4, 5],
            [8, 10],
            [12, 15],
        ]));

        let inner = col.transpose() * col;
        assert_eq!(inner[0], 14);
    }

    #[test]
    fn linear_index() {
        let mut v = Vector3f::ZERO;
        v[2] = 1.0;
        assert_eq!(v, Vector3f::unit_z());
    }
}
