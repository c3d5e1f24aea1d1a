//! Matrix product kernels.
//!
//! All kernels operate on column-major buffers: `a` is `m x n`, `b` is `n x p`, and the result `c`
//! is `m x p`. Products of two square matrices up to 4x4 are unrolled. Every other shape goes
//! through [`mul_generic`], including a square result with a different inner dimension (like
//! `4x2 * 2x4`).

use crate::{traits::Number, Matrix};

pub(super) fn matmul<T: Number, const M: usize, const N: usize, const P: usize>(
    lhs: &Matrix<T, M, N>,
    rhs: &Matrix<T, N, P>,
) -> Matrix<T, M, P> {
    let mut out = Matrix::<T, M, P>::ZERO;
    let (a, b, c) = (lhs.as_slice(), rhs.as_slice(), out.as_mut_slice());
    match (M, N, P) {
        (1, 1, 1) => c[0] = a[0] * b[0],
        (2, 2, 2) => {
            prefetch_hint(b);
            mul_2x2(a, b, c);
        }
        (3, 3, 3) => {
            prefetch_hint(b);
            mul_3x3(a, b, c);
        }
        (4, 4, 4) => {
            prefetch_hint(b);
            mul_4x4(a, b, c);
        }
        _ => mul_generic(a, b, c, M, N, P),
    }
    out
}

#[inline(always)]
fn mul_2x2<T: Number>(a: &[T], b: &[T], c: &mut [T]) {
    let (a, b, c) = (&a[..4], &b[..4], &mut c[..4]);
    c[0] = a[0] * b[0] + a[2] * b[1];
    c[1] = a[1] * b[0] + a[3] * b[1];
    c[2] = a[0] * b[2] + a[2] * b[3];
    c[3] = a[1] * b[2] + a[3] * b[3];
}

#[inline(always)]
fn mul_3x3<T: Number>(a: &[T], b: &[T], c: &mut [T]) {
    let (a, b, c) = (&a[..9], &b[..9], &mut c[..9]);
    for j in 0..3 {
        let (b0, b1, b2) = (b[3 * j], b[3 * j + 1], b[3 * j + 2]);
        for i in 0..3 {
            c[3 * j + i] = a[i] * b0 + a[3 + i] * b1 + a[6 + i] * b2;
        }
    }
}

#[inline(always)]
fn mul_4x4<T: Number>(a: &[T], b: &[T], c: &mut [T]) {
    let (a, b, c) = (&a[..16], &b[..16], &mut c[..16]);
    for j in 0..4 {
        let (b0, b1, b2, b3) = (b[4 * j], b[4 * j + 1], b[4 * j + 2], b[4 * j + 3]);
        for i in 0..4 {
            c[4 * j + i] = a[i] * b0 + a[4 + i] * b1 + a[8 + i] * b2 + a[12 + i] * b3;
        }
    }
}

/// Fallback for arbitrary shapes.
///
/// The inner dimension is consumed two elements at a time, with a scalar step for odd `n`.
fn mul_generic<T: Number>(a: &[T], b: &[T], c: &mut [T], m: usize, n: usize, p: usize) {
    for j in 0..p {
        let b_col = &b[j * n..][..n];
        for i in 0..m {
            let mut acc = T::ZERO;
            let mut pairs = b_col.chunks_exact(2);
            let mut k = 0;
            for pair in &mut pairs {
                acc = acc + a[k * m + i] * pair[0] + a[(k + 1) * m + i] * pair[1];
                k += 2;
            }
            if let [last] = *pairs.remainder() {
                acc = acc + a[k * m + i] * last;
            }
            c[j * m + i] = acc;
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(all(feature = "prefetch", target_arch = "x86_64"))] {
        const CACHE_LINE_SIZE: usize = 64;

        /// Prefetches `data` into all cache levels, one 64-byte cache line at a time.
        #[inline(always)]
        fn prefetch_hint<T>(data: &[T]) {
            use std::arch::x86_64::*;

            let lines = std::mem::size_of_val(data).div_ceil(CACHE_LINE_SIZE);
            let ptr = data.as_ptr().cast::<i8>();
            for line in 0..lines {
                // SAFETY: the offset stays within `data`, and SSE is part of the x86_64 baseline.
                unsafe { _mm_prefetch(ptr.add(line * CACHE_LINE_SIZE), _MM_HINT_T0) }
            }
        }
    } else {
        #[inline(always)]
        fn prefetch_hint<T>(_data: &[T]) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample<const R: usize, const C: usize>(seed: i32) -> Matrix<f64, R, C> {
        Matrix::from_fn(|row, col| ((row * 7 + col * 3) as i32 % 5 - 2 + seed) as f64)
    }

    fn check_against_generic<const N: usize>() {
        let a = sample::<N, N>(1);
        let b = sample::<N, N>(-1);

        let mut expected = Matrix::<f64, N, N>::ZERO;
        mul_generic(a.as_slice(), b.as_slice(), expected.as_mut_slice(), N, N, N);

        // Integer-valued inputs keep every partial sum exact.
        assert_eq!(matmul(&a, &b), expected, "{N}x{N} kernel");
    }

    #[test]
    fn unrolled_kernels_match_generic() {
        check_against_generic::<1>();
        check_against_generic::<2>();
        check_against_generic::<3>();
        check_against_generic::<4>();
    }

    #[test]
    fn generic_shapes() {
        // 2x3 * 3x1 with an odd inner dimension exercises the remainder step.
        let a = Matrix::from_rows([[1, 2, 3], [4, 5, 6]]);
        let b = Matrix::from_columns([[1, 1, 1]]);
        assert_eq!(matmul(&a, &b), Matrix::from_columns([[6, 15]]));

        let a = sample::<5, 5>(0);
        assert_eq!(matmul(&a, &Matrix::identity()), a);
        assert_eq!(matmul(&Matrix::identity(), &a), a);
    }

    fn check_inner<const M: usize, const N: usize, const P: usize>() {
        let a = sample::<M, N>(2);
        let b = sample::<N, P>(-3);
        let expected = Matrix::<f64, M, P>::from_fn(|row, col| {
            (0..N).map(|k| a[(row, k)] * b[(k, col)]).sum()
        });
        assert_eq!(matmul(&a, &b), expected, "{M}x{N} * {N}x{P}");
    }

    #[test]
    fn square_result_with_other_inner_dimension() {
        check_inner::<4, 2, 4>();
        check_inner::<2, 3, 2>();
        check_inner::<3, 1, 3>();
        check_inner::<2, 4, 2>();
    }
}
