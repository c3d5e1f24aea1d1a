use super::{ApproxEq, DefaultTolerances};

macro_rules! float_approx {
    ($($float:ident => $bits:ident),+) => {$(
        impl DefaultTolerances for $float {
            const DEFAULT_ABS_TOLERANCE: Self = $float::EPSILON;
            const DEFAULT_REL_TOLERANCE: Self = $float::EPSILON;
            const DEFAULT_ULPS_TOLERANCE: u32 = 4;
        }

        impl ApproxEq for $float {
            type Tolerance = $float;

            fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
                // Infinities only match themselves; NaN matches nothing.
                if !self.is_finite() || !other.is_finite() {
                    return self == other;
                }

                (self - other).abs() <= abs_tolerance
            }

            fn rel_diff_eq(&self, other: &Self, rel_tolerance: Self::Tolerance) -> bool {
                if !self.is_finite() || !other.is_finite() {
                    return self == other;
                }

                let largest = self.abs().max(other.abs());
                (self - other).abs() <= largest * rel_tolerance
            }

            fn ulps_diff_eq(&self, other: &Self, ulps_tolerance: u32) -> bool {
                if self.is_nan() || other.is_nan() {
                    return false;
                }
                if self.is_sign_positive() != other.is_sign_positive() {
                    // Only the two zeroes are allowed to straddle the sign.
                    return *self == *other;
                }

                let distance = self.to_bits().abs_diff(other.to_bits());
                distance <= $bits::from(ulps_tolerance)
            }
        }
    )+};
}

float_approx!(f32 => u32, f64 => u64);

impl<'a, T: ApproxEq + ?Sized> ApproxEq for &'a T {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
        (**self).abs_diff_eq(*other, abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &Self, rel_tolerance: Self::Tolerance) -> bool {
        (**self).rel_diff_eq(*other, rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &Self, ulps_tolerance: u32) -> bool {
        (**self).ulps_diff_eq(*other, ulps_tolerance)
    }
}

/// Slices of different lengths never compare equal.
impl<T: ApproxEq> ApproxEq for [T] {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(a, b)| a.abs_diff_eq(b, abs_tolerance))
    }

    fn rel_diff_eq(&self, other: &Self, rel_tolerance: Self::Tolerance) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(a, b)| a.rel_diff_eq(b, rel_tolerance))
    }

    fn ulps_diff_eq(&self, other: &Self, ulps_tolerance: u32) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(a, b)| a.ulps_diff_eq(b, ulps_tolerance))
    }
}

impl<T: ApproxEq, const N: usize> ApproxEq for [T; N] {
    type Tolerance = T::Tolerance;

    fn abs_diff_eq(&self, other: &Self, abs_tolerance: Self::Tolerance) -> bool {
        self[..].abs_diff_eq(&other[..], abs_tolerance)
    }

    fn rel_diff_eq(&self, other: &Self, rel_tolerance: Self::Tolerance) -> bool {
        self[..].rel_diff_eq(&other[..], rel_tolerance)
    }

    fn ulps_diff_eq(&self, other: &Self, ulps_tolerance: u32) -> bool {
        self[..].ulps_diff_eq(&other[..], ulps_tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ulps_counts_representable_values() {
        let next = f32::from_bits(1.0f32.to_bits() + 3);
        assert!(1.0f32.ulps_diff_eq(&next, 3));
        assert!(!1.0f32.ulps_diff_eq(&next, 2));
        assert!(next.ulps_diff_eq(&1.0, 3));
    }

    #[test]
    fn slices() {
        let a = [1.0f64, 2.0, 3.0];
        assert!(a.abs_diff_eq(&[1.0, 2.0, 3.05], 0.1));
        assert!(!a.abs_diff_eq(&[1.0, 2.0, 3.5], 0.1));
        assert!(!a[..].abs_diff_eq(&a[..2], 0.1));
        assert!(a.rel_diff_eq(&a, 0.0));
    }
}
