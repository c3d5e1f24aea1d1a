//! Scalar traits the containers are generic over.

use std::{fmt, ops};

/// Types that have a "zero" value (an additive identity).
pub trait Zero {
    /// The *0* value of this type.
    const ZERO: Self;
}

/// Types that have a "one" value (a multiplicative identity).
pub trait One {
    /// The *1* value of this type.
    const ONE: Self;
}

/// A trait for numeric types that support basic arithmetic operations.
///
/// This is blanket-implemented for every type with the required operator impls, so the built-in
/// integer and floating-point types all qualify. Element types are always [`Copy`]; there is no
/// support for "big number" types.
pub trait Number:
    Zero
    + One
    + ops::Neg<Output = Self>
    + ops::Add<Output = Self>
    + ops::Sub<Output = Self>
    + ops::Mul<Output = Self>
    + ops::Div<Output = Self>
    + PartialEq
    + Copy
{
}
impl<T> Number for T where
    T: Zero
        + One
        + ops::Neg<Output = Self>
        + ops::Add<Output = Self>
        + ops::Sub<Output = Self>
        + ops::Mul<Output = Self>
        + ops::Div<Output = Self>
        + PartialEq
        + Copy
{
}

/// Types that support computing their square root.
pub trait Sqrt {
    fn sqrt(self) -> Self;
}

/// Types that have an absolute value.
pub trait Abs {
    fn abs(self) -> Self;
}

/// Types that support the trigonometric functions.
pub trait Trig: Sized {
    /// Computes the sine of the angle `self` (in radians).
    fn sin(self) -> Self;
    /// Computes the cosine of the angle `self` (in radians).
    fn cos(self) -> Self;
    fn asin(self) -> Self;
    fn atan2(self, other: Self) -> Self;

    /// Computes sine and cosine of `self` at once.
    fn sin_cos(self) -> (Self, Self)
    where
        Self: Copy,
    {
        (self.sin(), self.cos())
    }
}

/// Types that support a `min` and `max` operation.
///
/// Only implemented for [`f32`] and [`f64`], in terms of their inherent `min` and `max`, so a
/// `NaN` operand is ignored in favour of the other one. Integers already get these from [`Ord`].
pub trait MinMax: Sized {
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;
    fn clamp(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }
}

/// Floating-point scalars.
///
/// Everything that needs a square root, a division that may not be exact, or a tolerance is
/// bounded on this trait: norms, inversion, decompositions and rotations.
pub trait Real: Number + Sqrt + Abs + Trig + MinMax + PartialOrd + fmt::Debug {
    /// Tolerance used by [`Matrix::is_approx`], the singularity check of the matrix inverse, and
    /// the gimbal-lock threshold of [`Quaternion::to_euler_angles`].
    ///
    /// This is the machine epsilon of [`f32`] (`1.1920929e-7`) for *both* [`f32`] and [`f64`], so a
    /// matrix is classified as singular the same way at either precision.
    ///
    /// [`Matrix::is_approx`]: crate::Matrix::is_approx
    /// [`Quaternion::to_euler_angles`]: crate::Quaternion::to_euler_angles
    const EPSILON: Self;

    /// Archimedes' constant.
    const PI: Self;

    /// `0.5`.
    const HALF: Self;
}

macro_rules! int_impls {
    ($($types:ty),+) => {
        $(
            impl Zero for $types {
                const ZERO: Self = 0;
            }

            impl One for $types {
                const ONE: Self = 1;
            }
        )+
    };
}
int_impls!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

macro_rules! signed_int_abs {
    ($($types:ty),+) => {
        $(
            impl Abs for $types {
                fn abs(self) -> Self {
                    <$types>::abs(self)
                }
            }
        )+
    };
}
signed_int_abs!(i8, i16, i32, i64, i128);

macro_rules! float_impls {
    ($($types:ident),+) => {
        $(
            impl Zero for $types {
                const ZERO: Self = 0.0;
            }

            impl One for $types {
                const ONE: Self = 1.0;
            }

            impl MinMax for $types {
                fn min(self, other: Self) -> Self {
                    <$types>::min(self, other)
                }

                fn max(self, other: Self) -> Self {
                    <$types>::max(self, other)
                }
            }

            impl Sqrt for $types {
                fn sqrt(self) -> Self {
                    <$types>::sqrt(self)
                }
            }

            impl Abs for $types {
                fn abs(self) -> Self {
                    <$types>::abs(self)
                }
            }

            impl Trig for $types {
                fn sin(self) -> Self {
                    <$types>::sin(self)
                }

                fn cos(self) -> Self {
                    <$types>::cos(self)
                }

                fn asin(self) -> Self {
                    <$types>::asin(self)
                }

                fn atan2(self, other: Self) -> Self {
                    <$types>::atan2(self, other)
                }

                fn sin_cos(self) -> (Self, Self) {
                    <$types>::sin_cos(self)
                }
            }

            impl Real for $types {
                const EPSILON: Self = f32::EPSILON as $types;
                const PI: Self = std::$types::consts::PI;
                const HALF: Self = 0.5;
            }
        )+
    };
}
float_impls!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsilon_is_not_widened() {
        assert_eq!(<f32 as Real>::EPSILON, 1.1920929e-7);
        assert_eq!(<f64 as Real>::EPSILON, f32::EPSILON as f64);
    }

    #[test]
    fn min_max_clamp() {
        assert_eq!(MinMax::clamp(5.0f32, 0.0, 3.0), 3.0);
        assert_eq!(MinMax::clamp(-2.0f64, -1.0, 1.0), -1.0);
        assert_eq!(MinMax::max(f32::NAN, 1.0f32), 1.0);
    }
}
