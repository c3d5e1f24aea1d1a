//! Approximate equality for floating-point values and the containers built from them.
//!
//! Exact `==` is rarely what you want after a few rounds of floating-point arithmetic. The
//! [`ApproxEq`] trait offers three ways of comparing values with a tolerance, and the
//! [`assert_approx_eq!`](crate::assert_approx_eq) and
//! [`assert_approx_ne!`](crate::assert_approx_ne) macros turn them into test assertions.
//!
//! Unlike [`Matrix::is_approx`](crate::Matrix::is_approx), which bounds the Euclidean distance of
//! two matrices, these comparisons are applied element by element.

mod impls;

use std::{fmt, panic::Location};

/// Types that can be compared for *approximate equality*.
///
/// Compound types (matrices, quaternions, slices) compare equal when every pair of corresponding
/// elements does.
///
/// For background on the different comparison methods, see
/// <https://randomascii.wordpress.com/2012/02/25/comparing-floating-point-numbers-2012-edition/>.
pub trait ApproxEq<Rhs: ?Sized = Self> {
    /// Tolerance type for absolute and relative comparisons.
    ///
    /// [`f32`] or [`f64`], matching the element type.
    type Tolerance: DefaultTolerances + Copy;

    /// Returns whether `|self - other| <= abs_tolerance`.
    fn abs_diff_eq(&self, other: &Rhs, abs_tolerance: Self::Tolerance) -> bool;

    /// Returns whether `|self - other| <= max(|self|, |other|) * rel_tolerance`.
    fn rel_diff_eq(&self, other: &Rhs, rel_tolerance: Self::Tolerance) -> bool;

    /// Returns whether at most `ulps_tolerance` representable values lie between `self` and
    /// `other` ([*units in the last place*]).
    ///
    /// `NaN` never compares equal. `-0.0` and `+0.0` compare equal, but any other pair of values
    /// with opposite signs does not.
    ///
    /// [*units in the last place*]: https://en.wikipedia.org/wiki/Unit_in_the_last_place
    fn ulps_diff_eq(&self, other: &Rhs, ulps_tolerance: u32) -> bool;
}

/// Tolerances used when an assertion does not configure any.
pub trait DefaultTolerances {
    /// Tolerance for [`ApproxEq::abs_diff_eq`].
    const DEFAULT_ABS_TOLERANCE: Self;
    /// Tolerance for [`ApproxEq::rel_diff_eq`].
    const DEFAULT_REL_TOLERANCE: Self;
    /// Tolerance for [`ApproxEq::ulps_diff_eq`].
    const DEFAULT_ULPS_TOLERANCE: u32;
}

/// Pending assertion returned by [`assert_approx_eq!`](crate::assert_approx_eq) and
/// [`assert_approx_ne!`](crate::assert_approx_ne).
///
/// The assertion is evaluated when the value is dropped, which is normally at the end of the
/// statement containing the macro. Until then, the comparisons to perform can be selected:
///
/// - [`Asserter::abs`] enables an absolute comparison ([`ApproxEq::abs_diff_eq`]).
/// - [`Asserter::rel`] enables a relative comparison ([`ApproxEq::rel_diff_eq`]).
/// - [`Asserter::ulps`] enables a comparison in ULPs ([`ApproxEq::ulps_diff_eq`]).
///
/// The values count as equal if *any* enabled comparison says so. Without any of these calls, an
/// absolute and a relative comparison with the [`DefaultTolerances`] of the type are performed.
pub struct Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    left: &'a T,
    right: &'a T,
    expect_equal: bool,
    location: &'static Location<'static>,
    msg: Option<fmt::Arguments<'a>>,
    abs: Option<T::Tolerance>,
    rel: Option<T::Tolerance>,
    ulps: Option<u32>,
}

impl<'a, T> Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    #[doc(hidden)]
    #[track_caller]
    pub fn new(
        left: &'a T,
        right: &'a T,
        kind: AssertionKind,
        msg: Option<fmt::Arguments<'a>>,
    ) -> Self {
        Self {
            left,
            right,
            expect_equal: kind == AssertionKind::Eq,
            location: Location::caller(),
            msg,
            abs: None,
            rel: None,
            ulps: None,
        }
    }

    /// Compares the absolute difference of the values against `abs`.
    ///
    /// Works well for values close to zero, including values of opposite sign.
    pub fn abs(&mut self, abs: T::Tolerance) -> &mut Self {
        self.abs = Some(abs);
        self
    }

    /// Compares the absolute difference of the values against `rel` times the larger magnitude.
    ///
    /// Works well for values far from zero. Near zero it needs huge tolerances: any non-zero
    /// value is only within a relative tolerance of 1.0 of zero.
    pub fn rel(&mut self, rel: T::Tolerance) -> &mut Self {
        self.rel = Some(rel);
        self
    }

    /// Counts the representable values between the two values and compares that against `ulps`.
    ///
    /// This adapts to the magnitude of the values automatically, but values of opposite sign are
    /// always far apart, even when both are tiny.
    pub fn ulps(&mut self, ulps: u32) -> &mut Self {
        self.ulps = Some(ulps);
        self
    }

    fn values_equal(&self) -> bool {
        let (abs, rel) = match (self.abs, self.rel, self.ulps) {
            (None, None, None) => (
                Some(T::Tolerance::DEFAULT_ABS_TOLERANCE),
                Some(T::Tolerance::DEFAULT_REL_TOLERANCE),
            ),
            (abs, rel, _) => (abs, rel),
        };

        abs.is_some_and(|tol| self.left.abs_diff_eq(self.right, tol))
            || rel.is_some_and(|tol| self.left.rel_diff_eq(self.right, tol))
            || self.ulps.is_some_and(|tol| self.left.ulps_diff_eq(self.right, tol))
    }
}

impl<'a, T> Drop for Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    // `#[track_caller]` has no effect on `drop`, so the macro's call site is captured in `new` and
    // printed as part of the message instead.
    fn drop(&mut self) {
        if self.values_equal() != self.expect_equal {
            assertion_failed(
                self.left,
                self.right,
                self.expect_equal,
                self.location,
                self.msg,
            );
        }
    }
}

fn assertion_failed(
    left: &dyn fmt::Debug,
    right: &dyn fmt::Debug,
    expect_equal: bool,
    location: &Location<'_>,
    msg: Option<fmt::Arguments<'_>>,
) -> ! {
    let op = if expect_equal { "==" } else { "!=" };
    let msg = match msg {
        Some(msg) => format!(": {msg}"),
        None => String::new(),
    };
    panic!(
        "assertion `left {op} right` failed at {location}{msg}\n  left: {left:?}\n right: {right:?}"
    )
}

#[doc(hidden)]
#[derive(Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssertionKind {
    Eq,
    Ne,
}

/// Asserts that two expressions are approximately equal (using [`ApproxEq`]).
///
/// Works like [`assert_eq!`], but returns an [`Asserter`](crate::approx::Asserter) that selects
/// the comparison method and tolerance. See also [`assert_approx_ne!`].
///
/// # Examples
///
/// Default comparison:
///
/// ```
/// # use embedded_math::*;
/// let sum = (0..10).fold(0.0, |acc, _| acc + 0.1);
/// assert_approx_eq!(sum, 1.0);
/// ```
///
/// Custom tolerances, on scalars and on whole matrices:
///
/// ```
/// # use embedded_math::*;
/// assert_approx_eq!(100.0, 99.0).abs(1.0);
/// assert_approx_eq!(100.0, 99.0).rel(0.01);
/// assert_approx_eq!(1.0, 1.0 + f64::EPSILON).ulps(1);
///
/// let m = Matrix2f::from_rows([[4.0, 3.0], [2.0, 1.0]]);
/// assert_approx_eq!(m * m.inverse(), Matrix2f::identity()).abs(1e-6);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Eq,
            ::core::option::Option::None,
        )
    };
    ($lhs:expr, $rhs:expr, $($arg:tt)+) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Eq,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}

/// Asserts that two expressions are *not* approximately equal (using [`ApproxEq`]).
///
/// Works like [`assert_ne!`], but returns an [`Asserter`](crate::approx::Asserter) that selects
/// the comparison method and tolerance. See also [`assert_approx_eq!`].
///
/// # Examples
///
/// ```
/// # use embedded_math::*;
/// assert_approx_ne!(100.0, 99.0).abs(0.5);
/// assert_approx_ne!(100.0, 99.0).rel(0.005);
/// assert_approx_ne!(1.0, 1.0 + 2.0 * f64::EPSILON).ulps(1);
/// ```
#[macro_export]
macro_rules! assert_approx_ne {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Ne,
            ::core::option::Option::None,
        )
    };
    ($lhs:expr, $rhs:expr, $($arg:tt)+) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Ne,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}
