//! A small, allocation-free linear algebra library for embedded and real-time code.
//!
//! Provides fixed-size matrices and vectors ([`Matrix`], [`Vector`]), quaternions
//! ([`Quaternion`]), aliasing sub-block views ([`ViewRef`]) and a partial-pivoting LU
//! decomposition ([`PartialPivLu`]).
//!
//! # Example
//!
//! ```
//! use embedded_math::*;
//!
//! let m = Matrix3f::from_rows([
//!     [2.0, 0.0, 0.0],
//!     [0.0, 4.0, 0.0],
//!     [0.0, 0.0, 8.0],
//! ]);
//! assert_eq!(m.determinant(), 64.0);
//! assert_eq!(m.inverse() * vec3(2.0, 4.0, 8.0), vec3(1.0, 1.0, 1.0));
//!
//! let q = Quaternionf::from_rotation_z(std::f32::consts::FRAC_PI_2);
//! assert_approx_eq!(q * vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)).abs(1e-6);
//! ```
//!
//! # Goals & Non-Goals
//!
//! - Never allocate. Every value lives inline, and dimensions are const generic parameters. There
//!   is no support for dynamically-sized vectors and matrices.
//! - Support only a single, column-major, unpadded data layout for matrices and vectors. Vectors
//!   are single-column matrices, so everything that works on matrices works on vectors.
//! - Reject shape mismatches at compile time. Operations on invalid shapes (eg. a zero-sized
//!   matrix, or `z()` on a 2D vector) fail to build instead of panicking.
//! - Be generic over the element type, but don't try to support non-[`Copy`] numeric types (eg.
//!   "big decimals").
//! - Be deterministic: results depend only on the inputs, never on allocation or thread state.
//! - Don't make promises about numerical stability for ill-conditioned input. Inversion uses
//!   closed forms up to 3x3 and LU with partial pivoting beyond that.
//!
//! # Cargo features
//!
//! - `prefetch` (enabled by default): issue cache prefetch hints before the unrolled 2x2, 3x3 and
//!   4x4 matrix products on `x86_64`. Has no effect on other targets.
//!
//! # Logging
//!
//! Operations that fall back to a documented default result (like inverting a singular matrix)
//! emit a [`log`] record at `debug` level. Pivoting decisions of the LU decomposition are logged
//! at `trace` level.

pub mod approx;
mod error;
mod lu;
mod matrix;
mod quat;
mod traits;
mod vector;
mod view;

pub use error::*;
pub use lu::*;
pub use matrix::*;
pub use quat::*;
pub use traits::*;
pub use vector::*;
pub use view::*;
