#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the inversion routines.
pub mod error;

/// General inverse dispatch and condition number.
pub mod general;

/// Square matrix inverse, determinant and closed-form small inverses.
pub mod inverse;

/// Conversions between nested rows and column-major buffers, and matrix norms.
pub mod layout;

/// Narrowing of caller sizes into the kernel integer width.
pub mod narrow;

/// Truncated Moore-Penrose pseudo-inverse.
pub mod pinv;

/// Full singular value decomposition.
pub mod svd;

pub use crate::error::{status_of, InverseError};
pub use crate::general::{condition_number, general_inverse, InverseParams, Norm};
pub use crate::inverse::{
    determinant, small_inverse, square_inverse, square_inverse_with_determinant,
};
pub use crate::pinv::pseudo_inverse;
pub use crate::svd::{svd, Svd};
