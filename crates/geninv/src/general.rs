use serde::{Deserialize, Serialize};

use crate::error::{check_len, InverseError};
use crate::inverse::{small_inverse, square_inverse};
use crate::layout::{norm_frobenius, norm_inf};
use crate::narrow::{buffer_len, narrow};
use crate::pinv::pseudo_inverse;

/// Parameters of the general inverse and the condition number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InverseParams {
    /// Singular values at or below this cutoff are dropped from the pseudo-inverse.
    pub tolerance: f64,
    /// Smallest accepted absolute determinant of the closed-form small inverse.
    pub det_tolerance: f64,
}

impl Default for InverseParams {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            det_tolerance: 1e-14,
        }
    }
}

/// Matrix norm used by [`condition_number`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Square root of the sum of the squared entries.
    #[default]
    Frobenius,
    /// Largest absolute row sum.
    Infinity,
}

/// Invert a matrix of any shape.
///
/// Square matrices up to `3 x 3` use the closed-form [`small_inverse`], larger square
/// matrices the LU based [`square_inverse`] and rectangular matrices the truncated
/// [`pseudo_inverse`] of a copy of `a`.
///
/// # Arguments
///
/// * `a` - The `m x n` input matrix in column-major order. It is not modified.
/// * `m` - The number of rows.
/// * `n` - The number of columns.
/// * `params` - The tolerances of the closed-form inverse and the pseudo-inverse.
/// * `ai` - A pre-allocated `n x m` buffer that receives the inverse in column-major order.
///
/// Example:
///
/// ```
/// use geninv::{general_inverse, InverseParams};
///
/// // rows: [1, 0], [0, 2], [0, 0]
/// let a = [1.0, 0.0, 0.0, 0.0, 2.0, 0.0];
/// let mut ai = [0.0; 6];
/// general_inverse(&a, 3, 2, &InverseParams::default(), &mut ai).unwrap();
/// assert_eq!(ai.map(|v| (v * 1e12).round() / 1e12), [1.0, 0.0, 0.0, 0.5, 0.0, 0.0]);
/// ```
pub fn general_inverse(
    a: &[f64],
    m: usize,
    n: usize,
    params: &InverseParams,
    ai: &mut [f64],
) -> Result<(), InverseError> {
    narrow(m)?;
    narrow(n)?;
    if m == 0 || n == 0 {
        return Err(InverseError::EmptyMatrix(m, n));
    }

    if m == n && m < 4 {
        log::debug!("closed-form inverse of a {}x{} matrix", m, n);
        small_inverse(a, m, ai, params.det_tolerance)?;
    } else if m == n {
        log::debug!("LU inverse of a {}x{} matrix", m, n);
        square_inverse(a, m, ai)?;
    } else {
        log::debug!("pseudo-inverse of a {}x{} matrix", m, n);
        check_len("a", a, buffer_len(m, n)?)?;
        pseudo_inverse(a.to_vec(), m, n, params.tolerance, ai)?;
    }

    Ok(())
}

/// Condition number `|A| * |A^+|` of a matrix, using its general inverse.
///
/// Example:
///
/// ```
/// use geninv::{condition_number, InverseParams, Norm};
///
/// // rows: [1, 0], [0, 4]
/// let a = [1.0, 0.0, 0.0, 4.0];
/// let cond = condition_number(&a, 2, 2, Norm::Infinity, &InverseParams::default()).unwrap();
/// assert_eq!(cond, 4.0);
/// ```
pub fn condition_number(
    a: &[f64],
    m: usize,
    n: usize,
    norm: Norm,
    params: &InverseParams,
) -> Result<f64, InverseError> {
    let mut ai = vec![0.0; buffer_len(n, m)?];
    general_inverse(a, m, n, params, &mut ai)?;

    let cond = match norm {
        Norm::Frobenius => norm_frobenius(a, m, n)? * norm_frobenius(&ai, n, m)?,
        Norm::Infinity => norm_inf(a, m, n)? * norm_inf(&ai, n, m)?,
    };

    Ok(cond)
}
