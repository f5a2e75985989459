use faer::prelude::SpSolver;

use crate::error::{check_len, InverseError};
use crate::narrow::{buffer_len, inverse_work_len, narrow};

/// Invert a square matrix using the LU factorization with partial pivoting.
///
/// # Arguments
///
/// * `a` - The `m x m` input matrix in column-major order. It is not modified.
/// * `m` - The number of rows and columns.
/// * `ai` - A pre-allocated `m x m` buffer that receives the inverse in column-major order.
///
/// # Errors
///
/// * [`InverseError::DimensionOverflow`] if `m` does not fit the kernel width. `ai` is untouched.
/// * [`InverseError::FactorizationSingular`] if the factorization finds an exactly zero pivot.
/// * [`InverseError::InversionFailed`] if the inversion of the factors produces non-finite values.
///
/// The content of `ai` is unspecified when an error is returned.
///
/// Example:
///
/// ```
/// use geninv::square_inverse;
///
/// let a = [1.0, 0.0, 0.0, 2.0];
/// let mut ai = [0.0; 4];
/// square_inverse(&a, 2, &mut ai).unwrap();
/// assert_eq!(ai, [1.0, 0.0, 0.0, 0.5]);
/// ```
pub fn square_inverse(a: &[f64], m: usize, ai: &mut [f64]) -> Result<(), InverseError> {
    square_inverse_with_determinant(a, m, ai).map(|_| ())
}

/// Invert a square matrix and return its determinant.
///
/// Same as [`square_inverse`], the determinant is read from the LU factors as the product
/// of the pivots, with the sign flipped once per row transposition.
pub fn square_inverse_with_determinant(
    a: &[f64],
    m: usize,
    ai: &mut [f64],
) -> Result<f64, InverseError> {
    let dim = narrow(m)?;
    let work_len = inverse_work_len(dim)? as usize;

    let len = buffer_len(m, m)?;
    check_len("a", a, len)?;
    check_len("ai", ai, len)?;
    if m == 0 {
        return Err(InverseError::EmptyMatrix(m, m));
    }

    ai.copy_from_slice(a);

    // factorize, the kernel keeps its own copy of the factors
    let lu = faer::mat::from_column_major_slice::<f64, usize, usize>(ai, m, m).partial_piv_lu();
    let pivots = lu_pivots(&lu.compute_u());
    if let Some(k) = pivots.iter().position(|&p| p == 0.0) {
        log::debug!("zero pivot at index {} of a {}x{} matrix", k, m, m);
        return Err(InverseError::FactorizationSingular(k));
    }

    // solve against the identity, one block of columns at a time
    let block_cols = work_len / m;
    let mut work = vec![0.0; work_len];
    for col_start in (0..m).step_by(block_cols) {
        let cols = block_cols.min(m - col_start);
        let block = &mut work[..m * cols];
        block.fill(0.0);
        for j in 0..cols {
            block[col_start + j + j * m] = 1.0;
        }

        let rhs =
            faer::mat::from_column_major_slice_mut::<f64, usize, usize>(&mut *block, m, cols);
        lu.solve_in_place(rhs);

        if block.iter().any(|v| !v.is_finite()) {
            log::debug!("non-finite inverse of a {}x{} matrix", m, m);
            return Err(InverseError::InversionFailed(m));
        }
        ai[col_start * m..(col_start + cols) * m].copy_from_slice(block);
    }

    Ok(signed_product(&pivots, lu.transposition_count()))
}

/// Compute the determinant of a square matrix from its LU factorization.
///
/// A matrix with an exactly zero pivot has a zero determinant; this is not an error.
///
/// Example:
///
/// ```
/// use geninv::determinant;
///
/// let a = [0.0, 1.0, 1.0, 0.0];
/// assert_eq!(determinant(&a, 2).unwrap(), -1.0);
/// ```
pub fn determinant(a: &[f64], m: usize) -> Result<f64, InverseError> {
    narrow(m)?;
    check_len("a", a, buffer_len(m, m)?)?;
    if m == 0 {
        return Err(InverseError::EmptyMatrix(m, m));
    }

    let lu = faer::mat::from_column_major_slice::<f64, usize, usize>(a, m, m).partial_piv_lu();
    let pivots = lu_pivots(&lu.compute_u());

    Ok(signed_product(&pivots, lu.transposition_count()))
}

// L has a unit diagonal, the pivots sit on the diagonal of U.
fn lu_pivots(u: &faer::Mat<f64>) -> Vec<f64> {
    (0..u.nrows()).map(|k| u.read(k, k)).collect()
}

fn signed_product(pivots: &[f64], transpositions: usize) -> f64 {
    let det = pivots.iter().product::<f64>();
    match transpositions % 2 {
        0 => det,
        _ => -det,
    }
}

/// Invert a 1x1, 2x2 or 3x3 matrix with the closed-form adjugate formula.
///
/// # Arguments
///
/// * `a` - The `m x m` input matrix in column-major order.
/// * `m` - The number of rows and columns, at most 3.
/// * `ai` - A pre-allocated `m x m` buffer that receives the inverse.
/// * `det_tol` - Smallest accepted absolute value of the determinant.
///
/// # Returns
///
/// The determinant of `a`. `ai` is only written when the determinant is accepted.
///
/// Example:
///
/// ```
/// use geninv::small_inverse;
///
/// let a = [4.0, 2.0, 7.0, 6.0];
/// let mut ai = [0.0; 4];
/// let det = small_inverse(&a, 2, &mut ai, 1e-12).unwrap();
/// assert_eq!(det, 10.0);
/// assert_eq!(ai, [0.6, -0.2, -0.7, 0.4]);
/// ```
pub fn small_inverse(
    a: &[f64],
    m: usize,
    ai: &mut [f64],
    det_tol: f64,
) -> Result<f64, InverseError> {
    if m == 0 {
        return Err(InverseError::EmptyMatrix(m, m));
    }
    if m > 3 {
        return Err(InverseError::UnsupportedSize(m, m));
    }
    check_len("a", a, m * m)?;
    check_len("ai", ai, m * m)?;

    let at = |i: usize, j: usize| a[i + j * m];

    let det = match m {
        1 => at(0, 0),
        2 => at(0, 0) * at(1, 1) - at(0, 1) * at(1, 0),
        _ => {
            at(0, 0) * (at(1, 1) * at(2, 2) - at(1, 2) * at(2, 1))
                - at(0, 1) * (at(1, 0) * at(2, 2) - at(1, 2) * at(2, 0))
                + at(0, 2) * (at(1, 0) * at(2, 1) - at(1, 1) * at(2, 0))
        }
    };

    if det.abs() < det_tol || det == 0.0 {
        log::debug!("determinant {} of a {}x{} matrix is below {}", det, m, m, det_tol);
        return Err(InverseError::DeterminantBelowTolerance { det, tol: det_tol });
    }

    let mut set = |i: usize, j: usize, val: f64| ai[i + j * m] = val;

    match m {
        1 => set(0, 0, 1.0 / det),
        2 => {
            set(0, 0, at(1, 1) / det);
            set(0, 1, -at(0, 1) / det);
            set(1, 0, -at(1, 0) / det);
            set(1, 1, at(0, 0) / det);
        }
        _ => {
            set(0, 0, (at(1, 1) * at(2, 2) - at(1, 2) * at(2, 1)) / det);
            set(0, 1, (at(0, 2) * at(2, 1) - at(0, 1) * at(2, 2)) / det);
            set(0, 2, (at(0, 1) * at(1, 2) - at(0, 2) * at(1, 1)) / det);

            set(1, 0, (at(1, 2) * at(2, 0) - at(1, 0) * at(2, 2)) / det);
            set(1, 1, (at(0, 0) * at(2, 2) - at(0, 2) * at(2, 0)) / det);
            set(1, 2, (at(0, 2) * at(1, 0) - at(0, 0) * at(1, 2)) / det);

            set(2, 0, (at(1, 0) * at(2, 1) - at(1, 1) * at(2, 0)) / det);
            set(2, 1, (at(0, 1) * at(2, 0) - at(0, 0) * at(2, 1)) / det);
            set(2, 2, (at(0, 0) * at(1, 1) - at(0, 1) * at(1, 0)) / det);
        }
    }

    Ok(det)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SENTINEL: f64 = -12345.0;

    // column-major product of an (m x k) and a (k x n) matrix
    fn matmul(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
        let mut c = vec![0.0; m * n];
        for j in 0..n {
            for p in 0..k {
                for i in 0..m {
                    c[i + j * m] += a[i + p * m] * b[p + j * k];
                }
            }
        }
        c
    }

    #[test]
    fn test_square_inverse_diagonal() -> Result<(), InverseError> {
        let a = [1.0, 0.0, 0.0, 2.0];
        let mut ai = [SENTINEL; 4];
        square_inverse(&a, 2, &mut ai)?;
        assert_eq!(ai, [1.0, 0.0, 0.0, 0.5]);
        Ok(())
    }

    #[test]
    fn test_square_inverse_3x3() -> Result<(), InverseError> {
        // rows: [1, 2, 3], [0, 4, 5], [1, 0, 6]
        let a = [1.0, 0.0, 1.0, 2.0, 4.0, 0.0, 3.0, 5.0, 6.0];
        let mut ai = [0.0; 9];
        let det = square_inverse_with_determinant(&a, 3, &mut ai)?;
        assert_relative_eq!(det, 22.0, epsilon = 1e-12);

        // rows: [12/11, -6/11, -1/11], [5/22, 3/22, -5/22], [-2/11, 1/11, 2/11]
        let expected = [
            12.0 / 11.0,
            5.0 / 22.0,
            -2.0 / 11.0,
            -6.0 / 11.0,
            3.0 / 22.0,
            1.0 / 11.0,
            -1.0 / 11.0,
            -5.0 / 22.0,
            2.0 / 11.0,
        ];
        for (x, y) in ai.iter().zip(expected.iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-14);
        }
        Ok(())
    }

    #[test]
    fn test_square_inverse_blocked() -> Result<(), InverseError> {
        // larger than one block of columns
        let m = 21;
        let a = (0..m * m)
            .map(|idx| {
                let (i, j) = (idx % m, idx / m);
                match i == j {
                    true => m as f64 + 1.0,
                    false => 1.0 / (1.0 + i as f64 + 2.0 * j as f64),
                }
            })
            .collect::<Vec<_>>();
        let mut ai = vec![0.0; m * m];
        square_inverse(&a, m, &mut ai)?;

        let prod = matmul(&ai, &a, m, m, m);
        for j in 0..m {
            for i in 0..m {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(prod[i + j * m], expected, epsilon = 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn test_square_inverse_singular() {
        let a = [1.0, 1.0, 1.0, 1.0];
        let mut ai = [0.0; 4];
        let res = square_inverse(&a, 2, &mut ai);
        assert_eq!(res, Err(InverseError::FactorizationSingular(1)));
    }

    #[test]
    fn test_square_inverse_zero_column() {
        let a = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 7.0];
        let mut ai = [0.0; 9];
        let res = square_inverse(&a, 3, &mut ai);
        assert_eq!(res, Err(InverseError::FactorizationSingular(0)));
    }

    #[test]
    fn test_square_inverse_not_finite() {
        // rows: [2, nan], [1, 1]
        let a = [2.0, 1.0, f64::NAN, 1.0];
        let mut ai = [0.0; 4];
        let res = square_inverse(&a, 2, &mut ai);
        assert_eq!(res, Err(InverseError::InversionFailed(2)));
    }

    #[test]
    fn test_square_inverse_overflow_keeps_output() {
        let m = i32::MAX as usize + 1;
        let a = [1.0; 4];
        let mut ai = [SENTINEL; 4];
        let res = square_inverse(&a, m, &mut ai);
        assert_eq!(res, Err(InverseError::DimensionOverflow(m)));
        assert!(ai.iter().all(|&v| v == SENTINEL));
    }

    #[test]
    fn test_square_inverse_buffer_length() {
        let a = [1.0; 4];
        let mut ai = [SENTINEL; 3];
        let res = square_inverse(&a, 2, &mut ai);
        assert_eq!(
            res,
            Err(InverseError::BufferLength {
                name: "ai",
                expected: 4,
                actual: 3
            })
        );
        assert!(ai.iter().all(|&v| v == SENTINEL));
    }

    #[test]
    fn test_determinant() -> Result<(), InverseError> {
        assert_eq!(determinant(&[0.0, 1.0, 1.0, 0.0], 2)?, -1.0);
        assert_eq!(determinant(&[1.0, 1.0, 1.0, 1.0], 2)?, 0.0);
        // rows: [1, 2, 3], [0, 4, 5], [1, 0, 6]
        let a = [1.0, 0.0, 1.0, 2.0, 4.0, 0.0, 3.0, 5.0, 6.0];
        assert_relative_eq!(determinant(&a, 3)?, 22.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_determinant_with_row_swaps() -> Result<(), InverseError> {
        // rows: [1, 4, 2], [3, 1, 5], [6, 2, 1]: the first pivot comes from the last row
        let a = [1.0, 3.0, 6.0, 4.0, 1.0, 2.0, 2.0, 5.0, 1.0];
        let mut lu = [0.0; 9];
        let mut closed = [0.0; 9];
        let det = square_inverse_with_determinant(&a, 3, &mut lu)?;
        let expected = small_inverse(&a, 3, &mut closed, 1e-12)?;

        assert_eq!(expected, 99.0);
        assert_relative_eq!(det, expected, epsilon = 1e-12);
        assert_relative_eq!(determinant(&a, 3)?, expected, epsilon = 1e-12);
        for (x, y) in lu.iter().zip(closed.iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_small_inverse() -> Result<(), InverseError> {
        let mut ai = [0.0; 1];
        assert_eq!(small_inverse(&[4.0], 1, &mut ai, 1e-12)?, 4.0);
        assert_eq!(ai, [0.25]);

        // rows: [1, 2, 3], [0, 4, 5], [1, 0, 6]
        let a = [1.0, 0.0, 1.0, 2.0, 4.0, 0.0, 3.0, 5.0, 6.0];
        let mut small = [0.0; 9];
        let mut lu = [0.0; 9];
        let det = small_inverse(&a, 3, &mut small, 1e-12)?;
        square_inverse(&a, 3, &mut lu)?;
        assert_eq!(det, 22.0);
        for (x, y) in small.iter().zip(lu.iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-14);
        }
        Ok(())
    }

    #[test]
    fn test_small_inverse_rejects() {
        let mut ai = [SENTINEL; 4];
        let res = small_inverse(&[1.0, 2.0, 2.0, 4.0], 2, &mut ai, 1e-12);
        assert_eq!(
            res,
            Err(InverseError::DeterminantBelowTolerance { det: 0.0, tol: 1e-12 })
        );
        assert!(ai.iter().all(|&v| v == SENTINEL));

        let mut big = [0.0; 16];
        assert_eq!(
            small_inverse(&[0.0; 16], 4, &mut big, 1e-12),
            Err(InverseError::UnsupportedSize(4, 4))
        );
    }
}
