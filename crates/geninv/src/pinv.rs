use crate::error::{check_len, InverseError};
use crate::narrow::{buffer_len, narrow};
use crate::svd::svd;

/// Compute the truncated Moore-Penrose pseudo-inverse of a matrix.
///
/// The matrix is decomposed as `A = U * diag(S) * Vt` and the pseudo-inverse is rebuilt as
///
/// `Ai[i, j] = sum_k Vt[k, i] * (1 / S[k]) * U[j, k]`
///
/// where only the singular values `S[k] > tol` contribute. Values at or below `tol` are
/// left out of the sum entirely, so a matrix whose singular values are all below the
/// cutoff yields the zero matrix.
///
/// # Arguments
///
/// * `a` - The `m x n` input matrix in column-major order, consumed by the decomposition.
/// * `m` - The number of rows.
/// * `n` - The number of columns.
/// * `tol` - The singular value cutoff, a non-negative number.
/// * `ai` - A pre-allocated `n x m` buffer that receives the pseudo-inverse in column-major order.
///
/// # Returns
///
/// The number of singular values kept, i.e. the numerical rank of `a` at `tol`.
///
/// Example:
///
/// ```
/// use geninv::pseudo_inverse;
///
/// // rows: [2, 0, 0], [0, 0, 0]
/// let a = vec![2.0, 0.0, 0.0, 0.0, 0.0, 0.0];
/// let mut ai = vec![0.0; 6];
/// let rank = pseudo_inverse(a, 2, 3, 1e-10, &mut ai).unwrap();
/// assert_eq!(rank, 1);
/// assert!((ai[0] - 0.5).abs() < 1e-12);
/// assert!(ai[1..].iter().all(|v| v.abs() < 1e-12));
/// ```
pub fn pseudo_inverse(
    a: Vec<f64>,
    m: usize,
    n: usize,
    tol: f64,
    ai: &mut [f64],
) -> Result<usize, InverseError> {
    narrow(m)?;
    narrow(n)?;
    if tol.is_nan() || tol < 0.0 {
        return Err(InverseError::InvalidTolerance(tol));
    }
    check_len("ai", ai, buffer_len(n, m)?)?;

    let min_mn = m.min(n);
    let mut u = vec![0.0; buffer_len(m, m)?];
    let mut s = vec![0.0; min_mn];
    let mut vt = vec![0.0; buffer_len(n, n)?];

    svd(a, m, n, &mut u, &mut s, &mut vt)?;

    let kept = s.iter().filter(|&&sk| sk > tol).count();
    log::debug!(
        "keeping {} of {} singular values above {} for a {}x{} matrix",
        kept,
        min_mn,
        tol,
        m,
        n
    );

    for i in 0..n {
        for j in 0..m {
            let mut acc = 0.0;
            for k in 0..min_mn {
                if s[k] > tol {
                    acc += vt[k + i * n] * (1.0 / s[k]) * u[j + k * m];
                }
            }
            ai[i + j * n] = acc;
        }
    }

    Ok(kept)
}
