use crate::error::{check_len, InverseError};
use crate::narrow::{buffer_len, narrow, svd_work_len};

/// Compute the full singular value decomposition `A = U * diag(S) * Vt`.
///
/// The input matrix is taken by value: the decomposition consumes it and the caller
/// must hand over a copy if the original values are still needed.
///
/// # Arguments
///
/// * `a` - The `m x n` input matrix in column-major order.
/// * `m` - The number of rows.
/// * `n` - The number of columns.
/// * `u` - Output `m x m` orthogonal matrix of left singular vectors, column-major.
/// * `s` - Output `min(m, n)` singular values in descending order.
/// * `vt` - Output `n x n` orthogonal matrix of transposed right singular vectors, column-major.
///
/// # Errors
///
/// [`InverseError::DimensionOverflow`] leaves every output untouched. On
/// [`InverseError::DecompositionNonConvergent`] the outputs are unspecified.
pub fn svd(
    a: Vec<f64>,
    m: usize,
    n: usize,
    u: &mut [f64],
    s: &mut [f64],
    vt: &mut [f64],
) -> Result<(), InverseError> {
    let rows = narrow(m)?;
    let cols = narrow(n)?;
    // faer allocates its own scratch; the length is only computed to reject sizes whose
    // workspace would overflow i32
    svd_work_len(rows, cols)?;

    check_len("a", &a, buffer_len(m, n)?)?;
    check_len("u", u, buffer_len(m, m)?)?;
    check_len("s", s, m.min(n))?;
    check_len("vt", vt, buffer_len(n, n)?)?;
    if m == 0 || n == 0 {
        return Err(InverseError::EmptyMatrix(m, n));
    }

    if a.iter().any(|v| !v.is_finite()) {
        log::warn!("non-finite entries in a {}x{} matrix, not decomposing", m, n);
        return Err(InverseError::DecompositionNonConvergent(m, n));
    }

    let dec = faer::mat::from_column_major_slice::<f64, usize, usize>(&a, m, n).svd();
    let (dec_u, dec_s, dec_v) = (dec.u(), dec.s_diagonal(), dec.v());

    for j in 0..m {
        for i in 0..m {
            u[i + j * m] = dec_u.read(i, j);
        }
    }
    for (k, sk) in s.iter_mut().enumerate() {
        *sk = dec_s.read(k);
    }
    for j in 0..n {
        for i in 0..n {
            vt[i + j * n] = dec_v.read(j, i);
        }
    }

    let finite = |buf: &[f64]| buf.iter().all(|v| v.is_finite());
    if !(finite(u) && finite(s) && finite(vt)) {
        log::warn!("SV decomposition of a {}x{} matrix did not converge", m, n);
        return Err(InverseError::DecompositionNonConvergent(m, n));
    }

    Ok(())
}

/// Owned result of a full singular value decomposition.
///
/// Example:
///
/// ```
/// use geninv::Svd;
///
/// // rows: [3, 0], [0, -2]
/// let dec = Svd::compute(vec![3.0, 0.0, 0.0, -2.0], 2, 2).unwrap();
/// assert_eq!(dec.s().len(), 2);
/// assert!((dec.s()[0] - 3.0).abs() < 1e-12);
/// assert!((dec.s()[1] - 2.0).abs() < 1e-12);
/// assert_eq!(dec.rank(2.5), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Svd {
    m: usize,
    n: usize,
    u: Vec<f64>,
    s: Vec<f64>,
    vt: Vec<f64>,
}

impl Svd {
    /// Decompose the `m x n` column-major matrix `a`, allocating the three factors.
    pub fn compute(a: Vec<f64>, m: usize, n: usize) -> Result<Self, InverseError> {
        let mut u = vec![0.0; buffer_len(m, m)?];
        let mut s = vec![0.0; m.min(n)];
        let mut vt = vec![0.0; buffer_len(n, n)?];

        svd(a, m, n, &mut u, &mut s, &mut vt)?;

        Ok(Self { m, n, u, s, vt })
    }

    /// Number of rows of the decomposed matrix.
    pub fn nrows(&self) -> usize {
        self.m
    }

    /// Number of columns of the decomposed matrix.
    pub fn ncols(&self) -> usize {
        self.n
    }

    /// Left singular vectors, `m x m` column-major.
    pub fn u(&self) -> &[f64] {
        &self.u
    }

    /// Singular values in descending order.
    pub fn s(&self) -> &[f64] {
        &self.s
    }

    /// Transposed right singular vectors, `n x n` column-major.
    pub fn vt(&self) -> &[f64] {
        &self.vt
    }

    /// Number of singular values strictly greater than `tol`.
    pub fn rank(&self, tol: f64) -> usize {
        self.s.iter().filter(|&&sk| sk > tol).count()
    }

    /// Rebuild `U * diag(S) * Vt` as an `m x n` column-major matrix.
    pub fn reconstruct(&self) -> Vec<f64> {
        let (m, n) = (self.m, self.n);
        let mut a = vec![0.0; m * n];
        for (k, &sk) in self.s.iter().enumerate() {
            for j in 0..n {
                let w = sk * self.vt[k + j * n];
                for i in 0..m {
                    a[i + j * m] += self.u[i + k * m] * w;
                }
            }
        }
        a
    }
}
