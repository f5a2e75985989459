use crate::error::{check_len, InverseError};
use crate::narrow::buffer_len;

/// Convert nested row-major rows into a column-major buffer.
///
/// # Returns
///
/// The column-major buffer with the number of rows and columns.
///
/// Example:
///
/// ```
/// use geninv::layout::to_col_major;
///
/// let (a, m, n) = to_col_major(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
/// assert_eq!((m, n), (3, 2));
/// assert_eq!(a, vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
/// ```
pub fn to_col_major<R: AsRef<[f64]>>(
    rows: &[R],
) -> Result<(Vec<f64>, usize, usize), InverseError> {
    let m = rows.len();
    let n = rows.first().map_or(0, |r| r.as_ref().len());

    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.as_ref().len() != n) {
        return Err(InverseError::RaggedRows {
            row,
            expected: n,
            actual: r.as_ref().len(),
        });
    }

    let mut data = vec![0.0; m * n];
    for (i, r) in rows.iter().enumerate() {
        for (j, &v) in r.as_ref().iter().enumerate() {
            data[i + j * m] = v;
        }
    }

    Ok((data, m, n))
}

/// Convert an `m x n` column-major buffer into nested rows.
///
/// The buffer must hold exactly `m * n` values.
pub fn from_col_major(data: &[f64], m: usize, n: usize) -> Result<Vec<Vec<f64>>, InverseError> {
    check_len("data", data, buffer_len(m, n)?)?;
    let rows = (0..m)
        .map(|i| (0..n).map(|j| data[i + j * m]).collect())
        .collect();
    Ok(rows)
}

/// Frobenius norm of an `m x n` column-major matrix.
pub fn norm_frobenius(a: &[f64], m: usize, n: usize) -> Result<f64, InverseError> {
    check_len("a", a, buffer_len(m, n)?)?;
    Ok(a.iter().map(|v| v * v).sum::<f64>().sqrt())
}

/// Infinity norm, the largest absolute row sum, of an `m x n` column-major matrix.
pub fn norm_inf(a: &[f64], m: usize, n: usize) -> Result<f64, InverseError> {
    check_len("a", a, buffer_len(m, n)?)?;
    let norm = (0..m)
        .map(|i| (0..n).map(|j| a[i + j * m].abs()).sum::<f64>())
        .fold(0.0, f64::max);
    Ok(norm)
}
