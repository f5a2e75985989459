use crate::error::InverseError;

/// Integer width of the dimensions, pivots and workspace lengths seen by the kernel.
pub type KernelInt = i32;

/// Column block used to size the scratch of the LU based inversion.
pub const INVERSE_BLOCK_SIZE: KernelInt = 8;

/// Narrow a caller size into the kernel integer width.
///
/// The conversion must round-trip exactly, otherwise the size is rejected.
///
/// Example:
///
/// ```
/// use geninv::narrow::narrow;
///
/// assert_eq!(narrow(3).unwrap(), 3);
/// assert!(narrow(usize::MAX).is_err());
/// ```
pub fn narrow(size: usize) -> Result<KernelInt, InverseError> {
    match KernelInt::try_from(size) {
        Ok(value) if value as usize == size => Ok(value),
        _ => {
            log::debug!("size {} does not fit in the kernel integer width", size);
            Err(InverseError::DimensionOverflow(size))
        }
    }
}

/// Number of entries of an `rows x cols` buffer, rejecting products that overflow.
pub(crate) fn buffer_len(rows: usize, cols: usize) -> Result<usize, InverseError> {
    rows.checked_mul(cols)
        .ok_or(InverseError::DimensionOverflow(rows.max(cols)))
}

/// Length of the scratch used by the LU inversion of an `m x m` matrix.
///
/// This is `m * INVERSE_BLOCK_SIZE`, computed in the kernel width.
pub fn inverse_work_len(m: KernelInt) -> Result<KernelInt, InverseError> {
    m.max(1)
        .checked_mul(INVERSE_BLOCK_SIZE)
        .ok_or(InverseError::DimensionOverflow(m as usize))
}

/// Length of the scratch used by the full SVD of an `m x n` matrix.
///
/// This is `2 * max(3 * min(m, n) + max(m, n), 5 * min(m, n))`, computed in the kernel
/// width.
pub fn svd_work_len(m: KernelInt, n: KernelInt) -> Result<KernelInt, InverseError> {
    let min_mn = m.min(n);
    let max_mn = m.max(n);
    let overflow = || InverseError::DimensionOverflow(max_mn as usize);

    let bidiag = min_mn
        .checked_mul(3)
        .and_then(|v| v.checked_add(max_mn))
        .ok_or_else(overflow)?;
    let qr = min_mn.checked_mul(5).ok_or_else(overflow)?;

    bidiag.max(qr).max(1).checked_mul(2).ok_or_else(overflow)
}
