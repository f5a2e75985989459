/// An error type for the inversion routines.
///
/// The first four variants are the numeric failures of the pipeline; the rest reject
/// malformed input before any output buffer is written.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InverseError {
    /// A size does not fit in the integer width of the linear algebra kernel.
    #[error("Dimension {0} does not fit in the kernel integer width")]
    DimensionOverflow(usize),

    /// The LU factorization produced an exactly zero pivot.
    #[error("LU factorization found a zero pivot at index {0}")]
    FactorizationSingular(usize),

    /// The explicit inversion of the LU factors produced non-finite values.
    #[error("Inversion of the LU factors of a ({0} x {0}) matrix failed")]
    InversionFailed(usize),

    /// The singular value decomposition did not converge.
    #[error("SV decomposition of a ({0} x {1}) matrix did not converge")]
    DecompositionNonConvergent(usize, usize),

    /// A buffer does not have the length required by the given dimensions.
    #[error("Buffer `{name}` has length {actual} but {expected} is required")]
    BufferLength {
        /// Name of the offending argument.
        name: &'static str,
        /// Length required by the dimensions.
        expected: usize,
        /// Length of the buffer that was passed.
        actual: usize,
    },

    /// The matrix has no rows or no columns.
    #[error("Cannot handle an empty ({0} x {1}) matrix")]
    EmptyMatrix(usize, usize),

    /// The singular value cutoff is negative or NaN.
    #[error("Tolerance must be a non-negative number, got {0}")]
    InvalidTolerance(f64),

    /// A row of a nested matrix has a different length than the first row.
    #[error("Row {row} has {actual} entries but {expected} are required")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },

    /// The determinant of a small matrix is below the requested tolerance.
    #[error("Inverse failed with zero determinant: |det(a)| = {det} < {tol}")]
    DeterminantBelowTolerance {
        /// The computed determinant.
        det: f64,
        /// The tolerance it was compared against.
        tol: f64,
    },

    /// The closed-form inverse only handles up to 3x3 matrices.
    #[error("Cannot compute the closed-form inverse of a ({0} x {1}) matrix")]
    UnsupportedSize(usize, usize),
}

impl InverseError {
    /// Returns the nonzero status code of the error.
    ///
    /// Codes are stable: `1` dimension overflow, `2` singular factorization, `3` failed
    /// inversion, `4` non-convergent decomposition, `5..=10` input validation errors.
    pub fn status(&self) -> i32 {
        match self {
            InverseError::DimensionOverflow(_) => 1,
            InverseError::FactorizationSingular(_) => 2,
            InverseError::InversionFailed(_) => 3,
            InverseError::DecompositionNonConvergent(..) => 4,
            InverseError::BufferLength { .. } => 5,
            InverseError::EmptyMatrix(..) => 6,
            InverseError::InvalidTolerance(_) => 7,
            InverseError::RaggedRows { .. } => 8,
            InverseError::DeterminantBelowTolerance { .. } => 9,
            InverseError::UnsupportedSize(..) => 10,
        }
    }
}

/// Flattens a result into its integer status, `0` meaning success.
///
/// Example:
///
/// ```
/// use geninv::{square_inverse, status_of};
///
/// let a = [1.0, 1.0, 1.0, 1.0];
/// let mut ai = [0.0; 4];
/// assert_eq!(status_of(&square_inverse(&a, 2, &mut ai)), 2);
/// ```
pub fn status_of<T>(result: &Result<T, InverseError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => err.status(),
    }
}

/// Checks that `buffer` holds exactly `expected` values.
pub(crate) fn check_len(
    name: &'static str,
    buffer: &[f64],
    expected: usize,
) -> Result<(), InverseError> {
    if buffer.len() != expected {
        return Err(InverseError::BufferLength {
            name,
            expected,
            actual: buffer.len(),
        });
    }
    Ok(())
}
