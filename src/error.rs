//! Error types for the Gaussian elimination solvers.

use thiserror::Error;

/// Errors that can occur while solving a linear system.
#[derive(Debug, Error)]
pub enum GaussError {
    /// The input is not an N x (N+1) augmented matrix with N > 0.
    #[error("augmented matrix must be N x (N+1) with N > 0; got {rows} x {cols}")]
    InvalidShape {
        /// Number of rows in the rejected input
        rows: usize,
        /// Number of columns in the rejected input
        cols: usize,
    },

    /// The requested worker count is zero.
    #[error("worker count must be positive")]
    InvalidWorkerCount,

    /// A pivot or back-substitution diagonal fell below the singularity
    /// threshold. The partially reduced working copy is discarded.
    #[error("matrix is singular or nearly singular (pivot below threshold in column {column})")]
    Singular {
        /// Column whose pivot candidates were all near zero
        column: usize,
    },

    /// The working copy of the matrix could not be allocated.
    #[error("failed to allocate a {rows} x {cols} working matrix")]
    Allocation {
        /// Requested row count
        rows: usize,
        /// Requested column count
        cols: usize,
    },

    /// A worker thread could not be spawned. Workers launched before the
    /// failure are released and joined before this error is returned.
    #[error("failed to launch worker thread {worker}: {source}")]
    ThreadLaunch {
        /// Index of the worker that failed to start
        worker: usize,
        /// Underlying spawn error
        source: std::io::Error,
    },
}

/// A specialized `Result` type for solver operations.
pub type Result<T> = std::result::Result<T, GaussError>;

impl GaussError {
    /// Returns `true` for argument errors detected before any thread is
    /// launched or any matrix memory is touched.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            GaussError::InvalidShape { .. } | GaussError::InvalidWorkerCount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GaussError::InvalidShape { rows: 3, cols: 3 };
        assert_eq!(
            err.to_string(),
            "augmented matrix must be N x (N+1) with N > 0; got 3 x 3"
        );
    }

    #[test]
    fn test_is_invalid_argument() {
        assert!(GaussError::InvalidWorkerCount.is_invalid_argument());
        assert!(GaussError::InvalidShape { rows: 0, cols: 0 }.is_invalid_argument());
        assert!(!GaussError::Singular { column: 2 }.is_invalid_argument());
    }
}
