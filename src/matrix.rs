//! Working-copy storage for the augmented system matrix.
//!
//! Rows are independently owned buffers behind per-row locks. A pivot
//! exchange swaps row ownership in O(1) instead of copying elements, and
//! the per-stage row partition maps onto disjoint lock acquisitions, so
//! workers reducing different rows never contend.

use crate::error::{GaussError, Result};
use ndarray::{Array1, Array2};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An N x (N+1) working copy of an augmented linear system.
///
/// Rows 0..N-1 hold the coefficient rows; column N is the right-hand
/// side. The struct is shared immutably across the worker pool; interior
/// mutability is per row, and the solver's partition invariant guarantees
/// at most one writer per row within an elimination stage.
pub struct AugmentedMatrix {
    rows: Vec<RwLock<Box<[f64]>>>,
    n: usize,
}

impl AugmentedMatrix {
    /// Allocate a working copy of `source`.
    ///
    /// The source is validated to be N x (N+1) with N > 0 and is never
    /// mutated afterwards. Allocation failures surface as
    /// [`GaussError::Allocation`] rather than aborting.
    pub fn from_array(source: &Array2<f64>) -> Result<Self> {
        let n = source.nrows();
        let cols = source.ncols();
        if n == 0 || cols != n + 1 {
            return Err(GaussError::InvalidShape { rows: n, cols });
        }

        let alloc_err = || GaussError::Allocation { rows: n, cols };
        let mut rows = Vec::new();
        rows.try_reserve_exact(n).map_err(|_| alloc_err())?;
        for row in source.rows() {
            let mut buf = Vec::new();
            buf.try_reserve_exact(cols).map_err(|_| alloc_err())?;
            buf.extend(row.iter().copied());
            rows.push(RwLock::new(buf.into_boxed_slice()));
        }

        Ok(Self { rows, n })
    }

    /// Dimension N of the system (the matrix has N+1 columns).
    pub fn size(&self) -> usize {
        self.n
    }

    /// Exchange rows `i` and `j` by swapping ownership of their buffers.
    ///
    /// O(1): only the row handles move, never the elements. Called only
    /// by the pivot authority while every other worker is parked at a
    /// barrier.
    pub fn swap_rows(&self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let mut row_i = self.write_row(i);
        let mut row_j = self.write_row(j);
        std::mem::swap(&mut *row_i, &mut *row_j);
    }

    /// Copy the solution column (column N) out of the matrix.
    pub fn solution(&self) -> Array1<f64> {
        Array1::from_iter((0..self.n).map(|i| self.read_row(i)[self.n]))
    }

    pub(crate) fn read_row(&self, i: usize) -> RwLockReadGuard<'_, Box<[f64]>> {
        // A poisoned lock can only come from a panicked worker; the row
        // buffer itself is still a valid allocation.
        self.rows[i].read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write_row(&self, i: usize) -> RwLockWriteGuard<'_, Box<[f64]>> {
        self.rows[i].write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_array_copies() {
        let source = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let m = AugmentedMatrix::from_array(&source).expect("valid shape");
        assert_eq!(m.size(), 2);
        assert_eq!(&**m.read_row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(&**m.read_row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let square = Array2::<f64>::zeros((3, 3));
        assert!(matches!(
            AugmentedMatrix::from_array(&square),
            Err(GaussError::InvalidShape { rows: 3, cols: 3 })
        ));

        let empty = Array2::<f64>::zeros((0, 1));
        assert!(matches!(
            AugmentedMatrix::from_array(&empty),
            Err(GaussError::InvalidShape { rows: 0, .. })
        ));
    }

    #[test]
    fn test_swap_rows() {
        let source = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let m = AugmentedMatrix::from_array(&source).expect("valid shape");
        m.swap_rows(0, 1);
        assert_eq!(&**m.read_row(0), &[4.0, 5.0, 6.0]);
        assert_eq!(&**m.read_row(1), &[1.0, 2.0, 3.0]);

        // Self-swap is a no-op.
        m.swap_rows(0, 0);
        assert_eq!(&**m.read_row(0), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_solution_column() {
        let source = array![[1.0, 0.0, 7.0], [0.0, 1.0, -2.0]];
        let m = AugmentedMatrix::from_array(&source).expect("valid shape");
        assert_eq!(m.solution(), array![7.0, -2.0]);
    }
}
