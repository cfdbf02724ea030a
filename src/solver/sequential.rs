//! Single-threaded reference solver.
//!
//! Same partial pivoting and singularity rules as the parallel path,
//! without the coordination machinery. Used by the benchmark harness as
//! the speedup baseline and by the tests as the agreement reference.

use crate::error::{GaussError, Result};
use crate::solver::DEFAULT_EPSILON;
use ndarray::{Array1, Array2};

/// Solve an augmented N x (N+1) system by Gaussian elimination with
/// partial pivoting, in the calling thread. The input is never mutated.
pub fn solve_sequential(matrix: &Array2<f64>) -> Result<Array1<f64>> {
    let n = matrix.nrows();
    if n == 0 || matrix.ncols() != n + 1 {
        return Err(GaussError::InvalidShape {
            rows: n,
            cols: matrix.ncols(),
        });
    }

    let mut m = matrix.clone();

    // Forward elimination.
    for k in 0..n {
        let mut max_row = k;
        let mut max_val = m[[k, k]].abs();
        for i in k + 1..n {
            let candidate = m[[i, k]].abs();
            if candidate > max_val {
                max_val = candidate;
                max_row = i;
            }
        }

        if max_val < DEFAULT_EPSILON {
            return Err(GaussError::Singular { column: k });
        }

        if max_row != k {
            for j in 0..=n {
                let tmp = m[[k, j]];
                m[[k, j]] = m[[max_row, j]];
                m[[max_row, j]] = tmp;
            }
        }

        let pivot = m[[k, k]];
        for i in k + 1..n {
            let factor = m[[i, k]] / pivot;
            for j in k..=n {
                m[[i, j]] -= factor * m[[k, j]];
            }
        }
    }

    // Back substitution on the upper-triangular system.
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut rhs = m[[i, n]];
        for j in i + 1..n {
            rhs -= m[[i, j]] * x[j];
        }
        let diag = m[[i, i]];
        if diag.abs() < DEFAULT_EPSILON {
            return Err(GaussError::Singular { column: i });
        }
        x[i] = rhs / diag;
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_three_unknowns() {
        let system = array![
            [2.0, 1.0, -1.0, 8.0],
            [-3.0, -1.0, 2.0, -11.0],
            [-2.0, 1.0, 2.0, -3.0],
        ];
        let x = solve_sequential(&system).expect("solvable");
        assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(x[1], 3.0, epsilon = 1e-10);
        assert_abs_diff_eq!(x[2], -1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_single_unknown() {
        let system = array![[5.0, 10.0]];
        let x = solve_sequential(&system).expect("solvable");
        assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_row_is_singular() {
        let system = array![[1.0, 2.0, 3.0], [0.0, 0.0, 0.0]];
        let result = solve_sequential(&system);
        assert!(matches!(result, Err(GaussError::Singular { .. })));
    }

    #[test]
    fn test_rejects_square_input() {
        let square = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(matches!(
            solve_sequential(&square),
            Err(GaussError::InvalidShape { .. })
        ));
    }
}
