//! Gaussian elimination solvers for dense augmented systems.
//!
//! Two entry points share the same pivoting and singularity rules:
//! - [`solve_parallel`]: a fixed pool of barrier-synchronized workers
//! - [`solve_sequential`]: the single-threaded reference implementation

mod sequential;
mod worker;

pub use sequential::solve_sequential;

use crate::error::{GaussError, Result};
use crate::matrix::AugmentedMatrix;
use ndarray::{Array1, Array2};
use std::sync::Barrier;
use std::thread;
use worker::{AbortSignal, StartGate, WorkerContext};

/// Magnitude below which a pivot or diagonal is treated as zero.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Parallel solver configuration.
#[derive(Debug, Clone)]
pub struct SolveConfig {
    /// Number of worker threads (the solve owns them for its lifetime)
    pub workers: usize,
    /// Singularity threshold for pivots and diagonals
    pub epsilon: f64,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl SolveConfig {
    /// Configuration with the given worker count and default epsilon.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }
}

/// Solve an augmented N x (N+1) system with a pool of worker threads.
///
/// The caller's matrix is never mutated; the solver works on a private
/// copy and returns the N solved unknowns in input row order. Workers
/// are launched per solve and joined before this function returns, on
/// success and on every failure path.
pub fn solve_parallel(matrix: &Array2<f64>, config: &SolveConfig) -> Result<Array1<f64>> {
    if config.workers == 0 {
        return Err(GaussError::InvalidWorkerCount);
    }
    let work = AugmentedMatrix::from_array(matrix)?;
    let n = work.size();
    let workers = config.workers;

    log::debug!("solving {n} x {n} system with {workers} workers");

    let iter_barrier = Barrier::new(workers);
    let phase_barrier = Barrier::new(workers);
    let abort = AbortSignal::new();
    let gate = StartGate::new();

    let mut launch_error = None;
    thread::scope(|scope| {
        for id in 0..workers {
            let ctx = WorkerContext {
                id,
                workers,
                matrix: &work,
                iter_barrier: &iter_barrier,
                phase_barrier: &phase_barrier,
                abort: &abort,
                gate: &gate,
                epsilon: config.epsilon,
            };
            let spawned = thread::Builder::new()
                .name(format!("gauss-worker-{id}"))
                .spawn_scoped(scope, move || worker::run(ctx));
            if let Err(source) = spawned {
                // Already-started workers are parked at the gate; closing
                // it sends them straight to termination before they reach
                // any barrier. The scope joins them on exit.
                gate.close();
                launch_error = Some(GaussError::ThreadLaunch { worker: id, source });
                return;
            }
        }
        gate.open();
    });

    if let Some(err) = launch_error {
        return Err(err);
    }
    if let Some(column) = abort.column() {
        return Err(GaussError::Singular { column });
    }
    Ok(work.solution())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_solve_two_by_two() {
        // 2x + y = 5, x - y = 1
        let system = array![[2.0, 1.0, 5.0], [1.0, -1.0, 1.0]];
        let x = solve_parallel(&system, &SolveConfig::with_workers(2)).expect("solvable");
        assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(x[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_leading_pivot_needs_swap() {
        let system = array![[0.0, 1.0, 2.0], [2.0, -1.0, 1.0]];
        let x = solve_parallel(&system, &SolveConfig::default()).expect("solvable after swap");
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(x[1], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_rejects_zero_workers() {
        let system = array![[1.0, 2.0]];
        let err = solve_parallel(&system, &SolveConfig::with_workers(0)).unwrap_err();
        assert!(matches!(err, GaussError::InvalidWorkerCount));
    }

    #[test]
    fn test_rejects_non_augmented_shape() {
        let square = array![[1.0, 2.0], [3.0, 4.0]];
        let err = solve_parallel(&square, &SolveConfig::default()).unwrap_err();
        assert!(matches!(err, GaussError::InvalidShape { rows: 2, cols: 2 }));
    }

    #[test]
    fn test_singular_reports_column() {
        // Second row is a multiple of the first.
        let system = array![[1.0, 2.0, 3.0], [2.0, 4.0, 6.0]];
        for workers in [1, 2, 4] {
            let err = solve_parallel(&system, &SolveConfig::with_workers(workers)).unwrap_err();
            assert!(matches!(err, GaussError::Singular { .. }));
        }
    }

    #[test]
    fn test_caller_matrix_untouched() {
        let system = array![[0.0, 1.0, 2.0], [2.0, -1.0, 1.0]];
        let before = system.clone();
        let _ = solve_parallel(&system, &SolveConfig::with_workers(2)).expect("solvable");
        assert_eq!(system, before);
    }
}
