//! Parallel dense linear-system solver
//!
//! Solves augmented N x (N+1) real systems by Gaussian elimination with
//! partial pivoting, either sequentially or across a fixed pool of
//! barrier-synchronized worker threads.
//!
//! # Features
//!
//! - **Partial pivoting** with O(1) row exchange (row handles move, not
//!   elements)
//! - **Fixed worker pool** per solve: two barrier waits per elimination
//!   stage, one phase boundary before back-substitution
//! - **Cooperative abort** on singular systems: the pivot authority
//!   raises a shared flag and every worker drains out of the barrier
//!   protocol without deadlocking
//! - **Sequential reference solver** for baselines and agreement tests
//!
//! # Example
//!
//! ```ignore
//! use parallel_gauss::{SolveConfig, solve_parallel};
//! use ndarray::array;
//!
//! // 2x + y = 5, x - y = 1
//! let system = array![[2.0, 1.0, 5.0], [1.0, -1.0, 1.0]];
//! let x = solve_parallel(&system, &SolveConfig::with_workers(4))?;
//! assert!((x[0] - 2.0).abs() < 1e-9);
//! ```

pub mod error;
pub mod matrix;
pub mod partition;
pub mod solver;
pub mod testdata;

// Re-export main types
pub use error::{GaussError, Result};
pub use matrix::AugmentedMatrix;

// Re-export solver entry points
pub use solver::{DEFAULT_EPSILON, SolveConfig, solve_parallel, solve_sequential};
