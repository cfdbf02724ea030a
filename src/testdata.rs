//! Test-system generators shared by the tests, benchmarks and the CLI.

use ndarray::{Array1, Array2, array, s};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Graded diagonally dominant system: diagonal 10 + 2i, off-diagonal 1,
/// right-hand side the row sum plus a small per-row shift. Deterministic,
/// well conditioned at every size.
pub fn graded_system(n: usize) -> Array2<f64> {
    let mut m = Array2::zeros((n, n + 1));
    for i in 0..n {
        let mut row_sum = 0.0;
        for j in 0..n {
            let value = if i == j { 10.0 + 2.0 * i as f64 } else { 1.0 };
            m[[i, j]] = value;
            row_sum += value;
        }
        m[[i, n]] = row_sum + 0.5 * i as f64;
    }
    m
}

/// Random strictly diagonally dominant system, reproducible from `seed`.
pub fn random_dominant_system(n: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = Array2::zeros((n, n + 1));
    for i in 0..n {
        let mut off_diagonal_sum = 0.0;
        for j in 0..n {
            if i != j {
                let value: f64 = rng.random_range(-1.0..1.0);
                m[[i, j]] = value;
                off_diagonal_sum += value.abs();
            }
        }
        // Strict dominance keeps every pivot comfortably above epsilon.
        m[[i, i]] = off_diagonal_sum + rng.random_range(1.0..2.0);
        m[[i, n]] = rng.random_range(-10.0..10.0);
    }
    m
}

/// 2x + y = 5, x - y = 1; solution (2, 1).
pub fn two_by_two() -> (Array2<f64>, Array1<f64>) {
    (
        array![[2.0, 1.0, 5.0], [1.0, -1.0, 1.0]],
        array![2.0, 1.0],
    )
}

/// 2x + y - z = 8, -3x - y + 2z = -11, -2x + y + 2z = -3; solution (2, 3, -1).
pub fn three_by_three() -> (Array2<f64>, Array1<f64>) {
    (
        array![
            [2.0, 1.0, -1.0, 8.0],
            [-3.0, -1.0, 2.0, -11.0],
            [-2.0, 1.0, 2.0, -3.0],
        ],
        array![2.0, 3.0, -1.0],
    )
}

/// Zero leading pivot; solvable only through a row exchange. Solution (1, 2).
pub fn swap_required() -> (Array2<f64>, Array1<f64>) {
    (
        array![[0.0, 1.0, 2.0], [2.0, -1.0, 1.0]],
        array![1.0, 2.0],
    )
}

/// Largest absolute residual |A·x - b| of a candidate solution against
/// the original augmented system.
pub fn residual_max(system: &Array2<f64>, x: &Array1<f64>) -> f64 {
    let n = system.nrows();
    let coefficients = system.slice(s![.., ..n]);
    let rhs = system.column(n);
    coefficients
        .dot(x)
        .iter()
        .zip(rhs.iter())
        .map(|(lhs, b)| (lhs - b).abs())
        .fold(0.0, f64::max)
}
