use clap::Parser;
use ndarray::Array2;
use parallel_gauss::{GaussError, SolveConfig, solve_parallel, solve_sequential, testdata};
use std::process;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "run_gauss",
    about = "Solve a dense linear system with parallel Gaussian elimination"
)]
struct Cli {
    /// Number of worker threads
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Size of the generated system
    #[arg(long, default_value_t = 50)]
    size: usize,

    /// Seed for the random generator (uses the deterministic graded system when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Run the sequential-vs-parallel comparison table instead of a single solve
    #[arg(long)]
    bench: bool,

    /// Check the residual of the computed solution against the input system
    #[arg(long)]
    verify: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = if cli.bench {
        run_bench(&cli)
    } else {
        run_solve(&cli)
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn generate_system(size: usize, seed: Option<u64>) -> Array2<f64> {
    match seed {
        Some(seed) => testdata::random_dominant_system(size, seed),
        None => testdata::graded_system(size),
    }
}

fn run_solve(cli: &Cli) -> Result<(), GaussError> {
    let system = generate_system(cli.size, cli.seed);

    println!(
        "Solving a {n} x {n} system with {threads} threads",
        n = cli.size,
        threads = cli.threads
    );
    print_system(&system);

    let config = SolveConfig::with_workers(cli.threads);
    let start = Instant::now();
    let x = solve_parallel(&system, &config)?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    println!("Solved in {elapsed_ms:.2} ms");
    print_solution(&x);

    if cli.verify {
        let residual = testdata::residual_max(&system, &x);
        println!("Max residual |A*x - b|: {residual:.3e}");
    }

    Ok(())
}

fn run_bench(cli: &Cli) -> Result<(), GaussError> {
    println!("=== Scaling over matrix size ({} threads) ===", cli.threads);
    println!("   Size | Sequential (ms) | Parallel (ms) | Speedup | Efficiency");
    for size in [20, 30, 50, 70, 100, 150] {
        bench_case(size, cli.threads, cli.seed)?;
    }

    println!();
    println!("=== Scaling over thread count ({n} x {n}) ===", n = cli.size);
    println!("Threads | Sequential (ms) | Parallel (ms) | Speedup | Efficiency");
    for threads in 1..=cli.threads {
        bench_threads_case(cli.size, threads, cli.seed)?;
    }

    Ok(())
}

fn bench_case(size: usize, threads: usize, seed: Option<u64>) -> Result<(), GaussError> {
    let (seq_ms, par_ms) = time_both(size, threads, seed)?;
    let speedup = seq_ms / par_ms;
    println!(
        "{size:>7} | {seq_ms:>15.2} | {par_ms:>13.2} | {speedup:>7.3} | {:>10.3}",
        speedup / threads as f64
    );
    Ok(())
}

fn bench_threads_case(size: usize, threads: usize, seed: Option<u64>) -> Result<(), GaussError> {
    let (seq_ms, par_ms) = time_both(size, threads, seed)?;
    let speedup = seq_ms / par_ms;
    println!(
        "{threads:>7} | {seq_ms:>15.2} | {par_ms:>13.2} | {speedup:>7.3} | {:>10.3}",
        speedup / threads as f64
    );
    Ok(())
}

fn time_both(size: usize, threads: usize, seed: Option<u64>) -> Result<(f64, f64), GaussError> {
    let system = generate_system(size, seed);

    let start = Instant::now();
    let x_seq = solve_sequential(&system)?;
    let seq_ms = start.elapsed().as_secs_f64() * 1000.0;

    let config = SolveConfig::with_workers(threads);
    let start = Instant::now();
    let x_par = solve_parallel(&system, &config)?;
    let par_ms = start.elapsed().as_secs_f64() * 1000.0;

    let max_diff = x_seq
        .iter()
        .zip(x_par.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    if max_diff > 1e-5 {
        log::warn!("sequential and parallel solutions differ by {max_diff:.3e}");
    }

    Ok((seq_ms, par_ms))
}

fn print_system(system: &Array2<f64>) {
    let n = system.nrows();
    if n > 10 {
        println!("(system too large to print)");
        return;
    }
    for i in 0..n {
        print!(" [");
        for j in 0..n {
            print!("{:8.4} ", system[[i, j]]);
        }
        println!("| {:8.4}]", system[[i, n]]);
    }
}

fn print_solution(x: &ndarray::Array1<f64>) {
    let n = x.len();
    if n <= 10 {
        for (i, value) in x.iter().enumerate() {
            println!("  x[{i}] = {value:12.6}");
        }
        return;
    }
    println!("  (showing first 5 and last 5 of {n} solutions)");
    for i in 0..5 {
        println!("  x[{i}] = {:12.6}", x[i]);
    }
    println!("  ...");
    for i in n - 5..n {
        println!("  x[{i}] = {:12.6}", x[i]);
    }
}
