//! Per-worker elimination loop and shared coordination state.
//!
//! Every worker runs the same stage loop. Worker 0 doubles as the pivot
//! authority: it selects and exchanges the pivot row for each stage and
//! performs the back-substitution phase. Synchronization discipline: on
//! every code path of a stage, every worker calls each barrier of that
//! stage exactly once, and the abort signal is only checked *after* a
//! barrier call, never to decide whether to skip one.

use crate::matrix::AugmentedMatrix;
use crate::partition;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Barrier, Condvar, Mutex, PoisonError};

/// Worker id of the pivot authority and back-substitution leader.
pub(crate) const LEADER: usize = 0;

/// Shared singularity signal. Monotonic: false until the leader detects a
/// sub-epsilon pivot or diagonal, then true for the rest of the solve.
/// Only worker 0 ever raises it, so the recorded column cannot race.
pub(crate) struct AbortSignal {
    raised: AtomicBool,
    column: AtomicUsize,
}

impl AbortSignal {
    pub(crate) fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
            column: AtomicUsize::new(0),
        }
    }

    pub(crate) fn raise(&self, column: usize) {
        self.column.store(column, Ordering::Relaxed);
        self.raised.store(true, Ordering::Release);
    }

    pub(crate) fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// The offending column, if the signal was raised.
    pub(crate) fn column(&self) -> Option<usize> {
        self.is_raised()
            .then(|| self.column.load(Ordering::Relaxed))
    }
}

/// Launch gate crossed by every worker before it touches any barrier.
///
/// If a spawn fails partway through launch, the coordinator closes the
/// gate and the already-started workers return without ever entering the
/// barrier protocol, so no barrier is left short a participant.
pub(crate) struct StartGate {
    decision: Mutex<Option<bool>>,
    ready: Condvar,
}

impl StartGate {
    pub(crate) fn new() -> Self {
        Self {
            decision: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    /// Release the workers into the solve.
    pub(crate) fn open(&self) {
        self.decide(true);
    }

    /// Tell the workers to exit immediately.
    pub(crate) fn close(&self) {
        self.decide(false);
    }

    fn decide(&self, go: bool) {
        let mut decision = self
            .decision
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *decision = Some(go);
        self.ready.notify_all();
    }

    /// Block until the coordinator decides; `true` means proceed.
    pub(crate) fn wait(&self) -> bool {
        let decision = self
            .decision
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let decision = self
            .ready
            .wait_while(decision, |decision| decision.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        decision.unwrap_or(false)
    }
}

/// Everything one worker needs for a solve. Created per solve by the
/// coordinator; no state outlives the worker scope.
pub(crate) struct WorkerContext<'a> {
    pub id: usize,
    pub workers: usize,
    pub matrix: &'a AugmentedMatrix,
    pub iter_barrier: &'a Barrier,
    pub phase_barrier: &'a Barrier,
    pub abort: &'a AbortSignal,
    pub gate: &'a StartGate,
    pub epsilon: f64,
}

/// Worker entry point.
pub(crate) fn run(ctx: WorkerContext<'_>) {
    if !ctx.gate.wait() {
        return;
    }

    forward_elimination(&ctx);

    // Forward/backward boundary. Crossed by every worker on every path,
    // including after an abort, before anyone inspects the flag again.
    ctx.phase_barrier.wait();
    if ctx.id == LEADER && !ctx.abort.is_raised() {
        back_substitute(&ctx);
    }
    ctx.phase_barrier.wait();
}

/// Reduce the matrix to upper-triangular form, one pivot column per
/// stage. Two iteration-barrier crossings per healthy stage; exactly one
/// (Barrier A) on the stage that detects singularity, uniformly for all
/// workers.
fn forward_elimination(ctx: &WorkerContext<'_>) {
    let n = ctx.matrix.size();

    for k in 1..n {
        let pivot_col = k - 1;

        if ctx.id == LEADER {
            select_pivot(ctx, pivot_col);
        }

        // Barrier A: the post-swap matrix and the abort signal are
        // visible to every worker before any factor is computed.
        ctx.iter_barrier.wait();
        if ctx.abort.is_raised() {
            return;
        }

        reduce_rows(ctx, k);

        // Barrier B: stage k's writes are complete before stage k+1
        // scans the next pivot column.
        ctx.iter_barrier.wait();
    }
}

/// Partial pivoting for one stage, executed by the leader while all other
/// workers wait at Barrier A: scan the pivot column for the largest
/// magnitude, raise the abort signal if even that is below epsilon,
/// otherwise exchange the pivot row into place.
fn select_pivot(ctx: &WorkerContext<'_>, pivot_col: usize) {
    let n = ctx.matrix.size();

    let mut max_row = pivot_col;
    let mut max_val = ctx.matrix.read_row(pivot_col)[pivot_col].abs();
    for i in pivot_col + 1..n {
        let candidate = ctx.matrix.read_row(i)[pivot_col].abs();
        if candidate > max_val {
            max_val = candidate;
            max_row = i;
        }
    }

    if max_val < ctx.epsilon {
        log::warn!(
            "singular system: no usable pivot in column {pivot_col} (best candidate {max_val:.3e})"
        );
        ctx.abort.raise(pivot_col);
        return;
    }

    if max_row != pivot_col {
        ctx.matrix.swap_rows(pivot_col, max_row);
    }
}

/// Eliminate the pivot column from this worker's chunk of the active
/// rows. The partition is recomputed each stage over the shrinking
/// sub-problem, so the work stays balanced as rows fall out of play.
fn reduce_rows(ctx: &WorkerContext<'_>, k: usize) {
    let n = ctx.matrix.size();
    let active_rows = n - k;
    let range = partition::worker_range(active_rows, ctx.workers, ctx.id);
    if range.is_empty() {
        return;
    }

    // The pivot row is read-shared by every worker for the whole stage;
    // writes go only to rows this worker owns.
    let pivot_row = ctx.matrix.read_row(k - 1);
    let pivot = pivot_row[k - 1];

    for j in range.start + k..range.end + k {
        let mut row = ctx.matrix.write_row(j);
        let factor = row[k - 1] / pivot;
        for i in k - 1..=n {
            row[i] -= factor * pivot_row[i];
        }
    }
}

/// Leader-sequential back-substitution, run by worker 0 between the two
/// phase-barrier crossings. The last diagonal never went through pivot
/// selection, so its epsilon check happens here; the same check guards
/// every normalization on the way up.
fn back_substitute(ctx: &WorkerContext<'_>) {
    let n = ctx.matrix.size();

    {
        let mut last = ctx.matrix.write_row(n - 1);
        let pivot = last[n - 1];
        if pivot.abs() < ctx.epsilon {
            log::warn!("singular system: near-zero diagonal in column {}", n - 1);
            ctx.abort.raise(n - 1);
            return;
        }
        last[n] /= pivot;
        last[n - 1] = 1.0;
    }

    for i in (0..n - 1).rev() {
        let mut row = ctx.matrix.write_row(i);

        for j in i + 1..n {
            let solved = ctx.matrix.read_row(j);
            let factor = row[j] / solved[j];
            row[n] -= factor * solved[n];
            row[j] -= factor * solved[j];
        }

        let pivot = row[i];
        if pivot.abs() < ctx.epsilon {
            log::warn!("singular system: near-zero diagonal in column {i}");
            ctx.abort.raise(i);
            return;
        }
        for j in i..=n {
            row[j] /= pivot;
        }
    }
}
