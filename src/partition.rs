//! Disjoint row partitioning for the worker pool.
//!
//! Each elimination stage splits the active rows into contiguous chunks,
//! one per worker. Ranges are pairwise disjoint and cover the active
//! range exactly; remainder rows go to the lowest-indexed workers. When
//! there are fewer rows than workers, trailing workers receive an empty
//! range (they still participate in every barrier).

use std::ops::Range;

/// The chunk of `0..total_rows` assigned to `worker_id` out of `workers`.
///
/// Returns an empty range for workers beyond the active count for this
/// stage. Callers offset the result into the absolute row space.
pub fn worker_range(total_rows: usize, workers: usize, worker_id: usize) -> Range<usize> {
    let active = total_rows.min(workers);
    if worker_id >= active {
        return 0..0;
    }
    let per_worker = total_rows / active;
    let extra = total_rows % active;
    let start = worker_id * per_worker + worker_id.min(extra);
    let len = per_worker + usize::from(worker_id < extra);
    start..start + len
}

/// All worker ranges for a stage, in worker order.
pub fn split_rows(total_rows: usize, workers: usize) -> Vec<Range<usize>> {
    (0..workers)
        .map(|id| worker_range(total_rows, workers, id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(total_rows: usize, workers: usize) {
        let ranges = split_rows(total_rows, workers);
        assert_eq!(ranges.len(), workers);

        // Contiguous, disjoint, and covering [0, total_rows).
        let mut next = 0;
        for range in &ranges {
            if range.is_empty() {
                continue;
            }
            assert_eq!(range.start, next);
            next = range.end;
        }
        assert_eq!(next, total_rows);
    }

    #[test]
    fn test_even_split() {
        assert_eq!(split_rows(8, 4), vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn test_remainder_goes_to_lowest_workers() {
        // 10 rows over 4 workers: the first two workers take 3 rows each.
        assert_eq!(split_rows(10, 4), vec![0..3, 3..6, 6..8, 8..10]);
    }

    #[test]
    fn test_more_workers_than_rows() {
        let ranges = split_rows(2, 5);
        assert_eq!(ranges[0], 0..1);
        assert_eq!(ranges[1], 1..2);
        for range in &ranges[2..] {
            assert!(range.is_empty());
        }
    }

    #[test]
    fn test_no_rows() {
        for range in split_rows(0, 3) {
            assert!(range.is_empty());
        }
    }

    #[test]
    fn test_coverage_sweep() {
        for total_rows in 0..40 {
            for workers in 1..10 {
                assert_covers(total_rows, workers);
            }
        }
    }
}
