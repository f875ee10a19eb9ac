//! Batch boundaries for the baseline sweep.
//!
//! `Planner::baseline_with_progress` cuts the enumerated 4-member squads into
//! these ranges, plans each range in parallel, and reports how many squads are
//! done after every range.

/// Split `total` candidate squads into up to `num_batches` ranges
/// `[start, end)` of enumeration order. Earlier ranges take the remainder, so
/// sizes differ by at most one.
///
/// # Example
/// ```
/// # use squadron::parallel::batch_ranges;
/// let ranges = batch_ranges(70, 4);
/// assert_eq!(ranges, vec![(0, 18), (18, 36), (36, 53), (53, 70)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + usize::from(i < remainder);
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}
