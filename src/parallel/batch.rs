//! Batch distribution for parallel simulation.
//!
//! Batch `i` always draws from the stream seeded by `(seed, i)`, so any split of the batch
//! indices into ranges yields the same samples in the same order.

use rayon::prelude::*;

use crate::combat::{simulate_batch, simulate_parallel, CombatSnapshot, DamageSamples, SimulationConfig};
use crate::error::SimulationError;
use crate::parallel::pool::WorkerPool;

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
///
/// # Example
/// ```
/// # use furysim::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
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
        let size = base + if i < remainder { 1 } else { 0 };
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Run all batches with one parallel task per contiguous chunk of batch indices.
pub fn simulate_chunked(
    snapshot: &CombatSnapshot,
    config: &SimulationConfig,
    chunks: usize,
) -> Result<DamageSamples, SimulationError> {
    config.validate()?;
    snapshot.validate()?;
    let samples: Vec<f64> = batch_ranges(config.batches, chunks)
        .into_par_iter()
        .map(|(start, end)| {
            (start..end)
                .map(|index| simulate_batch(snapshot, config, index))
                .collect::<Vec<_>>()
        })
        .flatten()
        .collect();
    Ok(DamageSamples::new(samples))
}

/// Run [simulate_parallel] inside `pool`.
pub fn run_simulation_batches(
    snapshot: &CombatSnapshot,
    config: &SimulationConfig,
    pool: &WorkerPool,
) -> Result<DamageSamples, SimulationError> {
    pool.install(|| simulate_parallel(snapshot, config))
}
