//! Occurrence counts per distinct fact-tuple

use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::cases::fact::Fact;
use crate::error::CaseError;

pub type FactTuple = Vec<Fact>;

/// Ordered by tuple, so iteration does not depend on input order
pub type Histogram = BTreeMap<FactTuple, usize>;

/// Rows per shard for the parallel reduction
pub const DEFAULT_SHARD_ROWS: usize = 4096;

/// Count each distinct tuple; empty input yields an empty histogram
pub fn histogram(tuples: &[FactTuple]) -> Result<Histogram, CaseError> {
    check_arity(tuples)?;
    Ok(count_shard(tuples))
}

/// Same counts as [`histogram`], with shards counted in parallel and merged by summation
pub fn histogram_sharded(tuples: &[FactTuple], shard_rows: usize) -> Result<Histogram, CaseError> {
    check_arity(tuples)?;
    let counts = tuples
        .par_chunks(shard_rows.max(1))
        .map(count_shard)
        .reduce(Histogram::new, merge_histograms);
    Ok(counts)
}

/// Sum the counts of two histograms
pub fn merge_histograms(mut a: Histogram, b: Histogram) -> Histogram {
    for (tuple, count) in b {
        *a.entry(tuple).or_insert(0) += count;
    }
    a
}

pub fn total_count(histogram: &Histogram) -> usize {
    histogram.values().sum()
}

fn count_shard(tuples: &[FactTuple]) -> Histogram {
    let mut counts = Histogram::new();
    for tuple in tuples {
        // Avoid cloning the tuple when it is already counted
        if let Some(count) = counts.get_mut(tuple) {
            *count += 1;
        } else {
            counts.insert(tuple.clone(), 1);
        }
    }
    counts
}

fn check_arity(tuples: &[FactTuple]) -> Result<(), CaseError> {
    if let Some(first) = tuples.first() {
        let expected = first.len();
        if let Some((row, tuple)) = tuples
            .iter()
            .enumerate()
            .find(|(_, t)| t.len() != expected)
        {
            return Err(CaseError::RaggedRow {
                row,
                found: tuple.len(),
                expected,
            });
        }
    }
    Ok(())
}
