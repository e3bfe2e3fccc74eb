//! Equal-width and equal-depth binning of a single numeric column

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::binning::labels::column_labels;
use crate::binning::table::{BinnedColumn, DiscretizedTable};
use crate::dataset::NumericColumn;
use crate::error::BinningError;

/// Minimum padding applied to both ends of the equal-width range
pub const EQUAL_WIDTH_EPSILON: f64 = 1e-5;

/// Binning policy, uniform across all columns of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinningMethod {
    EqualWidth,
    #[default]
    EqualDepth,
}

impl FromStr for BinningMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "equal_width" => Ok(BinningMethod::EqualWidth),
            "equal_depth" => Ok(BinningMethod::EqualDepth),
            other => Err(format!("unknown binning method '{}'", other)),
        }
    }
}

impl fmt::Display for BinningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinningMethod::EqualWidth => write!(f, "equal_width"),
            BinningMethod::EqualDepth => write!(f, "equal_depth"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binner {
    n_bins: usize,
    method: BinningMethod,
}

impl Binner {
    pub fn new(n_bins: usize, method: BinningMethod) -> Result<Self, BinningError> {
        if n_bins < 2 {
            return Err(BinningError::InvalidBinCount(n_bins));
        }
        Ok(Self { n_bins, method })
    }

    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    pub fn method(&self) -> BinningMethod {
        self.method
    }

    /// Binary domains get the polarity collapse during fact normalization
    pub fn is_binary(&self) -> bool {
        self.n_bins == 2
    }

    /// Bin index per row, `0..n_bins`, lowest bin first
    pub fn bin_indices(&self, column: &str, values: &[f64]) -> Result<Vec<usize>, BinningError> {
        validate_values(column, values)?;
        match self.method {
            BinningMethod::EqualWidth => Ok(equal_width_indices(values, self.n_bins)),
            BinningMethod::EqualDepth => equal_depth_indices(column, values, self.n_bins),
        }
    }

    pub fn bin_column(&self, column: &NumericColumn) -> Result<BinnedColumn, BinningError> {
        let bins = self.bin_indices(&column.name, &column.values)?;
        tracing::debug!(
            "Binned column '{}' into {} {} bins",
            column.name,
            self.n_bins,
            self.method
        );
        Ok(BinnedColumn::new(
            &column.name,
            column_labels(self.n_bins, &column.name),
            bins,
        ))
    }

    /// Bin every column, keeping the input column order
    pub fn bin_table(
        &self,
        columns: &[NumericColumn],
        parallel: bool,
    ) -> Result<DiscretizedTable, BinningError> {
        let binned: Vec<BinnedColumn> = if parallel {
            columns
                .par_iter()
                .map(|c| self.bin_column(c))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            columns
                .iter()
                .map(|c| self.bin_column(c))
                .collect::<Result<Vec<_>, _>>()?
        };

        let table = DiscretizedTable::new(self.n_bins, self.method, binned)?;
        tracing::info!(
            "Discretized {} columns x {} rows ({} bins, {})",
            table.width(),
            table.height(),
            self.n_bins,
            self.method
        );
        Ok(table)
    }
}

fn validate_values(column: &str, values: &[f64]) -> Result<(), BinningError> {
    if values.is_empty() {
        return Err(BinningError::EmptyColumn(column.to_string()));
    }
    if let Some(row) = values.iter().position(|v| !v.is_finite()) {
        return Err(BinningError::MissingValues {
            column: column.to_string(),
            row,
        });
    }
    Ok(())
}

/// Intervals are right-closed, `(edge[i], edge[i + 1]]`
fn equal_width_indices(values: &[f64], n: usize) -> Vec<usize> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    // Padding must stay above the rounding error at the column's magnitude
    let magnitude = min.abs().max(max.abs());
    let eps = EQUAL_WIDTH_EPSILON.max(magnitude * f64::EPSILON * 4.0);
    let lo = min - eps;
    let hi = max + eps;
    let step = (hi - lo) / n as f64;

    let mut upper_edges: Vec<f64> = (1..n).map(|i| lo + step * i as f64).collect();
    upper_edges.push(hi);

    values
        .iter()
        .map(|&v| {
            upper_edges
                .iter()
                .position(|&edge| v <= edge)
                .unwrap_or(n - 1)
        })
        .collect()
}

/// 1-based ranks; equal values are ranked by row order
pub fn stable_ranks(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0; values.len()];
    for (position, &row) in order.iter().enumerate() {
        ranks[row] = position + 1;
    }
    ranks
}

/// Quantile cut-points `k/n` over the rank sequence `1..=T`
///
/// With linear interpolation the k-th cut-point is `1 + k(T-1)/n`. A rank `r`
/// falls in the first bin whose upper cut-point is `>= r`, the lowest
/// cut-point being inclusive. The comparison `n(r-1) <= k(T-1)` is done in
/// integers so the assignment is exact.
fn equal_depth_indices(
    column: &str,
    values: &[f64],
    n: usize,
) -> Result<Vec<usize>, BinningError> {
    let total = values.len();
    if total < n {
        return Err(BinningError::InsufficientVariation {
            column: column.to_string(),
            bins: n,
            reason: format!("only {} rows", total),
        });
    }
    let first = values[0];
    if values.iter().all(|&v| v == first) {
        return Err(BinningError::InsufficientVariation {
            column: column.to_string(),
            bins: n,
            reason: format!("column is constant ({})", first),
        });
    }

    let span = total - 1;
    let indices = stable_ranks(values)
        .into_iter()
        .map(|rank| {
            if rank == 1 {
                0
            } else {
                (n * (rank - 1)).div_ceil(span) - 1
            }
        })
        .collect();
    Ok(indices)
}
