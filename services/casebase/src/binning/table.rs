//! Discretized table: per-column bin assignments sharing one row count

use polars::prelude::*;

use crate::binning::binner::BinningMethod;
use crate::error::BinningError;

#[derive(Debug, Clone, PartialEq)]
pub struct BinnedColumn {
    pub name: String,
    /// Column labels, lowest bin first
    pub vocabulary: Vec<String>,
    /// Bin index per row
    pub bins: Vec<usize>,
}

impl BinnedColumn {
    pub fn new(name: &str, vocabulary: Vec<String>, bins: Vec<usize>) -> Self {
        Self {
            name: name.to_string(),
            vocabulary,
            bins,
        }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Check the vocabulary size and every bin index against `n_bins`
    pub fn validate(&self, n_bins: usize) -> Result<(), BinningError> {
        if self.vocabulary.len() != n_bins {
            return Err(BinningError::VocabularyMismatch {
                column: self.name.clone(),
                found: self.vocabulary.len(),
                expected: n_bins,
            });
        }
        match self.bins.iter().position(|&bin| bin >= n_bins) {
            Some(row) => Err(BinningError::BinIndexOutOfRange {
                column: self.name.clone(),
                row,
                bin: self.bins[row],
                labels: n_bins,
            }),
            None => Ok(()),
        }
    }

    /// Panics if `row` is out of range or the column was never validated
    pub fn label(&self, row: usize) -> &str {
        &self.vocabulary[self.bins[row]]
    }

    /// Row count per bin, lowest bin first
    pub fn bin_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.vocabulary.len()];
        for &bin in &self.bins {
            counts[bin] += 1;
        }
        counts
    }
}

/// Output of binning every column of one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DiscretizedTable {
    n_bins: usize,
    method: BinningMethod,
    columns: Vec<BinnedColumn>,
}

impl DiscretizedTable {
    pub fn new(
        n_bins: usize,
        method: BinningMethod,
        columns: Vec<BinnedColumn>,
    ) -> Result<Self, BinningError> {
        for column in &columns {
            column.validate(n_bins)?;
        }
        if let Some(first) = columns.first() {
            if let Some(short) = columns.iter().find(|c| c.len() != first.len()) {
                return Err(BinningError::LengthMismatch {
                    column: short.name.clone(),
                    found: short.len(),
                    expected: first.len(),
                });
            }
        }
        Ok(Self {
            n_bins,
            method,
            columns,
        })
    }

    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    pub fn method(&self) -> BinningMethod {
        self.method
    }

    pub fn is_binary(&self) -> bool {
        self.n_bins == 2
    }

    pub fn height(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[BinnedColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Labels of one row in column order
    pub fn row_labels(&self, row: usize) -> Vec<&str> {
        self.columns.iter().map(|c| c.label(row)).collect()
    }

    /// Export as string columns named `<column>_facts`
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let series: Vec<Series> = self
            .columns
            .iter()
            .map(|c| {
                let labels: Vec<&str> = (0..c.len()).map(|row| c.label(row)).collect();
                Series::new(&format!("{}_facts", c.name), labels)
            })
            .collect();
        DataFrame::new(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::labels::column_labels;

    fn table() -> DiscretizedTable {
        DiscretizedTable::new(
            2,
            BinningMethod::EqualDepth,
            vec![
                BinnedColumn::new("Humidity", column_labels(2, "Humidity"), vec![0, 1, 1]),
                BinnedColumn::new("Temp", column_labels(2, "Temp"), vec![1, 0, 1]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_row_labels() {
        let t = table();
        assert_eq!(t.height(), 3);
        assert_eq!(t.width(), 2);
        assert_eq!(t.row_labels(0), vec!["low_Humidity", "high_Temp"]);
        assert_eq!(t.columns()[0].bin_counts(), vec![1, 2]);
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let result = DiscretizedTable::new(
            2,
            BinningMethod::EqualWidth,
            vec![
                BinnedColumn::new("a", column_labels(2, "a"), vec![0, 1]),
                BinnedColumn::new("b", column_labels(2, "b"), vec![0]),
            ],
        );
        assert!(matches!(
            result,
            Err(BinningError::LengthMismatch { found: 1, expected: 2, .. })
        ));
    }

    #[test]
    fn test_bin_index_out_of_range_rejected() {
        let result = DiscretizedTable::new(
            2,
            BinningMethod::EqualWidth,
            vec![BinnedColumn::new("a", column_labels(2, "a"), vec![0, 5])],
        );
        assert_eq!(
            result,
            Err(BinningError::BinIndexOutOfRange {
                column: "a".to_string(),
                row: 1,
                bin: 5,
                labels: 2,
            })
        );
    }

    #[test]
    fn test_vocabulary_size_must_match_bin_count() {
        let result = DiscretizedTable::new(
            3,
            BinningMethod::EqualDepth,
            vec![BinnedColumn::new("a", column_labels(2, "a"), vec![0, 1])],
        );
        assert!(matches!(
            result,
            Err(BinningError::VocabularyMismatch { found: 2, expected: 3, .. })
        ));
    }

    #[test]
    fn test_to_dataframe() {
        let df = table().to_dataframe().unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.get_column_names(), vec!["Humidity_facts", "Temp_facts"]);
        let temp = df.column("Temp_facts").unwrap().str().unwrap();
        assert_eq!(temp.get(1), Some("low_Temp"));
    }
}
