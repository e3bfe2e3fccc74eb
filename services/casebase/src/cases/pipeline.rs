//! End-to-end case building: bin → normalize → count → normalize mass

use polars::prelude::DataFrame;

use crate::binning::{Binner, BinningMethod, DiscretizedTable};
use crate::cases::histogram::{histogram, histogram_sharded, DEFAULT_SHARD_ROWS};
use crate::cases::model::CaseModel;
use crate::cases::normalize::table_fact_tuples;
use crate::config::BinningConfig;
use crate::dataset::{numeric_columns, NumericColumn};
use crate::error::CaseError;

/// Build a case model from an already discretized table
pub fn generate_case_model(table: &DiscretizedTable, parallel: bool) -> Result<CaseModel, CaseError> {
    let tuples = table_fact_tuples(table)?;
    let counts = if parallel {
        histogram_sharded(&tuples, DEFAULT_SHARD_ROWS)?
    } else {
        histogram(&tuples)?
    };
    tracing::info!(
        "Aggregated {} rows into {} distinct fact-tuples",
        tuples.len(),
        counts.len()
    );
    CaseModel::from_histogram(&counts, tuples.len())
}

#[derive(Debug, Clone)]
pub struct CaseModelBuilder {
    binner: Binner,
    columns: Option<Vec<String>>,
    parallel: bool,
}

impl CaseModelBuilder {
    pub fn new(n_bins: usize, method: BinningMethod) -> Result<Self, CaseError> {
        Ok(Self {
            binner: Binner::new(n_bins, method)?,
            columns: None,
            parallel: false,
        })
    }

    pub fn from_config(config: &BinningConfig) -> Result<Self, CaseError> {
        Ok(Self::new(config.n_bins, config.method)?
            .with_columns(config.columns.clone())
            .with_parallel(config.parallel))
    }

    pub fn with_columns(mut self, columns: Option<Vec<String>>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn binner(&self) -> &Binner {
        &self.binner
    }

    pub fn discretize(&self, columns: &[NumericColumn]) -> Result<DiscretizedTable, CaseError> {
        Ok(self.binner.bin_table(columns, self.parallel)?)
    }

    pub fn discretize_dataframe(&self, df: &DataFrame) -> Result<DiscretizedTable, CaseError> {
        let columns = numeric_columns(df, self.columns.as_deref())?;
        self.discretize(&columns)
    }

    pub fn build(&self, columns: &[NumericColumn]) -> Result<CaseModel, CaseError> {
        let table = self.discretize(columns)?;
        generate_case_model(&table, self.parallel)
    }

    pub fn build_from_dataframe(&self, df: &DataFrame) -> Result<CaseModel, CaseError> {
        let table = self.discretize_dataframe(df)?;
        generate_case_model(&table, self.parallel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::fact::Fact;
    use crate::cases::model::PROBABILITY_TOLERANCE;
    use crate::dataset::generate_mock_weather;
    use crate::error::BinningError;

    fn weather() -> Vec<NumericColumn> {
        vec![
            NumericColumn::new("Humidity", vec![80.0, 20.0, 55.0, 40.0, 90.0, 10.0, 70.0, 30.0]),
            NumericColumn::new("Temp", vec![12.0, 30.0, 15.0, 24.0, 5.0, 22.0, 14.0, 28.0]),
        ]
    }

    #[test]
    fn test_binary_pipeline() {
        let builder = CaseModelBuilder::new(2, BinningMethod::EqualDepth).unwrap();
        let model = builder.build(&weather()).unwrap();

        // Humid rows are exactly the cold rows in this sample
        assert_eq!(model.len(), 2);
        assert_eq!(
            model.probability_of(&[
                Fact::holds("high_Humidity"),
                Fact::new("high_Temp", false)
            ]),
            0.5
        );
        for case in &model {
            assert_eq!(case.facts.len(), 2);
            assert!(case.facts.iter().all(|f| f.name.starts_with("high_")));
        }
    }

    #[test]
    fn test_multi_bin_pipeline_uses_presence_facts() {
        let builder = CaseModelBuilder::new(4, BinningMethod::EqualWidth).unwrap();
        let model = builder.build(&weather()).unwrap();
        let tolerance = PROBABILITY_TOLERANCE * model.len() as f64;
        assert!((model.total_probability() - 1.0).abs() <= tolerance);
        assert!(model.iter().all(|c| c.facts.iter().all(|f| f.value)));
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let df = generate_mock_weather(300, 11).unwrap();
        for parallel in [false, true] {
            let builder = CaseModelBuilder::new(3, BinningMethod::EqualDepth)
                .unwrap()
                .with_parallel(parallel);
            let first = builder.build_from_dataframe(&df).unwrap();
            let second = builder.build_from_dataframe(&df).unwrap();
            assert_eq!(first, second);
            let bits = |m: &CaseModel| m.iter().map(|c| c.probability.to_bits()).collect::<Vec<_>>();
            assert_eq!(bits(&first), bits(&second));
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let df = generate_mock_weather(500, 5).unwrap();
        let sequential = CaseModelBuilder::new(2, BinningMethod::EqualDepth)
            .unwrap()
            .build_from_dataframe(&df)
            .unwrap();
        let parallel = CaseModelBuilder::new(2, BinningMethod::EqualDepth)
            .unwrap()
            .with_parallel(true)
            .build_from_dataframe(&df)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_column_selection() {
        let df = generate_mock_weather(40, 1).unwrap();
        let builder = CaseModelBuilder::new(2, BinningMethod::EqualDepth)
            .unwrap()
            .with_columns(Some(vec!["Temp".to_string()]));
        let model = builder.build_from_dataframe(&df).unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.probability_of(&[Fact::holds("high_Temp")]), 0.5);
    }

    #[test]
    fn test_constant_column_fails_whole_build() {
        let columns = vec![
            NumericColumn::new("Temp", vec![1.0, 2.0, 3.0]),
            NumericColumn::new("Flat", vec![7.0, 7.0, 7.0]),
        ];
        let builder = CaseModelBuilder::new(2, BinningMethod::EqualDepth).unwrap();
        let err = builder.build(&columns).unwrap_err();
        assert!(matches!(
            err,
            CaseError::Binning(BinningError::InsufficientVariation { ref column, .. }) if column == "Flat"
        ));
    }

    #[test]
    fn test_from_config() {
        let config = BinningConfig {
            n_bins: 5,
            method: BinningMethod::EqualWidth,
            columns: None,
            parallel: false,
        };
        let builder = CaseModelBuilder::from_config(&config).unwrap();
        assert_eq!(builder.binner().n_bins(), 5);
        assert_eq!(builder.binner().method(), BinningMethod::EqualWidth);
    }
}
