//! Tabular input: polars frames and the numeric columns the binner consumes

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use crate::config::MockConfig;
use crate::error::{BinningError, CaseError};

/// One named numeric column, no missing values
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<f64>,
}

impl NumericColumn {
    pub fn new(name: &str, values: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            values,
        }
    }

    pub fn from_series(series: &Series) -> Result<Self, CaseError> {
        let name = series.name().to_string();
        if !series.dtype().is_numeric() {
            return Err(BinningError::NonNumericColumn {
                column: name,
                dtype: series.dtype().to_string(),
            }
            .into());
        }

        let cast = series.cast(&DataType::Float64)?;
        let mut values = Vec::with_capacity(cast.len());
        for (row, value) in cast.f64()?.into_iter().enumerate() {
            match value {
                Some(v) => values.push(v),
                None => {
                    return Err(BinningError::MissingValues { column: name, row }.into());
                }
            }
        }
        Ok(Self { name, values })
    }
}

/// Extract numeric columns, optionally restricted to `selection` in that order
pub fn numeric_columns(
    df: &DataFrame,
    selection: Option<&[String]>,
) -> Result<Vec<NumericColumn>, CaseError> {
    match selection {
        Some(names) => names
            .iter()
            .map(|name| NumericColumn::from_series(df.column(name)?))
            .collect(),
        None => df
            .get_columns()
            .iter()
            .map(NumericColumn::from_series)
            .collect(),
    }
}

/// Load a CSV file into memory
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let path = path.as_ref();
    let df = LazyCsvReader::new(path)
        .finish()
        .with_context(|| format!("Failed to read CSV {:?}", path))?
        .collect()
        .with_context(|| format!("Failed to collect CSV {:?}", path))?;
    tracing::info!("Loaded {} rows x {} columns from {:?}", df.height(), df.width(), path);
    Ok(df)
}

/// Dataset name used in output paths, derived from the file stem
pub fn dataset_name<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string()
}

/// Resolve the dataset for a run: the CSV at `input`, or mock data when `mock` is set
pub fn load_input(input: Option<&str>, mock: bool, config: &MockConfig) -> Result<(String, DataFrame)> {
    match input {
        Some(path) if !mock => Ok((dataset_name(path), load_csv(path)?)),
        None if !mock => anyhow::bail!("No input given. Pass --input <csv> or --mock."),
        _ => {
            tracing::info!(
                "Generating mock dataset: rows={}, seed={}",
                config.rows,
                config.seed
            );
            let df = generate_mock_weather(config.rows, config.seed)?;
            Ok(("mock".to_string(), df))
        }
    }
}

/// Synthetic weather-like dataset for dry runs
pub fn generate_mock_weather(rows: usize, seed: u64) -> PolarsResult<DataFrame> {
    let mut rng = fastrand::Rng::with_seed(seed);

    let mut humidity = Vec::with_capacity(rows);
    let mut temp = Vec::with_capacity(rows);
    let mut wind_speed = Vec::with_capacity(rows);
    let mut pressure = Vec::with_capacity(rows);

    for _ in 0..rows {
        let h = 20.0 + rng.f64() * 80.0;
        humidity.push(h);
        // Humid days run cooler
        temp.push(35.0 - h * 0.2 + rng.f64() * 10.0);
        wind_speed.push(rng.f64() * rng.f64() * 60.0);
        pressure.push(995.0 + rng.f64() * 35.0 - h * 0.1);
    }

    DataFrame::new(vec![
        Series::new("Humidity", humidity),
        Series::new("Temp", temp),
        Series::new("WindSpeed", wind_speed),
        Series::new("Pressure", pressure),
    ])
}
