//! Output writing for case models and parsed rules (Parquet and JSONL)

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::binning::DiscretizedTable;
use crate::cases::{Case, CaseModel};
use crate::rules::{split_rule_lines, Argument, RuleFailure};

fn cases_dir(data_dir: &str, dataset: &str) -> PathBuf {
    Path::new(data_dir)
        .join("cases")
        .join(format!("dataset={}", dataset))
}

fn arguments_dir(data_dir: &str, dataset: &str) -> PathBuf {
    Path::new(data_dir)
        .join("arguments")
        .join(format!("dataset={}", dataset))
}

/// Write the discretized label table to Parquet
pub fn write_discretized_parquet(
    data_dir: &str,
    dataset: &str,
    table: &DiscretizedTable,
) -> Result<PathBuf> {
    let dir = cases_dir(data_dir, dataset);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {:?}", dir))?;

    let path = dir.join("binned.parquet");
    let mut df = table.to_dataframe()?;
    let file = std::fs::File::create(&path)?;
    ParquetWriter::new(file).finish(&mut df)?;

    tracing::info!("Wrote {} binned rows to {:?}", table.height(), path);
    Ok(path)
}

/// Write the case model to Parquet, one row per case
pub fn write_case_model_parquet(data_dir: &str, dataset: &str, model: &CaseModel) -> Result<PathBuf> {
    let dir = cases_dir(data_dir, dataset);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {:?}", dir))?;

    let path = dir.join("cases.parquet");

    let case_id_col: Vec<u32> = (0..model.len() as u32).collect();
    let probability_col: Vec<f64> = model.iter().map(|c| c.probability).collect();
    let fact_count_col: Vec<u32> = model.iter().map(|c| c.facts.len() as u32).collect();
    let facts_json_col: Vec<String> = model
        .iter()
        .map(|c| serde_json::to_string(&c.facts))
        .collect::<Result<_, _>>()?;
    let facts_text_col: Vec<String> = model
        .iter()
        .map(|c| crate::cases::format_facts(&c.facts))
        .collect();

    let mut df = DataFrame::new(vec![
        Series::new("case_id", case_id_col),
        Series::new("probability", probability_col),
        Series::new("fact_count", fact_count_col),
        Series::new("facts_json", facts_json_col),
        Series::new("facts", facts_text_col),
    ])?;

    let file = std::fs::File::create(&path)?;
    ParquetWriter::new(file).finish(&mut df)?;

    tracing::info!("Wrote {} cases to {:?}", model.len(), path);
    Ok(path)
}

/// Write the case model to JSONL, one case per line
pub fn write_case_model_jsonl(data_dir: &str, dataset: &str, model: &CaseModel) -> Result<PathBuf> {
    let dir = cases_dir(data_dir, dataset);
    std::fs::create_dir_all(&dir)?;

    let path = dir.join("cases.jsonl");
    let mut file = std::fs::File::create(&path)?;
    for case in model {
        let json = serde_json::to_string(case)?;
        writeln!(file, "{}", json)?;
    }

    tracing::info!("Wrote {} cases to {:?}", model.len(), path);
    Ok(path)
}

/// Load a case model written by [`write_case_model_jsonl`]
pub fn load_case_model_jsonl(data_dir: &str, dataset: &str) -> Result<CaseModel> {
    let path = cases_dir(data_dir, dataset).join("cases.jsonl");
    if !path.exists() {
        anyhow::bail!("Cases file not found: {:?}. Run 'cases' first.", path);
    }

    let content = std::fs::read_to_string(&path)?;
    let mut cases = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let case: Case = serde_json::from_str(line)?;
        cases.push(case);
    }

    let model = CaseModel::from_cases(cases)
        .with_context(|| format!("Invalid case model in {:?}", path))?;
    Ok(model)
}

/// Write parsed arguments to JSONL in input order
pub fn write_arguments_jsonl(data_dir: &str, dataset: &str, arguments: &[Argument]) -> Result<PathBuf> {
    let dir = arguments_dir(data_dir, dataset);
    std::fs::create_dir_all(&dir)?;

    let path = dir.join("arguments.jsonl");
    let mut file = std::fs::File::create(&path)?;
    for argument in arguments {
        let json = serde_json::to_string(argument)?;
        writeln!(file, "{}", json)?;
    }

    tracing::info!("Wrote {} arguments to {:?}", arguments.len(), path);
    Ok(path)
}

pub fn load_arguments_jsonl(data_dir: &str, dataset: &str) -> Result<Vec<Argument>> {
    let path = arguments_dir(data_dir, dataset).join("arguments.jsonl");
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&path)?;
    let mut arguments = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        arguments.push(serde_json::from_str(line)?);
    }
    Ok(arguments)
}

/// Review record for a rule that failed to parse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub index: usize,
    pub rule: String,
    pub rule_hash: String,
    pub kind: String,
    pub message: String,
}

impl From<&RuleFailure> for FailureRecord {
    fn from(failure: &RuleFailure) -> Self {
        Self {
            index: failure.index,
            rule: failure.rule.clone(),
            rule_hash: failure.rule_hash.clone(),
            kind: failure.error.kind().to_string(),
            message: failure.error.to_string(),
        }
    }
}

/// Write rule failures to a JSONL review file
pub fn write_rule_failures_jsonl(
    data_dir: &str,
    dataset: &str,
    failures: &[RuleFailure],
) -> Result<PathBuf> {
    let dir = arguments_dir(data_dir, dataset);
    std::fs::create_dir_all(&dir)?;

    let path = dir.join("failures.jsonl");
    let mut file = std::fs::File::create(&path)?;
    for failure in failures {
        let json = serde_json::to_string(&FailureRecord::from(failure))?;
        writeln!(file, "{}", json)?;
    }

    tracing::info!("Wrote {} rule failures to {:?}", failures.len(), path);
    Ok(path)
}

/// Read a rules file, one rule per line
pub fn load_rules_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read rules from {:?}", path.as_ref()))?;
    Ok(split_rule_lines(&content))
}
