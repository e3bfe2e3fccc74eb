//! Batch parsing: failures are collected per rule, never abort the batch

use rayon::prelude::*;

use crate::error::RuleError;
use crate::rules::argument::{rule_hash, Argument};
use crate::rules::parse::RuleParser;

/// A rule that failed to parse, with its position in the input batch
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFailure {
    pub index: usize,
    pub rule: String,
    pub rule_hash: String,
    pub error: RuleError,
}

impl RuleFailure {
    pub fn new(index: usize, rule: &str, error: RuleError) -> Self {
        Self {
            index,
            rule: rule.to_string(),
            rule_hash: rule_hash(rule),
            error,
        }
    }
}

/// Parsed arguments in input order plus per-rule failures
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleBatch {
    pub arguments: Vec<Argument>,
    pub failures: Vec<RuleFailure>,
}

impl RuleBatch {
    pub fn total(&self) -> usize {
        self.arguments.len() + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn from_results(results: Vec<Result<Argument, RuleError>>, rules: &[impl AsRef<str>]) -> Self {
        let mut batch = RuleBatch::default();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(argument) => batch.arguments.push(argument),
                Err(error) => {
                    tracing::warn!("Skipping rule {}: {}", index, error);
                    batch
                        .failures
                        .push(RuleFailure::new(index, rules[index].as_ref(), error));
                }
            }
        }
        tracing::info!(
            "Parsed {} of {} rules ({} failed)",
            batch.arguments.len(),
            batch.total(),
            batch.failures.len()
        );
        batch
    }
}

/// Parse every rule sequentially
pub fn parse_batch<S: AsRef<str>>(parser: &RuleParser, rules: &[S]) -> RuleBatch {
    let results = rules.iter().map(|r| parser.parse(r.as_ref())).collect();
    RuleBatch::from_results(results, rules)
}

/// Parse rules in parallel; output order matches input order
pub fn parse_batch_parallel<S: AsRef<str> + Sync>(parser: &RuleParser, rules: &[S]) -> RuleBatch {
    let results = rules.par_iter().map(|r| parser.parse(r.as_ref())).collect();
    RuleBatch::from_results(results, rules)
}

/// Rules from a text block, one per line; blank lines and `#` comments are skipped
pub fn split_rule_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .map(str::to_string)
        .collect()
}
