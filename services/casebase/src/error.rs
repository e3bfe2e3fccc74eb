//! Error types for the binning, case-building and rule-parsing stages

use thiserror::Error;

/// Errors raised while discretizing a numeric column
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BinningError {
    /// Column cannot be split into the requested number of bins
    #[error("column '{column}' cannot be split into {bins} bins: {reason}")]
    InsufficientVariation {
        column: String,
        bins: usize,
        reason: String,
    },

    #[error("bin count must be at least 2, got {0}")]
    InvalidBinCount(usize),

    #[error("column '{column}' has a missing or non-finite value at row {row}")]
    MissingValues { column: String, row: usize },

    #[error("column '{column}' is not numeric (dtype {dtype})")]
    NonNumericColumn { column: String, dtype: String },

    #[error("column '{0}' has no rows")]
    EmptyColumn(String),

    #[error("column '{column}' has {found} labels, expected {expected}")]
    VocabularyMismatch {
        column: String,
        found: usize,
        expected: usize,
    },

    /// Bin assignment points outside the column vocabulary
    #[error("column '{column}' assigns bin {bin} at row {row}, outside its {labels} labels")]
    BinIndexOutOfRange {
        column: String,
        row: usize,
        bin: usize,
        labels: usize,
    },

    #[error("column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        found: usize,
        expected: usize,
    },
}

/// Errors raised while building a case model
#[derive(Error, Debug)]
pub enum CaseError {
    /// Label does not belong to the binary vocabulary
    #[error("malformed label '{label}' for a binary column")]
    MalformedLabel { label: String },

    #[error("cannot build a case model over zero observations")]
    EmptyPopulation,

    /// Internal aggregation bug, not a user error
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("row {row} has {found} labels, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error(transparent)]
    Binning(#[from] BinningError),

    #[error("dataframe error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Errors raised while parsing a single rule string
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("malformed rule '{rule}': {reason}")]
    MalformedRule { rule: String, reason: String },

    #[error("unparsable condition '{condition}' in rule '{rule}'")]
    UnparsableCondition { rule: String, condition: String },
}

impl RuleError {
    pub fn malformed(rule: &str, reason: &str) -> Self {
        RuleError::MalformedRule {
            rule: rule.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn unparsable(rule: &str, condition: &str) -> Self {
        RuleError::UnparsableCondition {
            rule: rule.to_string(),
            condition: condition.to_string(),
        }
    }

    /// Raw rule text that triggered the failure
    pub fn rule(&self) -> &str {
        match self {
            RuleError::MalformedRule { rule, .. } => rule,
            RuleError::UnparsableCondition { rule, .. } => rule,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RuleError::MalformedRule { .. } => "malformed_rule",
            RuleError::UnparsableCondition { .. } => "unparsable_condition",
        }
    }
}
