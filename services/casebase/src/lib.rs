//! Tabular data and decision rules → symbolic cases and arguments
//!
//! 1. `binning` discretizes numeric columns into labelled bins
//! 2. `cases` turns labelled rows into facts and aggregates them into a case model
//! 3. `rules` parses decision-rule strings into arguments

pub mod config;
pub mod error;
pub mod dataset;
pub mod binning;
pub mod cases;
pub mod rules;
pub mod outputs;

pub use error::{BinningError, CaseError, RuleError};
