//! Label → canonical fact normalization
//!
//! Non-binary domains map every label to `(label, true)`. Binary domains keep a
//! single fact name per column: `high_X` stays `(high_X, true)` and `low_X`
//! becomes `(high_X, false)`, so the two bins stay mutually exclusive.

use crate::binning::DiscretizedTable;
use crate::cases::fact::Fact;
use crate::error::CaseError;

pub const LOW_PREFIX: &str = "low_";
pub const HIGH_PREFIX: &str = "high_";

/// Normalize a single bin label
pub fn to_fact(label: &str, is_binary: bool) -> Result<Fact, CaseError> {
    if !is_binary {
        return Ok(Fact::holds(label));
    }

    if let Some(rest) = label.strip_prefix(LOW_PREFIX) {
        Ok(Fact::new(format!("{}{}", HIGH_PREFIX, rest), false))
    } else if label.starts_with(HIGH_PREFIX) {
        Ok(Fact::holds(label))
    } else {
        Err(CaseError::MalformedLabel {
            label: label.to_string(),
        })
    }
}

/// Normalize one row of labels, keeping column order
pub fn row_to_facts(labels: &[&str], is_binary: bool) -> Result<Vec<Fact>, CaseError> {
    labels.iter().map(|l| to_fact(l, is_binary)).collect()
}

/// One fact-tuple per table row
///
/// Each column vocabulary is normalized once and rows index into it.
pub fn table_fact_tuples(table: &DiscretizedTable) -> Result<Vec<Vec<Fact>>, CaseError> {
    let is_binary = table.is_binary();
    let vocabularies: Vec<Vec<Fact>> = table
        .columns()
        .iter()
        .map(|c| {
            c.vocabulary
                .iter()
                .map(|label| to_fact(label, is_binary))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let tuples = (0..table.height())
        .map(|row| {
            table
                .columns()
                .iter()
                .zip(&vocabularies)
                .map(|(column, facts)| facts[column.bins[row]].clone())
                .collect()
        })
        .collect();
    Ok(tuples)
}
