//! Probability-weighted cases and the case model built from one population

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::cases::fact::Fact;
use crate::cases::histogram::{FactTuple, Histogram};
use crate::error::CaseError;

/// Per-case tolerance on the total probability mass
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// One observed fact configuration and its relative frequency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub probability: f64,
    pub facts: Vec<Fact>,
}

impl Case {
    pub fn new(probability: f64, facts: Vec<Fact>) -> Self {
        Self { probability, facts }
    }

    /// True if every given fact appears in this case
    pub fn satisfies(&self, facts: &[Fact]) -> bool {
        facts.iter().all(|f| self.facts.contains(f))
    }
}

/// Normalized population of cases with distinct fact-tuples
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseModel {
    cases: Vec<Case>,
}

impl CaseModel {
    /// One case per distinct tuple with `probability = count / total`
    pub fn from_histogram(histogram: &Histogram, total: usize) -> Result<Self, CaseError> {
        if total == 0 {
            return Err(CaseError::EmptyPopulation);
        }

        let cases = histogram
            .iter()
            .map(|(facts, &count)| Case::new(count as f64 / total as f64, facts.clone()))
            .collect();
        let model = Self { cases };
        model.check_normalized()?;

        tracing::debug!(
            "Built case model with {} cases over {} rows",
            model.len(),
            total
        );
        Ok(model)
    }

    /// Rebuild from stored cases, re-checking the model invariants
    pub fn from_cases(cases: Vec<Case>) -> Result<Self, CaseError> {
        if cases.is_empty() {
            return Err(CaseError::EmptyPopulation);
        }
        let mut seen: BTreeSet<&FactTuple> = BTreeSet::new();
        for case in &cases {
            if !(0.0..=1.0).contains(&case.probability) {
                return Err(CaseError::InvariantViolation(format!(
                    "case probability {} outside [0, 1]",
                    case.probability
                )));
            }
            if !seen.insert(&case.facts) {
                return Err(CaseError::InvariantViolation(format!(
                    "duplicate fact-tuple {}",
                    format_facts(&case.facts)
                )));
            }
        }
        let model = Self { cases };
        model.check_normalized()?;
        Ok(model)
    }

    fn check_normalized(&self) -> Result<(), CaseError> {
        let total = self.total_probability();
        let tolerance = PROBABILITY_TOLERANCE * self.cases.len().max(1) as f64;
        if (total - 1.0).abs() > tolerance {
            return Err(CaseError::InvariantViolation(format!(
                "case probabilities sum to {} over {} cases",
                total,
                self.cases.len()
            )));
        }
        Ok(())
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Case> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn total_probability(&self) -> f64 {
        self.cases.iter().map(|c| c.probability).sum()
    }

    /// Marginal probability that all given facts hold together
    pub fn probability_of(&self, facts: &[Fact]) -> f64 {
        self.cases
            .iter()
            .filter(|c| c.satisfies(facts))
            .map(|c| c.probability)
            .sum()
    }

    pub fn into_cases(self) -> Vec<Case> {
        self.cases
    }
}

impl<'a> IntoIterator for &'a CaseModel {
    type Item = &'a Case;
    type IntoIter = std::slice::Iter<'a, Case>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

pub fn format_facts(facts: &[Fact]) -> String {
    let parts: Vec<String> = facts.iter().map(|f| f.to_string()).collect();
    format!("[{}]", parts.join(", "))
}
