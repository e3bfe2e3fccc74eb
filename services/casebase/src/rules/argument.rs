//! Core argument types for parsed decision rules

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::cases::Fact;

/// Threshold comparison emitted by the tree producer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    LessEq,  // <=
    Greater, // >
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::LessEq => "<=",
            Operator::Greater => ">",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<=" => Some(Operator::LessEq),
            ">" => Some(Operator::Greater),
            _ => None,
        }
    }

    /// The two operators split a feature's range into complements
    pub fn complement(&self) -> Self {
        match self {
            Operator::LessEq => Operator::Greater,
            Operator::Greater => Operator::LessEq,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One premise: `feature operator threshold`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub feature: String,
    pub operator: Operator,
    pub threshold: f64,
}

impl Condition {
    pub fn new(feature: &str, operator: Operator, threshold: f64) -> Self {
        Self {
            feature: feature.to_string(),
            operator,
            threshold,
        }
    }

    pub fn holds(&self, value: f64) -> bool {
        match self.operator {
            Operator::LessEq => value <= self.threshold,
            Operator::Greater => value > self.threshold,
        }
    }

    /// Canonical fact with a single name per split, `feature > threshold`
    ///
    /// `<=` conditions map to the same name with `value = false`, matching
    /// the polarity convention used for binary bins.
    pub fn to_fact(&self) -> Fact {
        let name = format!(
            "{} {} {}",
            self.feature,
            Operator::Greater.symbol(),
            format_threshold(self.threshold)
        );
        Fact::new(name, self.operator == Operator::Greater)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} {} {})",
            self.feature,
            self.operator,
            format_threshold(self.threshold)
        )
    }
}

/// Leaf outcome of a decision path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Class(String),
    /// Regression leaf, no class table
    Response(f64),
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conclusion::Class(name) => write!(f, "{}", name),
            Conclusion::Response(value) => write!(f, "response: {}", format_threshold(*value)),
        }
    }
}

/// Ordered premises (root to leaf) plus a conclusion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub premises: Vec<Condition>,
    pub conclusion: Conclusion,
    pub rule_hash: String, // sha256 of raw rule text
}

impl Argument {
    pub fn new(premises: Vec<Condition>, conclusion: Conclusion, raw_rule: &str) -> Self {
        Self {
            premises,
            conclusion,
            rule_hash: rule_hash(raw_rule),
        }
    }

    pub fn premise_facts(&self) -> Vec<Fact> {
        self.premises.iter().map(Condition::to_fact).collect()
    }

    /// Features tested along the path, in first-tested order
    pub fn features(&self) -> Vec<&str> {
        let mut features: Vec<&str> = Vec::new();
        for premise in &self.premises {
            if !features.contains(&premise.feature.as_str()) {
                features.push(&premise.feature);
            }
        }
        features
    }

    /// Check the premises against a row lookup; unknown features fail the match
    pub fn applies<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<f64>,
    {
        self.premises
            .iter()
            .all(|p| lookup(&p.feature).is_some_and(|v| p.holds(v)))
    }

    pub fn class_name(&self) -> Option<&str> {
        match &self.conclusion {
            Conclusion::Class(name) => Some(name),
            Conclusion::Response(_) => None,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let premises: Vec<String> = self.premises.iter().map(|p| p.to_string()).collect();
        if premises.is_empty() {
            write!(f, "-> {}", self.conclusion)
        } else {
            write!(f, "{} -> {}", premises.join(", "), self.conclusion)
        }
    }
}

/// Hex sha256 of the raw rule text
pub fn rule_hash(raw_rule: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_rule.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Whole numbers keep one decimal, e.g. `50.0`
fn format_threshold(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
