//! Named boolean propositions

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fact {
    pub name: String,
    pub value: bool,
}

impl Fact {
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn holds(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    pub fn negated(&self) -> Self {
        Self::new(self.name.clone(), !self.value)
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value {
            write!(f, "{}", self.name)
        } else {
            write!(f, "!{}", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_uses_name_and_value() {
        assert_eq!(Fact::new("high_Temp", true), Fact::holds("high_Temp"));
        assert_ne!(Fact::new("high_Temp", true), Fact::new("high_Temp", false));
        assert_ne!(Fact::holds("high_Temp"), Fact::holds("high_Wind"));
    }

    #[test]
    fn test_display_and_negation() {
        let fact = Fact::holds("high_Temp");
        assert_eq!(fact.to_string(), "high_Temp");
        assert_eq!(fact.negated().to_string(), "!high_Temp");
        assert_eq!(fact.negated().negated(), fact);
    }
}
