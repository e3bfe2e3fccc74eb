//! Rule-string grammar
//!
//! ```text
//! rule       := premises? "->" conclusion
//! premises   := condition (", " condition)*
//! condition  := "(" feature operator number ")"
//! operator   := "<=" | ">"
//! conclusion := class_name | "response:" number
//! ```
//!
//! The first `" -> "` splits premises from the conclusion; a rule with no
//! premises starts with `"-> "`. Within a condition the feature ends at the
//! first `<=` or `>`. `response:` conclusions only appear without a class table.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::RuleError;
use crate::rules::argument::*;

pub const RULE_SEPARATOR: &str = " -> ";
pub const CONDITION_SEPARATOR: &str = ", ";
pub const RESPONSE_MARKER: &str = "response:";

const CONDITION_PATTERN: &str = r"^\s*(?P<feature>\S.*?)\s*(?P<op><=|>)\s*(?P<threshold>.*?)\s*$";

fn condition_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CONDITION_PATTERN).expect("condition pattern is valid"))
}

/// Parses rule strings against an optional class-name table
#[derive(Debug, Clone, Default)]
pub struct RuleParser {
    class_names: Option<Vec<String>>,
}

impl RuleParser {
    pub fn new(class_names: Option<Vec<String>>) -> Self {
        Self { class_names }
    }

    pub fn classification(class_names: &[&str]) -> Self {
        Self::new(Some(class_names.iter().map(|s| s.to_string()).collect()))
    }

    pub fn regression() -> Self {
        Self::new(None)
    }

    pub fn class_names(&self) -> Option<&[String]> {
        self.class_names.as_deref()
    }

    pub fn parse(&self, rule: &str) -> Result<Argument, RuleError> {
        let text = rule.trim();
        if text.is_empty() {
            return Err(RuleError::malformed(rule, "empty rule"));
        }

        let (premise_text, conclusion_text) = split_rule(text)
            .ok_or_else(|| RuleError::malformed(rule, "missing ' -> ' separator"))?;
        if conclusion_text.contains(RULE_SEPARATOR.trim()) {
            return Err(RuleError::malformed(rule, "more than one '->' separator"));
        }

        let premises = self.parse_premises(rule, premise_text)?;
        let conclusion = self.parse_conclusion(rule, conclusion_text)?;
        Ok(Argument::new(premises, conclusion, rule))
    }

    fn parse_premises(&self, rule: &str, text: &str) -> Result<Vec<Condition>, RuleError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        text.split(CONDITION_SEPARATOR)
            .map(|piece| parse_condition(rule, piece))
            .collect()
    }

    fn parse_conclusion(&self, rule: &str, text: &str) -> Result<Conclusion, RuleError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RuleError::malformed(rule, "missing conclusion"));
        }

        if let Some(names) = &self.class_names {
            if names.iter().any(|n| n == text) {
                return Ok(Conclusion::Class(text.to_string()));
            }
            if text.starts_with(RESPONSE_MARKER) {
                return Err(RuleError::malformed(
                    rule,
                    &format!("regression conclusion '{}' with a class table", text),
                ));
            }
        }

        if let Some(value) = text.strip_prefix(RESPONSE_MARKER) {
            return match parse_number(value) {
                Some(v) => Ok(Conclusion::Response(v)),
                None => Err(RuleError::malformed(
                    rule,
                    &format!("invalid response value '{}'", value.trim()),
                )),
            };
        }

        let reason = match &self.class_names {
            Some(_) => format!("unknown class label '{}'", text),
            None => format!("expected '{} <value>' without a class table, got '{}'", RESPONSE_MARKER, text),
        };
        Err(RuleError::malformed(rule, &reason))
    }
}

/// Split at the first separator; a leading `"-> "` means no premises
fn split_rule(text: &str) -> Option<(&str, &str)> {
    if let Some(rest) = text.strip_prefix(RULE_SEPARATOR.trim_start()) {
        return Some(("", rest));
    }
    text.split_once(RULE_SEPARATOR)
}

fn parse_condition(rule: &str, piece: &str) -> Result<Condition, RuleError> {
    let inner = piece
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| {
            RuleError::malformed(rule, &format!("condition '{}' is not parenthesized", piece))
        })?;

    let caps = condition_regex()
        .captures(inner)
        .ok_or_else(|| RuleError::unparsable(rule, inner))?;

    let feature = caps.name("feature").map(|m| m.as_str()).unwrap_or_default();
    if feature.trim().is_empty() {
        return Err(RuleError::unparsable(rule, inner));
    }
    let operator = caps
        .name("op")
        .and_then(|m| Operator::from_symbol(m.as_str()))
        .ok_or_else(|| RuleError::unparsable(rule, inner))?;
    let threshold = caps
        .name("threshold")
        .and_then(|m| parse_number(m.as_str()))
        .ok_or_else(|| RuleError::unparsable(rule, inner))?;

    Ok(Condition::new(feature, operator, threshold))
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather_parser() -> RuleParser {
        RuleParser::classification(&["NoRain", "Rain"])
    }

    #[test]
    fn test_parse_classification_rule() {
        let arg = weather_parser()
            .parse("(Humidity <= 50.0), (Temp > 20.0) -> Rain")
            .unwrap();
        assert_eq!(
            arg.premises,
            vec![
                Condition::new("Humidity", Operator::LessEq, 50.0),
                Condition::new("Temp", Operator::Greater, 20.0),
            ]
        );
        assert_eq!(arg.conclusion, Conclusion::Class("Rain".to_string()));
        assert_eq!(arg.rule_hash, rule_hash("(Humidity <= 50.0), (Temp > 20.0) -> Rain"));
    }

    #[test]
    fn test_display_round_trip() {
        let rule = "(Humidity3pm <= 71.5), (WindGustSpeed > 42.0), (Pressure3pm <= 1012.35) -> NoRain";
        let arg = weather_parser().parse(rule).unwrap();
        assert_eq!(arg.to_string(), rule);
    }

    #[test]
    fn test_parse_regression_rule() {
        let arg = RuleParser::regression()
            .parse("(Sunshine > 7.25) -> response: 0.123")
            .unwrap();
        assert_eq!(arg.conclusion, Conclusion::Response(0.123));
    }

    #[test]
    fn test_parse_single_leaf_rule() {
        let arg = weather_parser().parse(" -> NoRain").unwrap();
        assert!(arg.premises.is_empty());
        assert_eq!(arg.class_name(), Some("NoRain"));
    }

    #[test]
    fn test_features_with_underscores_and_negative_thresholds() {
        let arg = weather_parser()
            .parse("(Location_Albury > 0.5), (MinTemp <= -2.75), (Evaporation <= 1e-3) -> Rain")
            .unwrap();
        assert_eq!(arg.premises[0].feature, "Location_Albury");
        assert_eq!(arg.premises[1].threshold, -2.75);
        assert_eq!(arg.premises[2].threshold, 0.001);
    }

    #[test]
    fn test_missing_separator() {
        let rule = "(Humidity <= 50.0), (Temp > 20.0) Rain";
        let err = weather_parser().parse(rule).unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule { .. }));
        assert_eq!(err.rule(), rule);
    }

    #[test]
    fn test_missing_operator_is_unparsable() {
        let err = weather_parser().parse("(Humidity == 50.0) -> Rain").unwrap_err();
        assert_eq!(
            err,
            RuleError::UnparsableCondition {
                rule: "(Humidity == 50.0) -> Rain".to_string(),
                condition: "Humidity == 50.0".to_string(),
            }
        );
    }

    #[test]
    fn test_bad_threshold_is_unparsable() {
        for rule in [
            "(Temp > warm) -> Rain",
            "(Temp >= 20.0) -> Rain",
            "(Temp > nan) -> Rain",
            "(Temp <= ) -> Rain",
        ] {
            let err = weather_parser().parse(rule).unwrap_err();
            assert!(
                matches!(err, RuleError::UnparsableCondition { .. }),
                "{} gave {:?}",
                rule,
                err
            );
        }
    }

    #[test]
    fn test_unparenthesized_condition() {
        let err = weather_parser().parse("Temp > 20.0 -> Rain").unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule { .. }));
    }

    #[test]
    fn test_unknown_class() {
        let err = weather_parser().parse("(Temp > 20.0) -> Snow").unwrap_err();
        assert!(err.to_string().contains("Snow"));
    }

    #[test]
    fn test_class_label_without_table() {
        let err = RuleParser::regression().parse("(Temp > 20.0) -> Rain").unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule { .. }));
    }

    #[test]
    fn test_double_separator() {
        let err = weather_parser().parse("(Temp > 20.0) -> Rain -> NoRain").unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule { .. }));
    }

    #[test]
    fn test_blank_feature_is_unparsable() {
        for rule in ["( > 3.0) -> Rain", "(> 3.0) -> Rain", "(   <= 1.5) -> Rain"] {
            let err = weather_parser().parse(rule).unwrap_err();
            assert!(
                matches!(err, RuleError::UnparsableCondition { .. }),
                "{} gave {:?}",
                rule,
                err
            );
        }
    }

    #[test]
    fn test_separator_requires_spaces() {
        for rule in ["->NoRain", "(Temp > 20.0) ->Rain", "(Temp > 20.0)-> Rain"] {
            let err = weather_parser().parse(rule).unwrap_err();
            assert!(matches!(err, RuleError::MalformedRule { .. }), "{}", rule);
        }
        assert!(weather_parser().parse("-> NoRain").is_ok());
    }

    #[test]
    fn test_response_rejected_with_class_table() {
        let err = weather_parser()
            .parse("(Sunshine > 7.25) -> response: 0.123")
            .unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule { .. }));
        assert!(err.to_string().contains("response:"));
    }

    #[test]
    fn test_empty_and_missing_conclusion() {
        assert!(weather_parser().parse("   ").is_err());
        assert!(weather_parser().parse("(Temp > 20.0) -> ").is_err());
    }
}
