//! Fixed label vocabulary per bin count

/// Base labels for `n` bins, lowest bin first
pub fn bin_labels(n: usize) -> Vec<String> {
    let fixed: &[&str] = match n {
        2 => &["low", "high"],
        3 => &["low", "medium", "high"],
        4 => &["very_low", "low", "high", "very_high"],
        5 => &["very_low", "low", "medium", "high", "very_high"],
        _ => {
            return (1..=n).map(|i| format!("quantile_{}", i)).collect();
        }
    };
    fixed.iter().map(|s| s.to_string()).collect()
}

/// Labels for `n` bins of one column, e.g. `low_Temp`
pub fn column_labels(n: usize, column: &str) -> Vec<String> {
    bin_labels(n)
        .into_iter()
        .map(|label| format!("{}_{}", label, column))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_vocabularies() {
        assert_eq!(bin_labels(2), vec!["low", "high"]);
        assert_eq!(bin_labels(3), vec!["low", "medium", "high"]);
        assert_eq!(bin_labels(4), vec!["very_low", "low", "high", "very_high"]);
        assert_eq!(
            bin_labels(5),
            vec!["very_low", "low", "medium", "high", "very_high"]
        );
    }

    #[test]
    fn test_quantile_vocabulary() {
        let labels = bin_labels(7);
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0], "quantile_1");
        assert_eq!(labels[6], "quantile_7");
    }

    #[test]
    fn test_column_suffix() {
        assert_eq!(
            column_labels(2, "TempFacts"),
            vec!["low_TempFacts", "high_TempFacts"]
        );
    }
}
