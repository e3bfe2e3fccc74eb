use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::binning::BinningMethod;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub binning: BinningConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub mock: MockConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinningConfig {
    #[serde(default = "default_n_bins")]
    pub n_bins: usize,
    #[serde(default)]
    pub method: BinningMethod,
    /// Restrict case building to these columns, in this order
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub parallel: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub class_names: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub review_failures: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MockConfig {
    #[serde(default = "default_mock_rows")]
    pub rows: usize,
    #[serde(default = "default_mock_seed")]
    pub seed: u64,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;
        let config: Config = toml::from_str(&content)
            .context("Failed to parse config TOML")?;
        Ok(config)
    }

    /// Load the config if the file exists, else fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            tracing::warn!("Config {:?} not found, using defaults", path.as_ref());
            Ok(Self::default())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            binning: BinningConfig::default(),
            rules: RulesConfig::default(),
            mock: MockConfig::default(),
        }
    }
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            n_bins: default_n_bins(),
            method: BinningMethod::default(),
            columns: None,
            parallel: true,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            class_names: None,
            review_failures: true,
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            rows: default_mock_rows(),
            seed: default_mock_seed(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_n_bins() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_mock_rows() -> usize {
    500
}

fn default_mock_seed() -> u64 {
    7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load() {
        let config = Config::load("../../config/casebase.toml").unwrap();
        assert_eq!(config.data_dir, "data");
        assert!(config.binning.n_bins >= 2);
    }

    #[test]
    fn test_config_defaults() {
        let toml_str = r#"
data_dir = "test_data"
[binning]
[rules]
class_names = ["NoRain", "Rain"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.binning.n_bins, 2);
        assert_eq!(config.binning.method, BinningMethod::EqualDepth);
        assert!(config.binning.parallel);
        assert_eq!(config.mock.rows, 500);
        assert_eq!(
            config.rules.class_names,
            Some(vec!["NoRain".to_string(), "Rain".to_string()])
        );
    }

    #[test]
    fn test_config_method_snake_case() {
        let toml_str = r#"
[binning]
n_bins = 4
method = "equal_width"
columns = ["Humidity", "Temp"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.binning.method, BinningMethod::EqualWidth);
        assert_eq!(config.binning.columns.as_ref().map(|c| c.len()), Some(2));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("does/not/exist.toml").unwrap();
        assert_eq!(config.binning.n_bins, 2);
        assert!(config.rules.review_failures);
    }
}
