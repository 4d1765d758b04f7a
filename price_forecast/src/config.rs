//! Configuration for the forecasters and the history generator

use crate::error::{ForecastError, Result};
use procura_math::forest::ForestParams;
use procura_math::tree::TreeParams;
use serde::{Deserialize, Serialize};

/// Random forest settings for the feature-augmented forecaster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum tree depth; unlimited when absent
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples in each leaf
    pub min_samples_leaf: usize,
    /// Features considered per split; all when absent
    pub max_features: Option<usize>,
    /// Train each tree on a bootstrap resample
    pub bootstrap: bool,
    /// Training seed; fresh entropy when absent
    pub seed: Option<u64>,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: Some(42),
        }
    }
}

impl ForestConfig {
    /// Check the settings describe a trainable forest
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_estimators must be positive".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(ForecastError::InvalidParameter(
                "max_depth must be positive when set".to_string(),
            ));
        }
        self.tree_params()
            .validate()
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
        }
    }

    /// Ensemble parameters for the numeric layer
    pub fn to_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            tree: self.tree_params(),
            bootstrap: self.bootstrap,
            seed: self.seed,
        }
    }
}

/// Settings for the synthetic price history generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Number of monthly observations to produce
    pub months: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { months: 24 }
    }
}

impl HistoryConfig {
    /// Check the settings
    pub fn validate(&self) -> Result<()> {
        if self.months == 0 {
            return Err(ForecastError::InvalidParameter(
                "History must span at least one month".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ForestConfig::default().validate().is_ok());
        assert!(HistoryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ForestConfig = serde_json::from_str(r#"{"n_estimators": 25}"#).unwrap();
        assert_eq!(config.n_estimators, 25);
        assert_eq!(config.min_samples_split, 2);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_invalid_settings() {
        let config = ForestConfig {
            n_estimators: 0,
            ..ForestConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ForecastError::InvalidParameter(_))
        ));

        let config = ForestConfig {
            min_samples_leaf: 0,
            ..ForestConfig::default()
        };
        assert!(config.validate().is_err());

        assert!(HistoryConfig { months: 0 }.validate().is_err());
    }
}
