//! Random forest forecaster over calendar, lag and rolling-mean features
//!
//! Forecasting is iterative: each step's prediction is appended to the
//! running series that feeds the lag and rolling features of the next step,
//! so early errors carry into later horizons.

use crate::config::ForestConfig;
use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use crate::models::features::{feature_vector, training_rows, WARMUP};
use crate::models::{ensure_history, FittedForecaster, PriceForecaster};
use chrono::NaiveDate;
use procura_math::forest::RandomForest;
use tracing::{debug, trace};

/// Feature-augmented random forest forecaster
#[derive(Debug, Clone)]
pub struct FeatureForestForecaster {
    /// Name of the model
    name: String,
    /// Ensemble settings
    config: ForestConfig,
}

/// Forest fitted to one history
#[derive(Debug, Clone)]
pub struct FittedFeatureForest {
    /// Name of the model
    name: String,
    /// First historical date; day offsets are measured from here
    origin: NaiveDate,
    /// Observed prices the forecast continues from
    history: Vec<f64>,
    /// Fitted ensemble
    forest: RandomForest,
}

impl FeatureForestForecaster {
    /// Fewest observations that leave at least one complete training row
    pub const MIN_HISTORY: usize = WARMUP + 1;

    /// Create a forecaster with the given forest settings
    pub fn new(config: ForestConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            name: format!("Feature Random Forest (trees={})", config.n_estimators),
            config,
        })
    }

    /// Forest settings in use
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

impl Default for FeatureForestForecaster {
    fn default() -> Self {
        let config = ForestConfig::default();
        Self {
            name: format!("Feature Random Forest (trees={})", config.n_estimators),
            config,
        }
    }
}

impl PriceForecaster for FeatureForestForecaster {
    type Fitted = FittedFeatureForest;

    fn fit(&self, history: &PriceSeries) -> Result<Self::Fitted> {
        ensure_history(history, Self::MIN_HISTORY)?;

        let (rows, targets) = training_rows(history)?;
        let origin = history
            .first()
            .map(|p| p.date)
            .ok_or(ForecastError::InsufficientHistory {
                required: Self::MIN_HISTORY,
                actual: 0,
            })?;

        let forest = RandomForest::fit(&rows, &targets, &self.config.to_params())?;
        debug!(
            training_rows = rows.len(),
            trees = forest.n_trees(),
            seed = ?self.config.seed,
            "trained feature forest"
        );

        Ok(FittedFeatureForest {
            name: self.name.clone(),
            origin,
            history: history.prices(),
            forest,
        })
    }

    fn min_history(&self) -> usize {
        Self::MIN_HISTORY
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedFeatureForest {
    /// The fitted ensemble
    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    /// Predict one step from the running series of prices before `date`
    fn step(&self, date: NaiveDate, running: &[f64]) -> Result<f64> {
        let features = feature_vector(self.origin, date, running).ok_or_else(|| {
            ForecastError::InsufficientHistory {
                required: WARMUP,
                actual: running.len(),
            }
        })?;
        Ok(self.forest.predict(&features)?)
    }
}

impl FittedForecaster for FittedFeatureForest {
    fn predict_dates(&self, dates: &[NaiveDate]) -> Result<Vec<f64>> {
        let (_, predictions) = dates.iter().try_fold(
            (self.history.clone(), Vec::with_capacity(dates.len())),
            |(mut running, mut predictions), &date| {
                let prediction = self.step(date, &running)?;
                trace!(%date, prediction, "forecast step");
                running.push(prediction);
                predictions.push(prediction);
                Ok::<_, ForecastError>((running, predictions))
            },
        )?;

        Ok(predictions)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
