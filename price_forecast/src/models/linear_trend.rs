//! Linear trend model over days since the first observation

use crate::data::PriceSeries;
use crate::error::Result;
use crate::models::{ensure_history, FittedForecaster, PriceForecaster};
use crate::utils::days_since;
use chrono::NaiveDate;
use procura_math::regression::LinearRegression;
use tracing::{debug, warn};

/// Least-squares trend forecaster
#[derive(Debug, Clone)]
pub struct LinearTrendForecaster {
    /// Name of the model
    name: String,
}

/// Trend line fitted to one history
#[derive(Debug, Clone)]
pub struct FittedLinearTrend {
    /// Name of the model
    name: String,
    /// First historical date; day offsets are measured from here
    origin: NaiveDate,
    /// Fitted line
    regression: LinearRegression,
}

impl LinearTrendForecaster {
    /// Fewest observations a trend line can be fitted on
    pub const MIN_HISTORY: usize = 2;

    /// Create a new linear trend forecaster
    pub fn new() -> Self {
        Self {
            name: "Linear Trend".to_string(),
        }
    }
}

impl Default for LinearTrendForecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceForecaster for LinearTrendForecaster {
    type Fitted = FittedLinearTrend;

    fn fit(&self, history: &PriceSeries) -> Result<Self::Fitted> {
        ensure_history(history, Self::MIN_HISTORY)?;

        let dates = history.dates();
        let origin = dates[0];
        let days: Vec<f64> = dates.iter().map(|&d| days_since(origin, d)).collect();
        let regression = LinearRegression::fit(&days, &history.prices())?;

        if regression.is_degenerate() {
            warn!(
                observations = history.len(),
                "trend feature has no variance; forecasting the historical mean"
            );
        }
        debug!(
            slope = regression.slope(),
            intercept = regression.intercept(),
            r_squared = regression.r_squared(),
            "fitted linear trend"
        );

        Ok(FittedLinearTrend {
            name: self.name.clone(),
            origin,
            regression,
        })
    }

    fn min_history(&self) -> usize {
        Self::MIN_HISTORY
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedLinearTrend {
    /// Price change per day
    pub fn slope_per_day(&self) -> f64 {
        self.regression.slope()
    }

    /// Fitted price at the first historical date
    pub fn intercept(&self) -> f64 {
        self.regression.intercept()
    }

    /// Coefficient of determination on the history
    pub fn r_squared(&self) -> f64 {
        self.regression.r_squared()
    }
}

impl FittedForecaster for FittedLinearTrend {
    fn predict_dates(&self, dates: &[NaiveDate]) -> Result<Vec<f64>> {
        Ok(dates
            .iter()
            .map(|&d| self.regression.predict(days_since(self.origin, d)))
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
