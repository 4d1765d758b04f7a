//! Forecasting models for monthly price series

use crate::data::{PricePoint, PriceSeries};
use crate::error::{ForecastError, Result};
use crate::utils::future_month_dates;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod feature_forest;
pub mod features;
pub mod linear_trend;

pub use feature_forest::{FeatureForestForecaster, FittedFeatureForest};
pub use linear_trend::{FittedLinearTrend, LinearTrendForecaster};

/// Whether a point was observed or produced by a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    Historical,
    Forecast,
}

/// A dated price tagged with its origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub kind: PointKind,
}

/// Input history followed by the generated forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Name of the model that produced the forecast
    model: String,
    /// Historical points followed by forecast points
    points: Vec<ForecastPoint>,
    /// Number of leading historical points
    historical_len: usize,
}

impl ForecastResult {
    /// Combine a history with forecast points
    pub fn new(model: &str, history: &PriceSeries, forecast: Vec<PricePoint>) -> Result<Self> {
        if let (Some(last), Some(first_forecast)) = (history.last(), forecast.first()) {
            if first_forecast.date <= last.date {
                return Err(ForecastError::DataError(format!(
                    "Forecast starts at {} which is not after the last observation {}",
                    first_forecast.date, last.date
                )));
            }
        }

        let historical = history.points().iter().map(|p| ForecastPoint {
            date: p.date,
            price: p.price,
            kind: PointKind::Historical,
        });
        let future = forecast.iter().map(|p| ForecastPoint {
            date: p.date,
            price: p.price,
            kind: PointKind::Forecast,
        });

        Ok(Self {
            model: model.to_string(),
            points: historical.chain(future).collect(),
            historical_len: history.len(),
        })
    }

    /// Name of the model that produced this result
    pub fn model(&self) -> &str {
        &self.model
    }

    /// All points, historical first
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// The historical segment
    pub fn historical(&self) -> &[ForecastPoint] {
        &self.points[..self.historical_len]
    }

    /// The forecast segment
    pub fn forecast(&self) -> &[ForecastPoint] {
        &self.points[self.historical_len..]
    }

    /// Forecasted prices in date order
    pub fn forecast_prices(&self) -> Vec<f64> {
        self.forecast().iter().map(|p| p.price).collect()
    }

    /// Number of periods forecasted
    pub fn horizon(&self) -> usize {
        self.points.len() - self.historical_len
    }

    /// Final forecast point, if any
    pub fn last_forecast(&self) -> Option<&ForecastPoint> {
        self.forecast().last()
    }

    /// Serialize the result to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<'de> Deserialize<'de> for ForecastResult {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            model: String,
            points: Vec<ForecastPoint>,
            historical_len: usize,
        }

        let raw = Raw::deserialize(deserializer)?;
        if raw.historical_len > raw.points.len() {
            return Err(serde::de::Error::custom(format!(
                "historical_len {} exceeds {} points",
                raw.historical_len,
                raw.points.len()
            )));
        }

        let (historical, forecast) = raw.points.split_at(raw.historical_len);
        let kinds_match = historical.iter().all(|p| p.kind == PointKind::Historical)
            && forecast.iter().all(|p| p.kind == PointKind::Forecast);
        if !kinds_match {
            return Err(serde::de::Error::custom(
                "historical points must precede forecast points",
            ));
        }
        if raw.points.windows(2).any(|w| w[1].date <= w[0].date) {
            return Err(serde::de::Error::custom(
                "points must be in strictly ascending date order",
            ));
        }

        Ok(Self {
            model: raw.model,
            points: raw.points,
            historical_len: raw.historical_len,
        })
    }
}

/// A forecaster fitted to one price history
pub trait FittedForecaster: Debug {
    /// Predict the price for each future date, in order
    fn predict_dates(&self, dates: &[NaiveDate]) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be fitted to a price history
pub trait PriceForecaster: Debug {
    /// The type of fitted model produced
    type Fitted: FittedForecaster;

    /// Fit the model to the history
    fn fit(&self, history: &PriceSeries) -> Result<Self::Fitted>;

    /// Fewest observations the model can be fitted on
    fn min_history(&self) -> usize;

    /// Get the name of the model
    fn name(&self) -> &str;

    /// Fit on `history` and forecast `periods` monthly points after its last date
    fn forecast(&self, history: &PriceSeries, periods: usize) -> Result<ForecastResult> {
        if periods == 0 {
            return Err(ForecastError::InvalidPeriods(periods));
        }
        ensure_history(history, self.min_history())?;

        let fitted = self.fit(history)?;
        let last = history
            .last()
            .ok_or(ForecastError::InsufficientHistory {
                required: self.min_history(),
                actual: 0,
            })?;

        let dates = future_month_dates(last.date, periods)?;
        let prices = fitted.predict_dates(&dates)?;
        let forecast = dates
            .into_iter()
            .zip(prices)
            .map(|(date, price)| PricePoint::new(date, price))
            .collect();

        ForecastResult::new(fitted.name(), history, forecast)
    }
}

/// Reject histories shorter than `required`
pub(crate) fn ensure_history(history: &PriceSeries, required: usize) -> Result<()> {
    if history.len() < required {
        return Err(ForecastError::InsufficientHistory {
            required,
            actual: history.len(),
        });
    }
    Ok(())
}

/// Forecast with a least-squares trend line over days since the first observation
pub fn simple_forecast(history: &PriceSeries, periods: usize) -> Result<ForecastResult> {
    LinearTrendForecaster::new().forecast(history, periods)
}

/// Forecast with a random forest over calendar, lag and rolling-mean features
pub fn advanced_forecast(history: &PriceSeries, periods: usize) -> Result<ForecastResult> {
    FeatureForestForecaster::default().forecast(history, periods)
}
