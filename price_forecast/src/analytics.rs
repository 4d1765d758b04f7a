//! Price analytics derived from a history and its forecast

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use crate::models::ForecastResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Uncertainty applied to the first forecast step
const BASE_UNCERTAINTY: f64 = 0.05;
/// Extra uncertainty per additional forecast step
const UNCERTAINTY_STEP: f64 = 0.01;

/// Direction and size of a percentage price move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendBand {
    SignificantIncrease,
    ModerateIncrease,
    Stable,
    ModerateDecrease,
    SignificantDecrease,
}

impl TrendBand {
    /// Classify a percentage change
    pub fn from_change(change_pct: f64) -> Self {
        if change_pct > 10.0 {
            Self::SignificantIncrease
        } else if change_pct > 3.0 {
            Self::ModerateIncrease
        } else if change_pct < -10.0 {
            Self::SignificantDecrease
        } else if change_pct < -3.0 {
            Self::ModerateDecrease
        } else {
            Self::Stable
        }
    }

    /// Narrative for a historical trend
    pub fn trend_label(&self) -> &'static str {
        match self {
            Self::SignificantIncrease => "significant upward trend",
            Self::ModerateIncrease => "moderate upward trend",
            Self::Stable => "relatively stable prices",
            Self::ModerateDecrease => "moderate downward trend",
            Self::SignificantDecrease => "significant downward trend",
        }
    }

    /// Narrative for a forecast outlook
    pub fn outlook_label(&self) -> &'static str {
        match self {
            Self::SignificantIncrease => "significant price increases",
            Self::ModerateIncrease => "moderate price increases",
            Self::Stable => "stable prices",
            Self::ModerateDecrease => "moderate price decreases",
            Self::SignificantDecrease => "significant price decreases",
        }
    }
}

/// Coefficient-of-variation bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityBand {
    High,
    Moderate,
    Low,
}

impl VolatilityBand {
    /// Classify a volatility percentage
    pub fn from_volatility(volatility_pct: f64) -> Self {
        if volatility_pct > 15.0 {
            Self::High
        } else if volatility_pct > 8.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "high volatility",
            Self::Moderate => "moderate volatility",
            Self::Low => "low volatility",
        }
    }
}

/// Headline metrics for a price history and its forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub current_price: f64,
    pub average_price: f64,
    /// Current price relative to the historical mean, in percent
    pub price_vs_average_pct: f64,
    /// Sample standard deviation as a percentage of the mean
    pub volatility_pct: f64,
    /// Last price relative to the first, in percent
    pub historical_trend_pct: f64,
    /// Final forecast price relative to the current price, in percent
    pub forecast_change_pct: f64,
    pub forecast_end_price: f64,
}

impl PriceSummary {
    /// Summarise `history` and the forecast made from it
    pub fn new(history: &PriceSeries, forecast: &ForecastResult) -> Result<Self> {
        let (first, last) = match (history.first(), history.last()) {
            (Some(first), Some(last)) if history.len() >= 2 => (first.price, last.price),
            _ => {
                return Err(ForecastError::InsufficientHistory {
                    required: 2,
                    actual: history.len(),
                })
            }
        };

        let average_price = history.mean()?;
        if average_price <= 0.0 || first <= 0.0 || last <= 0.0 {
            return Err(ForecastError::DataError(
                "Price summary needs strictly positive prices".to_string(),
            ));
        }

        let forecast_end_price = forecast
            .last_forecast()
            .map(|p| p.price)
            .ok_or(ForecastError::InvalidPeriods(0))?;

        Ok(Self {
            current_price: last,
            average_price,
            price_vs_average_pct: (last / average_price - 1.0) * 100.0,
            volatility_pct: history.std_dev()? / average_price * 100.0,
            historical_trend_pct: (last / first - 1.0) * 100.0,
            forecast_change_pct: (forecast_end_price / last - 1.0) * 100.0,
            forecast_end_price,
        })
    }

    pub fn historical_trend(&self) -> TrendBand {
        TrendBand::from_change(self.historical_trend_pct)
    }

    pub fn forecast_outlook(&self) -> TrendBand {
        TrendBand::from_change(self.forecast_change_pct)
    }

    pub fn volatility(&self) -> VolatilityBand {
        VolatilityBand::from_volatility(self.volatility_pct)
    }

    /// Sourcing recommendations implied by the forecast and volatility
    pub fn recommendations(&self) -> Vec<&'static str> {
        let mut recommendations = Vec::with_capacity(3);
        if self.forecast_change_pct > 0.0 {
            recommendations.push("Consider long-term contracts to lock in current prices");
        } else {
            recommendations.push("Consider short-term contracts and spot purchases");
        }
        if self.forecast_change_pct > 5.0 {
            recommendations.push("Evaluate alternative materials or suppliers");
        }
        if self.volatility_pct > 10.0 {
            recommendations.push("Implement price hedging strategies");
        }
        recommendations
    }
}

/// Forecast price with a band that widens with horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyBand {
    pub date: NaiveDate,
    pub lower: f64,
    pub price: f64,
    pub upper: f64,
}

/// Widening bands around each forecast point: 5 % at the first step plus 1 % per step
pub fn uncertainty_bands(forecast: &ForecastResult) -> Vec<UncertaintyBand> {
    forecast
        .forecast()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let uncertainty = BASE_UNCERTAINTY + i as f64 * UNCERTAINTY_STEP;
            UncertaintyBand {
                date: point.date,
                lower: (point.price * (1.0 - uncertainty)).max(0.0),
                price: point.price,
                upper: point.price * (1.0 + uncertainty),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PricePoint;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history() -> PriceSeries {
        PriceSeries::from_parts(
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)],
            vec![100.0, 110.0, 120.0],
        )
        .unwrap()
    }

    fn forecast(prices: &[f64]) -> ForecastResult {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(date(2024, 4 + i as u32, 1), p))
            .collect();
        ForecastResult::new("test", &history(), points).unwrap()
    }

    #[test]
    fn test_summary_metrics() {
        let summary = PriceSummary::new(&history(), &forecast(&[126.0, 129.0])).unwrap();

        assert_relative_eq!(summary.current_price, 120.0);
        assert_relative_eq!(summary.average_price, 110.0);
        assert_relative_eq!(summary.historical_trend_pct, 20.0, epsilon = 1e-9);
        assert_relative_eq!(summary.forecast_change_pct, 7.5, epsilon = 1e-9);
        assert_relative_eq!(summary.volatility_pct, 10.0 / 110.0 * 100.0, epsilon = 1e-9);

        assert_eq!(summary.historical_trend(), TrendBand::SignificantIncrease);
        assert_eq!(summary.forecast_outlook(), TrendBand::ModerateIncrease);
        assert_eq!(summary.volatility(), VolatilityBand::Moderate);
    }

    #[test]
    fn test_recommendations() {
        let summary = PriceSummary::new(&history(), &forecast(&[126.0, 129.0])).unwrap();
        assert_eq!(
            summary.recommendations(),
            vec![
                "Consider long-term contracts to lock in current prices",
                "Evaluate alternative materials or suppliers",
            ]
        );

        let summary = PriceSummary::new(&history(), &forecast(&[110.0])).unwrap();
        assert_eq!(
            summary.recommendations(),
            vec!["Consider short-term contracts and spot purchases"]
        );
    }

    #[test]
    fn test_bands_widen() {
        let bands = uncertainty_bands(&forecast(&[100.0, 100.0, 100.0]));

        assert_relative_eq!(bands[0].upper, 105.0, epsilon = 1e-9);
        assert_relative_eq!(bands[2].lower, 93.0, epsilon = 1e-9);
        assert!(bands.windows(2).all(|w| w[1].upper - w[1].lower > w[0].upper - w[0].lower));
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(TrendBand::from_change(10.0), TrendBand::ModerateIncrease);
        assert_eq!(TrendBand::from_change(3.0), TrendBand::Stable);
        assert_eq!(TrendBand::from_change(-3.5), TrendBand::ModerateDecrease);
        assert_eq!(TrendBand::from_change(-12.0), TrendBand::SignificantDecrease);
        assert_eq!(VolatilityBand::from_volatility(15.0), VolatilityBand::Moderate);
        assert_eq!(VolatilityBand::from_volatility(15.1), VolatilityBand::High);
    }
}
