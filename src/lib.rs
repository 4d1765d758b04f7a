//! # Procura
//!
//! Procurement price intelligence: forecasts for monthly material prices and
//! should-cost breakdowns to negotiate against.
//!
//! The workspace is split in two crates:
//!
//! - [`price_forecast`]: price series, forecasting models, should-cost models and analytics
//! - [`procura_math`]: the numeric primitives underneath (regression, rolling statistics, tree ensembles)
//!
//! ## Example
//!
//! ```
//! use procura_workspace::{simple_forecast, PriceSeries};
//! use chrono::NaiveDate;
//!
//! let dates = vec![
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
//! ];
//! let history = PriceSeries::from_parts(dates, vec![100.0, 110.0]).unwrap();
//! let forecast = simple_forecast(&history, 2).unwrap();
//! assert_eq!(forecast.horizon(), 2);
//! ```

pub use price_forecast;
pub use procura_math;

pub use price_forecast::{
    advanced_forecast, should_cost_model, should_cost_model_with_rng, simple_forecast,
    ComponentKind, CostComponent, ForecastError, ForecastResult, PricePoint, PriceSeries,
    ShouldCostModel,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_facade_exposes_both_entry_points() {
        let dates = (1..=8)
            .map(|m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap())
            .collect();
        let prices = (0..8).map(|i| 100.0 + i as f64).collect();
        let history = PriceSeries::from_parts(dates, prices).unwrap();

        assert_eq!(simple_forecast(&history, 3).unwrap().horizon(), 3);
        assert_eq!(advanced_forecast(&history, 3).unwrap().horizon(), 3);

        let mut rng = StdRng::seed_from_u64(1);
        let model = should_cost_model_with_rng(
            "Steel",
            &[CostComponent::new("raw_material", 1.0)],
            &mut rng,
        );
        assert_eq!(model.breakdown().len(), 2);
    }
}
