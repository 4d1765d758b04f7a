//! # Price Forecast
//!
//! Procurement price forecasting and should-cost modeling.
//!
//! ## Features
//!
//! - Monthly price series handling with CSV loading
//! - Linear trend forecasting over days since the first observation
//! - Feature-augmented random forest forecasting (calendar, lag and rolling-mean features)
//! - Should-cost decomposition with what-if adjustments and negotiation assessment
//! - Price analytics: volatility, trend bands and widening uncertainty bands
//! - Input-cost driver analysis (correlation, lag correlation, pass-through)
//! - Reproducible synthetic price histories seeded from material names
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use price_forecast::data::PriceSeries;
//! use price_forecast::models::simple_forecast;
//! use price_forecast::should_cost::{preset_components, should_cost_model};
//!
//! let dates = vec![
//!     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
//! ];
//! let history = PriceSeries::from_parts(dates, vec![100.0, 110.0, 120.0])?;
//!
//! let forecast = simple_forecast(&history, 3)?;
//! assert_eq!(forecast.horizon(), 3);
//!
//! let model = should_cost_model("Steel", &preset_components("Steel"));
//! assert!(model.total_cost() > 0.0);
//! # Ok::<(), price_forecast::ForecastError>(())
//! ```

pub mod analytics;
pub mod config;
pub mod data;
pub mod drivers;
pub mod error;
pub mod history;
pub mod metrics;
pub mod models;
pub mod should_cost;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{ForestConfig, HistoryConfig};
pub use crate::data::{PricePoint, PriceSeries};
pub use crate::error::ForecastError;
pub use crate::models::{
    advanced_forecast, simple_forecast, ForecastPoint, ForecastResult, PointKind, PriceForecaster,
};
pub use crate::should_cost::{
    should_cost_model, should_cost_model_with_rng, ComponentKind, CostComponent, ShouldCostModel,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
