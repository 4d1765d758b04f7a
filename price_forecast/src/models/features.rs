//! Feature construction for the feature-augmented forecaster
//!
//! Calendar features come from the observation date. Lag and rolling-mean
//! features only look at prices strictly before the observation.

use crate::data::PriceSeries;
use crate::error::Result;
use crate::utils::days_since;
use chrono::{Datelike, NaiveDate};
use procura_math::rolling::{causal_rolling_mean, lag, trailing_mean};

/// Feature names in vector order
pub const FEATURE_NAMES: [&str; 8] = [
    "days_since_start",
    "month",
    "day_of_year",
    "lag_1",
    "lag_2",
    "lag_3",
    "rolling_mean_3",
    "rolling_mean_6",
];

/// Number of features per row
pub const N_FEATURES: usize = FEATURE_NAMES.len();

/// Prior observations needed before a row has every feature
pub const WARMUP: usize = 6;

/// Features for a single date
pub type FeatureVector = [f64; N_FEATURES];

/// Build the feature vector for `date` given every price observed before it.
///
/// Returns `None` until at least [`WARMUP`] prior prices exist.
pub fn feature_vector(origin: NaiveDate, date: NaiveDate, prior: &[f64]) -> Option<FeatureVector> {
    let t = prior.len();
    Some([
        days_since(origin, date),
        f64::from(date.month()),
        f64::from(date.ordinal()),
        lag(prior, t, 1)?,
        lag(prior, t, 2)?,
        lag(prior, t, 3)?,
        trailing_mean(prior, t, 3)?,
        trailing_mean(prior, t, WARMUP)?,
    ])
}

/// Training rows and targets for every observation past the warm-up
pub fn training_rows(history: &PriceSeries) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
    let prices = history.prices();
    let dates = history.dates();
    let origin = match dates.first() {
        Some(&d) => d,
        None => return Ok((Vec::new(), Vec::new())),
    };

    let mean_3 = causal_rolling_mean(&prices, 3)?;
    let mean_6 = causal_rolling_mean(&prices, WARMUP)?;

    let mut rows = Vec::with_capacity(prices.len().saturating_sub(WARMUP));
    let mut targets = Vec::with_capacity(rows.capacity());
    for t in WARMUP..prices.len() {
        let (Some(m3), Some(m6)) = (mean_3[t], mean_6[t]) else {
            continue;
        };
        let date = dates[t];
        rows.push(vec![
            days_since(origin, date),
            f64::from(date.month()),
            f64::from(date.ordinal()),
            prices[t - 1],
            prices[t - 2],
            prices[t - 3],
            m3,
            m6,
        ]);
        targets.push(prices[t]);
    }

    Ok((rows, targets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn monthly_series(prices: &[f64]) -> PriceSeries {
        let dates = (0..prices.len())
            .map(|i| NaiveDate::from_ymd_opt(2023 + (i / 12) as i32, 1 + (i % 12) as u32, 1).unwrap())
            .collect();
        PriceSeries::from_parts(dates, prices.to_vec()).unwrap()
    }

    #[test]
    fn test_warmup_rows_dropped() {
        let prices: Vec<f64> = (1..=9).map(f64::from).collect();
        let (rows, targets) = training_rows(&monthly_series(&prices)).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(targets, vec![7.0, 8.0, 9.0]);
        assert!(rows.iter().all(|r| r.len() == N_FEATURES));
    }

    #[test]
    fn test_rows_are_causal() {
        let prices: Vec<f64> = (1..=7).map(f64::from).collect();
        let (rows, _) = training_rows(&monthly_series(&prices)).unwrap();
        let row = &rows[0];

        // target is 7.0 on 2023-07-01
        assert_relative_eq!(row[1], 7.0);
        assert_relative_eq!(row[2], 182.0);
        assert_eq!(&row[3..6], &[6.0, 5.0, 4.0]);
        assert_relative_eq!(row[6], 5.0);
        assert_relative_eq!(row[7], 3.5);
    }

    #[test]
    fn test_feature_vector_matches_training_rows() {
        let prices: Vec<f64> = vec![10.0, 12.0, 11.0, 14.0, 13.0, 15.0, 16.0, 18.0];
        let series = monthly_series(&prices);
        let (rows, _) = training_rows(&series).unwrap();
        let dates = series.dates();

        for (offset, row) in rows.iter().enumerate() {
            let t = WARMUP + offset;
            let v = feature_vector(dates[0], dates[t], &prices[..t]).unwrap();
            for (a, b) in v.iter().zip(row) {
                assert_relative_eq!(*a, *b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_feature_vector_needs_warmup() {
        let origin = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(feature_vector(origin, origin, &[1.0, 2.0, 3.0, 4.0, 5.0]).is_none());
        assert!(feature_vector(origin, origin, &[1.0; 6]).is_some());
    }
}
