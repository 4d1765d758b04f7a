//! Ordinary least-squares regression on a single feature
//!
//! Fits `y = slope * x + intercept` from mean-centred sums, which keeps the
//! slope stable when `x` values are large (for example day offsets).

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Threshold below which the feature is treated as having no variance
const VARIANCE_EPSILON: f64 = 1e-10;

/// Fitted single-feature linear regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    slope: f64,
    intercept: f64,
    r_squared: f64,
    n_observations: usize,
    degenerate: bool,
}

impl LinearRegression {
    /// Fit a line through the paired observations.
    ///
    /// When every `x` is identical the slope is undefined; the fit then
    /// degrades to a flat line at the mean of `y` and [`is_degenerate`]
    /// reports `true`.
    ///
    /// [`is_degenerate`]: LinearRegression::is_degenerate
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(MathError::InvalidInput(format!(
                "Feature length ({}) doesn't match target length ({})",
                xs.len(),
                ys.len()
            )));
        }

        if xs.is_empty() {
            return Err(MathError::InsufficientData(
                "Linear regression needs at least 1 observation".to_string(),
            ));
        }

        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Regression inputs must be finite".to_string(),
            ));
        }

        let n = xs.len() as f64;
        let x_mean = xs.iter().sum::<f64>() / n;
        let y_mean = ys.iter().sum::<f64>() / n;

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (&x, &y) in xs.iter().zip(ys) {
            sxy += (x - x_mean) * (y - y_mean);
            sxx += (x - x_mean) * (x - x_mean);
        }

        let degenerate = sxx.abs() < VARIANCE_EPSILON;
        let slope = if degenerate { 0.0 } else { sxy / sxx };
        let intercept = y_mean - slope * x_mean;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for (&x, &y) in xs.iter().zip(ys) {
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - (slope * x + intercept)).powi(2);
        }

        // A constant target is explained perfectly by any flat line.
        let r_squared = if ss_total.abs() < VARIANCE_EPSILON {
            1.0
        } else {
            1.0 - ss_residual / ss_total
        };

        Ok(Self {
            slope,
            intercept,
            r_squared,
            n_observations: xs.len(),
            degenerate,
        })
    }

    /// Evaluate the fitted line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Evaluate the fitted line at every `x`
    pub fn predict_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }

    /// Get the slope (change in `y` per unit of `x`)
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Get the intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Get the R-squared value (coefficient of determination)
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Number of observations used in the fit
    pub fn n_observations(&self) -> usize {
        self.n_observations
    }

    /// Whether the feature had no variance and the fit fell back to the mean
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}
