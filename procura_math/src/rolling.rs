//! Rolling statistics over ordered observations
//!
//! Everything here is causal: the value reported for position `t` only uses
//! observations strictly before `t`.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple moving average over a fixed trailing window
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new moving average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Push a new observation into the window
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Current average, or `None` until the window is full
    pub fn value(&self) -> Option<f64> {
        if self.values.len() < self.period {
            return None;
        }

        Some(self.sum / self.period as f64)
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }
}

/// Mean of the `window` values immediately before position `t`.
///
/// Returns `None` when fewer than `window` values precede `t`.
pub fn trailing_mean(values: &[f64], t: usize, window: usize) -> Option<f64> {
    if window == 0 || t < window || t > values.len() {
        return None;
    }

    let slice = &values[t - window..t];
    Some(slice.iter().sum::<f64>() / window as f64)
}

/// Value `k` steps before position `t`, if it exists
pub fn lag(values: &[f64], t: usize, k: usize) -> Option<f64> {
    if k == 0 || t < k || t > values.len() {
        return None;
    }

    Some(values[t - k])
}

/// Causal rolling mean for every position of `values`.
///
/// Entry `t` is the mean of `values[t - window..t]`; the first `window`
/// entries are `None`.
pub fn causal_rolling_mean(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut sma = SimpleMovingAverage::new(window)?;
    let mut out = Vec::with_capacity(values.len());

    for &value in values {
        out.push(sma.value());
        sma.update(value);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_sma_window() {
        let mut sma = SimpleMovingAverage::new(3).unwrap();
        sma.update(1.0);
        sma.update(2.0);
        assert!(sma.value().is_none());

        sma.update(3.0);
        assert_relative_eq!(sma.value().unwrap(), 2.0);

        sma.update(10.0);
        assert_relative_eq!(sma.value().unwrap(), 5.0);
        assert_eq!(sma.period(), 3);
    }

    #[test]
    fn test_sma_rejects_zero_period() {
        assert!(SimpleMovingAverage::new(0).is_err());
    }

    #[test]
    fn test_causal_rolling_mean_excludes_current() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let means = causal_rolling_mean(&values, 3).unwrap();

        assert_eq!(means.len(), 5);
        assert!(means[..3].iter().all(Option::is_none));
        assert_relative_eq!(means[3].unwrap(), 2.0);
        assert_relative_eq!(means[4].unwrap(), 3.0);
    }

    #[rstest]
    #[case(4, 2, Some(35.0))]
    #[case(2, 2, Some(15.0))]
    #[case(1, 2, None)]
    #[case(4, 0, None)]
    fn test_trailing_mean(#[case] t: usize, #[case] window: usize, #[case] expected: Option<f64>) {
        let values = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(trailing_mean(&values, t, window), expected);
    }

    #[rstest]
    #[case(4, 1, Some(40.0))]
    #[case(4, 3, Some(20.0))]
    #[case(2, 3, None)]
    fn test_lag(#[case] t: usize, #[case] k: usize, #[case] expected: Option<f64>) {
        let values = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(lag(&values, t, k), expected);
    }

    #[test]
    fn test_causal_mean_matches_trailing_mean() {
        let values: Vec<f64> = (0..20).map(|i| (i as f64).sin() * 5.0 + 50.0).collect();
        let means = causal_rolling_mean(&values, 6).unwrap();

        for (t, mean) in means.iter().enumerate() {
            match (mean, trailing_mean(&values, t, 6)) {
                (Some(a), Some(b)) => assert_relative_eq!(*a, b, epsilon = 1e-9),
                (None, None) => {}
                other => panic!("mismatch at {}: {:?}", t, other),
            }
        }
    }
}
