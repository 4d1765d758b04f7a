//! Input-cost driver analysis
//!
//! Relates the price of an input (for example iron ore for steel) to the
//! price of the material it feeds. Both series are reduced to monthly means
//! and every input month is paired with the nearest material month.

use crate::data::PriceSeries;
use crate::utils::month_index;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Aligned pairs needed before a correlation is reported
const MIN_CORRELATION_PAIRS: usize = 3;

/// How closely an input tracks the material price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverStrength {
    Strong,
    Moderate,
    Weak,
    /// Not enough aligned data to tell
    Undetermined,
}

impl DriverStrength {
    /// Classify a correlation coefficient
    pub fn from_correlation(correlation: Option<f64>) -> Self {
        match correlation {
            Some(c) if c > 0.7 => Self::Strong,
            Some(c) if c >= 0.4 => Self::Moderate,
            Some(_) => Self::Weak,
            None => Self::Undetermined,
        }
    }
}

/// Relationship between one input and the material price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputCostDriver {
    pub input: String,
    /// Pearson correlation of aligned monthly prices
    pub correlation: Option<f64>,
    /// Correlation of the input one month earlier with the material price
    pub lag_correlation: Option<f64>,
    /// Input % change over the window divided by material % change
    pub pass_through_ratio: Option<f64>,
    pub strength: DriverStrength,
}

/// Analyse each named input series against the material series
pub fn input_cost_drivers(
    material: &PriceSeries,
    inputs: &[(String, PriceSeries)],
) -> Vec<InputCostDriver> {
    inputs
        .iter()
        .map(|(name, series)| analyse_input(name, material, series))
        .collect()
}

fn analyse_input(name: &str, material: &PriceSeries, input: &PriceSeries) -> InputCostDriver {
    let pairs = align_nearest(&monthly_means(input), &monthly_means(material));

    let correlation = if pairs.len() >= MIN_CORRELATION_PAIRS {
        let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
        pearson(&xs, &ys)
    } else {
        None
    };

    let lag_correlation = if pairs.len() > MIN_CORRELATION_PAIRS {
        let xs: Vec<f64> = pairs[..pairs.len() - 1].iter().map(|p| p.0).collect();
        let ys: Vec<f64> = pairs[1..].iter().map(|p| p.1).collect();
        pearson(&xs, &ys)
    } else {
        None
    };

    InputCostDriver {
        input: name.to_string(),
        correlation,
        lag_correlation,
        pass_through_ratio: pass_through(&pairs),
        strength: DriverStrength::from_correlation(correlation),
    }
}

/// Mean price per calendar month, keyed by month index
fn monthly_means(series: &PriceSeries) -> BTreeMap<i64, f64> {
    let mut buckets: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for point in series.points() {
        let entry = buckets.entry(month_index(point.date)).or_insert((0.0, 0));
        entry.0 += point.price;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(month, (sum, count))| (month, sum / count as f64))
        .collect()
}

/// Pair every input month with the nearest material month (earlier month wins ties)
fn align_nearest(input: &BTreeMap<i64, f64>, material: &BTreeMap<i64, f64>) -> Vec<(f64, f64)> {
    if material.is_empty() {
        return Vec::new();
    }

    input
        .iter()
        .filter_map(|(&month, &input_price)| {
            let before = material.range(..=month).next_back();
            let after = material.range(month..).next();
            let nearest = match (before, after) {
                (Some(b), Some(a)) => {
                    if month - b.0 <= a.0 - month {
                        b
                    } else {
                        a
                    }
                }
                (Some(b), None) => b,
                (None, Some(a)) => a,
                (None, None) => return None,
            };
            Some((input_price, *nearest.1))
        })
        .collect()
}

/// Pearson correlation; `None` when either side has no variance
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let sd_x = xs.iter().std_dev();
    let sd_y = ys.iter().std_dev();
    if !(sd_x > 0.0 && sd_y > 0.0) {
        return None;
    }

    let covariance = xs.iter().covariance(ys.iter());
    Some((covariance / (sd_x * sd_y)).clamp(-1.0, 1.0))
}

fn pass_through(pairs: &[(f64, f64)]) -> Option<f64> {
    let (first, last) = match (pairs.first(), pairs.last()) {
        (Some(first), Some(last)) if pairs.len() > 1 => (first, last),
        _ => return None,
    };
    if first.0 == 0.0 || first.1 == 0.0 {
        return None;
    }

    let input_change = (last.0 / first.0 - 1.0) * 100.0;
    let material_change = (last.1 / first.1 - 1.0) * 100.0;
    if material_change == 0.0 {
        Some(0.0)
    } else {
        Some(input_change / material_change)
    }
}
