//! Synthetic monthly price histories
//!
//! Histories are reproducible: the generator is seeded from the category and
//! material names, so the same pair always yields the same series.

use crate::config::HistoryConfig;
use crate::data::{PricePoint, PriceSeries};
use crate::error::{ForecastError, Result};
use crate::utils::{is_month_end, month_end, sub_months};
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;
use tracing::debug;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Lowest price a generated observation can take
const PRICE_FLOOR: f64 = 0.1;

const AVIATION: &str = "Aviation";
const AVIATION_PREMIUM_MATERIALS: [&str; 4] = ["Jet Fuel", "Titanium", "Carbon Fiber", "Avionics"];

/// Stable 64-bit seed for a name (FNV-1a)
pub fn seed_from_name(name: &str) -> u64 {
    name.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Shape of a category's price process
#[derive(Debug, Clone, Copy, PartialEq)]
struct PriceProfile {
    base_range: (f64, f64),
    trends: [f64; 3],
    seasonality_range: (f64, f64),
    noise_range: (f64, f64),
}

impl PriceProfile {
    fn for_material(category: &str, material: &str) -> Self {
        if category == AVIATION {
            let base_range = if AVIATION_PREMIUM_MATERIALS.contains(&material) {
                (300.0, 1200.0)
            } else {
                (500.0, 800.0)
            };
            Self {
                base_range,
                trends: [-0.8, 0.1, 1.2],
                seasonality_range: (0.08, 0.25),
                noise_range: (0.03, 0.15),
            }
        } else {
            Self {
                base_range: (50.0, 500.0),
                trends: [-0.5, 0.2, 0.8],
                seasonality_range: (0.05, 0.2),
                noise_range: (0.01, 0.1),
            }
        }
    }
}

/// Generator for trend + seasonality + noise price histories
#[derive(Debug, Clone, Default)]
pub struct PriceHistoryGenerator {
    config: HistoryConfig,
}

impl PriceHistoryGenerator {
    /// Create a generator with the given settings
    pub fn new(config: HistoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// History for `material` in `category`, ending at the last month-end on or before `end`
    pub fn generate(&self, category: &str, material: &str, end: NaiveDate) -> Result<PriceSeries> {
        let seed = seed_from_name(&format!("{}_{}", category, material));
        debug!(category, material, seed, "generating price history");
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate_with_rng(category, material, end, &mut rng)
    }

    /// History drawing all randomness from `rng`
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        category: &str,
        material: &str,
        end: NaiveDate,
        rng: &mut R,
    ) -> Result<PriceSeries> {
        let profile = PriceProfile::for_material(category, material);

        let base_price = rng.gen_range(profile.base_range.0..profile.base_range.1);
        let trend = profile.trends[rng.gen_range(0..profile.trends.len())];
        let seasonality_factor = rng.gen_range(profile.seasonality_range.0..profile.seasonality_range.1);
        let noise_factor = rng.gen_range(profile.noise_range.0..profile.noise_range.1);

        let noise = Normal::new(0.0, noise_factor * base_price)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;

        let last = last_month_end(end)?;
        let months = self.config.months;
        let mut points = Vec::with_capacity(months);
        for i in 0..months {
            let back = u32::try_from(months - 1 - i).map_err(|_| {
                ForecastError::InvalidParameter(format!("History of {} months is too long", months))
            })?;
            let date = sub_months(last, back)?;

            let seasonality =
                (2.0 * PI * f64::from(date.month()) / 12.0).sin() * seasonality_factor * base_price;
            let price = base_price + trend * i as f64 + seasonality + noise.sample(rng);
            points.push(PricePoint::new(date, price.max(PRICE_FLOOR)));
        }

        PriceSeries::new(points)
    }
}

/// Last month-end on or before `date`
fn last_month_end(date: NaiveDate) -> Result<NaiveDate> {
    if is_month_end(date) {
        return Ok(date);
    }
    let first = date.with_day(1).ok_or_else(|| {
        ForecastError::DataError(format!("Cannot take the first of the month for {}", date))
    })?;
    match first.pred_opt() {
        Some(previous) => month_end(previous),
        None => Err(ForecastError::DataError(format!(
            "No month-end before {}",
            date
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_seed_is_stable() {
        assert_eq!(seed_from_name(""), FNV_OFFSET);
        assert_eq!(seed_from_name("Steel"), seed_from_name("Steel"));
        assert_ne!(seed_from_name("Steel"), seed_from_name("Copper"));
    }

    #[test]
    fn test_last_month_end() {
        assert_eq!(last_month_end(date(2024, 3, 31)).unwrap(), date(2024, 3, 31));
        assert_eq!(last_month_end(date(2024, 3, 15)).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_profiles() {
        let premium = PriceProfile::for_material("Aviation", "Titanium");
        assert_eq!(premium.base_range, (300.0, 1200.0));
        let aviation = PriceProfile::for_material("Aviation", "Seats");
        assert_eq!(aviation.base_range, (500.0, 800.0));
        let general = PriceProfile::for_material("Raw Materials", "Titanium");
        assert_eq!(general.trends, [-0.5, 0.2, 0.8]);
    }
}
