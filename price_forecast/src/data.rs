//! Price series handling for forecasting

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A single dated price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observation date (monthly granularity)
    #[serde(alias = "Date")]
    pub date: NaiveDate,
    /// Observed price
    #[serde(alias = "Price")]
    pub price: f64,
}

impl PricePoint {
    /// Create a new price point
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Price observations sorted by date with no duplicate dates
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a series from points that are already in ascending date order
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        for point in &points {
            if !point.price.is_finite() || point.price < 0.0 {
                return Err(ForecastError::DataError(format!(
                    "Price on {} must be a finite non-negative number, got {}",
                    point.date, point.price
                )));
            }
        }

        for pair in points.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(ForecastError::DataError(format!(
                    "Duplicate observation for {}",
                    pair[0].date
                )));
            }
            if pair[1].date < pair[0].date {
                return Err(ForecastError::DataError(format!(
                    "Observations out of order: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }

        Ok(Self { points })
    }

    /// Create a series from unordered points, sorting them by date first
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Result<Self> {
        points.sort_by_key(|p| p.date);
        Self::new(points)
    }

    /// Create a series from parallel date and price vectors
    pub fn from_parts(dates: Vec<NaiveDate>, prices: Vec<f64>) -> Result<Self> {
        if dates.len() != prices.len() {
            return Err(ForecastError::DataError(format!(
                "Dates length ({}) doesn't match prices length ({})",
                dates.len(),
                prices.len()
            )));
        }

        Self::new(
            dates
                .into_iter()
                .zip(prices)
                .map(|(date, price)| PricePoint::new(date, price))
                .collect(),
        )
    }

    /// Load a series from a CSV file with `date` and `price` columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a series from any CSV source with `date` and `price` columns
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut points = Vec::new();
        for record in csv_reader.deserialize() {
            let point: PricePoint = record?;
            points.push(point);
        }

        Self::from_unsorted(points)
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no observations
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All observations in date order
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Prices in date order
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Dates in ascending order
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Earliest observation
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Latest observation
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Sub-series of observations `start..end`
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        if start > end || end > self.points.len() {
            return Err(ForecastError::DataError(format!(
                "Invalid slice {}..{} for series of length {}",
                start,
                end,
                self.points.len()
            )));
        }

        Ok(Self {
            points: self.points[start..end].to_vec(),
        })
    }

    /// Mean price
    pub fn mean(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(ForecastError::DataError(
                "Cannot take the mean of an empty series".to_string(),
            ));
        }

        Ok(self.points.iter().map(|p| p.price).mean())
    }

    /// Sample standard deviation of prices
    pub fn std_dev(&self) -> Result<f64> {
        if self.len() < 2 {
            return Err(ForecastError::DataError(
                "Standard deviation needs at least 2 observations".to_string(),
            ));
        }

        Ok(self.points.iter().map(|p| p.price).std_dev())
    }

    /// Percentage change of every price relative to the first one
    pub fn percent_change_from_start(&self) -> Result<Vec<f64>> {
        let base = match self.first() {
            Some(first) if first.price > 0.0 => first.price,
            Some(_) => {
                return Err(ForecastError::DataError(
                    "First price is zero; percent change is undefined".to_string(),
                ))
            }
            None => return Ok(Vec::new()),
        };

        Ok(self
            .points
            .iter()
            .map(|p| (p.price / base - 1.0) * 100.0)
            .collect())
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            points: Vec<PricePoint>,
        }

        let raw = Raw::deserialize(deserializer)?;
        PriceSeries::new(raw.points).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_duplicates_and_disorder() {
        let dup = vec![
            PricePoint::new(date(2024, 1, 31), 1.0),
            PricePoint::new(date(2024, 1, 31), 2.0),
        ];
        assert!(matches!(
            PriceSeries::new(dup),
            Err(ForecastError::DataError(_))
        ));

        let disorder = vec![
            PricePoint::new(date(2024, 2, 29), 1.0),
            PricePoint::new(date(2024, 1, 31), 2.0),
        ];
        assert!(PriceSeries::new(disorder.clone()).is_err());
        assert_eq!(PriceSeries::from_unsorted(disorder).unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_negative_price() {
        let points = vec![PricePoint::new(date(2024, 1, 31), -1.0)];
        assert!(PriceSeries::new(points).is_err());
    }

    #[test]
    fn test_statistics() {
        let series = PriceSeries::from_parts(
            vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)],
            vec![100.0, 103.0, 106.0],
        )
        .unwrap();

        assert_relative_eq!(series.mean().unwrap(), 103.0);
        assert_relative_eq!(series.std_dev().unwrap(), 3.0);

        let changes = series.percent_change_from_start().unwrap();
        assert_relative_eq!(changes[2], 6.0, epsilon = 1e-9);

        assert!(PriceSeries::default().mean().is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"points":[{"date":"2024-02-01","price":1.0},{"date":"2024-01-01","price":2.0}]}"#;
        assert!(serde_json::from_str::<PriceSeries>(json).is_err());
    }
}
