//! Calendar helpers for monthly price series

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Months, NaiveDate};

/// Whether `date` is the last day of its month
pub fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

/// Last day of the month containing `date`
pub fn month_end(date: NaiveDate) -> Result<NaiveDate> {
    let first = date
        .with_day(1)
        .ok_or_else(|| out_of_range(date))?;
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

/// Add `months` calendar months to `date`.
///
/// Month-end dates stay month-end; other dates keep their day of month,
/// clamped to the length of the target month.
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    if is_month_end(date) {
        let first = date.with_day(1).ok_or_else(|| out_of_range(date))?;
        let target = first
            .checked_add_months(Months::new(months))
            .ok_or_else(|| out_of_range(date))?;
        return month_end(target);
    }

    date.checked_add_months(Months::new(months))
        .ok_or_else(|| out_of_range(date))
}

/// Subtract `months` calendar months from `date`, with the same month-end rule as [`add_months`]
pub fn sub_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    if is_month_end(date) {
        let first = date.with_day(1).ok_or_else(|| out_of_range(date))?;
        let target = first
            .checked_sub_months(Months::new(months))
            .ok_or_else(|| out_of_range(date))?;
        return month_end(target);
    }

    date.checked_sub_months(Months::new(months))
        .ok_or_else(|| out_of_range(date))
}

/// Create the `periods` monthly dates following `last`
pub fn future_month_dates(last: NaiveDate, periods: usize) -> Result<Vec<NaiveDate>> {
    (1..=periods)
        .map(|i| {
            let step = u32::try_from(i).map_err(|_| {
                ForecastError::InvalidParameter(format!("Forecast horizon {} is too large", periods))
            })?;
            add_months(last, step)
        })
        .collect()
}

/// Whole days from `start` to `date` as a regression feature
pub fn days_since(start: NaiveDate, date: NaiveDate) -> f64 {
    (date - start).num_days() as f64
}

/// Month index used to compare calendar months across years
pub fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn out_of_range(date: NaiveDate) -> ForecastError {
    ForecastError::DataError(format!("Date arithmetic out of range from {}", date))
}
