use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("invalid year/month: {0}/{1}")]
    InvalidMonth(i32, u32),
}

/// First and last calendar day of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MonthRange {
    pub first_of_month: NaiveDate,
    pub last_of_month: NaiveDate,
}

impl MonthRange {
    /// Month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let first_of_month = date.with_day(1).unwrap_or(date);
        // Day 0 of the following month; saturates at chrono's upper bound.
        let last_of_month = first_of_month
            .checked_add_months(Months::new(1))
            .and_then(|next| next.checked_sub_signed(Duration::days(1)))
            .unwrap_or(NaiveDate::MAX);
        Self {
            first_of_month,
            last_of_month,
        }
    }

    pub fn for_month(year: i32, month: u32) -> Result<Self, DateRangeError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self::containing)
            .ok_or(DateRangeError::InvalidMonth(year, month))
    }

    pub fn year(&self) -> i32 {
        self.first_of_month.year()
    }

    pub fn month(&self) -> u32 {
        self.first_of_month.month()
    }

    pub fn iso_start(&self) -> String {
        date_key(self.first_of_month)
    }

    pub fn iso_end(&self) -> String {
        date_key(self.last_of_month)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_of_month <= date && date <= self.last_of_month
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        expand_inclusive(self.first_of_month, self.last_of_month)
    }
}

/// `YYYY-MM-DD`.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Every date in the closed interval `[start, end]`, in order. Empty when `end < start`.
pub fn expand_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn containing_handles_variable_month_lengths() {
        let feb_leap = MonthRange::containing(d(2024, 2, 18));
        assert_eq!(feb_leap.first_of_month, d(2024, 2, 1));
        assert_eq!(feb_leap.last_of_month, d(2024, 2, 29));

        let feb = MonthRange::containing(d(2023, 2, 1));
        assert_eq!(feb.last_of_month, d(2023, 2, 28));

        let dec = MonthRange::containing(d(2024, 12, 31));
        assert_eq!(dec.last_of_month, d(2024, 12, 31));
        assert_eq!(MonthRange::containing(d(2024, 4, 30)).last_of_month, d(2024, 4, 30));
    }

    #[test]
    fn iso_bounds_are_plain_dates() {
        let range = MonthRange::for_month(2024, 3).unwrap();
        assert_eq!(range.iso_start(), "2024-03-01");
        assert_eq!(range.iso_end(), "2024-03-31");
        assert_eq!(range.days().count(), 31);
    }

    #[test]
    fn for_month_rejects_invalid_month() {
        assert_eq!(
            MonthRange::for_month(2024, 13),
            Err(DateRangeError::InvalidMonth(2024, 13))
        );
    }

    #[test]
    fn expand_inclusive_includes_both_ends() {
        let days: Vec<_> = expand_inclusive(d(2024, 3, 4), d(2024, 3, 6)).collect();
        assert_eq!(days, vec![d(2024, 3, 4), d(2024, 3, 5), d(2024, 3, 6)]);
    }

    #[test]
    fn expand_inclusive_single_day_and_inverted_span() {
        assert_eq!(expand_inclusive(d(2024, 3, 4), d(2024, 3, 4)).count(), 1);
        assert_eq!(expand_inclusive(d(2024, 3, 6), d(2024, 3, 4)).count(), 0);
    }

    #[test]
    fn expand_inclusive_crosses_month_boundary() {
        let days: Vec<_> = expand_inclusive(d(2024, 2, 28), d(2024, 3, 1)).collect();
        assert_eq!(days, vec![d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)]);
    }
}
