//! Aggregation window
//!
//! The inclusive `[start, end]` range statistics are computed over. Ranges
//! are validated on construction: a reversed range is an error, never an
//! empty result.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Inclusive date-time window for filtering call records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Create a validated range
    ///
    /// Fails with `InvalidDateRange` when `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Create a range spanning whole UTC calendar days
    ///
    /// `start` begins at 00:00:00 and `end` runs through 23:59:59, matching
    /// the `YYYY-MM-DD` parameters accepted at the API boundary.
    pub fn full_days(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        let start = start
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| AppError::Internal("invalid start of day".to_string()))?
            .and_utc();
        let end = end
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| AppError::Internal("invalid end of day".to_string()))?
            .and_utc();
        Self::new(start, end)
    }

    /// Range start (inclusive)
    #[inline]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Range end (inclusive)
    #[inline]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether a timestamp falls inside the window, boundaries included
    #[inline]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    /// Iterate the UTC calendar days the window touches, ascending
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.start.date_naive();
        let last = self.end.date_naive();
        std::iter::successors(Some(first), move |day| {
            day.succ_opt().filter(|next| *next <= last)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reversed_range_rejected() {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let err = DateRange::new(start, end).unwrap_err();
        assert_eq!(err.error_code(), "invalid_date_range");
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let range = DateRange::full_days(date(2024, 1, 1), date(2024, 1, 5)).unwrap();

        let at_start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let at_end = Utc.with_ymd_and_hms(2024, 1, 5, 23, 59, 59).unwrap();
        let just_before = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        let just_after = Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap();

        assert!(range.contains(at_start));
        assert!(range.contains(at_end));
        assert!(!range.contains(just_before));
        assert!(!range.contains(just_after));
    }

    #[test]
    fn test_days_walk_is_gapless() {
        let range = DateRange::full_days(date(2024, 1, 1), date(2024, 1, 5)).unwrap();
        let days: Vec<NaiveDate> = range.days().collect();
        assert_eq!(days.len(), 5);
        assert_eq!(days[0], date(2024, 1, 1));
        assert_eq!(days[4], date(2024, 1, 5));
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::full_days(date(2024, 3, 15), date(2024, 3, 15)).unwrap();
        assert_eq!(range.days().count(), 1);
    }

    #[test]
    fn test_days_cross_month_boundary() {
        let range = DateRange::full_days(date(2024, 1, 30), date(2024, 2, 2)).unwrap();
        let days: Vec<NaiveDate> = range.days().collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days[2], date(2024, 2, 1));
    }
}
