//! Inclusive day ranges and date expansion.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{OdcError, OdcResult};

/// Inclusive range of calendar days, `start..=end`.
/// Always non-empty: `end >= start` is checked on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    /// `end` defaults to `start` (a single-day span).
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> OdcResult<Self> {
        let end = end.unwrap_or(start);
        if end < start {
            return Err(OdcError::InvalidDateRange {
                record: String::new(),
                start,
                end,
            });
        }
        Ok(DateSpan { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        DateSpan { start: day, end: day }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, `end - start + 1`.
    pub fn len(&self) -> u32 {
        (self.end - self.start).num_days() as u32 + 1
    }

    pub fn is_multi_day(&self) -> bool {
        self.end > self.start
    }

    /// Every day of the span in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.len() as usize)
    }

    /// Days paired with their 1-based position in the span.
    pub fn numbered_days(&self) -> impl Iterator<Item = (u32, NaiveDate)> {
        (1..).zip(self.days())
    }
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// Parse a YYYY-MM-DD date
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::d;

    #[test]
    fn expands_inclusive_range() {
        let span = DateSpan::new(d(2024, 3, 4), Some(d(2024, 3, 6))).unwrap();
        let days: Vec<_> = span.days().collect();
        assert_eq!(days, vec![d(2024, 3, 4), d(2024, 3, 5), d(2024, 3, 6)]);
        assert_eq!(span.len(), 3);
        assert!(span.is_multi_day());
    }

    #[test]
    fn missing_end_is_single_day() {
        let span = DateSpan::new(d(2024, 3, 5), None).unwrap();
        assert_eq!(span.len(), 1);
        assert!(!span.is_multi_day());
        assert_eq!(span, DateSpan::single(d(2024, 3, 5)));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = DateSpan::new(d(2024, 3, 6), Some(d(2024, 3, 4))).unwrap_err();
        assert!(matches!(err, OdcError::InvalidDateRange { .. }));
    }

    #[test]
    fn crosses_leap_day() {
        let span = DateSpan::new(d(2024, 2, 28), Some(d(2024, 3, 2))).unwrap();
        let numbered: Vec<_> = span.numbered_days().collect();
        assert_eq!(
            numbered,
            vec![
                (1, d(2024, 2, 28)),
                (2, d(2024, 2, 29)),
                (3, d(2024, 3, 1)),
                (4, d(2024, 3, 2)),
            ]
        );
    }

    #[test]
    fn week_start_is_monday() {
        assert_eq!(week_start(d(2024, 3, 6)), d(2024, 3, 4));
        assert_eq!(week_start(d(2024, 3, 4)), d(2024, 3, 4));
        assert_eq!(week_start(d(2024, 3, 10)), d(2024, 3, 4));
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date("2024-03-04").unwrap(), d(2024, 3, 4));
        assert!(parse_date("04/03/2024").is_err());
    }
}
