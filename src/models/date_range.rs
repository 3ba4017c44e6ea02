//! Inclusive calendar date ranges
//!
//! Every window Spendwise works with (a budget's interval, a report's
//! aggregation window, a month) is a closed `[start, end]` range of calendar
//! dates. Both boundaries are inclusive, so two ranges that share a single day
//! overlap.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Earliest and latest year accepted for month windows
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// A closed range of calendar dates with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = DateRangeError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Create a range, rejecting an end date before the start date
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if end < start {
            return Err(DateRangeError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The `[first day, last day]` window of a month (1-based)
    pub fn month(year: i32, month: u32) -> Result<Self, DateRangeError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateRangeError::InvalidYear(year));
        }
        if !(1..=12).contains(&month) {
            return Err(DateRangeError::InvalidMonth(month));
        }

        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or(DateRangeError::InvalidMonth(month))?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end = next_month
            .and_then(|d| d.pred_opt())
            .ok_or(DateRangeError::InvalidYear(year))?;

        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Check if a date falls within this range (boundaries included)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Check if `[start, end]` shares at least one day with this range
    ///
    /// `[a, b]` and `[c, d]` overlap iff `a <= d && c <= b`.
    pub fn overlaps_dates(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= end && start <= self.end
    }

    /// Check if two ranges share at least one day
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.overlaps_dates(other.start, other.end)
    }

    /// Check if `[start, end]` lies entirely within this range
    pub fn encloses_dates(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start >= self.start && end <= self.end
    }

    /// Parse a range string
    ///
    /// Formats:
    /// - Month: "2025-01"
    /// - Single day: "2025-01-15"
    /// - Explicit range: "2025-01-01..2025-01-15"
    pub fn parse(s: &str) -> Result<Self, DateRangeError> {
        let s = s.trim();

        if let Some((start, end)) = s.split_once("..") {
            let start = parse_calendar_date(start)?;
            let end = parse_calendar_date(end)?;
            return Self::new(start, end);
        }

        if let Ok(date) = parse_calendar_date(s) {
            return Ok(Self::single_day(date));
        }

        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() == 2 {
            let year: i32 = parts[0]
                .parse()
                .map_err(|_| DateRangeError::InvalidFormat(s.to_string()))?;
            let month: u32 = parts[1]
                .parse()
                .map_err(|_| DateRangeError::InvalidFormat(s.to_string()))?;
            return Self::month(year, month);
        }

        Err(DateRangeError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Parse user input into a calendar date
///
/// Accepts `YYYY-MM-DD`, and timestamps (`YYYY-MM-DDTHH:MM:SS`, RFC 3339)
/// whose time of day is dropped. For RFC 3339 input the date is the one
/// written in the timestamp's own offset.
pub fn parse_calendar_date(s: &str) -> Result<NaiveDate, DateRangeError> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(timestamp.date());
    }

    Err(DateRangeError::InvalidFormat(s.to_string()))
}

/// Error type for date range construction and parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    InvalidMonth(u32),
    InvalidYear(i32),
    InvalidFormat(String),
}

impl fmt::Display for DateRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
            Self::InvalidMonth(m) => write!(f, "Invalid month: {} (expected 1-12)", m),
            Self::InvalidYear(y) => write!(f, "Invalid year: {}", y),
            Self::InvalidFormat(s) => {
                write!(f, "Invalid date format: '{}'. Use YYYY-MM-DD", s)
            }
        }
    }
}

impl std::error::Error for DateRangeError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange::new(start, end).unwrap()
    }

    #[test]
    fn test_rejects_end_before_start() {
        let err = DateRange::new(date(2025, 2, 1), date(2025, 1, 31)).unwrap_err();
        assert!(matches!(err, DateRangeError::EndBeforeStart { .. }));
    }

    #[test]
    fn test_month_window() {
        let march = DateRange::month(2024, 3).unwrap();
        assert_eq!(march.start(), date(2024, 3, 1));
        assert_eq!(march.end(), date(2024, 3, 31));

        let feb = DateRange::month(2024, 2).unwrap();
        assert_eq!(feb.end(), date(2024, 2, 29));

        let dec = DateRange::month(2024, 12).unwrap();
        assert_eq!(dec.end(), date(2024, 12, 31));
    }

    #[test]
    fn test_invalid_month_and_year() {
        assert_eq!(DateRange::month(2024, 0), Err(DateRangeError::InvalidMonth(0)));
        assert_eq!(DateRange::month(2024, 13), Err(DateRangeError::InvalidMonth(13)));
        assert_eq!(DateRange::month(0, 5), Err(DateRangeError::InvalidYear(0)));
    }

    #[test]
    fn test_overlap_is_boundary_inclusive() {
        let january = range(date(2024, 1, 1), date(2024, 1, 31));
        let touching = range(date(2024, 1, 31), date(2024, 2, 15));
        let after = range(date(2024, 2, 1), date(2024, 2, 15));

        assert!(january.overlaps(&touching));
        assert!(touching.overlaps(&january));
        assert!(!january.overlaps(&after));
        assert!(!after.overlaps(&january));
    }

    #[test]
    fn test_overlap_containment() {
        let outer = range(date(2024, 1, 1), date(2024, 12, 31));
        let inner = range(date(2024, 6, 1), date(2024, 6, 30));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(outer.encloses_dates(inner.start(), inner.end()));
        assert!(!inner.encloses_dates(outer.start(), outer.end()));
    }

    #[test]
    fn test_contains() {
        let jan = DateRange::month(2025, 1).unwrap();
        assert!(jan.contains(date(2025, 1, 1)));
        assert!(jan.contains(date(2025, 1, 31)));
        assert!(!jan.contains(date(2025, 2, 1)));
    }

    #[test]
    fn test_parse() {
        assert_eq!(DateRange::parse("2025-01").unwrap(), DateRange::month(2025, 1).unwrap());
        assert_eq!(
            DateRange::parse("2025-01-05..2025-01-09").unwrap(),
            range(date(2025, 1, 5), date(2025, 1, 9))
        );
        assert_eq!(
            DateRange::parse("2025-01-05").unwrap(),
            DateRange::single_day(date(2025, 1, 5))
        );
        assert!(DateRange::parse("2025-01-09..2025-01-05").is_err());
        assert!(DateRange::parse("next week").is_err());
    }

    #[test]
    fn test_parse_calendar_date_drops_time() {
        assert_eq!(parse_calendar_date("2024-03-15").unwrap(), date(2024, 3, 15));
        assert_eq!(
            parse_calendar_date("2024-03-15T23:59:59Z").unwrap(),
            date(2024, 3, 15)
        );
        assert_eq!(
            parse_calendar_date("2024-03-15T08:00:00").unwrap(),
            date(2024, 3, 15)
        );
        assert!(parse_calendar_date("15/03/2024").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: DateRange =
            serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-01-31"}"#).unwrap();
        assert_eq!(ok, DateRange::month(2024, 1).unwrap());

        let bad = serde_json::from_str::<DateRange>(r#"{"start":"2024-02-01","end":"2024-01-31"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_display() {
        let r = range(date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(r.to_string(), "2024-01-01..2024-01-31");
    }
}
