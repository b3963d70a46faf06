//! Pay-cycle window
//!
//! A fortnight starting on the pay day: 14 calendar days, both ends inclusive.

use chrono::{Days, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days in a pay cycle
pub const PAY_CYCLE_DAYS: i64 = 14;

/// The fortnight a budget is calculated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayCycleWindow {
    pub start: NaiveDate,
}

impl PayCycleWindow {
    pub fn new(start: NaiveDate) -> Self {
        Self { start }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window (inclusive)
    ///
    /// Clamped to the last representable date for a window starting at the
    /// very end of the calendar.
    pub fn end_date(&self) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(PAY_CYCLE_DAYS as u64 - 1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Check if a date falls within this window
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    pub fn next(&self) -> Option<Self> {
        self.start
            .checked_add_days(Days::new(PAY_CYCLE_DAYS as u64))
            .map(Self::new)
    }

    pub fn prev(&self) -> Option<Self> {
        self.start
            .checked_sub_days(Days::new(PAY_CYCLE_DAYS as u64))
            .map(Self::new)
    }

    /// Parse a window from its start date ("2024-01-15")
    ///
    /// A start whose fortnight would run past the last representable date
    /// is rejected.
    pub fn parse(s: &str) -> Result<Self, PayCycleParseError> {
        let start = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| PayCycleParseError::InvalidFormat(s.to_string()))?;
        start
            .checked_add_days(Days::new(PAY_CYCLE_DAYS as u64 - 1))
            .ok_or_else(|| PayCycleParseError::OutOfRange(s.to_string()))?;
        Ok(Self::new(start))
    }
}

impl fmt::Display for PayCycleWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start_date().format("%Y-%m-%d"),
            self.end_date().format("%Y-%m-%d")
        )
    }
}

impl Ord for PayCycleWindow {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.start.cmp(&other.start)
    }
}

impl PartialOrd for PayCycleWindow {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayCycleParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for PayCycleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => {
                write!(f, "Invalid pay cycle start '{}'. Use YYYY-MM-DD", s)
            }
            Self::OutOfRange(s) => {
                write!(f, "Pay cycle starting '{}' runs past the end of the calendar", s)
            }
        }
    }
}

impl std::error::Error for PayCycleParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_bounds() {
        let window = PayCycleWindow::new(date(2024, 1, 15));
        assert_eq!(window.end_date(), date(2024, 1, 28));
        assert!(window.contains(date(2024, 1, 15)));
        assert!(window.contains(date(2024, 1, 28)));
        assert!(!window.contains(date(2024, 1, 29)));
        assert!(!window.contains(date(2024, 1, 14)));
    }

    #[test]
    fn test_navigation() {
        let window = PayCycleWindow::new(date(2024, 12, 23));
        assert_eq!(window.next().unwrap().start, date(2025, 1, 6));
        assert_eq!(window.next().and_then(|w| w.prev()), Some(window));
        assert_eq!(PayCycleWindow::new(NaiveDate::MAX).next(), None);
        assert_eq!(PayCycleWindow::new(NaiveDate::MIN).prev(), None);
    }

    #[test]
    fn test_parse_and_display() {
        let window = PayCycleWindow::parse("2024-01-15").unwrap();
        assert_eq!(window.to_string(), "2024-01-15 - 2024-01-28");
        assert!(PayCycleWindow::parse("15/01/2024").is_err());
    }

    #[test]
    fn test_window_at_end_of_calendar() {
        let late = NaiveDate::MAX - Duration::days(5);
        let window = PayCycleWindow::new(late);
        assert_eq!(window.end_date(), NaiveDate::MAX);
        assert!(window.contains(late));
        assert!(window.contains(NaiveDate::MAX));

        let raw = late.format("%Y-%m-%d").to_string();
        assert!(matches!(
            PayCycleWindow::parse(&raw),
            Err(PayCycleParseError::OutOfRange(_))
        ));
        let last_ok = (NaiveDate::MAX - Duration::days(13)).format("%Y-%m-%d").to_string();
        assert!(PayCycleWindow::parse(&last_ok).is_ok());
    }
}
