//! Time utilities
//!
//! Scheduling works on UTC calendar days.

use chrono::{Datelike, Duration, NaiveDate, Utc};

use crate::constants::{ARCHIVE_WINDOW_DAYS, DATE_FORMAT};

/// Current UTC calendar day
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Most recent Sunday on or before `today`
pub fn week_start(today: NaiveDate) -> NaiveDate {
    let days_since_sunday = today.weekday().num_days_from_sunday();
    today - Duration::days(i64::from(days_since_sunday))
}

/// First day covered by the archive ending on `today`
pub fn archive_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(ARCHIVE_WINDOW_DAYS)
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Format a calendar date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_week_start_is_previous_sunday() {
        // 2025-03-12 is a Wednesday
        assert_eq!(week_start(day("2025-03-12")), day("2025-03-09"));
        // A Sunday starts its own week
        assert_eq!(week_start(day("2025-03-09")), day("2025-03-09"));
        // Saturday belongs to the week that started six days earlier
        assert_eq!(week_start(day("2025-03-15")), day("2025-03-09"));
    }

    #[test]
    fn test_archive_start() {
        assert_eq!(archive_start(day("2025-03-31")), day("2025-03-01"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2025-01-02 "), Some(day("2025-01-02")));
        assert_eq!(parse_date("02/01/2025"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(format_date(day("2025-01-02")), "2025-01-02");
    }
}
