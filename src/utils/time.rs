//! Time utilities
//!
//! Parsing of user-supplied local times and human-readable formatting of
//! opening hours, shared by the CLI and the preview.

use crate::utils::error::{SiteError, SiteResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a local wall-clock time such as `2026-10-18 09:00`.
///
/// A bare `HH:MM` is resolved against `today`.
pub fn parse_local_datetime(input: &str, today: NaiveDate) -> SiteResult<NaiveDateTime> {
    let trimmed = input.trim();

    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }

    if let Ok(time) = NaiveTime::parse_from_str(trimmed, "%H:%M") {
        return Ok(today.and_time(time));
    }

    Err(SiteError::TimeParse {
        input: input.to_string(),
        message: "expected YYYY-MM-DD HH:MM or HH:MM".to_string(),
    })
}

/// Full English name of a weekday
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Format an hour of the day the way the sign in the window reads.
///
/// # Examples
///
/// - `7` -> "7am"
/// - `12` -> "12pm"
/// - `19` -> "7pm"
/// - `0` -> "12am"
pub fn format_hour(hour: u32) -> String {
    match hour % 24 {
        0 => "12am".to_string(),
        h @ 1..=11 => format!("{}am", h),
        12 => "12pm".to_string(),
        h => format!("{}pm", h - 12),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[test]
    fn test_parse_full_datetime() {
        let parsed = parse_local_datetime("2026-10-18 09:00", today()).unwrap();
        assert_eq!(parsed.weekday(), Weekday::Sun);
        assert_eq!(parsed.hour(), 9);
    }

    #[test]
    fn test_parse_iso_datetime() {
        let parsed = parse_local_datetime("2026-10-18T18:30", today()).unwrap();
        assert_eq!(parsed.hour(), 18);
        assert_eq!(parsed.minute(), 30);
    }

    #[test]
    fn test_parse_bare_time_uses_today() {
        let parsed = parse_local_datetime("06:59", today()).unwrap();
        assert_eq!(parsed.date(), today());
        assert_eq!(parsed.weekday(), Weekday::Wed);
        assert_eq!(parsed.minute(), 59);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_local_datetime("lunchtime", today()).unwrap_err();
        assert!(err.to_string().contains("lunchtime"));
    }

    #[test]
    fn test_format_hour() {
        assert_eq!(format_hour(0), "12am");
        assert_eq!(format_hour(7), "7am");
        assert_eq!(format_hour(12), "12pm");
        assert_eq!(format_hour(17), "5pm");
        assert_eq!(format_hour(19), "7pm");
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
        assert_eq!(weekday_name(Weekday::Wed), "Wednesday");
    }
}
