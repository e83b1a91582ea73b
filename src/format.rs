//! Date and time string helpers shared by the form, the tables and the
//! `--status` output. Formats match what the reservation templates expect:
//! zero-padded `YYYY-MM-DD` and `HH:MM`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

pub const DATE_FMT: &str = "%Y-%m-%d";
pub const TIME_FMT: &str = "%H:%M";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid date (expected YYYY-MM-DD)")]
    Date,
    #[error("invalid time (expected HH:MM)")]
    Time,
}

/// Render the calendar date of a date-time as zero-padded `YYYY-MM-DD`.
pub fn date(dt: &NaiveDateTime) -> String {
    dt.format(DATE_FMT).to_string()
}

/// Render the wall-clock time of a date-time as zero-padded `HH:MM`.
pub fn time(dt: &NaiveDateTime) -> String {
    format!("{:02}:{:02}", dt.hour(), dt.minute())
}

/// Render a start/end pair the way reservation rows display it.
pub fn time_range(start: &NaiveTime, end: &NaiveTime) -> String {
    format!(
        "{} - {}",
        start.format(TIME_FMT),
        end.format(TIME_FMT)
    )
}

pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FMT).map_err(|_| ParseError::Date)
}

pub fn parse_time(s: &str) -> Result<NaiveTime, ParseError> {
    NaiveTime::parse_from_str(s.trim(), TIME_FMT).map_err(|_| ParseError::Time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn date_is_zero_padded() {
        assert_eq!(date(&dt(2025, 3, 5, 9, 7)), "2025-03-05");
    }

    #[test]
    fn time_is_zero_padded() {
        assert_eq!(time(&dt(2025, 3, 5, 9, 7)), "09:07");
    }

    #[test]
    fn time_range_joins_both_ends() {
        let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        assert_eq!(time_range(&start, &end), "09:00 - 10:30");
    }

    #[test]
    fn parse_date_accepts_padded_form_only() {
        assert_eq!(
            parse_date("2025-03-05"),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap())
        );
        assert_eq!(parse_date("05/03/2025"), Err(ParseError::Date));
        assert_eq!(parse_date(""), Err(ParseError::Date));
    }

    #[test]
    fn parse_time_rejects_out_of_range() {
        assert_eq!(
            parse_time("09:07"),
            Ok(NaiveTime::from_hms_opt(9, 7, 0).unwrap())
        );
        assert_eq!(parse_time("25:00"), Err(ParseError::Time));
        assert_eq!(parse_time("9am"), Err(ParseError::Time));
    }

    #[test]
    fn parse_trims_whitespace() {
        assert!(parse_date(" 2025-03-05 ").is_ok());
        assert!(parse_time(" 09:07 ").is_ok());
    }
}
