//! Conversion between date/time components and their canonical strings.
//!
//! Canonical forms are `YYYY-MM-DD` for dates, `HH:MM` for times and
//! `MM/DD/YYYY` for the slash form used by event forms. Parsing is exact
//! width: `2022-2-1` is rejected, as is any non-digit character.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use thiserror::Error;

use crate::validation::require_string;

pub const MIN_YEAR: i32 = 1000;

/// Days per month in a common year.
const COMMON_MONTH_LENGTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("String is empty.")]
    Empty,
    #[error("Date '{0}' must be in the form 'YYYY-MM-DD'.")]
    DateFormat(String),
    #[error("Date '{0}' must be in the form 'MM/DD/YYYY'.")]
    FormDateFormat(String),
    #[error("Time '{0}' must be in the form 'HH:MM'.")]
    TimeFormat(String),
    #[error("Month '{0}' must be in the range 1-12 inclusive.")]
    MonthOutOfRange(u32),
    #[error("Year '{0}' must be greater than or equal to 1000.")]
    YearOutOfRange(i32),
    #[error("Day '{day}' must be in the range 1-{max} inclusive.")]
    DayOutOfRange { day: u32, max: u32 },
    #[error("Hour '{0}' must be in the range 0-23 inclusive.")]
    HourOutOfRange(u32),
    #[error("Minutes '{0}' must be in the range 0-59 inclusive.")]
    MinuteOutOfRange(u32),
    #[error("Date {0} cannot be represented as a timestamp.")]
    Unrepresentable(String),
}

pub type Result<T> = std::result::Result<T, DateError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeParts {
    pub hours: u32,
    pub minutes: u32,
}

/// Gregorian leap year rule.
///
/// ```
/// use duedesk_core::datetime::is_leap_year;
///
/// assert!(is_leap_year(2024));
/// assert!(is_leap_year(2000));
/// assert!(!is_leap_year(1900));
/// assert!(!is_leap_year(2023));
/// ```
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days per month for `year`.
pub fn month_lengths(year: i32) -> [u32; 12] {
    let mut lengths = COMMON_MONTH_LENGTHS;
    if is_leap_year(year) {
        lengths[1] = 29;
    }
    lengths
}

/// Number of days in `month` (1-12) of `year`, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(month_lengths(year)[(month - 1) as usize])
}

/// Parses an all-digit field of exactly `width` characters.
fn fixed_digits(field: &str, width: usize) -> Option<u32> {
    if field.len() != width || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

fn check_date(year: i32, month: u32, day: u32) -> Result<DateParts> {
    if !(1..=12).contains(&month) {
        return Err(DateError::MonthOutOfRange(month));
    }
    if year < MIN_YEAR {
        return Err(DateError::YearOutOfRange(year));
    }
    let max = month_lengths(year)[(month - 1) as usize];
    if day < 1 || day > max {
        return Err(DateError::DayOutOfRange { day, max });
    }
    Ok(DateParts { year, month, day })
}

/// Parses `YYYY-MM-DD`.
///
/// ```
/// use duedesk_core::datetime::{parse_date_string, DateParts};
///
/// assert_eq!(
///     parse_date_string("2024-02-29").unwrap(),
///     DateParts { year: 2024, month: 2, day: 29 }
/// );
/// assert!(parse_date_string("2023-02-29").is_err());
/// assert!(parse_date_string("2022-2-1").is_err());
/// ```
pub fn parse_date_string(value: &str) -> Result<DateParts> {
    let value = require_string(value, true).map_err(|_| DateError::Empty)?;
    let format_err = || DateError::DateFormat(value.to_string());

    let mut fields = value.split('-');
    let (Some(y), Some(m), Some(d), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(format_err());
    };
    let year = fixed_digits(y, 4).ok_or_else(format_err)?;
    let month = fixed_digits(m, 2).ok_or_else(format_err)?;
    let day = fixed_digits(d, 2).ok_or_else(format_err)?;

    check_date(year as i32, month, day)
}

/// Parses the slash form `MM/DD/YYYY` used by event forms.
pub fn parse_form_date(value: &str) -> Result<DateParts> {
    let value = require_string(value, true).map_err(|_| DateError::Empty)?;
    let format_err = || DateError::FormDateFormat(value.to_string());

    let mut fields = value.split('/');
    let (Some(m), Some(d), Some(y), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(format_err());
    };
    let month = fixed_digits(m, 2).ok_or_else(format_err)?;
    let day = fixed_digits(d, 2).ok_or_else(format_err)?;
    let year = fixed_digits(y, 4).ok_or_else(format_err)?;

    check_date(year as i32, month, day)
}

/// Parses `HH:MM` (24 hour clock).
pub fn parse_time_string(value: &str) -> Result<TimeParts> {
    let value = require_string(value, true).map_err(|_| DateError::Empty)?;
    let format_err = || DateError::TimeFormat(value.to_string());

    let Some((h, m)) = value.split_once(':') else {
        return Err(format_err());
    };
    let hours = fixed_digits(h, 2).ok_or_else(format_err)?;
    let minutes = fixed_digits(m, 2).ok_or_else(format_err)?;

    if hours > 23 {
        return Err(DateError::HourOutOfRange(hours));
    }
    if minutes > 59 {
        return Err(DateError::MinuteOutOfRange(minutes));
    }
    Ok(TimeParts { hours, minutes })
}

/// Combines date and time components into a UTC timestamp.
pub fn to_timestamp(date: DateParts, time: TimeParts) -> Result<DateTime<Utc>> {
    check_date(date.year, date.month, date.day)?;
    Utc.with_ymd_and_hms(date.year, date.month, date.day, time.hours, time.minutes, 0)
        .single()
        .ok_or_else(|| DateError::Unrepresentable(to_date_string(date)))
}

/// Formats components as `YYYY-MM-DD`.
pub fn to_date_string(date: DateParts) -> String {
    format!("{:04}-{:02}-{:02}", date.year, date.month, date.day)
}

/// Formats components as `HH:MM`.
pub fn to_time_string(time: TimeParts) -> String {
    format!("{:02}:{:02}", time.hours, time.minutes)
}

pub fn date_parts(ts: &DateTime<Utc>) -> DateParts {
    DateParts {
        year: ts.year(),
        month: ts.month(),
        day: ts.day(),
    }
}

pub fn time_parts(ts: &DateTime<Utc>) -> TimeParts {
    TimeParts {
        hours: ts.hour(),
        minutes: ts.minute(),
    }
}

/// Formats a timestamp as `M/D/YYYY @ h:mm AM|PM`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use duedesk_core::datetime::to_human_string;
///
/// let ts = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
/// assert_eq!(to_human_string(&ts), "3/5/2024 @ 2:07 PM");
/// ```
pub fn to_human_string(ts: &DateTime<Utc>) -> String {
    ts.format("%-m/%-d/%Y @ %-I:%M %p").to_string()
}

/// First day of the given month, if the month is valid.
pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_lengths_rebuilt_per_year() {
        assert_eq!(month_lengths(2024)[1], 29);
        assert_eq!(month_lengths(2023)[1], 28);
        assert_eq!(month_lengths(2000)[1], 29);
        assert_eq!(month_lengths(1900)[1], 28);
        assert_eq!(month_lengths(2023).iter().sum::<u32>(), 365);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 13), None);
        assert_eq!(days_in_month(2024, 0), None);
    }

    #[test]
    fn test_parse_date_string_exact_width() {
        assert!(matches!(
            parse_date_string("2022-2-1"),
            Err(DateError::DateFormat(_))
        ));
        assert!(matches!(
            parse_date_string("2022-02-01-01"),
            Err(DateError::DateFormat(_))
        ));
        assert!(matches!(
            parse_date_string("2022-0x-01"),
            Err(DateError::DateFormat(_))
        ));
        assert!(matches!(
            parse_date_string("+022-02-01"),
            Err(DateError::DateFormat(_))
        ));
    }

    #[test]
    fn test_parse_date_string_ranges() {
        assert_eq!(
            parse_date_string("2022-13-01"),
            Err(DateError::MonthOutOfRange(13))
        );
        assert_eq!(
            parse_date_string("0999-01-01"),
            Err(DateError::YearOutOfRange(999))
        );
        assert_eq!(
            parse_date_string("2023-02-29"),
            Err(DateError::DayOutOfRange { day: 29, max: 28 })
        );
        assert_eq!(
            parse_date_string("2022-04-00"),
            Err(DateError::DayOutOfRange { day: 0, max: 30 })
        );
    }

    #[test]
    fn test_parse_date_string_trims() {
        assert_eq!(
            parse_date_string(" 2022-04-30 "),
            Ok(DateParts {
                year: 2022,
                month: 4,
                day: 30
            })
        );
        assert_eq!(parse_date_string("   "), Err(DateError::Empty));
    }

    #[test]
    fn test_parse_form_date() {
        assert_eq!(
            parse_form_date("12/25/2024"),
            Ok(DateParts {
                year: 2024,
                month: 12,
                day: 25
            })
        );
        assert!(matches!(
            parse_form_date("2024-12-25"),
            Err(DateError::FormDateFormat(_))
        ));
        assert_eq!(
            parse_form_date("02/30/2024"),
            Err(DateError::DayOutOfRange { day: 30, max: 29 })
        );
    }

    #[test]
    fn test_parse_time_string() {
        assert_eq!(
            parse_time_string("07:05"),
            Ok(TimeParts {
                hours: 7,
                minutes: 5
            })
        );
        assert_eq!(parse_time_string("24:00"), Err(DateError::HourOutOfRange(24)));
        assert_eq!(
            parse_time_string("23:60"),
            Err(DateError::MinuteOutOfRange(60))
        );
        assert!(matches!(
            parse_time_string("7:05"),
            Err(DateError::TimeFormat(_))
        ));
        assert!(matches!(
            parse_time_string("07:05:00"),
            Err(DateError::TimeFormat(_))
        ));
    }

    #[test]
    fn test_date_round_trip() {
        for input in ["2024-02-29", "1999-12-31", "2023-01-01"] {
            let parts = parse_date_string(input).unwrap();
            assert_eq!(to_date_string(parts), input);
        }
    }

    #[test]
    fn test_time_round_trip() {
        for input in ["00:00", "09:30", "23:59"] {
            let parts = parse_time_string(input).unwrap();
            assert_eq!(to_time_string(parts), input);
        }
    }

    #[test]
    fn test_timestamp_decomposes_back() {
        let date = parse_date_string("2024-07-04").unwrap();
        let time = parse_time_string("18:45").unwrap();
        let ts = to_timestamp(date, time).unwrap();

        assert_eq!(date_parts(&ts), date);
        assert_eq!(time_parts(&ts), time);
    }

    #[test]
    fn test_to_timestamp_rejects_bad_components() {
        let date = DateParts {
            year: 2023,
            month: 2,
            day: 29,
        };
        let time = TimeParts {
            hours: 0,
            minutes: 0,
        };
        assert!(to_timestamp(date, time).is_err());
    }

    #[test]
    fn test_human_string_midnight_and_noon() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 9, 0, 0, 0).unwrap();
        let noon = Utc.with_ymd_and_hms(2024, 11, 20, 12, 30, 0).unwrap();
        assert_eq!(to_human_string(&midnight), "1/9/2024 @ 12:00 AM");
        assert_eq!(to_human_string(&noon), "11/20/2024 @ 12:30 PM");
    }
}
