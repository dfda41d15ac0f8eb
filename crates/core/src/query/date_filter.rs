//! Partial date filters.
//!
//! A filter token is `MM/DD/YYYY` where the month or day may be `XX` and the
//! year may be `XXXX`. The present components become one conjunctive store
//! predicate over the deadline, read in UTC.

use serde::{Deserialize, Serialize};

use crate::datetime::{days_in_month, MIN_YEAR};
use crate::error::{PlannerError, Result};
use crate::storage::{DeadlinePart, EventFilter};

const TOKEN_LEN: usize = 10;

/// Month, day and year of a date filter. `None` means "any".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFilter {
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub year: Option<i32>,
}

/// The eight presence combinations of a [`DateFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatePredicate {
    Exact { year: i32, month: u32, day: u32 },
    MonthDay { month: u32, day: u32 },
    MonthYear { month: u32, year: i32 },
    Month { month: u32 },
    DayYear { day: u32, year: i32 },
    Day { day: u32 },
    Year { year: i32 },
    Unconstrained,
}

impl DateFilter {
    pub fn predicate(&self) -> DatePredicate {
        match (self.month, self.day, self.year) {
            (Some(month), Some(day), Some(year)) => DatePredicate::Exact { year, month, day },
            (Some(month), Some(day), None) => DatePredicate::MonthDay { month, day },
            (Some(month), None, Some(year)) => DatePredicate::MonthYear { month, year },
            (Some(month), None, None) => DatePredicate::Month { month },
            (None, Some(day), Some(year)) => DatePredicate::DayYear { day, year },
            (None, Some(day), None) => DatePredicate::Day { day },
            (None, None, Some(year)) => DatePredicate::Year { year },
            (None, None, None) => DatePredicate::Unconstrained,
        }
    }
}

impl DatePredicate {
    /// Compiles the predicate into a single conjunctive event filter.
    ///
    /// ```
    /// use duedesk_core::query::DatePredicate;
    /// use duedesk_core::storage::{DeadlinePart, EventFilter};
    ///
    /// let filter = DatePredicate::Month { month: 5 }.to_filter().unwrap();
    /// assert_eq!(
    ///     filter,
    ///     EventFilter::And(vec![EventFilter::DeadlinePart {
    ///         part: DeadlinePart::Month,
    ///         value: 5
    ///     }])
    /// );
    /// assert!(DatePredicate::Unconstrained.to_filter().is_err());
    /// ```
    pub fn to_filter(&self) -> Result<EventFilter> {
        let part = |part, value| EventFilter::DeadlinePart { part, value };
        let (year, month, day) = (DeadlinePart::Year, DeadlinePart::Month, DeadlinePart::Day);

        let parts = match *self {
            DatePredicate::Exact {
                year: y,
                month: m,
                day: d,
            } => vec![part(year, y), part(month, m as i32), part(day, d as i32)],
            DatePredicate::MonthDay { month: m, day: d } => {
                vec![part(month, m as i32), part(day, d as i32)]
            }
            DatePredicate::MonthYear { month: m, year: y } => {
                vec![part(year, y), part(month, m as i32)]
            }
            DatePredicate::Month { month: m } => vec![part(month, m as i32)],
            DatePredicate::DayYear { day: d, year: y } => {
                vec![part(year, y), part(day, d as i32)]
            }
            DatePredicate::Day { day: d } => vec![part(day, d as i32)],
            DatePredicate::Year { year: y } => vec![part(year, y)],
            DatePredicate::Unconstrained => {
                return Err(PlannerError::InvalidArgument(
                    "A date filter needs at least one of month, day or year.".to_string(),
                ))
            }
        };
        Ok(EventFilter::And(parts))
    }
}

fn field<'a>(token: &'a str, range: std::ops::Range<usize>) -> Result<&'a str> {
    token.get(range).ok_or_else(|| format_error(token))
}

fn format_error(token: &str) -> PlannerError {
    PlannerError::InvalidArgument(format!("'{token}' is not a valid formatted date."))
}

/// Parses a component that is either all placeholder characters or all digits.
fn component(token: &str, raw: &str, placeholder: &str) -> Result<Option<u32>> {
    if raw.eq_ignore_ascii_case(placeholder) {
        return Ok(None);
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format_error(token));
    }
    raw.parse().map(Some).map_err(|_| format_error(token))
}

/// Parses a `MM/DD/YYYY` token with `XX`/`XXXX` placeholders.
///
/// Placeholders are matched case-insensitively. Present components are range
/// checked; a day is checked against its month when the month is known,
/// allowing February 29 unless a non-leap year is also given.
///
/// ```
/// use duedesk_core::query::{parse_date_token, DatePredicate};
///
/// let filter = parse_date_token("05/XX/XXXX").unwrap();
/// assert_eq!(filter.predicate(), DatePredicate::Month { month: 5 });
/// assert!(parse_date_token("13/XX/XXXX").is_err());
/// assert!(parse_date_token("5/1/2024").is_err());
/// ```
pub fn parse_date_token(token: &str) -> Result<DateFilter> {
    let token = token.trim();
    if token.len() != TOKEN_LEN || !token.is_ascii() {
        return Err(format_error(token));
    }
    if field(token, 2..3)? != "/" || field(token, 5..6)? != "/" {
        return Err(format_error(token));
    }

    let month = component(token, field(token, 0..2)?, "XX")?;
    let day = component(token, field(token, 3..5)?, "XX")?;
    let year = component(token, field(token, 6..10)?, "XXXX")?.map(|y| y as i32);

    if let Some(m) = month {
        if !(1..=12).contains(&m) {
            return Err(PlannerError::InvalidArgument(format!(
                "Month '{m}' must be in the range 1-12 inclusive."
            )));
        }
    }
    if let Some(y) = year {
        if y < MIN_YEAR {
            return Err(PlannerError::InvalidArgument(format!(
                "Year '{y}' must be greater than or equal to 1000."
            )));
        }
    }
    if let Some(d) = day {
        // Without a year, use a leap year so February 29 stays searchable.
        let max = match month {
            Some(m) => days_in_month(year.unwrap_or(2000), m).unwrap_or(31),
            None => 31,
        };
        if d < 1 || d > max {
            return Err(PlannerError::InvalidArgument(format!(
                "Day '{d}' must be in the range 1-{max} inclusive."
            )));
        }
    }

    Ok(DateFilter { month, day, year })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Event;
    use chrono::{TimeZone, Utc};

    fn due(y: i32, m: u32, d: u32) -> Event {
        Event::new(
            "alice",
            "t",
            "",
            1,
            Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        )
    }

    fn filter_for(token: &str) -> EventFilter {
        parse_date_token(token)
            .unwrap()
            .predicate()
            .to_filter()
            .unwrap()
    }

    #[test]
    fn test_all_eight_presence_combinations() {
        let cases = [
            ("05/08/2022", DatePredicate::Exact { year: 2022, month: 5, day: 8 }),
            ("05/08/XXXX", DatePredicate::MonthDay { month: 5, day: 8 }),
            ("05/XX/2022", DatePredicate::MonthYear { month: 5, year: 2022 }),
            ("05/XX/XXXX", DatePredicate::Month { month: 5 }),
            ("XX/08/2022", DatePredicate::DayYear { day: 8, year: 2022 }),
            ("XX/08/XXXX", DatePredicate::Day { day: 8 }),
            ("XX/XX/2022", DatePredicate::Year { year: 2022 }),
            ("XX/XX/XXXX", DatePredicate::Unconstrained),
        ];
        for (token, expected) in cases {
            assert_eq!(parse_date_token(token).unwrap().predicate(), expected, "{token}");
        }
    }

    #[test]
    fn test_unconstrained_is_rejected() {
        let predicate = parse_date_token("XX/XX/XXXX").unwrap().predicate();
        assert!(matches!(
            predicate.to_filter(),
            Err(PlannerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_month_only_ignores_year() {
        let filter = filter_for("05/XX/XXXX");
        assert!(filter.matches(&due(2022, 5, 8)));
        assert!(filter.matches(&due(2021, 5, 8)));
        assert!(!filter.matches(&due(2022, 6, 8)));
    }

    #[test]
    fn test_month_day_without_year() {
        let filter = filter_for("05/08/XXXX");
        assert!(filter.matches(&due(2022, 5, 8)));
        assert!(filter.matches(&due(2019, 5, 8)));
        assert!(!filter.matches(&due(2022, 5, 9)));
    }

    #[test]
    fn test_day_year_without_month() {
        let filter = filter_for("XX/08/2022");
        assert!(filter.matches(&due(2022, 1, 8)));
        assert!(filter.matches(&due(2022, 11, 8)));
        assert!(!filter.matches(&due(2021, 1, 8)));
    }

    #[test]
    fn test_exact() {
        let filter = filter_for("05/08/2022");
        assert!(filter.matches(&due(2022, 5, 8)));
        assert!(!filter.matches(&due(2021, 5, 8)));
    }

    #[test]
    fn test_placeholders_are_case_insensitive() {
        let filter = parse_date_token("xx/08/xxxx").unwrap();
        assert_eq!(filter.predicate(), DatePredicate::Day { day: 8 });
    }

    #[test]
    fn test_malformed_tokens() {
        for token in [
            "",
            "05-08-2022",
            "5/8/2022",
            "05/08/22",
            "AB/08/2022",
            "05/X8/2022",
            "05/08/XXX1",
            "05/08/2022 extra",
            "0é/08/2022",
        ] {
            assert!(parse_date_token(token).is_err(), "{token}");
        }
    }

    #[test]
    fn test_component_ranges() {
        assert!(parse_date_token("00/XX/XXXX").is_err());
        assert!(parse_date_token("XX/32/XXXX").is_err());
        assert!(parse_date_token("XX/00/XXXX").is_err());
        assert!(parse_date_token("04/31/XXXX").is_err());
        assert!(parse_date_token("XX/XX/0999").is_err());
    }

    #[test]
    fn test_february_29() {
        assert!(parse_date_token("02/29/XXXX").is_ok());
        assert!(parse_date_token("02/29/2024").is_ok());
        assert!(parse_date_token("02/29/2023").is_err());
    }
}
