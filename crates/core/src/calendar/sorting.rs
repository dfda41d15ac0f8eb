use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use super::types::{DayEvents, Event};
use crate::datetime::{days_in_month, first_of_month};

/// Sorts events by deadline, then by priority (highest first).
pub fn sort_by_deadline(events: &mut [Event]) {
    events.sort_by(|a, b| {
        a.deadline
            .cmp(&b.deadline)
            .then_with(|| b.priority.cmp(&a.priority))
    });
}

/// Groups events by the calendar day of their deadline.
pub fn group_events_by_date(events: &[Event]) -> HashMap<NaiveDate, Vec<&Event>> {
    let mut grouped: HashMap<NaiveDate, Vec<&Event>> = HashMap::new();

    for event in events {
        grouped.entry(event.deadline_date()).or_default().push(event);
    }

    grouped
}

/// Returns every date of the month, leap aware. Empty for an invalid month.
pub fn month_dates(year: i32, month: u32) -> Vec<NaiveDate> {
    let (Some(first), Some(len)) = (first_of_month(year, month), days_in_month(year, month)) else {
        return Vec::new();
    };

    (0..len as i64)
        .map(|offset| first + Duration::days(offset))
        .collect()
}

/// Builds one bucket per day of the month. Events due outside the month are
/// dropped; events within a day are sorted by deadline.
pub fn build_month_view(year: i32, month: u32, events: Vec<Event>) -> Vec<DayEvents> {
    let grouped = group_events_by_date(&events);

    month_dates(year, month)
        .into_iter()
        .map(|date| {
            let mut day_events: Vec<Event> = grouped
                .get(&date)
                .map(|refs| refs.iter().map(|e| (*e).clone()).collect())
                .unwrap_or_default();

            sort_by_deadline(&mut day_events);

            DayEvents::new(date, day_events)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::types::Timestamp;
    use chrono::{TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn event(title: &str, priority: u8, deadline: Timestamp) -> Event {
        Event::new("alice", title, "", priority, deadline)
    }

    #[test]
    fn test_sort_by_deadline_then_priority() {
        let mut events = vec![
            event("late", 5, at(2024, 3, 2, 9)),
            event("early-low", 1, at(2024, 3, 1, 9)),
            event("early-high", 4, at(2024, 3, 1, 9)),
        ];
        sort_by_deadline(&mut events);

        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["early-high", "early-low", "late"]);
    }

    #[test]
    fn test_group_events_by_date() {
        let events = vec![
            event("a", 1, at(2024, 3, 1, 9)),
            event("b", 1, at(2024, 3, 1, 18)),
            event("c", 1, at(2024, 3, 2, 9)),
        ];
        let grouped = group_events_by_date(&events);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()].len(), 2);
    }

    #[test]
    fn test_month_dates_leap_february() {
        assert_eq!(month_dates(2024, 2).len(), 29);
        assert_eq!(month_dates(2023, 2).len(), 28);
        assert!(month_dates(2023, 13).is_empty());
    }

    #[test]
    fn test_build_month_view() {
        let events = vec![
            event("evening", 1, at(2024, 4, 10, 20)),
            event("morning", 1, at(2024, 4, 10, 8)),
            event("next month", 1, at(2024, 5, 1, 8)),
        ];
        let view = build_month_view(2024, 4, events);

        assert_eq!(view.len(), 30);
        let tenth = &view[9];
        assert_eq!(tenth.date, NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
        let titles: Vec<_> = tenth.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["morning", "evening"]);
        assert_eq!(view.iter().filter(|d| !d.is_empty()).count(), 1);
    }
}
