//! Pretty output formatting.

use duedesk_core::calendar::{Calendar, Comment, DayEvents, Event, User};
use duedesk_core::datetime::to_human_string;

use crate::seed::SeedReport;

fn stars(priority: u8) -> String {
    format!("{}{}", "*".repeat(priority as usize), ".".repeat(5 - priority.min(5) as usize))
}

/// Format an event for display.
pub fn format_event(event: &Event) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Due: {}\n  Owners: {}",
        event.title,
        stars(event.priority),
        event.id,
        to_human_string(&event.deadline),
        event.owners.join(", ")
    );
    if !event.description.is_empty() {
        output.push_str(&format!("\n  Description: {}", event.description));
    }
    for comment in &event.comments {
        output.push_str(&format!("\n  > {}", format_comment(comment)));
    }
    output
}

/// Format events for display.
pub fn format_events(events: &[Event]) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }
    let mut output = format!("EVENTS ({})\n", events.len());
    output.push_str(&"-".repeat(40));
    for event in events {
        output.push_str(&format!("\n{}", format_event(event)));
        output.push('\n');
    }
    output
}

/// Format a comment for display.
pub fn format_comment(comment: &Comment) -> String {
    format!(
        "{} ({}, {}): {}",
        comment.owner,
        to_human_string(&comment.created_on),
        comment.id,
        comment.text
    )
}

/// Format a calendar for display.
pub fn format_calendar(calendar: &Calendar) -> String {
    format!(
        "{}\n  ID: {}\n  Events: {}",
        calendar.title,
        calendar.id,
        calendar.events.len()
    )
}

/// Format a user for display.
pub fn format_user(user: &User) -> String {
    let mut output = format!(
        "{} {} (@{})\n  ID: {}",
        user.first_name, user.last_name, user.username, user.id
    );
    for calendar in &user.calendars {
        output.push_str(&format!(
            "\n  Calendar: {} ({}, {} events)",
            calendar.title,
            calendar.id,
            calendar.events.len()
        ));
    }
    output
}

/// Format a month view. Days without events are skipped.
pub fn format_month(days: &[DayEvents]) -> String {
    let busy: Vec<&DayEvents> = days.iter().filter(|d| !d.is_empty()).collect();
    if busy.is_empty() {
        return "Nothing due this month.".to_string();
    }
    let mut output = String::new();
    for day in busy {
        output.push_str(&day.date.format("%a %b %-d").to_string());
        for event in &day.events {
            output.push_str(&format!(
                "\n  {} {} [{}] ({})",
                event.deadline.format("%H:%M"),
                event.title,
                stars(event.priority),
                event.id
            ));
        }
        output.push('\n');
    }
    output
}

/// Format a seeding summary.
pub fn format_seed_report(report: &SeedReport) -> String {
    format!(
        "Seeded {} users, {} events ({} shared) and {} comments.",
        report.users, report.events, report.shared, report.comments
    )
}
