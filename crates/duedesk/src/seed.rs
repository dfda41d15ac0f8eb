//! Demo data generator.
//!
//! Creates `user1`..`userN`, each with a default calendar full of random
//! events. Every other event is shared with the previous user and every event
//! gets one comment, so searches, ownership changes and comment deletion all
//! have something to work on.

use chrono::{Datelike, Utc};
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::Serialize;

use duedesk_core::calendar::{EventDraft, Timestamp, MAX_PRIORITY, MIN_PRIORITY};
use duedesk_core::datetime::{days_in_month, to_timestamp, DateParts, TimeParts};
use duedesk_core::{PlannerError, Result};

use crate::comments::add_comment;
use crate::events::{add_owner, schedule_event};
use crate::state::AppState;
use crate::users::create_user;

/// Stored for every seeded account. Not a real hash; seeded accounts are
/// for local exploration only.
pub const SEED_PASSWORD_HASH: &str = "$seed$not-a-real-hash";

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Margaret", "Ken", "Radia", "Dennis",
];
const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Knuth", "Hamilton", "Thompson",
    "Perlman", "Ritchie",
];

/// What a seeding run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub users: usize,
    pub events: usize,
    pub shared: usize,
    pub comments: usize,
}

/// `count` lowercase pseudo-words of 3 to 8 letters.
pub fn random_words(rng: &mut impl Rng, count: usize) -> String {
    (0..count)
        .map(|_| {
            let len = rng.random_range(3..=8);
            (0..len)
                .map(|_| rng.random_range(b'a'..=b'z') as char)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A random minute of `year`, UTC.
pub fn random_deadline(rng: &mut impl Rng, year: i32) -> Result<Timestamp> {
    let month = rng.random_range(1..=12);
    let last_day = days_in_month(year, month).unwrap_or(28);
    let date = DateParts {
        year,
        month,
        day: rng.random_range(1..=last_day),
    };
    let time = TimeParts {
        hours: rng.random_range(0..24),
        minutes: rng.random_range(0..60),
    };
    Ok(to_timestamp(date, time)?)
}

fn random_draft(rng: &mut impl Rng, year: i32) -> Result<EventDraft> {
    let title_words = rng.random_range(1..=4);
    let description_words = rng.random_range(5..=15);
    EventDraft::new(
        &random_words(rng, title_words),
        &random_words(rng, description_words),
        rng.random_range(MIN_PRIORITY as i64..=MAX_PRIORITY as i64),
        random_deadline(rng, year)?,
    )
}

/// Seeds with an OS-seeded generator.
pub async fn seed(state: &AppState) -> Result<SeedReport> {
    let mut rng = StdRng::from_os_rng();
    seed_with(state, &mut rng).await
}

/// Seeds using the given generator. Users that already exist are skipped.
pub async fn seed_with(state: &AppState, rng: &mut StdRng) -> Result<SeedReport> {
    let user_count = state.config.seed_users;
    let events_per_user = state.config.seed_events_per_user;
    let year = Utc::now().year();
    let mut report = SeedReport::default();

    let usernames: Vec<String> = (1..=user_count).map(|i| format!("user{i}")).collect();

    for (i, username) in usernames.iter().enumerate() {
        let first = FIRST_NAMES[i % FIRST_NAMES.len()];
        let last = LAST_NAMES[i % LAST_NAMES.len()];

        let user = match create_user(state, username, SEED_PASSWORD_HASH, first, last).await {
            Ok(user) => user,
            Err(PlannerError::InvalidArgument(message)) => {
                tracing::warn!(%username, %message, "Skipping existing seed user");
                continue;
            }
            Err(e) => return Err(e),
        };
        report.users += 1;

        let calendar_id = user
            .calendars
            .first()
            .map(|c| c.id.to_string())
            .ok_or_else(|| {
                PlannerError::StoreInconsistency(format!("User '{username}' has no calendar."))
            })?;
        // Share with the previous user, who is already stored.
        let friend = i.checked_sub(1).map(|j| usernames[j].as_str());

        for n in 0..events_per_user {
            let draft = random_draft(rng, year)?;
            let event = schedule_event(state, username, &calendar_id, draft).await?;
            let event_id = event.id.to_string();
            report.events += 1;

            if let Some(friend) = friend.filter(|_| n % 2 == 0) {
                add_owner(state, &event_id, friend, username).await?;
                report.shared += 1;
            }

            let words = rng.random_range(3..=12);
            add_comment(state, &event_id, username, &random_words(rng, words), Utc::now())
                .await?;
            report.comments += 1;
        }
    }

    tracing::info!(
        users = report.users,
        events = report.events,
        shared = report.shared,
        comments = report.comments,
        "Seeded demo data"
    );
    Ok(report)
}
