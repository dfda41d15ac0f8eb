//! duedesk CLI entry point.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duedesk::cli::{Cli, Commands, OutputFormat};
use duedesk::config::Config;
use duedesk::error::exit_code;
use duedesk::output::{format_output, json, pretty};
use duedesk::state::AppState;
use duedesk::{calendars, comments, events, search, seed, users};
use duedesk_core::calendar::EventForm;
use duedesk_core::PlannerError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = Config::from_env();
    if let Some(path) = &cli.sqlite_path {
        config.sqlite_path = path.clone();
    }
    let state = open_state(&cli, config).await?;

    match run(&cli, &state).await {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast::<PlannerError>() {
            Ok(err) if err.is_no_results() => {
                println!("{err}");
                Ok(())
            }
            Ok(err) => {
                match cli.format {
                    OutputFormat::Json => eprintln!("{}", json::format_error(&err)),
                    OutputFormat::Pretty => eprintln!("{err}"),
                }
                std::process::exit(exit_code(&err));
            }
            Err(other) => Err(other),
        },
    }
}

fn init_tracing(log_json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "duedesk=info,duedesk_core=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so command output stays machine readable.
    if log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(feature = "inmemory")]
async fn memory_state(config: Config) -> Result<AppState> {
    let state = AppState::in_memory(config);
    seed::seed(&state).await.context("Failed to seed the in-memory store")?;
    Ok(state)
}

#[cfg(not(feature = "inmemory"))]
async fn memory_state(_config: Config) -> Result<AppState> {
    anyhow::bail!("--memory needs the 'inmemory' feature")
}

#[cfg(feature = "sqlite")]
async fn persistent_state(config: Config) -> Result<AppState> {
    AppState::sqlite(config).await
}

#[cfg(not(feature = "sqlite"))]
async fn persistent_state(config: Config) -> Result<AppState> {
    tracing::warn!("Built without the 'sqlite' feature, data will not persist");
    memory_state(config).await
}

async fn open_state(cli: &Cli, config: Config) -> Result<AppState> {
    if cli.memory {
        memory_state(config).await
    } else {
        persistent_state(config).await
    }
}

fn print<T: Serialize>(value: &T, format: OutputFormat, pretty: impl FnOnce(&T) -> String) {
    println!("{}", format_output(value, format, pretty));
}

async fn run(cli: &Cli, state: &AppState) -> Result<()> {
    let format = cli.format;

    match &cli.command {
        Commands::Seed => {
            let report = seed::seed(state).await?;
            print(&report, format, pretty::format_seed_report);
        }
        Commands::Agenda => {
            let found = events::list_user_events(state, cli.accessor()?).await?;
            print(&found, format, |e| pretty::format_events(e));
        }
        Commands::Users(cmd) => {
            use duedesk::cli::users::UsersAction;
            match &cmd.action {
                UsersAction::Create {
                    username,
                    password_hash,
                    first_name,
                    last_name,
                } => {
                    let user =
                        users::create_user(state, username, password_hash, first_name, last_name)
                            .await?;
                    print(&user, format, |u| format!("Created:\n{}", pretty::format_user(u)));
                }
                UsersAction::Get { username } => {
                    let username = match username {
                        Some(username) => username.as_str(),
                        None => cli.accessor()?,
                    };
                    let user = users::get_user(state, username).await?;
                    print(&user, format, pretty::format_user);
                }
                UsersAction::Rename {
                    first_name,
                    last_name,
                } => {
                    let user =
                        users::change_name(state, cli.accessor()?, first_name, last_name).await?;
                    print(&user, format, |u| format!("Updated:\n{}", pretty::format_user(u)));
                }
                UsersAction::Password { password_hash } => {
                    users::change_password(state, cli.accessor()?, password_hash).await?;
                    println!("Password updated");
                }
            }
        }
        Commands::Calendars(cmd) => {
            use duedesk::cli::calendars::CalendarsAction;
            let accessor = cli.accessor()?;
            match &cmd.action {
                CalendarsAction::Create { title } => {
                    let calendar = calendars::create_calendar(state, accessor, title).await?;
                    print(&calendar, format, |c| {
                        format!("Created:\n{}", pretty::format_calendar(c))
                    });
                }
                CalendarsAction::Get { id } => {
                    let calendar = calendars::get_calendar(state, id, accessor).await?;
                    print(&calendar, format, pretty::format_calendar);
                }
                CalendarsAction::AddEvent {
                    calendar_id,
                    event_id,
                } => {
                    let calendar =
                        calendars::add_event_to_calendar(state, calendar_id, event_id, accessor)
                            .await?;
                    print(&calendar, format, pretty::format_calendar);
                }
                CalendarsAction::RemoveEvent { event_id } => {
                    let changed =
                        calendars::remove_event_from_calendars(state, event_id, accessor).await?;
                    print(&changed, format, |n| {
                        format!("Removed event {event_id} from {n} user(s) calendars")
                    });
                }
                CalendarsAction::Month {
                    calendar_id,
                    year,
                    month,
                } => {
                    let days =
                        calendars::calendar_month(state, calendar_id, *year, *month, accessor)
                            .await?;
                    print(&days, format, |d| pretty::format_month(d));
                }
            }
        }
        Commands::Events(cmd) => {
            use duedesk::cli::events::EventsAction;
            let accessor = cli.accessor()?;
            match &cmd.action {
                EventsAction::Create { fields, calendar } => {
                    let draft = EventForm::from(fields.clone()).into_draft()?;
                    let event = match calendar {
                        Some(calendar_id) => {
                            events::schedule_event(state, accessor, calendar_id, draft).await?
                        }
                        None => events::create_event(state, accessor, draft).await?,
                    };
                    print(&event, format, |e| format!("Created:\n{}", pretty::format_event(e)));
                }
                EventsAction::Get { id } => {
                    let event = events::get_event(state, id, accessor).await?;
                    print(&event, format, pretty::format_event);
                }
                EventsAction::Edit { id, fields } => {
                    let draft = EventForm::from(fields.clone()).into_draft()?;
                    let event = events::edit_event(state, id, accessor, draft).await?;
                    print(&event, format, |e| format!("Updated:\n{}", pretty::format_event(e)));
                }
                EventsAction::Delete { id } => {
                    let event = events::delete_event(state, id, accessor).await?;
                    print(&event, format, |e| format!("Deleted event {}", e.id));
                }
                EventsAction::AddOwner { id, username } => {
                    let event = events::add_owner(state, id, username, accessor).await?;
                    print(&event, format, pretty::format_event);
                }
                EventsAction::RemoveOwner { id, username } => {
                    let event = events::remove_owner(state, id, username, accessor).await?;
                    print(&event, format, pretty::format_event);
                }
            }
        }
        Commands::Comments(cmd) => {
            use duedesk::cli::comments::CommentsAction;
            let accessor = cli.accessor()?;
            match &cmd.action {
                CommentsAction::Add { event_id, text } => {
                    let comment =
                        comments::add_comment(state, event_id, accessor, text, Utc::now()).await?;
                    print(&comment, format, pretty::format_comment);
                }
                CommentsAction::Get { id } => {
                    let comment = comments::get_comment(state, id, accessor).await?;
                    print(&comment, format, pretty::format_comment);
                }
                CommentsAction::Event { id } => {
                    let event = comments::get_event_from_comment(state, id, accessor).await?;
                    print(&event, format, pretty::format_event);
                }
                CommentsAction::Delete { id } => {
                    let comment = comments::delete_comment(state, id, accessor).await?;
                    print(&comment, format, |c| format!("Deleted comment {}", c.id));
                }
            }
        }
        Commands::Search(cmd) => {
            use duedesk::cli::search::SearchAction;
            let accessor = cli.accessor()?;
            let found = match &cmd.action {
                SearchAction::Query {
                    search_type,
                    term,
                    order,
                } => search::filter_events(state, search_type, term, order, accessor).await?,
                SearchAction::Priority { priority, order } => {
                    search::filter_event_priority(state, priority, order, accessor).await?
                }
                SearchAction::Date { date, order } => {
                    search::filter_event_date(state, date, order, accessor).await?
                }
            };
            print(&found, format, |e| pretty::format_events(e));
        }
    }

    Ok(())
}
