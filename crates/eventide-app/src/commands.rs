//! Runs one CLI command against a loaded calendar.

use std::io::Write;

use eventide_core::config::Settings;
use eventide_query::{Occurring, QuerySet};

use crate::calendar::Calendar;
use crate::cli::{Cli, Command, Window};
use crate::error::{AppError, AppResult};
use crate::report;

/// ## Summary
/// Resolves the calendar file from the CLI or configuration, loads it and
/// runs the requested command, writing rows to `out`.
///
/// ## Errors
/// Returns an error if no calendar file is configured, the file cannot be
/// loaded, or writing fails.
pub fn run(cli: &Cli, settings: &Settings, out: &mut impl Write) -> AppResult<()> {
    let path = cli
        .calendar
        .clone()
        .or_else(|| settings.calendar.path.clone().map(Into::into))
        .ok_or_else(|| {
            AppError::Usage("no calendar file: pass --calendar or set calendar.path".to_string())
        })?;

    let calendar = Calendar::load(&path)?;

    let mut window = cli.window;
    if window.limit.is_none() {
        window.limit = settings.calendar.limit;
    }

    execute(cli.command, &window, &calendar, out)
}

/// ## Summary
/// Runs `command` over `calendar` with the given query window.
///
/// ## Errors
/// Returns any error from `out`.
pub fn execute(
    command: Command,
    window: &Window,
    calendar: &Calendar,
    out: &mut impl Write,
) -> AppResult<()> {
    let events = QuerySet::new(calendar.events());
    tracing::debug!(?command, ?window, events = events.len(), "Running command");

    match command {
        Command::Occurrences => {
            let candidates = if window.exact {
                events.for_period(window.from, window.to, true)
            } else {
                events
            };
            let occurrences = candidates.all_occurrences(window.from, window.to, window.limit);
            let rows = report::write_occurrences(out, occurrences)?;
            tracing::info!(rows, "Listed occurrences");
        }
        Command::Next => {
            let rows = events
                .for_period(window.from, window.to, window.exact)
                .iter()
                .map(|event| (event, event.next_occurrence(window.from, window.to)))
                .collect::<Vec<_>>();
            report::write_next(out, rows)?;
        }
        Command::Agenda => {
            let rows = events
                .sort_by_next(window.from)
                .into_iter()
                .map(|event| (event, event.next_occurrence(window.from, None)));
            report::write_next(out, rows)?;
        }
        Command::Events => {
            let matching = events.for_period(window.from, window.to, window.exact);
            report::write_events(out, matching.iter())?;
        }
    }

    Ok(())
}
