use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use eventide_core::boundary::DateBound;

/// Top-level CLI parser for the `eventide` binary.
#[derive(Debug, Parser)]
#[command(name = "eventide", version, about = "Query the occurrences of repeating calendar events")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Calendar file (defaults to `calendar.path` from the configuration)
    #[arg(short, long, global = true)]
    pub calendar: Option<PathBuf>,

    #[command(flatten)]
    pub window: Window,
}

#[derive(Clone, Copy, Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Every occurrence in the window, across all events, in start order.
    Occurrences,
    /// The next occurrence of each event.
    Next,
    /// Events ordered by their next occurrence.
    Agenda,
    /// Events that may occur in the window.
    Events,
}

/// Query window shared by every command.
#[derive(Clone, Copy, Debug, Default, Args)]
pub struct Window {
    /// Lower bound: a date (`2021-01-31`) or an RFC 3339 timestamp
    #[arg(long, global = true)]
    pub from: Option<DateBound>,

    /// Upper bound: a date (widened to 23:59:59) or an RFC 3339 timestamp
    #[arg(long, global = true)]
    pub to: Option<DateBound>,

    /// Max occurrences to list
    #[arg(short, long, global = true)]
    pub limit: Option<usize>,

    /// Expand every candidate event to drop those with no occurrence in the
    /// window (slow on large calendars)
    #[arg(long, global = true)]
    pub exact: bool,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn window_flags_parse_around_subcommand() {
        let cli = Cli::try_parse_from([
            "eventide",
            "--calendar",
            "team.json",
            "occurrences",
            "--from",
            "2021-01-31",
            "--to",
            "2021-02-01T12:00:00Z",
            "--limit",
            "5",
        ])
        .expect("cli should parse");

        assert_eq!(cli.command, Command::Occurrences);
        assert_eq!(cli.calendar, Some(PathBuf::from("team.json")));
        assert_eq!(
            cli.window.from,
            Some(DateBound::Date(NaiveDate::from_ymd_opt(2021, 1, 31).unwrap()))
        );
        assert!(matches!(cli.window.to, Some(DateBound::DateTime(_))));
        assert_eq!(cli.window.limit, Some(5));
        assert!(!cli.window.exact);
    }

    #[test]
    fn bad_bound_is_rejected() {
        let result = Cli::try_parse_from(["eventide", "events", "--from", "yesterday"]);
        assert!(result.is_err());
    }

    #[test]
    fn exact_flag() {
        let cli = Cli::try_parse_from(["eventide", "events", "--exact"]).unwrap();
        assert_eq!(cli.command, Command::Events);
        assert!(cli.window.exact);
    }
}
