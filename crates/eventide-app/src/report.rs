//! Plain-text output, one line per row, tab separated.

use std::io::{self, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use eventide_query::{Event, Occurring};
use eventide_rule::Occurrence;

use crate::calendar::Listing;

fn timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Writes `start  end  title` for each occurrence and returns how many rows
/// were written.
///
/// ## Errors
/// Returns any error from `out`.
pub fn write_occurrences<'a>(
    out: &mut impl Write,
    occurrences: impl IntoIterator<Item = Occurrence<'a, Listing>>,
) -> io::Result<usize> {
    let mut rows = 0;
    for occ in occurrences {
        writeln!(
            out,
            "{}\t{}\t{}",
            timestamp(occ.start),
            timestamp(occ.end),
            occ.payload.title
        )?;
        rows += 1;
    }
    Ok(rows)
}

/// Writes `title  next-start` for each event, with `-` when there is none.
///
/// ## Errors
/// Returns any error from `out`.
pub fn write_next<'a>(
    out: &mut impl Write,
    rows: impl IntoIterator<Item = (&'a Event<Listing>, Option<Occurrence<'a, Listing>>)>,
) -> io::Result<()> {
    for (event, next) in rows {
        match next {
            Some(occ) => writeln!(out, "{}\t{}", event.title(), timestamp(occ.start))?,
            None => writeln!(out, "{}\t-", event.title())?,
        }
    }
    Ok(())
}

/// Writes `id  title  rule-count` for each event.
///
/// ## Errors
/// Returns any error from `out`.
pub fn write_events<'a>(
    out: &mut impl Write,
    events: impl IntoIterator<Item = &'a Event<Listing>>,
) -> io::Result<()> {
    for event in events {
        writeln!(out, "{}\t{}\t{}", event.id(), event.title(), event.rules().len())?;
    }
    Ok(())
}
