//! Eventide integration test support.
//!
//! Fixtures shared by the cross-crate integration tests.

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use eventide_core::boundary::DateBound;
use eventide_core::types::Repeat;
use eventide_query::Event;
use eventide_rule::{OccurrenceRule, Timing};

/// ## Summary
/// UTC timestamp at the top of the given hour.
///
/// ## Panics
/// Panics if the date is invalid.
#[must_use]
pub fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid fixture timestamp {y}-{mo}-{d} {h}:00"))
}

/// ## Panics
/// Panics if the date is invalid.
#[must_use]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_else(|| panic!("invalid fixture date {y}-{m}-{d}"))
}

/// Calendar-date window boundary.
#[must_use]
pub fn day(y: i32, m: u32, d: u32) -> Option<DateBound> {
    Some(DateBound::Date(date(y, m, d)))
}

/// Precise window boundary.
#[must_use]
pub fn instant(dt: DateTime<Utc>) -> Option<DateBound> {
    Some(DateBound::DateTime(dt))
}

/// ## Summary
/// Builds a valid rule lasting `hours` from `start`.
///
/// ## Panics
/// Panics if the timing breaks a rule invariant.
#[must_use]
pub fn rule<P>(
    start: DateTime<Utc>,
    hours: i64,
    repeat: Option<Repeat>,
    repeat_until: Option<NaiveDate>,
    payload: P,
) -> OccurrenceRule<P> {
    let timing = Timing {
        start,
        end: start + TimeDelta::hours(hours),
        repeat,
        repeat_until,
    };
    OccurrenceRule::new(timing, payload)
        .unwrap_or_else(|err| panic!("invalid fixture rule starting {start}: {err}"))
}

/// ## Summary
/// A mixed collection of events covering every kind of rule: single,
/// bounded and open-ended repeats, overnight spans and a rule that repeats
/// past the instance cap.
#[must_use]
pub fn sample_calendar() -> Vec<Event<&'static str>> {
    vec![
        Event::new("Kickoff").with_rule(rule(at(2021, 1, 4, 10), 2, None, None, "kickoff")),
        Event::new("Standup").with_rule(rule(
            at(2021, 1, 4, 9),
            1,
            Some(Repeat::Weekly),
            Some(date(2021, 3, 29)),
            "standup",
        )),
        Event::new("Night shift").with_rule(rule(
            at(2021, 1, 1, 22),
            6,
            Some(Repeat::Daily),
            Some(date(2021, 1, 20)),
            "night",
        )),
        Event::new("Board")
            .with_rule(rule(at(2020, 11, 2, 14), 3, Some(Repeat::Monthly), None, "board"))
            .with_rule(rule(at(2021, 2, 15, 9), 8, None, None, "board-offsite")),
        Event::new("Anniversary").with_rule(rule(
            at(2015, 6, 1, 18),
            4,
            Some(Repeat::Yearly),
            None,
            "anniversary",
        )),
        Event::new("Heartbeat").with_rule(rule(
            at(2020, 1, 1, 0),
            1,
            Some(Repeat::Daily),
            None,
            "heartbeat",
        )),
        Event::new("Archived").with_rule(rule(at(2019, 5, 5, 12), 1, None, None, "archived")),
        Event::new("Empty"),
    ]
}
