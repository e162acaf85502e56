//! Expansion of a single occurrence rule into concrete instances.
//!
//! ## Summary
//! A non-repeating rule yields its own span when its start lies inside the
//! window. A repeating rule walks its schedule from the first start, capped at
//! [`REPEAT_MAX`] generated starts, and yields every start inside the window.
//! The window's lower edge is moved back by the rule's duration so that
//! instances overlapping the window from before are kept.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use eventide_core::boundary::{DateBound, as_datetime, end_of_day};
use eventide_core::constants::REPEAT_MAX;
use rrule::RRuleSet;

use crate::rule::OccurrenceRule;

/// One concrete instance of a rule.
#[derive(Debug, PartialEq, Eq)]
pub struct Occurrence<'a, P> {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub payload: &'a P,
}

impl<P> Occurrence<'_, P> {
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

impl<P> Clone for Occurrence<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Occurrence<'_, P> {}

type ScheduleIter<'a> = <&'a RRuleSet as IntoIterator>::IntoIter;

enum Source<'a> {
    Single(Option<DateTime<Utc>>),
    Repeating {
        starts: ScheduleIter<'a>,
        /// Sub-second part of the rule's start, dropped by the schedule.
        subsec: TimeDelta,
        generated: u16,
        lower: Option<DateTime<Utc>>,
        upper: Option<DateTime<Utc>>,
    },
    Finished,
}

/// Lazy, start-ordered instances of one rule.
///
/// Nothing past what has been pulled is generated. The sequence cannot be
/// rewound; expand the rule again to start over.
pub struct Occurrences<'a, P> {
    source: Source<'a>,
    duration: TimeDelta,
    payload: &'a P,
}

impl<P> OccurrenceRule<P> {
    /// ## Summary
    /// Expands this rule into the instances starting inside `[from, to]`.
    ///
    /// `from` widens to the start of its day and `to` to the end of its day.
    /// For repeating rules `repeat_until` further caps the upper edge, and the
    /// lower edge is moved back by the rule's duration.
    #[must_use]
    pub fn expand(&self, from: Option<DateBound>, to: Option<DateBound>) -> Occurrences<'_, P> {
        let from = as_datetime(from, false);
        let to = as_datetime(to, true);
        let duration = self.duration();

        let source = if let Some(schedule) = self.schedule() {
            let until = self.repeat_until().map(end_of_day);
            let upper = match (to, until) {
                (Some(to), Some(until)) => Some(to.min(until)),
                (to, until) => to.or(until),
            };
            let lower = from.map(|from| from - duration);

            tracing::trace!(
                rule_start = %self.start(),
                repeat = ?self.repeat(),
                lower = ?lower,
                upper = ?upper,
                "Expanding repeating rule"
            );

            Source::Repeating {
                starts: schedule.into_iter(),
                subsec: self.start() - self.start().trunc_subsecs(0),
                generated: 0,
                lower,
                upper,
            }
        } else {
            let start = self.start();
            let inside = from.is_none_or(|from| start >= from) && to.is_none_or(|to| start <= to);
            Source::Single(inside.then_some(start))
        };

        Occurrences {
            source,
            duration,
            payload: self.payload(),
        }
    }
}

impl<'a, P> Iterator for Occurrences<'a, P> {
    type Item = Occurrence<'a, P>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = match &mut self.source {
            Source::Single(start) => start.take(),
            Source::Repeating {
                starts,
                subsec,
                generated,
                lower,
                upper,
            } => loop {
                if *generated >= REPEAT_MAX {
                    break None;
                }
                let Some(start) = starts.next() else {
                    break None;
                };
                *generated += 1;

                let start = start.with_timezone(&Utc) + *subsec;
                if lower.is_some_and(|lower| start < lower) {
                    continue;
                }
                if upper.is_some_and(|upper| start > upper) {
                    break None;
                }
                break Some(start);
            },
            Source::Finished => None,
        };

        let Some(start) = start else {
            self.source = Source::Finished;
            return None;
        };

        Some(Occurrence {
            start,
            end: start + self.duration,
            payload: self.payload,
        })
    }
}

impl<P> std::iter::FusedIterator for Occurrences<'_, P> {}
