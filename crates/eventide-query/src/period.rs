//! Filtering collections down to the records that can occur in a period.
//!
//! ## Summary
//! The approximate phase only reads stored, indexed fields and may keep
//! records with no instance in the window, but never drops one that has an
//! instance. The exact phase expands every survivor and drops the ones that
//! produce nothing; it is opt-in because it is slow on large collections.

use chrono::{DateTime, Utc};
use eventide_core::boundary::DateBound;

use crate::expr::{Expr, Field};
use crate::occurring::Occurring;
use crate::queryset::QuerySet;

/// ## Summary
/// Stored-field predicate for records that may start on or before `to`.
#[must_use]
pub fn starts_by(to: DateTime<Utc>) -> Expr {
    Field::Start.le(to)
}

/// ## Summary
/// Stored-field predicate for records that may still be running at `from`:
/// the stored span ends at or after `from`, or the rule repeats forever, or
/// its last repeated instance can end at or after `from`.
#[must_use]
pub fn ends_after(from: DateTime<Utc>) -> Expr {
    let still_repeating = Field::RepeatUntil.is_null().or(Field::RepeatHorizon.ge(from));
    Field::End
        .ge(from)
        .or(Field::Repeat.is_not_null().and(still_repeating))
}

impl<R: Occurring> QuerySet<'_, R> {
    /// ## Summary
    /// Narrows the collection to records with instances inside `[from, to]`.
    ///
    /// Without `exact` the result is a superset built from stored fields only.
    /// With `exact` every remaining record is expanded and kept only if it
    /// yields at least one instance, which can be very slow.
    #[must_use]
    pub fn for_period(self, from: Option<DateBound>, to: Option<DateBound>, exact: bool) -> Self {
        let total = self.len();
        let mut filtered = self;

        if let Some(to) = to {
            filtered = filtered.filter(&starts_by(to.upper())).distinct();
        }

        if let Some(from) = from {
            filtered = filtered.filter(&ends_after(from.lower())).distinct();
        }

        tracing::debug!(
            total,
            approximate = filtered.len(),
            from = ?from,
            to = ?to,
            "Approximate period filter applied"
        );

        if exact {
            filtered = filtered.filter_invalid(from, to);
        }

        filtered
    }

    /// Drops the records that have no instance inside `[from, to]`.
    fn filter_invalid(self, from: Option<DateBound>, to: Option<DateBound>) -> Self {
        let invalid: Vec<usize> = self
            .entries()
            .filter(|(_, record)| record.occurrences(from, to).next().is_none())
            .map(|(key, _)| key)
            .collect();

        tracing::debug!(
            candidates = self.len(),
            excluded = invalid.len(),
            "Exact period filter applied"
        );

        self.exclude(&invalid)
    }
}
