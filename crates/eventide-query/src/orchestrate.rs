//! Occurrence queries across a whole collection.

use chrono::{DateTime, Utc};
use eventide_core::boundary::DateBound;
use eventide_rule::{Merge, Occurrence};

use crate::occurring::{OccurrenceStream, Occurring};
use crate::queryset::QuerySet;

impl<'a, R: Occurring> QuerySet<'a, R> {
    /// ## Summary
    /// Every instance inside `[from, to]` across the collection, in start
    /// order, capped at `limit` when given.
    ///
    /// Records are first narrowed with the approximate period filter, then
    /// each survivor is expanded lazily and the streams are merged.
    #[must_use]
    pub fn all_occurrences(
        &self,
        from: Option<DateBound>,
        to: Option<DateBound>,
        limit: Option<usize>,
    ) -> Merge<OccurrenceStream<'a, R::Payload>> {
        let candidates = self.clone().for_period(from, to, false);
        let streams: Vec<_> = candidates
            .iter()
            .map(|record| record.occurrences(from, to))
            .collect();

        Merge::new(streams, limit)
    }

    /// ## Summary
    /// The earliest instance inside `[from, to]` across the collection, with
    /// `from` defaulting to now.
    #[must_use]
    pub fn next_occurrence(
        &self,
        from: Option<DateBound>,
        to: Option<DateBound>,
    ) -> Option<Occurrence<'a, R::Payload>> {
        let from = from.unwrap_or_else(|| DateBound::from(Utc::now()));
        self.all_occurrences(Some(from), to, Some(1)).next()
    }

    /// ## Summary
    /// Records ordered by their next occurrence after `from` (default now).
    /// Records with no next occurrence are left out.
    ///
    /// The whole collection is expanded up front, so this returns a list
    /// rather than a query set.
    #[must_use]
    pub fn sort_by_next(&self, from: Option<DateBound>) -> Vec<&'a R> {
        let from = from.unwrap_or_else(|| DateBound::from(Utc::now()));

        let mut upcoming: Vec<(DateTime<Utc>, &'a R)> = self
            .iter()
            .filter_map(|record| {
                record
                    .next_occurrence(Some(from), None)
                    .map(|occ| (occ.start, record))
            })
            .collect();
        upcoming.sort_by_key(|(start, _)| *start);

        tracing::debug!(
            records = self.len(),
            upcoming = upcoming.len(),
            "Sorted records by next occurrence"
        );

        upcoming.into_iter().map(|(_, record)| record).collect()
    }
}
