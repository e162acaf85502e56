//! The capability shared by everything that produces occurrences.

use chrono::Utc;
use eventide_core::boundary::DateBound;
use eventide_rule::{Occurrence, OccurrenceRule};

/// A boxed, start-ordered occurrence sequence.
pub type OccurrenceStream<'a, P> = Box<dyn Iterator<Item = Occurrence<'a, P>> + 'a>;

/// A record backed by stored occurrence rules that can expand into instances.
///
/// Bare rules and events both implement this, so period filtering and the
/// collection queries are written once for either kind of record.
pub trait Occurring {
    type Payload;

    /// Stored rules the record's approximate filtering runs against.
    fn rules(&self) -> &[OccurrenceRule<Self::Payload>];

    /// All instances inside `[from, to]`, in start order.
    fn occurrences(
        &self,
        from: Option<DateBound>,
        to: Option<DateBound>,
    ) -> OccurrenceStream<'_, Self::Payload>;

    /// ## Summary
    /// The first instance inside `[from, to]`, with `from` defaulting to now.
    fn next_occurrence(
        &self,
        from: Option<DateBound>,
        to: Option<DateBound>,
    ) -> Option<Occurrence<'_, Self::Payload>> {
        let from = from.unwrap_or_else(|| DateBound::from(Utc::now()));
        self.occurrences(Some(from), to).next()
    }
}

impl<P> Occurring for OccurrenceRule<P> {
    type Payload = P;

    fn rules(&self) -> &[OccurrenceRule<P>] {
        std::slice::from_ref(self)
    }

    fn occurrences(&self, from: Option<DateBound>, to: Option<DateBound>) -> OccurrenceStream<'_, P> {
        Box::new(self.expand(from, to))
    }
}
