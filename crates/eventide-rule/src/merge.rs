//! K-way merge of independently ordered occurrence streams.

use chrono::{DateTime, Utc};

use crate::expand::Occurrence;

/// Items that can be merged by a comparable key.
pub trait MergeKey {
    type Key: Ord + ?Sized;

    fn merge_key(&self) -> &Self::Key;
}

impl<P> MergeKey for Occurrence<'_, P> {
    type Key = DateTime<Utc>;

    fn merge_key(&self) -> &DateTime<Utc> {
        &self.start
    }
}

impl<K: Ord, V> MergeKey for (K, V) {
    type Key = K;

    fn merge_key(&self) -> &K {
        &self.0
    }
}

impl<K: Ord, V, W> MergeKey for (K, V, W) {
    type Key = K;

    fn merge_key(&self) -> &K {
        &self.0
    }
}

/// Merges ordered sources into one ordered sequence.
///
/// Holds one buffered head per active source. Each step yields the smallest
/// head (the earliest source wins ties) and refills it from its source; a
/// source is dropped once exhausted. Stops after `limit` items if given.
pub struct Merge<I: Iterator> {
    heads: Vec<(I::Item, I)>,
    remaining: Option<usize>,
}

impl<I> Merge<I>
where
    I: Iterator,
    I::Item: MergeKey,
{
    pub fn new(sources: impl IntoIterator<Item = I>, limit: Option<usize>) -> Self {
        let heads: Vec<_> = sources
            .into_iter()
            .filter_map(|mut source| source.next().map(|head| (head, source)))
            .collect();

        tracing::trace!(active = heads.len(), limit = ?limit, "Merging sources");

        Self {
            heads,
            remaining: limit,
        }
    }

    /// Number of sources that still have items buffered.
    #[must_use]
    pub fn active(&self) -> usize {
        self.heads.len()
    }
}

impl<I> Iterator for Merge<I>
where
    I: Iterator,
    I::Item: MergeKey,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) || self.heads.is_empty() {
            return None;
        }

        let mut earliest = 0;
        for (index, (head, _)) in self.heads.iter().enumerate().skip(1) {
            if head.merge_key() < self.heads[earliest].0.merge_key() {
                earliest = index;
            }
        }

        let refill = self.heads[earliest].1.next();
        let item = match refill {
            Some(next) => std::mem::replace(&mut self.heads[earliest].0, next),
            None => self.heads.remove(earliest).0,
        };

        if let Some(remaining) = &mut self.remaining {
            *remaining -= 1;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let buffered = self.heads.len();
        match self.remaining {
            Some(remaining) => (buffered.min(remaining), Some(remaining)),
            None => (buffered, None),
        }
    }
}

/// ## Summary
/// Merges per-rule or per-record occurrence streams in start order, yielding
/// at most `limit` occurrences when a limit is given.
pub fn combine_occurrences<'a, P, I>(
    sources: impl IntoIterator<Item = I>,
    limit: Option<usize>,
) -> Merge<I>
where
    P: 'a,
    I: Iterator<Item = Occurrence<'a, P>>,
{
    Merge::new(sources, limit)
}
