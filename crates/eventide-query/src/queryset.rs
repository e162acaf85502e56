//! In-memory query sets over borrowed records.
//!
//! ## Summary
//! A `QuerySet` is a selection of records from a backing slice, addressed by
//! their position (the record key). Filtering narrows the selection and never
//! touches the records themselves, so several query sets can read the same
//! records at once.

use std::collections::HashSet;

use crate::expr::Expr;
use crate::occurring::Occurring;

pub struct QuerySet<'a, R> {
    records: &'a [R],
    selected: Vec<usize>,
}

impl<R> Clone for QuerySet<'_, R> {
    fn clone(&self) -> Self {
        Self {
            records: self.records,
            selected: self.selected.clone(),
        }
    }
}

impl<R> std::fmt::Debug for QuerySet<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySet")
            .field("total", &self.records.len())
            .field("selected", &self.selected)
            .finish()
    }
}

impl<'a, R> QuerySet<'a, R> {
    /// Selects every record in `records`.
    #[must_use]
    pub fn new(records: &'a [R]) -> Self {
        Self {
            records,
            selected: (0..records.len()).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Keys of the selected records, in selection order.
    #[must_use]
    pub fn keys(&self) -> &[usize] {
        &self.selected
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.entries().map(|(_, record)| record)
    }

    pub fn entries(&self) -> impl Iterator<Item = (usize, &'a R)> + '_ {
        let records = self.records;
        self.selected.iter().map(move |&key| (key, &records[key]))
    }

    /// Drops the records whose key is in `keys`.
    #[must_use]
    pub fn exclude(mut self, keys: &[usize]) -> Self {
        if !keys.is_empty() {
            let excluded: HashSet<usize> = keys.iter().copied().collect();
            self.selected.retain(|key| !excluded.contains(key));
        }
        self
    }

    /// Removes repeated selections of the same record, keeping the first.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        let mut seen = HashSet::with_capacity(self.selected.len());
        self.selected.retain(|key| seen.insert(*key));
        self
    }
}

impl<R: Occurring> QuerySet<'_, R> {
    /// ## Summary
    /// Keeps the records with at least one stored rule matching `expr`.
    #[must_use]
    pub fn filter(mut self, expr: &Expr) -> Self {
        let records = self.records;
        let before = self.selected.len();
        self.selected
            .retain(|&key| records[key].rules().iter().any(|rule| expr.matches(rule)));

        tracing::trace!(%expr, before, after = self.selected.len(), "Applied filter");
        self
    }
}

impl<'a, R> From<&'a [R]> for QuerySet<'a, R> {
    fn from(records: &'a [R]) -> Self {
        Self::new(records)
    }
}

impl<'a, R> From<&'a Vec<R>> for QuerySet<'a, R> {
    fn from(records: &'a Vec<R>) -> Self {
        Self::new(records)
    }
}
