//! Events: records owning one or more occurrence rules.

use chrono::{DateTime, Utc};
use eventide_core::boundary::DateBound;
use eventide_rule::error::RuleResult;
use eventide_rule::{Merge, OccurrenceRule, Timing};
use uuid::Uuid;

use crate::occurring::{OccurrenceStream, Occurring};
use crate::queryset::QuerySet;

/// An event and the occurrence rules it owns.
///
/// The event's occurrence stream is the start-ordered merge of its rules'
/// expansions. Rules are kept ordered by `(start, end)`, so instances with
/// equal starts come from the earlier rule first. Rules are dropped with the
/// event.
#[derive(Debug, Clone)]
pub struct Event<P = ()> {
    id: Uuid,
    title: String,
    rules: Vec<OccurrenceRule<P>>,
}

impl<P> Event<P> {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::now_v7(), title)
    }

    #[must_use]
    pub fn with_id(id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_rule(mut self, rule: OccurrenceRule<P>) -> Self {
        self.add_rule(rule);
        self
    }

    /// Inserts `rule` after every rule ordered at or before it.
    pub fn add_rule(&mut self, rule: OccurrenceRule<P>) {
        let key = order_key(&rule);
        let at = self.rules.partition_point(|existing| order_key(existing) <= key);
        self.rules.insert(at, rule);
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// ## Summary
    /// Edits the rule at `index` through [`OccurrenceRule::edit`], then
    /// restores the rule order. Returns `None` when there is no such rule.
    ///
    /// ## Errors
    /// The inner result carries the validation failure; the rule is left
    /// unchanged.
    pub fn edit_rule(
        &mut self,
        index: usize,
        change: impl FnOnce(&mut Timing),
    ) -> Option<RuleResult<()>> {
        let rule = self.rules.get_mut(index)?;
        if let Err(err) = rule.edit(change) {
            return Some(Err(err));
        }
        self.rules.sort_by_key(order_key);
        Some(Ok(()))
    }

    /// ## Summary
    /// All instances of this event inside `[from, to]`, in start order, capped
    /// at `limit` when given.
    #[must_use]
    pub fn all_occurrences(
        &self,
        from: Option<DateBound>,
        to: Option<DateBound>,
        limit: Option<usize>,
    ) -> Merge<OccurrenceStream<'_, P>> {
        QuerySet::new(&self.rules).all_occurrences(from, to, limit)
    }
}

fn order_key<P>(rule: &OccurrenceRule<P>) -> (DateTime<Utc>, DateTime<Utc>) {
    (rule.start(), rule.end())
}

impl<P> Occurring for Event<P> {
    type Payload = P;

    fn rules(&self) -> &[OccurrenceRule<P>] {
        &self.rules
    }

    fn occurrences(&self, from: Option<DateBound>, to: Option<DateBound>) -> OccurrenceStream<'_, P> {
        Box::new(self.all_occurrences(from, to, None))
    }
}
