//! The occurrence rule model and its edit-time validation.

use chrono::{DateTime, NaiveDate, SubsecRound, TimeDelta, Utc};
use eventide_core::constants::REPEAT_MAX;
use eventide_core::types::Repeat;
use rrule::{Frequency, RRule, RRuleSet, Tz, Unvalidated};

use crate::error::{RuleError, RuleResult, RuleViolation};

/// The timing half of an occurrence rule: its first span and how it repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timing {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub repeat: Option<Repeat>,
    /// Last calendar date on which a repeated instance may start.
    pub repeat_until: Option<NaiveDate>,
}

impl Timing {
    /// Creates a non-repeating timing.
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            repeat: None,
            repeat_until: None,
        }
    }

    #[must_use]
    pub const fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = Some(repeat);
        self
    }

    #[must_use]
    pub const fn with_repeat_until(mut self, repeat_until: NaiveDate) -> Self {
        self.repeat_until = Some(repeat_until);
        self
    }

    /// ## Summary
    /// Checks the rule invariants, reporting the first one violated.
    ///
    /// ## Errors
    /// Returns the violated invariant when `end <= start`, when `repeat_until`
    /// is set without `repeat`, or when `repeat_until` precedes the date of `start`.
    pub fn check(&self) -> Result<(), RuleViolation> {
        if self.start >= self.end {
            return Err(RuleViolation::EndNotAfterStart);
        }

        if self.repeat_until.is_some() && self.repeat.is_none() {
            return Err(RuleViolation::RepeatIntervalRequired);
        }

        if self
            .repeat_until
            .is_some_and(|until| until < self.start.date_naive())
        {
            return Err(RuleViolation::RepeatUntilBeforeStart);
        }

        Ok(())
    }

    /// Length of every instance derived from this timing.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// A validated start/end span with an optional repetition pattern.
///
/// Construction and every edit re-check the invariants, so expansion can
/// assume a well-formed rule. The payload is carried through untouched to
/// every generated instance.
#[derive(Debug, Clone)]
pub struct OccurrenceRule<P = ()> {
    timing: Timing,
    payload: P,
    schedule: Option<RRuleSet>,
}

impl<P> OccurrenceRule<P> {
    /// ## Summary
    /// Validates `timing` and builds a rule owning `payload`.
    ///
    /// ## Errors
    /// Returns [`RuleError::Invalid`] naming the violated invariant, or
    /// [`RuleError::Recurrence`] if the repetition pattern cannot be built.
    pub fn new(timing: Timing, payload: P) -> RuleResult<Self> {
        let schedule = build_schedule(&timing)?;
        Ok(Self {
            timing,
            payload,
            schedule,
        })
    }

    /// ## Summary
    /// Applies `change` to a copy of the timing and keeps it only if the
    /// result is still valid.
    ///
    /// ## Errors
    /// Returns the validation failure; the rule is left unchanged.
    pub fn edit(&mut self, change: impl FnOnce(&mut Timing)) -> RuleResult<()> {
        let mut timing = self.timing;
        change(&mut timing);
        self.schedule = build_schedule(&timing)?;
        self.timing = timing;
        Ok(())
    }

    #[must_use]
    pub const fn timing(&self) -> &Timing {
        &self.timing
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.timing.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.timing.end
    }

    #[must_use]
    pub const fn repeat(&self) -> Option<Repeat> {
        self.timing.repeat
    }

    #[must_use]
    pub const fn repeat_until(&self) -> Option<NaiveDate> {
        self.timing.repeat_until
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.timing.duration()
    }

    #[must_use]
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    /// Splits the rule back into its timing and payload.
    pub fn into_parts(self) -> (Timing, P) {
        (self.timing, self.payload)
    }

    /// Repetition schedule, present exactly when `repeat` is set.
    pub(crate) const fn schedule(&self) -> Option<&RRuleSet> {
        self.schedule.as_ref()
    }
}

impl<P: PartialEq> PartialEq for OccurrenceRule<P> {
    fn eq(&self, other: &Self) -> bool {
        self.timing == other.timing && self.payload == other.payload
    }
}

const fn frequency(repeat: Repeat) -> Frequency {
    match repeat {
        Repeat::Daily => Frequency::Daily,
        Repeat::Weekly => Frequency::Weekly,
        Repeat::Monthly => Frequency::Monthly,
        Repeat::Yearly => Frequency::Yearly,
    }
}

/// Validates `timing` and, for repeating rules, builds the capped schedule.
fn build_schedule(timing: &Timing) -> RuleResult<Option<RRuleSet>> {
    if let Err(violation) = timing.check() {
        tracing::debug!(
            start = %timing.start,
            end = %timing.end,
            repeat = ?timing.repeat,
            repeat_until = ?timing.repeat_until,
            %violation,
            "Occurrence rule failed validation"
        );
        return Err(violation.into());
    }

    let Some(repeat) = timing.repeat else {
        return Ok(None);
    };

    // Candidates are whole seconds; expansion adds the fraction back.
    let schedule = RRule::<Unvalidated>::new(frequency(repeat))
        .count(u32::from(REPEAT_MAX))
        .build(timing.start.trunc_subsecs(0).with_timezone(&Tz::UTC))
        .map_err(|err| RuleError::Recurrence(err.to_string()))?;

    tracing::trace!(schedule = %schedule, "Built repetition schedule");
    Ok(Some(schedule))
}
