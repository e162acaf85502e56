//! Filter expressions over the stored fields of occurrence rules.
//!
//! ## Summary
//! A small boolean expression language in the shape of a SQL `WHERE` clause:
//! comparisons and null tests on indexed fields, combined with `AND`, `OR` and
//! `NOT`. Evaluation is three-valued, so comparing a null field is unknown and
//! only expressions that evaluate to true select a row.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use eventide_core::boundary::end_of_day;
use eventide_core::types::Repeat;
use eventide_rule::OccurrenceRule;

/// Indexed fields of a stored occurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Start,
    End,
    Repeat,
    RepeatUntil,
    /// Latest moment a repeated instance can end: the end of the
    /// `repeat_until` day plus the rule's duration. Null unless both
    /// `repeat` and `repeat_until` are set.
    RepeatHorizon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Repeat(Repeat),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Compare { field: Field, op: Op, value: Value },
    IsNull(Field),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Repeat => "repeat",
            Self::RepeatUntil => "repeat_until",
            Self::RepeatHorizon => "repeat_horizon",
        }
    }

    /// The stored value of this field on `rule`, `None` when null.
    #[must_use]
    pub fn value_of<P>(self, rule: &OccurrenceRule<P>) -> Option<Value> {
        match self {
            Self::Start => Some(Value::Timestamp(rule.start())),
            Self::End => Some(Value::Timestamp(rule.end())),
            Self::Repeat => rule.repeat().map(Value::Repeat),
            Self::RepeatUntil => rule.repeat_until().map(Value::Date),
            Self::RepeatHorizon => {
                rule.repeat()?;
                rule.repeat_until()
                    .map(|until| Value::Timestamp(end_of_day(until) + rule.duration()))
            }
        }
    }

    #[must_use]
    pub fn is(self, value: impl Into<Value>) -> Expr {
        self.compare(Op::Eq, value)
    }

    #[must_use]
    pub fn lt(self, value: impl Into<Value>) -> Expr {
        self.compare(Op::Lt, value)
    }

    #[must_use]
    pub fn le(self, value: impl Into<Value>) -> Expr {
        self.compare(Op::Le, value)
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Value>) -> Expr {
        self.compare(Op::Gt, value)
    }

    #[must_use]
    pub fn ge(self, value: impl Into<Value>) -> Expr {
        self.compare(Op::Ge, value)
    }

    #[must_use]
    pub const fn is_null(self) -> Expr {
        Expr::IsNull(self)
    }

    #[must_use]
    pub fn is_not_null(self) -> Expr {
        !Expr::IsNull(self)
    }

    fn compare(self, op: Op, value: impl Into<Value>) -> Expr {
        Expr::Compare {
            field: self,
            op,
            value: value.into(),
        }
    }
}

impl Value {
    /// Orders two values of compatible kinds. A date compared with a
    /// timestamp is compared against the timestamp's calendar date.
    fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(&b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(&b)),
            (Self::Date(a), Self::Timestamp(b)) => Some(a.cmp(&b.date_naive())),
            (Self::Timestamp(a), Self::Date(b)) => Some(a.date_naive().cmp(&b)),
            (Self::Repeat(a), Self::Repeat(b)) => (a == b).then_some(Ordering::Equal),
            _ => None,
        }
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<Repeat> for Value {
    fn from(value: Repeat) -> Self {
        Self::Repeat(value)
    }
}

impl Op {
    const fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => matches!(ordering, Ordering::Equal),
            Self::Lt => matches!(ordering, Ordering::Less),
            Self::Le => !matches!(ordering, Ordering::Greater),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Ge => !matches!(ordering, Ordering::Less),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl Expr {
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Whether `rule` is selected by this expression.
    #[must_use]
    pub fn matches<P>(&self, rule: &OccurrenceRule<P>) -> bool {
        self.evaluate(rule) == Some(true)
    }

    /// Three-valued evaluation; `None` is SQL's unknown.
    fn evaluate<P>(&self, rule: &OccurrenceRule<P>) -> Option<bool> {
        match self {
            Self::Compare { field, op, value } => {
                let stored = field.value_of(rule)?;
                stored.compare(*value).map(|ordering| op.holds(ordering))
            }
            Self::IsNull(field) => Some(field.value_of(rule).is_none()),
            Self::Not(inner) => inner.evaluate(rule).map(|value| !value),
            Self::And(left, right) => match (left.evaluate(rule), right.evaluate(rule)) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
            Self::Or(left, right) => match (left.evaluate(rule), right.evaluate(rule)) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
        }
    }
}

impl std::ops::Not for Expr {
    type Output = Self;

    fn not(self) -> Self {
        Self::Not(Box::new(self))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timestamp(dt) => write!(f, "'{}'", dt.to_rfc3339()),
            Self::Date(date) => write!(f, "'{date}'"),
            Self::Repeat(repeat) => write!(f, "'{repeat}'"),
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compare { field, op, value } => {
                write!(f, "{} {} {value}", field.as_str(), op.as_str())
            }
            Self::IsNull(field) => write!(f, "{} IS NULL", field.as_str()),
            Self::Not(inner) => write!(f, "NOT ({inner})"),
            Self::And(left, right) => write!(f, "({left} AND {right})"),
            Self::Or(left, right) => write!(f, "({left} OR {right})"),
        }
    }
}
