//! Date-or-datetime window boundaries.
//!
//! ## Summary
//! Query windows accept either a precise timestamp or a calendar date. A
//! timestamp is used as-is; a date widens to the start of the day for lower
//! bounds and to 23:59:59 for upper bounds.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{END_OF_DAY, START_OF_DAY};
use crate::error::CoreError;

/// A window boundary given either as a timestamp or as a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateBound {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

impl DateBound {
    /// ## Summary
    /// Widens this boundary to a precise timestamp.
    ///
    /// Dates become 00:00:00 when `end` is false and 23:59:59 when `end` is true.
    #[must_use]
    pub fn as_datetime(self, end: bool) -> DateTime<Utc> {
        match self {
            Self::DateTime(dt) => dt,
            Self::Date(date) if end => end_of_day(date),
            Self::Date(date) => start_of_day(date),
        }
    }

    /// Widens to a lower bound.
    #[must_use]
    pub fn lower(self) -> DateTime<Utc> {
        self.as_datetime(false)
    }

    /// Widens to an upper bound.
    #[must_use]
    pub fn upper(self) -> DateTime<Utc> {
        self.as_datetime(true)
    }
}

impl From<DateTime<Utc>> for DateBound {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }
}

impl From<NaiveDate> for DateBound {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl std::fmt::Display for DateBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Date(date) => write!(f, "{date}"),
        }
    }
}

impl std::str::FromStr for DateBound {
    type Err = CoreError;

    /// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` (read as UTC)
    /// and `YYYY-MM-DD` dates.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::DateTime(dt.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Self::DateTime(naive.and_utc()));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self::Date)
            .map_err(|err| CoreError::ParseError(format!("invalid date or datetime {s:?}: {err}")))
    }
}

/// ## Summary
/// Midnight at the start of `date`, in UTC.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(START_OF_DAY).and_utc()
}

/// ## Summary
/// The last whole second of `date` (23:59:59), in UTC.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(END_OF_DAY).and_utc()
}

/// ## Summary
/// Normalises an optional boundary, see [`DateBound::as_datetime`].
#[must_use]
pub fn as_datetime(bound: Option<DateBound>, end: bool) -> Option<DateTime<Utc>> {
    bound.map(|bound| bound.as_datetime(end))
}
