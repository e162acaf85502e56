//! JSON calendar files.
//!
//! ## Summary
//! A calendar file lists events, each with a title, an optional UUID and
//! the occurrence rules it owns:
//!
//! ```json
//! { "events": [ { "title": "Standup", "occurrences": [
//!     { "start": "2021-01-04T09:00:00Z", "end": "2021-01-04T09:15:00Z",
//!       "repeat": "weekly", "repeat_until": "2021-03-29" } ] } ] }
//! ```
//!
//! Every rule is validated while loading, so a loaded calendar never holds
//! an invalid rule.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use eventide_core::types::Repeat;
use eventide_query::Event;
use eventide_rule::{OccurrenceRule, Timing};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Payload carried by every rule loaded from a calendar file.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// Title of the owning event, repeated so each instance can be printed
    /// on its own.
    pub title: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CalendarFile {
    events: Vec<EventEntry>,
}

#[derive(Debug, Deserialize)]
struct EventEntry {
    #[serde(default)]
    id: Option<Uuid>,
    title: String,
    #[serde(default)]
    occurrences: Vec<OccurrenceEntry>,
}

#[derive(Debug, Deserialize)]
struct OccurrenceEntry {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    #[serde(default)]
    repeat: Option<Repeat>,
    #[serde(default)]
    repeat_until: Option<NaiveDate>,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct Calendar {
    events: Vec<Event<Listing>>,
}

impl Calendar {
    /// ## Summary
    /// Reads and validates the calendar file at `path`.
    ///
    /// ## Errors
    /// Returns an error if the file cannot be read, is not a valid calendar
    /// document, or holds an invalid occurrence rule.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let calendar = Self::from_json(&contents)?;

        tracing::info!(
            path = %path.display(),
            events = calendar.events.len(),
            "Calendar loaded"
        );
        Ok(calendar)
    }

    /// ## Summary
    /// Parses and validates a calendar document.
    ///
    /// ## Errors
    /// Returns [`AppError::Json`] for malformed documents and
    /// [`AppError::InvalidOccurrence`] for rules that break an invariant.
    pub fn from_json(contents: &str) -> AppResult<Self> {
        let file: CalendarFile = serde_json::from_str(contents)?;
        let events = file
            .events
            .into_iter()
            .map(EventEntry::into_event)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self { events })
    }

    #[must_use]
    pub fn events(&self) -> &[Event<Listing>] {
        &self.events
    }
}

impl EventEntry {
    fn into_event(self) -> AppResult<Event<Listing>> {
        let mut event = match self.id {
            Some(id) => Event::with_id(id, self.title.clone()),
            None => Event::new(self.title.clone()),
        };

        for (index, entry) in self.occurrences.into_iter().enumerate() {
            let timing = Timing {
                start: entry.start,
                end: entry.end,
                repeat: entry.repeat,
                repeat_until: entry.repeat_until,
            };
            let listing = Listing {
                title: self.title.clone(),
                data: entry.data,
            };

            let rule = OccurrenceRule::new(timing, listing).map_err(|source| {
                AppError::InvalidOccurrence {
                    event: self.title.clone(),
                    index,
                    source,
                }
            })?;
            event.add_rule(rule);
        }

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use eventide_query::Occurring;
    use eventide_rule::error::RuleViolation;

    const TEAM: &str = r#"{
        "events": [
            {
                "id": "0190f3a4-7c1e-7d2a-9b3c-4d5e6f708192",
                "title": "Standup",
                "occurrences": [
                    {
                        "start": "2021-01-04T09:00:00Z",
                        "end": "2021-01-04T09:15:00Z",
                        "repeat": "weekly",
                        "repeat_until": "2021-01-25",
                        "data": { "room": "A" }
                    }
                ]
            },
            { "title": "Unscheduled" }
        ]
    }"#;

    #[test_log::test]
    fn test_from_json() {
        let calendar = Calendar::from_json(TEAM).unwrap();
        let events = calendar.events();
        assert_eq!(events.len(), 2);

        let standup = &events[0];
        assert_eq!(standup.id().to_string(), "0190f3a4-7c1e-7d2a-9b3c-4d5e6f708192");
        assert_eq!(standup.title(), "Standup");

        let rule = &standup.rules()[0];
        assert_eq!(rule.repeat(), Some(Repeat::Weekly));
        assert_eq!(rule.repeat_until(), NaiveDate::from_ymd_opt(2021, 1, 25));
        assert_eq!(rule.payload().title, "Standup");
        assert_eq!(rule.payload().data["room"], "A");
        assert_eq!(standup.all_occurrences(None, None, None).count(), 4);

        assert!(events[1].rules().is_empty());
    }

    #[test]
    fn test_invalid_occurrence_is_reported() {
        let doc = r#"{ "events": [ { "title": "Backwards", "occurrences": [
            { "start": "2021-01-04T10:00:00Z", "end": "2021-01-04T09:00:00Z" } ] } ] }"#;

        match Calendar::from_json(doc) {
            Err(AppError::InvalidOccurrence { event, index, source }) => {
                assert_eq!(event, "Backwards");
                assert_eq!(index, 0);
                assert_eq!(source.violation(), Some(RuleViolation::EndNotAfterStart));
            }
            other => panic!("expected an invalid occurrence, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_repeat_is_rejected() {
        let doc = r#"{ "events": [ { "title": "Odd", "occurrences": [
            { "start": "2021-01-04T09:00:00Z", "end": "2021-01-04T10:00:00Z",
              "repeat": "fortnightly" } ] } ] }"#;
        assert!(matches!(Calendar::from_json(doc), Err(AppError::Json(_))));
    }

    #[test]
    fn test_default_payload_data_is_null() {
        let doc = r#"{ "events": [ { "title": "Once", "occurrences": [
            { "start": "2021-01-04T09:00:00Z", "end": "2021-01-04T10:00:00Z" } ] } ] }"#;
        let calendar = Calendar::from_json(doc).unwrap();
        let rule = &calendar.events()[0].rules()[0];
        assert!(rule.payload().data.is_null());
        assert_eq!(rule.start(), Utc.with_ymd_and_hms(2021, 1, 4, 9, 0, 0).unwrap());
    }
}
