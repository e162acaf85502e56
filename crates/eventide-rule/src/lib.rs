//! Occurrence rules and their expansion into concrete, time-ordered instances.

pub mod error;
pub mod expand;
pub mod merge;
pub mod rule;

pub use expand::{Occurrence, Occurrences};
pub use merge::{Merge, MergeKey, combine_occurrences};
pub use rule::{OccurrenceRule, Timing};
