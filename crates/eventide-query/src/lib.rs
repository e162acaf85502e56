//! Period filtering and occurrence queries over collections of events and
//! occurrence rules.

pub mod event;
pub mod expr;
pub mod occurring;
pub mod orchestrate;
pub mod period;
pub mod queryset;

pub use event::Event;
pub use expr::{Expr, Field};
pub use occurring::{OccurrenceStream, Occurring};
pub use queryset::QuerySet;
