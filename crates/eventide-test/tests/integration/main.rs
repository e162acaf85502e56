//! Cross-crate integration tests.

mod properties;
mod scenarios;
