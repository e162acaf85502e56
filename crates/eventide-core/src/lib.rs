//! Shared building blocks for occurrence expansion: date boundaries,
//! the repetition vocabulary, configuration and core errors.

pub mod boundary;
pub mod config;
pub mod constants;
pub mod error;
pub mod types;
