use thiserror::Error;

/// Core-level errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Parse error: {0}")]
    ParseError(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
