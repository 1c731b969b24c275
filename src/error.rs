use thiserror::Error;

/// Menu input that could not be turned into an option index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSelection {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("{choice} is not between 1 and {count}")]
    OutOfRange { choice: usize, count: usize },
}

/// Standard input ran dry while a menu was waiting for an answer.
#[derive(Debug, Error)]
#[error("input stream closed")]
pub struct InputClosed;
