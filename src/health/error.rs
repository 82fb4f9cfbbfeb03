//! Tool input error type

use thiserror::Error;

/// A tool argument string that could not be turned into calculator input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolInputError {
    #[error("expected {expected} comma-separated fields ({format}), got {found}")]
    WrongFieldCount {
        expected: usize,
        found: usize,
        format: &'static str,
    },
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be greater than zero, got {value:?}")]
    OutOfRange { field: &'static str, value: String },
    #[error("{field} is too large, got {value:?}")]
    TooLarge { field: &'static str, value: String },
    #[error("age, weight and height give a non-positive calorie estimate; check that they are realistic")]
    ImplausibleBody,
}
