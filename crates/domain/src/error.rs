//! Domain error type.

use thiserror::Error;

/// Errors raised while building or checking character records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field holds a value outside its allowed range.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A required field was absent from the input.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl DomainError {
    /// Creates a validation error for a field value that breaks an invariant.
    ///
    /// # Example
    /// ```ignore
    /// if level < 1 {
    ///     return Err(DomainError::validation("level must be at least 1"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField(field)
    }
}
