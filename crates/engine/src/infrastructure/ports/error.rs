//! Error types for port operations.

/// Repository operation errors with context for debugging.
///
/// Absence is not an error: lookups and mutations report it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Store-level constraint violated (duplicate key, failed conditional write).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl RepoError {
    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Create a ConstraintViolation error.
    pub fn constraint(message: impl ToString) -> Self {
        Self::ConstraintViolation(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_error_carries_operation() {
        let err = RepoError::database("sqlite.find_one", "disk I/O error");
        assert_eq!(
            err.to_string(),
            "Database error in sqlite.find_one: disk I/O error"
        );
    }

    #[test]
    fn constraint_violation_keeps_message() {
        let err = RepoError::constraint("id 7 already exists");
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
        assert_eq!(err.to_string(), "Constraint violation: id 7 already exists");
    }
}
