use thiserror::Error;

use crate::domain::vote::VoteRejection;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    /// Operation attempted outside the state that allows it
    /// (e.g. voting outside an election window).
    #[error("Invalid state: {0}")]
    State(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Vote rejected: {0}")]
    VoteRejected(VoteRejection),

    #[error("Database error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Whether this error is likely transient (lock contention, pool exhaustion)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            DomainError::Storage(msg) => {
                let msg = msg.to_ascii_lowercase();
                msg.contains("database is locked")
                    || msg.contains("busy")
                    || msg.contains("pool timed out")
            }
            _ => false,
        }
    }
}

impl From<VoteRejection> for DomainError {
    fn from(rejection: VoteRejection) -> Self {
        DomainError::VoteRejected(rejection)
    }
}

/// Startup and configuration failures
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_contention_is_transient() {
        let err = DomainError::Storage("error returned from database: database is locked".into());
        assert!(err.is_transient());
    }

    #[test]
    fn constraint_errors_are_not_transient() {
        assert!(!DomainError::Conflict("username".into()).is_transient());
        assert!(!DomainError::Storage("no such table: votes".into()).is_transient());
        assert!(!DomainError::VoteRejected(VoteRejection::AlreadyVoted).is_transient());
    }

    #[test]
    fn not_found_message_names_entity() {
        let err = DomainError::not_found("Election", "id", 42);
        assert_eq!(err.to_string(), "Not found: Election with id=42");
    }
}
