//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! Every variant maps to a stable code so clients can branch on the kind
//! without parsing messages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Bad input shape (malformed date, empty title, ...)
    #[error("Validation error: {0}")]
    Validation(String),
    /// Missing user/task/reward/claim, named by entity
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Credentials missing or wrong
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Caller lacks the capability for this operation
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// Requested status equals the current one
    #[error("Already updated to {0}")]
    AlreadyInStatus(String),
    /// Record already left the pending state
    #[error("Already resolved as {0}")]
    AlreadyResolved(String),
    /// User already holds a live claim on the same catalog task
    #[error("Already claimed: {0}")]
    AlreadyClaimed(String),
    /// Recurring religion tasks already exist for the period
    #[error("Already generated: {0}")]
    AlreadyGenerated(String),
    /// Operation clashes with existing records
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Reward is out of stock")]
    OutOfStock,
    #[error("Insufficient balance: {required} points required, {available} available")]
    InsufficientBalance { required: i64, available: i64 },
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
    /// File storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Machine-readable kind exposed alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "VALIDATION_ERROR",
            DomainError::NotFound(_) => "NOT_FOUND",
            DomainError::Unauthorized(_) => "UNAUTHORIZED",
            DomainError::Forbidden(_) => "FORBIDDEN",
            DomainError::AlreadyInStatus(_) => "ALREADY_IN_STATUS",
            DomainError::AlreadyResolved(_) => "ALREADY_RESOLVED",
            DomainError::AlreadyClaimed(_) => "ALREADY_CLAIMED",
            DomainError::AlreadyGenerated(_) => "ALREADY_GENERATED",
            DomainError::Conflict(_) => "CONFLICT",
            DomainError::OutOfStock => "OUT_OF_STOCK",
            DomainError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            DomainError::Database(_) => "PERSISTENCE_ERROR",
            DomainError::Storage(_) => "STORAGE_ERROR",
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_per_kind() {
        let errors = [
            DomainError::validation("x"),
            DomainError::NotFound("user"),
            DomainError::Unauthorized("x".into()),
            DomainError::Forbidden("x".into()),
            DomainError::AlreadyInStatus("Diterima".into()),
            DomainError::AlreadyResolved("Ditolak".into()),
            DomainError::AlreadyClaimed("x".into()),
            DomainError::AlreadyGenerated("x".into()),
            DomainError::Conflict("x".into()),
            DomainError::OutOfStock,
            DomainError::InsufficientBalance {
                required: 2,
                available: 1,
            },
            DomainError::Database("x".into()),
            DomainError::Storage("x".into()),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_messages_are_human_readable() {
        assert_eq!(DomainError::NotFound("reward").to_string(), "reward not found");
        assert_eq!(
            DomainError::InsufficientBalance {
                required: 600,
                available: 400
            }
            .to_string(),
            "Insufficient balance: 600 points required, 400 available"
        );
    }
}
