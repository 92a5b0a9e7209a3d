//! # DomainError
//!
//! Centralized error handling for Inkpot.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type shared by services and adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Resource not found (e.g., Post, User)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// A required field was missing or blank
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The current identity may not perform this action
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource already exists (e.g., duplicate email or post title)
    #[error("conflict: {0}")]
    Conflict(String),

    /// The outbound mail relay rejected or never answered the request
    #[error("mail relay error: {0}")]
    Relay(String),

    /// Infrastructure failure (e.g., database unavailable)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound(entity.to_owned(), id.to_string())
    }
}

/// A specialized Result type for Inkpot logic.
pub type Result<T> = std::result::Result<T, DomainError>;
