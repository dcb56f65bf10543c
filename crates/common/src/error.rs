//! Error types for redsocial.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Integrity Errors ===
    /// A unique constraint was violated. The payload names the violated
    /// field (`email`, `username`) or the follow pair.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// A foreign key target does not exist.
    #[error("Dangling reference: {0}")]
    DanglingReference(String),

    /// Operation on a nonexistent id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Privacy value outside the allowed set.
    #[error("Invalid enum value: {0}")]
    InvalidEnumValue(String),

    // === Follow Graph Errors ===
    /// A user attempted to follow themselves.
    #[error("Cannot follow yourself")]
    SelfFollow,

    /// An active follow edge for the pair already exists.
    #[error("Already following")]
    AlreadyFollowing,

    /// No active follow edge exists for the pair.
    #[error("Not following")]
    NotFollowing,

    /// An external caller attempted to decrement a counter below zero.
    #[error("Counter underflow: {0}")]
    CounterUnderflow(String),

    // === Ambient Errors ===
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the stable error code reported to the external layer.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateKey(_) => "DUPLICATE_KEY",
            Self::DanglingReference(_) => "DANGLING_REFERENCE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidEnumValue(_) => "INVALID_ENUM_VALUE",
            Self::SelfFollow => "SELF_FOLLOW",
            Self::AlreadyFollowing => "ALREADY_FOLLOWING",
            Self::NotFollowing => "NOT_FOLLOWING",
            Self::CounterUnderflow(_) => "COUNTER_UNDERFLOW",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error was caused by the caller's request
    /// (as opposed to a store or configuration failure).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Self::Database(_) | Self::Config(_) | Self::Internal(_)
        )
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
