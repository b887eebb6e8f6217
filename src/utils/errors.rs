//! Error handling for Courtside
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the Courtside application
#[derive(Error, Debug)]
pub enum CourtsideError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid slot key: {0}")]
    InvalidSlotKey(String),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Maximum {max} players per booking")]
    MaxPlayers { max: usize },

    #[error("Invalid code")]
    InvalidCode,

    #[error("Duplicate scan: user {user_id} was already scanned in the last 24 hours")]
    DuplicateScan { user_id: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Mail delivery error: {0}")]
    Mail(String),

    /// Permanent refusal by the mail provider; resending will not help
    #[error("Mail rejected: {0}")]
    MailRejected(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Courtside operations
pub type Result<T> = std::result::Result<T, CourtsideError>;

impl CourtsideError {
    /// Shorthand for a `NotFound` error
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CourtsideError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            CourtsideError::Database(_) => false,
            CourtsideError::Migration(_) => false,
            CourtsideError::Config(_) => false,
            CourtsideError::Unauthorized(_) => false,
            CourtsideError::PermissionDenied(_) => false,
            CourtsideError::NotFound { .. } => false,
            CourtsideError::InvalidInput(_) => false,
            CourtsideError::InvalidSlotKey(_) => false,
            CourtsideError::SlotUnavailable(_) => false,
            CourtsideError::MaxPlayers { .. } => false,
            CourtsideError::InvalidCode => false,
            CourtsideError::DuplicateScan { .. } => false,
            CourtsideError::Conflict(_) => false,
            CourtsideError::Mail(_) => true,
            CourtsideError::MailRejected(_) => false,
            CourtsideError::Http(_) => true,
            CourtsideError::Token(_) => false,
            CourtsideError::PasswordHash(_) => false,
            CourtsideError::Serialization(_) => false,
            CourtsideError::Io(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CourtsideError::Database(_) => ErrorSeverity::Critical,
            CourtsideError::Migration(_) => ErrorSeverity::Critical,
            CourtsideError::Config(_) => ErrorSeverity::Critical,
            CourtsideError::Unauthorized(_) => ErrorSeverity::Warning,
            CourtsideError::PermissionDenied(_) => ErrorSeverity::Warning,
            CourtsideError::NotFound { .. }
            | CourtsideError::InvalidInput(_)
            | CourtsideError::InvalidSlotKey(_)
            | CourtsideError::SlotUnavailable(_)
            | CourtsideError::MaxPlayers { .. }
            | CourtsideError::InvalidCode
            | CourtsideError::DuplicateScan { .. }
            | CourtsideError::Conflict(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// True for failures caused by infrastructure rather than by the caller
    pub fn is_internal(&self) -> bool {
        matches!(self.severity(), ErrorSeverity::Error | ErrorSeverity::Critical)
    }
}

/// Postgres SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// Check whether a database error is a unique constraint violation
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
