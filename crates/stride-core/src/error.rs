//! Error types for the goal engine.
//!
//! Every failure that leaves the core is a [`GoalError`]. Each variant
//! belongs to exactly one [`ErrorKind`], which decides whether the retry
//! helper may repeat the operation and which message template the
//! presentation layer shows.

use std::fmt;
use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Comprehensive error type for all goal operations.
#[derive(Error, Debug)]
pub enum GoalError {
    /// No user is signed in; store calls are refused up front
    #[error("Not authenticated: sign in to access your goals")]
    NotAuthenticated,
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Network, timeout or store-unavailable failures outside SQLite
    #[error("Temporary failure: {message}")]
    Transient { message: String },
    /// Stored data could not be interpreted
    #[error("Data integrity error: {message}")]
    DataIntegrity { message: String },
    /// Goal not found for the given ID
    #[error("Goal with ID {id} not found")]
    GoalNotFound { id: u64 },
    /// Day plan not found for the given goal and day number
    #[error("Day {day} of goal {goal_id} not found")]
    DayNotFound { goal_id: u64, day: u32 },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// The roadmap generator failed or returned an unusable payload
    #[error("Roadmap generation failed: {cause}")]
    Generation { cause: String },
    /// The operation was cancelled by its caller
    #[error("Operation cancelled")]
    Cancelled,
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Classification of a [`GoalError`] used for retry and presentation
/// decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No user context; prompt for sign-in, never retry
    NotAuthenticated,
    /// I/O, timeout, busy store; safe to retry with backoff
    Transient,
    /// Corrupt or inconsistent stored data; retrying reproduces it
    DataIntegrity,
    /// Bad input, bad configuration or schema-invalid generator payload;
    /// nothing was written
    Validation,
    /// The addressed goal or day does not exist
    NotFound,
    /// Deliberate cancellation; must not be mistaken for a failure
    Cancelled,
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> GoalError {
        GoalError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> GoalError {
        GoalError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl GoalError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a data integrity error.
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::DataIntegrity {
            message: message.into(),
        }
    }

    /// Creates a transient error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    /// Creates a generation failure with a human-readable cause.
    pub fn generation(cause: impl Into<String>) -> Self {
        Self::Generation {
            cause: cause.into(),
        }
    }

    /// Returns the taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAuthenticated => ErrorKind::NotAuthenticated,
            Self::Database { source, .. } => match source.sqlite_error_code() {
                Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => ErrorKind::Transient,
                Some(ErrorCode::CannotOpen | ErrorCode::SystemIoFailure) => ErrorKind::Transient,
                _ => ErrorKind::DataIntegrity,
            },
            Self::Transient { .. } | Self::FileSystem { .. } => ErrorKind::Transient,
            Self::DataIntegrity { .. } | Self::Serialization { .. } => ErrorKind::DataIntegrity,
            Self::GoalNotFound { .. } | Self::DayNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidInput { .. } | Self::Generation { .. } => ErrorKind::Validation,
            Self::XdgDirectory(_) | Self::Configuration { .. } => ErrorKind::Validation,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether repeating the failed operation may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    /// Fixed, user-facing message for this error's kind.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::NotAuthenticated => "You are signed out. Sign in again to continue.".into(),
            ErrorKind::Transient => {
                "Could not reach your goals right now. Check your connection and try again.".into()
            }
            ErrorKind::DataIntegrity => {
                format!("Your saved progress looks inconsistent ({self}).")
            }
            ErrorKind::Validation => match self {
                Self::Generation { cause } => format!("Could not create a roadmap: {cause}"),
                _ => self.to_string(),
            },
            ErrorKind::NotFound => self.to_string(),
            ErrorKind::Cancelled => "Cancelled.".into(),
        }
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T, E> {
    /// Add context to any error type, converting to GoalError.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GoalError::Configuration {
            message: format!("{}: {}", context, e),
        })
    }
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| GoalError::database(message).with_source(e))
    }
}

/// Result type alias for goal operations
pub type Result<T> = std::result::Result<T, GoalError>;
