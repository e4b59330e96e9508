//! Error types for the todo storage core.
//!
//! # Design
//! Every failure a `TodoStore` can report is classified into exactly one
//! `ErrorKind`, so the HTTP surface can map it to a stable status code
//! without inspecting backend details. `NotFound` gets a dedicated variant
//! because a malformed id and an unknown id are the same outcome for the
//! caller. Backend-internal error text is kept in `BackendError` as the
//! `source()` of `StoreError::BackendUnavailable` and never appears in the
//! top-level message.

use thiserror::Error;

/// Convenience alias for storage port results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Stable classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing required input. Never retried.
    ValidationFailure,
    /// The id does not resolve to a live record. Never retried.
    NotFound,
    /// The storage engine could not be reached or failed unexpectedly.
    /// The caller may retry; the core never does.
    BackendUnavailable,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ValidationFailure => "validation_failure",
            ErrorKind::NotFound => "not_found",
            ErrorKind::BackendUnavailable => "backend_unavailable",
        }
    }
}

/// Request fields known to the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Completed,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Completed => "completed",
        }
    }
}

/// Input rejected before it reached storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("request body is not valid JSON")]
    InvalidJson,

    #[error("request body must be a JSON object")]
    BodyNotObject,

    #[error("`{}` is required", .0.as_str())]
    MissingField(Field),

    #[error("`{}` must be a {expected}", .field.as_str())]
    WrongType {
        field: Field,
        expected: &'static str,
    },

    #[error("`title` must not be empty")]
    EmptyTitle,

    #[error("request body exceeds the size limit")]
    BodyTooLarge,

    /// The transport failed before the whole body arrived.
    #[error("request body could not be read")]
    BodyUnreadable,
}

impl ValidationError {
    /// Machine-readable reason code, stable across releases.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::InvalidJson => "invalid_json",
            ValidationError::BodyNotObject => "body_not_object",
            ValidationError::MissingField(Field::Title) => "title_required",
            ValidationError::MissingField(Field::Completed) => "completed_required",
            ValidationError::WrongType {
                field: Field::Title,
                ..
            } => "title_not_string",
            ValidationError::WrongType {
                field: Field::Completed,
                ..
            } => "completed_not_boolean",
            ValidationError::EmptyTitle => "title_empty",
            ValidationError::BodyTooLarge => "body_too_large",
            ValidationError::BodyUnreadable => "body_unreadable",
        }
    }
}

/// Low-level failure raised by a storage engine.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The blocking task running a statement panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A persisted record does not satisfy the record invariants.
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

/// Errors returned by every `TodoStore` operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("todo not found: {id}")]
    NotFound { id: String },

    #[error("storage backend unavailable")]
    BackendUnavailable(#[source] BackendError),
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound { id: id.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation(_) => ErrorKind::ValidationFailure,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::BackendUnavailable(_) => ErrorKind::BackendUnavailable,
        }
    }

    /// Machine-readable reason code for the failure.
    pub fn reason(&self) -> &'static str {
        match self {
            StoreError::Validation(err) => err.reason(),
            StoreError::NotFound { .. } => "todo_not_found",
            StoreError::BackendUnavailable(_) => "backend_unavailable",
        }
    }
}
