//! Database error types.

use derive_more::{Display, Error};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::instrument;

/// Broad category of a database failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DbErrorKind {
    /// A uniqueness constraint rejected the write.
    #[display("duplicate")]
    Duplicate,
    /// The row addressed by an update does not exist.
    #[display("missing")]
    Missing,
    /// Connection, query or migration failure.
    #[display("backend")]
    Backend,
}

/// Database error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error ({}): {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Failure category.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a new backend error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(DbErrorKind::Backend, message)
    }

    /// Creates an error of the given kind with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn with_kind(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// True when a uniqueness constraint rejected the write.
    pub fn is_duplicate(&self) -> bool {
        self.kind == DbErrorKind::Duplicate
    }
}

impl From<DieselError> for DbError {
    #[track_caller]
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::with_kind(DbErrorKind::Duplicate, info.message().to_string())
            }
            DieselError::NotFound => Self::with_kind(DbErrorKind::Missing, "Record not found"),
            other => Self::new(format!("Diesel error: {}", other)),
        }
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}
