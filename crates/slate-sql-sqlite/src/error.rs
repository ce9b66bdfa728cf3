//! Engine-level errors.

use slate_sql_core::{DecodeError, EncodeError, RowError, SchemaError, StatementError};

/// Errors raised while executing statements against a SQLite database.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A primary-key or unique violation. Recoverable only inside the
    /// insert-or-update path; everywhere else it propagates.
    #[error("uniqueness conflict: {0}")]
    Conflict(String),

    /// Any other error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),

    /// A fetched value did not decode under the expected column type.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A bound value did not encode under its column type.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A schema registry operation failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A statement could not be rendered.
    #[error(transparent)]
    Statement(#[from] StatementError),

    /// A result row could not be assembled.
    #[error(transparent)]
    Row(#[from] RowError),

    /// Reflection met a declared column type it cannot map back to a
    /// data type.
    #[error("unknown declared column type '{0}'")]
    UnknownDeclaredType(String),

    /// A record's value count does not match the table's column count.
    #[error("record has {values} values but table '{table}' has {columns} columns")]
    RecordShape {
        /// The target table.
        table: String,
        /// Number of table columns.
        columns: usize,
        /// Number of record values.
        values: usize,
    },
}

impl From<rusqlite::Error> for EngineError {
    /// Classifies primary-key and unique violations as
    /// [`EngineError::Conflict`] so the insert-or-update path can recover
    /// from them. Other constraint violations (NOT NULL, CHECK) are not
    /// conflicts and stay [`EngineError::Sqlite`].
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Self::Conflict(message.clone().unwrap_or_else(|| err.to_string()))
            }
            _ => Self::Sqlite(err),
        }
    }
}

impl EngineError {
    /// Whether this is a uniqueness conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
