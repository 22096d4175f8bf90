//! Error types for clinic-store operations.
//!
//! Provides the error hierarchy using `thiserror` for storage lifecycle,
//! query execution, and CLI commands. Query failures are propagated to the
//! caller unmodified; the store never retries or rolls back beyond what
//! `SQLite` does per-statement.

use thiserror::Error;

/// Result type alias for clinic-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for clinic-store operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Storage lifecycle errors (open, close, schema).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Query execution errors (malformed SQL, constraint violations).
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}

/// Storage lifecycle errors: connection open/close and schema management.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The database file could not be opened or created.
    #[error("failed to open database: {0}")]
    Open(String),

    /// An operation was issued while the connection is closed.
    #[error("store is not open")]
    NotOpen,

    /// Store not initialized (init command not run).
    #[error("store not initialized. Run: clinic-store init")]
    NotInitialized,

    /// Schema creation error (malformed table statement).
    #[error("schema error: {0}")]
    Schema(String),

    /// Schema migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

/// Query execution errors: malformed SQL or constraint violations.
///
/// Surfaced synchronously to the immediate caller. There is no distinction
/// between transient and permanent failures.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Statement preparation or execution failed (malformed SQL, unknown
    /// table, parameter-count mismatch, constraint violation).
    #[error("statement failed: {0}")]
    Execute(String),

    /// An entity row referenced by id does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity table name.
        entity: &'static str,
        /// The id that was not found.
        id: String,
    },

    /// A stored wire string does not map to a known enum variant.
    #[error("unknown {field} value: {value}")]
    UnknownVariant {
        /// Field whose value was unrecognized.
        field: &'static str,
        /// The offending value.
        value: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),

    /// User cancelled operation.
    #[error("operation cancelled by user")]
    Cancelled,
}

// Implement From traits for library errors

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Query(QueryError::Execute(err.to_string()))
    }
}

impl From<rusqlite::Error> for QueryError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Execute(err.to_string())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Open(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::NotOpen;
        assert_eq!(err.to_string(), "store is not open");

        let err = StorageError::NotInitialized;
        assert_eq!(
            err.to_string(),
            "store not initialized. Run: clinic-store init"
        );

        let err = StorageError::Open("disk full".to_string());
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_query_error_display() {
        let err = QueryError::NotFound {
            entity: "appointments",
            id: "abc-123".to_string(),
        };
        assert_eq!(err.to_string(), "appointments not found: abc-123");

        let err = QueryError::UnknownVariant {
            field: "status",
            value: "rescheduled".to_string(),
        };
        assert_eq!(err.to_string(), "unknown status value: rescheduled");
    }

    #[test]
    fn test_command_error_display() {
        let err = CommandError::InvalidArgument("--lat".to_string());
        assert!(err.to_string().contains("invalid argument"));

        let err = CommandError::Cancelled;
        assert!(err.to_string().contains("cancelled"));
    }

    #[test]
    fn test_error_from_storage() {
        let err: Error = StorageError::NotOpen.into();
        assert!(matches!(err, Error::Storage(StorageError::NotOpen)));
    }

    #[test]
    fn test_error_from_query() {
        let err: Error = QueryError::Execute("no such table: foo".to_string()).into();
        assert!(matches!(err, Error::Query(QueryError::Execute(_))));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let rusqlite_err = rusqlite::Error::InvalidQuery;
        let err: QueryError = rusqlite_err.into();
        assert!(matches!(err, QueryError::Execute(_)));

        let rusqlite_err = rusqlite::Error::InvalidQuery;
        let err: Error = rusqlite_err.into();
        assert!(matches!(err, Error::Query(QueryError::Execute(_))));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err: serde_json::Error = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: QueryError = json_err.into();
        assert!(matches!(err, QueryError::Serialization(_)));
    }
}
