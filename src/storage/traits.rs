//! Store trait definition.
//!
//! Defines the lifecycle and generic query interface for persistent
//! storage backends. Typed per-entity operations live on the concrete
//! store; this trait captures the surface every backend must provide.

use crate::error::Result;
use rusqlite::types::Value as SqlValue;
use serde::Serialize;

/// Trait for the on-device persistent store.
///
/// The connection has two states, closed and open. A handle is
/// constructed open; `close` transitions open to closed, and there is no
/// reopen on the same handle. `init` seeds the schema (idempotently) on
/// an open handle. Every operation other than `close` and `is_open` is
/// only valid while open and fails with
/// [`crate::error::StorageError::NotOpen`] otherwise.
pub trait Store {
    /// Creates the schema and runs any pending forward migrations.
    ///
    /// Idempotent: safe to call multiple times; a second call neither
    /// errors nor duplicates tables.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation or migration fails.
    fn init(&mut self) -> Result<()>;

    /// Checks whether the schema has been created.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is closed or the check fails.
    fn is_initialized(&self) -> Result<bool>;

    /// Returns true while the connection is open.
    fn is_open(&self) -> bool;

    /// Releases the connection.
    ///
    /// No-op when already closed. Close failures are logged and not
    /// re-raised.
    fn close(&mut self);

    /// Deletes all rows but preserves the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    fn reset(&mut self) -> Result<()>;

    /// Runs a single parameterized statement and returns the first result
    /// set.
    ///
    /// No statement batching, no transaction wrapping. The caller supplies
    /// a well-formed statement and a positional parameter list matching
    /// its placeholders.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::QueryError`] on malformed SQL, a
    /// parameter-count mismatch, or a constraint violation, propagated
    /// unmodified.
    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<ResultSet>;

    /// Gathers storage statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if statistics cannot be gathered.
    fn stats(&self) -> Result<StoreStats>;
}

/// The first result set of an executed statement.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// Column names, in select order. Empty for non-query statements.
    pub columns: Vec<String>,
    /// Row values, one inner vector per row.
    pub rows: Vec<Vec<SqlValue>>,
    /// Rows changed by a non-query statement; 0 for queries.
    pub rows_affected: usize,
}

impl ResultSet {
    /// Returns true when the statement produced no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Storage statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Number of users stored.
    pub user_count: usize,
    /// Number of clinics stored.
    pub clinic_count: usize,
    /// Number of doctors stored.
    pub doctor_count: usize,
    /// Number of appointments stored.
    pub appointment_count: usize,
    /// Number of medical records stored.
    pub record_count: usize,
    /// Number of payments stored.
    pub payment_count: usize,
    /// Number of notifications stored.
    pub notification_count: usize,
    /// Schema version.
    pub schema_version: u32,
    /// Database file size in bytes (None for in-memory stores).
    pub db_size: Option<u64>,
}
