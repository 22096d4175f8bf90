//! `SQLite` store implementation.
//!
//! Owns the connection lifecycle and the generic parameterized query
//! surface. The handle is explicitly owned and injectable rather than
//! process-global, so tests construct a fresh in-memory store each.
//!
//! Single connection, single logical writer: there is no locking, no
//! transaction isolation beyond per-statement behavior, and no
//! cancellation. Once a statement is issued it runs to completion or
//! failure.

use crate::error::{Result, StorageError};
use crate::storage::schema::{
    CHECK_SCHEMA_SQL, CURRENT_SCHEMA_VERSION, ENTITY_TABLES, GET_VERSION_SQL, SCHEMA_SQL,
    SET_VERSION_SQL,
};
use crate::storage::traits::{ResultSet, Store, StoreStats};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::path::{Path, PathBuf};

/// SQLite-backed clinic store.
///
/// # Examples
///
/// ```no_run
/// use clinic_store::storage::{ClinicStore, Store};
///
/// let mut store = ClinicStore::open("clinic.db").unwrap();
/// store.init().unwrap();
/// ```
pub struct ClinicStore {
    /// `SQLite` connection; None while closed.
    conn: Option<Connection>,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
}

impl ClinicStore {
    /// Opens or creates a `SQLite` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the database file cannot be opened
    /// or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(StorageError::from)?;
            }
        }

        let conn =
            Connection::open(&path).map_err(|e| StorageError::Open(e.to_string()))?;

        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(|e| StorageError::Open(e.to_string()))?;

        // WAL mode for file-backed stores (pragma returns its new value)
        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
            .map_err(|e| StorageError::Open(e.to_string()))?;

        Ok(Self {
            conn: Some(conn),
            path: Some(path),
        })
    }

    /// Creates an in-memory store.
    ///
    /// Useful for testing.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StorageError::Open(e.to_string()))?;
        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(|e| StorageError::Open(e.to_string()))?;

        Ok(Self {
            conn: Some(conn),
            path: None,
        })
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the open connection or fails when closed.
    pub(crate) fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| StorageError::NotOpen.into())
    }

    /// Gets the current schema version.
    fn get_schema_version(&self) -> Result<Option<u32>> {
        let version: Option<String> = self
            .conn()?
            .query_row(GET_VERSION_SQL, [], |row| row.get(0))
            .optional()
            .map_err(StorageError::from_sqlite)?;

        Ok(version.and_then(|v| v.parse().ok()))
    }

    /// Sets the schema version.
    fn set_schema_version(&self, version: u32) -> Result<()> {
        self.conn()?
            .execute(SET_VERSION_SQL, params![version.to_string()])
            .map_err(StorageError::from_sqlite)?;
        Ok(())
    }

    /// Counts rows in a table known at compile time.
    fn count_table(&self, table: &'static str) -> Result<usize> {
        let count: i64 = self
            .conn()?
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .map_err(crate::error::QueryError::from)?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

impl StorageError {
    /// Maps a driver error encountered during schema management.
    fn from_sqlite(err: rusqlite::Error) -> Self {
        Self::Schema(err.to_string())
    }
}

impl Store for ClinicStore {
    fn init(&mut self) -> Result<()> {
        // Check if already initialized
        let is_init: i64 = self
            .conn()?
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(StorageError::from_sqlite)?;

        if is_init == 0 {
            // Fresh install - create schema
            self.conn()?
                .execute_batch(SCHEMA_SQL)
                .map_err(StorageError::from_sqlite)?;
            self.set_schema_version(CURRENT_SCHEMA_VERSION)?;
        } else if let Some(current) = self.get_schema_version()? {
            if current < CURRENT_SCHEMA_VERSION {
                // Run forward migrations
                let migrations = crate::storage::schema::get_migrations_from(current);
                for migration in migrations {
                    self.conn()?
                        .execute_batch(migration.sql)
                        .map_err(|e| StorageError::Migration(e.to_string()))?;
                    log::info!(
                        "migrated schema v{} -> v{}",
                        migration.from_version,
                        migration.to_version
                    );
                }
                self.set_schema_version(CURRENT_SCHEMA_VERSION)?;
            }
        }

        Ok(())
    }

    fn is_initialized(&self) -> Result<bool> {
        let count: i64 = self
            .conn()?
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(StorageError::from_sqlite)?;
        Ok(count > 0)
    }

    fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_conn, err)) = conn.close() {
                // Logged, never re-raised
                log::warn!("error closing database: {err}");
            }
        }
    }

    fn reset(&mut self) -> Result<()> {
        let conn = self.conn()?;
        for table in ENTITY_TABLES {
            conn.execute(&format!("DELETE FROM {table}"), [])
                .map_err(crate::error::QueryError::from)?;
        }
        Ok(())
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<ResultSet> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(crate::error::QueryError::from)?;

        let columns: Vec<String> = stmt
            .column_names()
            .iter()
            .map(ToString::to_string)
            .collect();

        // Non-query statements have no columns; run them for the change count
        if columns.is_empty() {
            let rows_affected = stmt
                .execute(params_from_iter(params.iter().cloned()))
                .map_err(crate::error::QueryError::from)?;
            return Ok(ResultSet {
                columns,
                rows: Vec::new(),
                rows_affected,
            });
        }

        let mut rows = stmt
            .query(params_from_iter(params.iter().cloned()))
            .map_err(crate::error::QueryError::from)?;

        let mut out: Vec<Vec<SqlValue>> = Vec::new();
        while let Some(row) = rows.next().map_err(crate::error::QueryError::from)? {
            let mut record = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                record.push(
                    row.get::<_, SqlValue>(i)
                        .map_err(crate::error::QueryError::from)?,
                );
            }
            out.push(record);
        }

        Ok(ResultSet {
            columns,
            rows: out,
            rows_affected: 0,
        })
    }

    fn stats(&self) -> Result<StoreStats> {
        let schema_version = self.get_schema_version()?.unwrap_or(0);

        let db_size = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok().map(|m| m.len()));

        Ok(StoreStats {
            user_count: self.count_table("users")?,
            clinic_count: self.count_table("clinics")?,
            doctor_count: self.count_table("doctors")?,
            appointment_count: self.count_table("appointments")?,
            record_count: self.count_table("medical_records")?,
            payment_count: self.count_table("payments")?,
            notification_count: self.count_table("notifications")?,
            schema_version,
            db_size,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::error::{Error, QueryError};

    fn setup() -> ClinicStore {
        let mut store = ClinicStore::in_memory().unwrap();
        store.init().unwrap();
        store
    }

    #[test]
    fn test_init() {
        let mut store = ClinicStore::in_memory().unwrap();
        assert!(store.init().is_ok());
        assert!(store.is_initialized().unwrap());
    }

    #[test]
    fn test_init_idempotent() {
        let mut store = ClinicStore::in_memory().unwrap();
        store.init().unwrap();
        store.init().unwrap();

        // No duplicated or dropped tables
        let result = store
            .execute(
                "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                &[],
            )
            .unwrap();
        assert_eq!(result.rows.len(), ENTITY_TABLES.len() + 1); // + schema_info
    }

    #[test]
    fn test_execute_unknown_table_is_query_error() {
        let store = setup();
        let err = store.execute("SELECT * FROM no_such_table", &[]).unwrap_err();
        assert!(matches!(err, Error::Query(QueryError::Execute(_))));
    }

    #[test]
    fn test_execute_mismatched_param_count_is_query_error() {
        let store = setup();
        let err = store
            .execute("SELECT * FROM users WHERE id = ? AND email = ?", &[])
            .unwrap_err();
        assert!(matches!(err, Error::Query(QueryError::Execute(_))));
    }

    #[test]
    fn test_execute_duplicate_primary_key_is_query_error() {
        let store = setup();
        let insert = "INSERT INTO clinics (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)";
        let params = [
            SqlValue::from("clinic-1".to_string()),
            SqlValue::from("City General Hospital".to_string()),
            SqlValue::from("2024-01-01T00:00:00Z".to_string()),
            SqlValue::from("2024-01-01T00:00:00Z".to_string()),
        ];
        store.execute(insert, &params).unwrap();
        let err = store.execute(insert, &params).unwrap_err();
        assert!(matches!(err, Error::Query(QueryError::Execute(_))));
    }

    #[test]
    fn test_execute_round_trip_preserves_values() {
        let store = setup();
        store
            .execute(
                "INSERT INTO clinics (id, name, latitude, longitude, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                &[
                    SqlValue::from("clinic-1".to_string()),
                    SqlValue::from("City General Hospital".to_string()),
                    SqlValue::from(37.7749),
                    SqlValue::from(-122.4194),
                    SqlValue::from("2024-01-01T00:00:00Z".to_string()),
                    SqlValue::from("2024-01-01T00:00:00Z".to_string()),
                ],
            )
            .unwrap();

        let result = store
            .execute(
                "SELECT id, name, latitude, longitude FROM clinics WHERE id = ?",
                &[SqlValue::from("clinic-1".to_string())],
            )
            .unwrap();

        assert_eq!(result.columns, vec!["id", "name", "latitude", "longitude"]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0][0], SqlValue::Text("clinic-1".to_string()));
        assert_eq!(
            result.rows[0][1],
            SqlValue::Text("City General Hospital".to_string())
        );
        assert_eq!(result.rows[0][2], SqlValue::Real(37.7749));
        assert_eq!(result.rows[0][3], SqlValue::Real(-122.4194));
    }

    #[test]
    fn test_execute_reports_rows_affected() {
        let store = setup();
        let result = store
            .execute(
                "INSERT INTO allergies (id, medical_info_id, name, created_at) VALUES (?, ?, ?, ?)",
                &[
                    SqlValue::from("a1".to_string()),
                    SqlValue::from("mi1".to_string()),
                    SqlValue::from("Penicillin".to_string()),
                    SqlValue::from("2024-01-01T00:00:00Z".to_string()),
                ],
            )
            .unwrap();
        assert_eq!(result.rows_affected, 1);
        assert!(result.is_empty());
    }

    #[test]
    fn test_close_then_close_is_noop() {
        let mut store = setup();
        store.close();
        assert!(!store.is_open());
        store.close(); // Second close must not panic or error
        assert!(!store.is_open());
    }

    #[test]
    fn test_execute_after_close_fails() {
        let mut store = setup();
        store.close();
        let err = store.execute("SELECT 1", &[]).unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::NotOpen)));
    }

    #[test]
    fn test_is_initialized_false_before_init() {
        let store = ClinicStore::in_memory().unwrap();
        assert!(!store.is_initialized().unwrap());
    }

    #[test]
    fn test_reset_clears_rows_keeps_schema() {
        let mut store = setup();
        store
            .execute(
                "INSERT INTO users (id, name, email, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
                &[
                    SqlValue::from("u1".to_string()),
                    SqlValue::from("Jane Doe".to_string()),
                    SqlValue::from("jane@example.com".to_string()),
                    SqlValue::from("2024-01-01T00:00:00Z".to_string()),
                    SqlValue::from("2024-01-01T00:00:00Z".to_string()),
                ],
            )
            .unwrap();

        store.reset().unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.user_count, 0);
        assert!(store.is_initialized().unwrap());
    }

    #[test]
    fn test_stats() {
        let store = setup();
        let stats = store.stats().unwrap();
        assert_eq!(stats.user_count, 0);
        assert_eq!(stats.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(stats.db_size.is_none()); // in-memory
    }
}
