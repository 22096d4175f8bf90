//! Persistent storage for clinic data.
//!
//! `SQLite`-backed store behind the [`Store`] trait. [`ClinicStore`] owns
//! the connection; typed per-entity operations live in `entities`, the
//! schema and migrations in `schema`.

mod entities;
pub mod schema;
mod sqlite;
mod traits;

pub use rusqlite::types::Value as SqlValue;
pub use sqlite::ClinicStore;
pub use traits::{ResultSet, Store, StoreStats};

/// Default database location, relative to the current directory.
pub const DEFAULT_DB_PATH: &str = ".clinic/clinic.db";
