//! Database schema definitions.
//!
//! DDL for the clinic-store `SQLite` database: sixteen entity tables plus
//! the `schema_info` version table. All identifiers are `TEXT` primary
//! keys, timestamps are ISO-8601 `TEXT`, boolean flags are 0/1 `INTEGER`
//! columns. There is no indexing beyond primary keys, no cascading
//! deletes, and no enforced referential integrity between tables.

/// Current schema version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// SQL schema for initial database setup.
pub const SCHEMA_SQL: &str = r"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_info (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Patient identities
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    phone TEXT,
    date_of_birth TEXT,
    gender TEXT,
    profile_picture TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Healthcare facilities
CREATE TABLE IF NOT EXISTS clinics (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT,
    city TEXT,
    state TEXT,
    zip_code TEXT,
    country TEXT,
    phone TEXT,
    email TEXT,
    website TEXT,
    latitude REAL,
    longitude REAL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Practitioners
CREATE TABLE IF NOT EXISTS doctors (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    specialization TEXT,
    clinic_id TEXT,
    phone TEXT,
    email TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Medical profile anchor (one per user)
CREATE TABLE IF NOT EXISTS medical_info (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    blood_type TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_addresses (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    street TEXT,
    city TEXT,
    state TEXT,
    zip_code TEXT,
    country TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS emergency_contacts (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    relationship TEXT,
    phone TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Labeled facts under the medical profile
CREATE TABLE IF NOT EXISTS allergies (
    id TEXT PRIMARY KEY,
    medical_info_id TEXT NOT NULL,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS medications (
    id TEXT PRIMARY KEY,
    medical_info_id TEXT NOT NULL,
    name TEXT NOT NULL,
    dosage TEXT,
    frequency TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS medical_conditions (
    id TEXT PRIMARY KEY,
    medical_info_id TEXT NOT NULL,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Scheduled encounters
CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    clinic_id TEXT NOT NULL,
    doctor_id TEXT NOT NULL,
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    status TEXT NOT NULL,
    notes TEXT,
    virtual_meeting INTEGER DEFAULT 0,
    meeting_link TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Typed documents and artifacts
CREATE TABLE IF NOT EXISTS medical_records (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    type TEXT NOT NULL,
    title TEXT NOT NULL,
    date TEXT NOT NULL,
    doctor_id TEXT,
    clinic_id TEXT,
    description TEXT,
    file_url TEXT,
    is_digitally_signed INTEGER DEFAULT 0,
    signed_by TEXT,
    signature_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Billing transactions
CREATE TABLE IF NOT EXISTS payments (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    appointment_id TEXT,
    medical_record_id TEXT,
    amount REAL NOT NULL,
    currency TEXT NOT NULL,
    status TEXT NOT NULL,
    payment_method TEXT,
    transaction_id TEXT,
    invoice_url TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notifications (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    message TEXT NOT NULL,
    type TEXT NOT NULL,
    read INTEGER DEFAULT 0,
    appointment_id TEXT,
    medical_record_id TEXT,
    payment_id TEXT,
    action_url TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_preferences (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    notifications INTEGER DEFAULT 1,
    dark_mode INTEGER DEFAULT 0,
    language TEXT DEFAULT 'en',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS preferred_clinics (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    clinic_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS preferred_doctors (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    doctor_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);
";

/// SQL to check if schema is initialized.
pub const CHECK_SCHEMA_SQL: &str = r"
SELECT COUNT(*) FROM sqlite_master
WHERE type='table' AND name='schema_info';
";

/// SQL to get schema version.
pub const GET_VERSION_SQL: &str = r"
SELECT value FROM schema_info WHERE key = 'version';
";

/// SQL to set schema version.
pub const SET_VERSION_SQL: &str = r"
INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?);
";

/// Entity tables created by [`SCHEMA_SQL`], in creation order.
pub const ENTITY_TABLES: &[&str] = &[
    "users",
    "clinics",
    "doctors",
    "medical_info",
    "user_addresses",
    "emergency_contacts",
    "allergies",
    "medications",
    "medical_conditions",
    "appointments",
    "medical_records",
    "payments",
    "notifications",
    "user_preferences",
    "preferred_clinics",
    "preferred_doctors",
];

/// A forward-only migration between schema versions.
pub struct Migration {
    /// Version this migration upgrades from.
    pub from_version: u32,
    /// Version this migration upgrades to.
    pub to_version: u32,
    /// SQL statements to execute.
    pub sql: &'static str,
}

/// Available migrations. The v1 schema ships with none; future versions
/// append forward-only entries here.
pub const MIGRATIONS: &[Migration] = &[];

/// Gets migrations needed to upgrade from a version.
#[must_use]
pub fn get_migrations_from(current_version: u32) -> Vec<&'static Migration> {
    MIGRATIONS
        .iter()
        .filter(|m| m.from_version >= current_version && m.to_version <= CURRENT_SCHEMA_VERSION)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_version() {
        const _: () = assert!(CURRENT_SCHEMA_VERSION >= 1);
    }

    #[test]
    fn test_schema_lists_every_entity_table() {
        for table in ENTITY_TABLES {
            assert!(
                SCHEMA_SQL.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
                "missing DDL for {table}"
            );
        }
        // sixteen entity tables + schema_info
        assert_eq!(ENTITY_TABLES.len(), 16);
    }

    #[test]
    fn test_migrations_ordered() {
        for migration in MIGRATIONS {
            assert!(migration.to_version > migration.from_version);
        }
    }

    #[test]
    fn test_get_migrations_from_current_is_empty() {
        assert!(get_migrations_from(CURRENT_SCHEMA_VERSION).is_empty());
    }
}
