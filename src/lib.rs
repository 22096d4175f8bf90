//! # clinic-store
//!
//! Local-first storage for patient clinic data.
//!
//! clinic-store is the on-device persistence layer behind a patient
//! clinic application: a `SQLite` database of patients, clinics,
//! doctors, appointments, medical records, payments, and notifications,
//! with a generic parameterized query surface and typed per-entity
//! operations on top of it.
//!
//! ## Features
//!
//! - **`SQLite` Storage**: single-connection store with a versioned,
//!   forward-migrated schema
//! - **Typed Entities**: serde-ready domain structs with UUID identity
//!   and ISO-8601 timestamps
//! - **Proximity Search**: Haversine distance helpers for the clinic
//!   locator
//! - **CLI**: init, seed, query, and inspect the database from the shell

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod cli;
pub mod core;
pub mod error;
pub mod geo;
pub mod storage;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{
    Appointment, AppointmentStatus, Clinic, Doctor, MedicalRecord, Notification, NotificationKind,
    Payment, PaymentStatus, RecordKind, User, generate_id, generate_timestamp,
};

// Re-export storage types
pub use storage::{ClinicStore, DEFAULT_DB_PATH, ResultSet, SqlValue, Store, StoreStats};

// Re-export geo helpers
pub use geo::{ClinicDistance, haversine_km, sort_by_distance};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
