//! Identifier and timestamp generation.
//!
//! Ids are UUIDv4 strings: collision-resistant under burst creation and
//! carrying no embedded ordering. Row recency lives in `created_at`, not
//! in the id.

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// Generates a new opaque row identifier.
///
/// # Examples
///
/// ```
/// let a = clinic_store::core::generate_id();
/// let b = clinic_store::core::generate_id();
/// assert_ne!(a, b);
/// ```
#[must_use]
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns the current instant as an ISO-8601 (RFC 3339) string.
///
/// All rows store their `created_at` / `updated_at` timestamps in this
/// form, as `TEXT` columns.
#[must_use]
pub fn generate_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
