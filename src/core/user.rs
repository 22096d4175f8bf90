//! Patient identity and per-user profile rows.
//!
//! A `User` is the root of the per-patient data: addresses, emergency
//! contacts, and preferences hang off it as one-to-many rows keyed by
//! `user_id`. References are plain string ids with no enforced referential
//! integrity, matching the flat schema.

use crate::core::id::{generate_id, generate_timestamp};
use serde::{Deserialize, Serialize};

/// A patient identity and demographic profile.
///
/// # Examples
///
/// ```
/// use clinic_store::core::User;
///
/// let user = User::new("Jane Doe".to_string(), "jane@example.com".to_string());
/// assert!(!user.id.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque string primary key.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Email address (unique in the schema).
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Date of birth (ISO-8601 date).
    pub date_of_birth: Option<String>,
    /// Gender.
    pub gender: Option<String>,
    /// Profile picture reference (URL or file path).
    pub profile_picture: Option<String>,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
    /// Last-update timestamp (ISO-8601).
    pub updated_at: String,
}

impl User {
    /// Creates a new user with a fresh id and timestamps.
    #[must_use]
    pub fn new(name: String, email: String) -> Self {
        let now = generate_timestamp();
        Self {
            id: generate_id(),
            name,
            email,
            phone: None,
            date_of_birth: None,
            gender: None,
            profile_picture: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Refreshes the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = generate_timestamp();
    }
}

/// A postal address belonging to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAddress {
    /// Opaque string primary key.
    pub id: String,
    /// Owning user id.
    pub user_id: String,
    /// Street line.
    pub street: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
    /// Last-update timestamp (ISO-8601).
    pub updated_at: String,
}

impl UserAddress {
    /// Creates an empty address row for a user.
    #[must_use]
    pub fn new(user_id: String) -> Self {
        let now = generate_timestamp();
        Self {
            id: generate_id(),
            user_id,
            street: None,
            city: None,
            state: None,
            zip_code: None,
            country: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// An emergency contact for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    /// Opaque string primary key.
    pub id: String,
    /// Owning user id.
    pub user_id: String,
    /// Contact name.
    pub name: String,
    /// Relationship to the user.
    pub relationship: Option<String>,
    /// Contact phone number.
    pub phone: String,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
    /// Last-update timestamp (ISO-8601).
    pub updated_at: String,
}

impl EmergencyContact {
    /// Creates a new emergency contact row.
    #[must_use]
    pub fn new(user_id: String, name: String, phone: String) -> Self {
        let now = generate_timestamp();
        Self {
            id: generate_id(),
            user_id,
            name,
            relationship: None,
            phone,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Per-user application settings.
///
/// Boolean flags are persisted as 0/1 integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Opaque string primary key.
    pub id: String,
    /// Owning user id.
    pub user_id: String,
    /// Whether notifications are enabled.
    pub notifications: bool,
    /// Whether dark mode is enabled.
    pub dark_mode: bool,
    /// Preferred language code.
    pub language: String,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
    /// Last-update timestamp (ISO-8601).
    pub updated_at: String,
}

impl UserPreferences {
    /// Creates default preferences for a user.
    #[must_use]
    pub fn new(user_id: String) -> Self {
        let now = generate_timestamp();
        Self {
            id: generate_id(),
            user_id,
            notifications: true,
            dark_mode: false,
            language: "en".to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_id_and_timestamps() {
        let user = User::new("Jane Doe".to_string(), "jane@example.com".to_string());
        assert!(!user.id.is_empty());
        assert_eq!(user.created_at, user.updated_at);
        assert!(user.phone.is_none());
    }

    #[test]
    fn test_touch_updates_timestamp() {
        let mut user = User::new("Jane Doe".to_string(), "jane@example.com".to_string());
        let created = user.created_at.clone();
        std::thread::sleep(std::time::Duration::from_millis(5));
        user.touch();
        assert!(user.updated_at >= created);
        assert_eq!(user.created_at, created);
    }

    #[test]
    fn test_preferences_defaults() {
        let prefs = UserPreferences::new("user-1".to_string());
        assert!(prefs.notifications);
        assert!(!prefs.dark_mode);
        assert_eq!(prefs.language, "en");
    }
}
