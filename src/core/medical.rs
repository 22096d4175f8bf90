//! The per-user medical profile cluster.
//!
//! `MedicalInfo` is the anchor row; allergies, medications, and conditions
//! are one-to-many labeled facts keyed by `medical_info_id`, each carrying
//! only a creation timestamp.

use crate::core::id::{generate_id, generate_timestamp};
use serde::{Deserialize, Serialize};

/// The anchor row for a user's medical profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalInfo {
    /// Opaque string primary key.
    pub id: String,
    /// Owning user id.
    pub user_id: String,
    /// Blood type (e.g. "O+").
    pub blood_type: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
    /// Last-update timestamp (ISO-8601).
    pub updated_at: String,
}

impl MedicalInfo {
    /// Creates an empty medical profile for a user.
    #[must_use]
    pub fn new(user_id: String) -> Self {
        let now = generate_timestamp();
        Self {
            id: generate_id(),
            user_id,
            blood_type: None,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A labeled allergy fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allergy {
    /// Opaque string primary key.
    pub id: String,
    /// Owning medical profile id.
    pub medical_info_id: String,
    /// Allergy name.
    pub name: String,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
}

impl Allergy {
    /// Creates a new allergy row.
    #[must_use]
    pub fn new(medical_info_id: String, name: String) -> Self {
        Self {
            id: generate_id(),
            medical_info_id,
            name,
            created_at: generate_timestamp(),
        }
    }
}

/// A current medication with optional dosage details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    /// Opaque string primary key.
    pub id: String,
    /// Owning medical profile id.
    pub medical_info_id: String,
    /// Medication name.
    pub name: String,
    /// Dosage description (e.g. "500mg").
    pub dosage: Option<String>,
    /// Frequency description (e.g. "3 times daily").
    pub frequency: Option<String>,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
}

impl Medication {
    /// Creates a new medication row.
    #[must_use]
    pub fn new(medical_info_id: String, name: String) -> Self {
        Self {
            id: generate_id(),
            medical_info_id,
            name,
            dosage: None,
            frequency: None,
            created_at: generate_timestamp(),
        }
    }
}

/// A labeled chronic or past condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalCondition {
    /// Opaque string primary key.
    pub id: String,
    /// Owning medical profile id.
    pub medical_info_id: String,
    /// Condition name.
    pub name: String,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
}

impl MedicalCondition {
    /// Creates a new condition row.
    #[must_use]
    pub fn new(medical_info_id: String, name: String) -> Self {
        Self {
            id: generate_id(),
            medical_info_id,
            name,
            created_at: generate_timestamp(),
        }
    }
}
