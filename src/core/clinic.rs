//! Clinic and practitioner records.

use crate::core::id::{generate_id, generate_timestamp};
use serde::{Deserialize, Serialize};

/// A physical or virtual healthcare facility.
///
/// Coordinates are optional; clinics without them are skipped by the
/// proximity helpers in [`crate::geo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    /// Opaque string primary key.
    pub id: String,
    /// Facility name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
    /// Last-update timestamp (ISO-8601).
    pub updated_at: String,
}

impl Clinic {
    /// Creates a new clinic with a fresh id and timestamps.
    #[must_use]
    pub fn new(name: String) -> Self {
        let now = generate_timestamp();
        Self {
            id: generate_id(),
            name,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            country: None,
            phone: None,
            email: None,
            website: None,
            latitude: None,
            longitude: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Returns the clinic's coordinates, if both are set.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// A practitioner associated with a clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    /// Opaque string primary key.
    pub id: String,
    /// Practitioner name.
    pub name: String,
    /// Medical specialization.
    pub specialization: Option<String>,
    /// Clinic the doctor practices at. Nothing ties appointments made with
    /// this doctor to this clinic; the reference is informational.
    pub clinic_id: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
    /// Last-update timestamp (ISO-8601).
    pub updated_at: String,
}

impl Doctor {
    /// Creates a new doctor with a fresh id and timestamps.
    #[must_use]
    pub fn new(name: String) -> Self {
        let now = generate_timestamp();
        Self {
            id: generate_id(),
            name,
            specialization: None,
            clinic_id: None,
            phone: None,
            email: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A user's bookmarked clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredClinic {
    /// Opaque string primary key.
    pub id: String,
    /// Owning user id.
    pub user_id: String,
    /// Bookmarked clinic id.
    pub clinic_id: String,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
}

impl PreferredClinic {
    /// Creates a new clinic bookmark.
    #[must_use]
    pub fn new(user_id: String, clinic_id: String) -> Self {
        Self {
            id: generate_id(),
            user_id,
            clinic_id,
            created_at: generate_timestamp(),
        }
    }
}

/// A user's bookmarked doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredDoctor {
    /// Opaque string primary key.
    pub id: String,
    /// Owning user id.
    pub user_id: String,
    /// Bookmarked doctor id.
    pub doctor_id: String,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
}

impl PreferredDoctor {
    /// Creates a new doctor bookmark.
    #[must_use]
    pub fn new(user_id: String, doctor_id: String) -> Self {
        Self {
            id: generate_id(),
            user_id,
            doctor_id,
            created_at: generate_timestamp(),
        }
    }
}
