//! Appointment records and their status lifecycle.

use crate::core::id::{generate_id, generate_timestamp};
use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of an appointment.
///
/// Stored as its lowercase wire string in the `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Confirmed and upcoming.
    Scheduled,
    /// The encounter took place.
    Completed,
    /// Cancelled by either party.
    Cancelled,
    /// Awaiting confirmation.
    Pending,
}

impl AppointmentStatus {
    /// Returns the wire string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "pending" => Ok(Self::Pending),
            other => Err(QueryError::UnknownVariant {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// A scheduled encounter between a user and a doctor at a clinic.
///
/// The doctor reference is not required to match the doctor's own
/// `clinic_id`; the schema does not enforce it.
///
/// # Examples
///
/// ```
/// use clinic_store::core::{Appointment, AppointmentStatus};
///
/// let appt = Appointment::new(
///     "user-1".to_string(),
///     "clinic-1".to_string(),
///     "doctor-1".to_string(),
///     "2024-03-15".to_string(),
///     "10:00 AM".to_string(),
/// );
/// assert_eq!(appt.status, AppointmentStatus::Pending);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Opaque string primary key.
    pub id: String,
    /// Booking user id.
    pub user_id: String,
    /// Clinic id.
    pub clinic_id: String,
    /// Doctor id.
    pub doctor_id: String,
    /// Appointment date (ISO-8601 date).
    pub date: String,
    /// Appointment time as displayed (e.g. "10:00 AM").
    pub time: String,
    /// Current status.
    pub status: AppointmentStatus,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Whether the encounter is a virtual consultation.
    pub virtual_meeting: bool,
    /// Meeting link for virtual consultations.
    pub meeting_link: Option<String>,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
    /// Last-update timestamp (ISO-8601).
    pub updated_at: String,
}

impl Appointment {
    /// Creates a new pending appointment.
    #[must_use]
    pub fn new(
        user_id: String,
        clinic_id: String,
        doctor_id: String,
        date: String,
        time: String,
    ) -> Self {
        let now = generate_timestamp();
        Self {
            id: generate_id(),
            user_id,
            clinic_id,
            doctor_id,
            date,
            time,
            status: AppointmentStatus::Pending,
            notes: None,
            virtual_meeting: false,
            meeting_link: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Marks the appointment as a virtual consultation with a meeting link.
    #[must_use]
    pub fn with_meeting_link(mut self, link: String) -> Self {
        self.virtual_meeting = true;
        self.meeting_link = Some(link);
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use test_case::test_case;

    #[test_case("scheduled", AppointmentStatus::Scheduled)]
    #[test_case("completed", AppointmentStatus::Completed)]
    #[test_case("cancelled", AppointmentStatus::Cancelled)]
    #[test_case("pending", AppointmentStatus::Pending)]
    fn test_status_round_trip(wire: &str, status: AppointmentStatus) {
        assert_eq!(status.as_str(), wire);
        assert_eq!(wire.parse::<AppointmentStatus>().ok(), Some(status));
    }

    #[test]
    fn test_status_rejects_unknown() {
        let err = "rescheduled".parse::<AppointmentStatus>().unwrap_err();
        assert!(matches!(err, QueryError::UnknownVariant { field: "status", .. }));
    }

    #[test]
    fn test_new_appointment_is_pending() {
        let appt = Appointment::new(
            "u1".to_string(),
            "c1".to_string(),
            "d1".to_string(),
            "2024-03-15".to_string(),
            "10:00 AM".to_string(),
        );
        assert_eq!(appt.status, AppointmentStatus::Pending);
        assert!(!appt.virtual_meeting);
    }

    #[test]
    fn test_with_meeting_link() {
        let appt = Appointment::new(
            "u1".to_string(),
            "c1".to_string(),
            "d1".to_string(),
            "2024-03-15".to_string(),
            "2:30 PM".to_string(),
        )
        .with_meeting_link("https://meeting.example.com/abc123".to_string());
        assert!(appt.virtual_meeting);
        assert_eq!(
            appt.meeting_link.as_deref(),
            Some("https://meeting.example.com/abc123")
        );
    }
}
