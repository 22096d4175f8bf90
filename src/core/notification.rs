//! User-facing notification rows.

use crate::core::id::{generate_id, generate_timestamp};
use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Appointment reminder or change.
    Appointment,
    /// Medication reminder.
    Medication,
    /// A result (e.g. lab) became available.
    Result,
    /// Payment activity.
    Payment,
    /// System message.
    System,
    /// Emergency alert.
    Emergency,
}

impl NotificationKind {
    /// Returns the wire string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::Medication => "medication",
            Self::Result => "result",
            Self::Payment => "payment",
            Self::System => "system",
            Self::Emergency => "emergency",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "appointment" => Ok(Self::Appointment),
            "medication" => Ok(Self::Medication),
            "result" => Ok(Self::Result),
            "payment" => Ok(Self::Payment),
            "system" => Ok(Self::System),
            "emergency" => Ok(Self::Emergency),
            unknown => Err(QueryError::UnknownVariant {
                field: "type",
                value: unknown.to_string(),
            }),
        }
    }
}

/// A typed notification delivered to a user.
///
/// Carries optional back-links to the appointment, record, or payment it
/// refers to. The read flag is stored as a 0/1 integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Opaque string primary key.
    pub id: String,
    /// Recipient user id.
    pub user_id: String,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Whether the user has read it.
    pub read: bool,
    /// Linked appointment id, if any.
    pub appointment_id: Option<String>,
    /// Linked medical record id, if any.
    pub medical_record_id: Option<String>,
    /// Linked payment id, if any.
    pub payment_id: Option<String>,
    /// Deep-link target for taps.
    pub action_url: Option<String>,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
}

impl Notification {
    /// Creates a new unread notification.
    #[must_use]
    pub fn new(user_id: String, kind: NotificationKind, title: String, message: String) -> Self {
        Self {
            id: generate_id(),
            user_id,
            title,
            message,
            kind,
            read: false,
            appointment_id: None,
            medical_record_id: None,
            payment_id: None,
            action_url: None,
            created_at: generate_timestamp(),
        }
    }
}
