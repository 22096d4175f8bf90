//! Payment records.

use crate::core::id::{generate_id, generate_timestamp};
use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a payment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting settlement.
    Pending,
    /// Settled successfully.
    Completed,
    /// The transaction failed.
    Failed,
    /// The amount was returned.
    Refunded,
}

impl PaymentStatus {
    /// Returns the wire string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            unknown => Err(QueryError::UnknownVariant {
                field: "status",
                value: unknown.to_string(),
            }),
        }
    }
}

/// A billing transaction associated with a user.
///
/// May reference an appointment or a medical record; neither reference is
/// validated against its target table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Opaque string primary key.
    pub id: String,
    /// Paying user id.
    pub user_id: String,
    /// Appointment being paid for, if any.
    pub appointment_id: Option<String>,
    /// Medical record being paid for, if any.
    pub medical_record_id: Option<String>,
    /// Amount in the given currency.
    pub amount: f64,
    /// ISO currency code (e.g. "USD").
    pub currency: String,
    /// Current status.
    pub status: PaymentStatus,
    /// Payment method reference (e.g. "credit_card").
    pub payment_method: Option<String>,
    /// External transaction reference.
    pub transaction_id: Option<String>,
    /// Invoice document reference.
    pub invoice_url: Option<String>,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
    /// Last-update timestamp (ISO-8601).
    pub updated_at: String,
}

impl Payment {
    /// Creates a new pending payment.
    #[must_use]
    pub fn new(user_id: String, amount: f64, currency: String) -> Self {
        let now = generate_timestamp();
        Self {
            id: generate_id(),
            user_id,
            appointment_id: None,
            medical_record_id: None,
            amount,
            currency,
            status: PaymentStatus::Pending,
            payment_method: None,
            transaction_id: None,
            invoice_url: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Links the payment to an appointment.
    #[must_use]
    pub fn for_appointment(mut self, appointment_id: String) -> Self {
        self.appointment_id = Some(appointment_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("pending", PaymentStatus::Pending)]
    #[test_case("completed", PaymentStatus::Completed)]
    #[test_case("failed", PaymentStatus::Failed)]
    #[test_case("refunded", PaymentStatus::Refunded)]
    fn test_status_round_trip(wire: &str, status: PaymentStatus) {
        assert_eq!(status.as_str(), wire);
        assert_eq!(wire.parse::<PaymentStatus>().ok(), Some(status));
    }

    #[test]
    fn test_status_rejects_unknown() {
        assert!("chargeback".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_new_payment_is_pending() {
        let payment = Payment::new("u1".to_string(), 75.0, "USD".to_string())
            .for_appointment("appt-1".to_string());
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.appointment_id.as_deref(), Some("appt-1"));
        assert!(payment.medical_record_id.is_none());
    }
}
