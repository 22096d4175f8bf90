//! Medical record documents and digital-signature metadata.

use crate::core::id::{generate_id, generate_timestamp};
use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of artifact a medical record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A prescription issued by a doctor.
    Prescription,
    /// A laboratory result.
    LabResult,
    /// An imaging artifact (scan, x-ray).
    Imaging,
    /// A written report or diagnosis.
    Report,
    /// Anything else.
    Other,
}

impl RecordKind {
    /// Returns the wire string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prescription => "prescription",
            Self::LabResult => "lab_result",
            Self::Imaging => "imaging",
            Self::Report => "report",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prescription" => Ok(Self::Prescription),
            "lab_result" => Ok(Self::LabResult),
            "imaging" => Ok(Self::Imaging),
            "report" => Ok(Self::Report),
            "other" => Ok(Self::Other),
            unknown => Err(QueryError::UnknownVariant {
                field: "type",
                value: unknown.to_string(),
            }),
        }
    }
}

/// A typed document or data artifact associated with a user.
///
/// Doctor and clinic references are optional; the file reference and
/// signature fields are present only when the source system supplied them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRecord {
    /// Opaque string primary key.
    pub id: String,
    /// Owning user id.
    pub user_id: String,
    /// Artifact kind.
    pub kind: RecordKind,
    /// Display title.
    pub title: String,
    /// Record date (ISO-8601 date).
    pub date: String,
    /// Issuing doctor id.
    pub doctor_id: Option<String>,
    /// Issuing clinic id.
    pub clinic_id: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// File reference (URL or file path).
    pub file_url: Option<String>,
    /// Whether the record carries a digital signature.
    pub is_digitally_signed: bool,
    /// Who signed the record.
    pub signed_by: Option<String>,
    /// When the record was signed (ISO-8601 date).
    pub signature_date: Option<String>,
    /// Creation timestamp (ISO-8601).
    pub created_at: String,
    /// Last-update timestamp (ISO-8601).
    pub updated_at: String,
}

impl MedicalRecord {
    /// Creates a new unsigned record.
    #[must_use]
    pub fn new(user_id: String, kind: RecordKind, title: String, date: String) -> Self {
        let now = generate_timestamp();
        Self {
            id: generate_id(),
            user_id,
            kind,
            title,
            date,
            doctor_id: None,
            clinic_id: None,
            description: None,
            file_url: None,
            is_digitally_signed: false,
            signed_by: None,
            signature_date: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Attaches digital-signature metadata.
    #[must_use]
    pub fn signed(mut self, signed_by: String, signature_date: String) -> Self {
        self.is_digitally_signed = true;
        self.signed_by = Some(signed_by);
        self.signature_date = Some(signature_date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("prescription", RecordKind::Prescription)]
    #[test_case("lab_result", RecordKind::LabResult)]
    #[test_case("imaging", RecordKind::Imaging)]
    #[test_case("report", RecordKind::Report)]
    #[test_case("other", RecordKind::Other)]
    fn test_kind_round_trip(wire: &str, kind: RecordKind) {
        assert_eq!(kind.as_str(), wire);
        assert_eq!(wire.parse::<RecordKind>().ok(), Some(kind));
    }

    #[test]
    fn test_kind_rejects_unknown() {
        assert!("invoice".parse::<RecordKind>().is_err());
    }

    #[test]
    fn test_signed_record() {
        let record = MedicalRecord::new(
            "u1".to_string(),
            RecordKind::Prescription,
            "Antibiotic Prescription".to_string(),
            "2024-03-15".to_string(),
        )
        .signed("Dr. John Smith".to_string(), "2024-03-15".to_string());

        assert!(record.is_digitally_signed);
        assert_eq!(record.signed_by.as_deref(), Some("Dr. John Smith"));
    }
}
