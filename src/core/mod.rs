//! Core domain models for clinic-store.
//!
//! Flat, serde-derived records mirroring the persisted schema: users and
//! their profile cluster, clinics and doctors, appointments, medical
//! records, payments, and notifications. These are pure domain models with
//! no I/O dependencies; the storage layer maps them to and from rows.

pub mod appointment;
pub mod clinic;
pub mod id;
pub mod medical;
pub mod notification;
pub mod payment;
pub mod record;
pub mod user;

pub use appointment::{Appointment, AppointmentStatus};
pub use clinic::{Clinic, Doctor, PreferredClinic, PreferredDoctor};
pub use id::{generate_id, generate_timestamp};
pub use medical::{Allergy, MedicalCondition, MedicalInfo, Medication};
pub use notification::{Notification, NotificationKind};
pub use payment::{Payment, PaymentStatus};
pub use record::{MedicalRecord, RecordKind};
pub use user::{EmergencyContact, User, UserAddress, UserPreferences};
