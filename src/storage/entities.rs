//! Typed entity operations on [`ClinicStore`].
//!
//! Insert, lookup, list, and the handful of status updates the
//! application performs. Every operation is a single statement routed
//! through the open connection; errors propagate unmodified as
//! [`QueryError`]. Reads of missing rows return `Ok(None)`; updates of
//! missing rows fail with [`QueryError::NotFound`].

use crate::core::{
    Allergy, Appointment, AppointmentStatus, Clinic, Doctor, EmergencyContact, MedicalCondition,
    MedicalInfo, MedicalRecord, Medication, Notification, Payment, PaymentStatus, PreferredClinic,
    PreferredDoctor, User, UserAddress, UserPreferences, generate_timestamp,
};
use crate::error::{QueryError, Result};
use crate::storage::sqlite::ClinicStore;
use rusqlite::{OptionalExtension, Row, params};
use std::str::FromStr;

/// Converts a stored wire string into an enum inside a row-mapping closure.
fn parse_wire<T>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T: FromStr<Err = QueryError>,
{
    value.parse().map_err(|e: QueryError| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        date_of_birth: row.get(4)?,
        gender: row.get(5)?,
        profile_picture: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn clinic_from_row(row: &Row<'_>) -> rusqlite::Result<Clinic> {
    Ok(Clinic {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        city: row.get(3)?,
        state: row.get(4)?,
        zip_code: row.get(5)?,
        country: row.get(6)?,
        phone: row.get(7)?,
        email: row.get(8)?,
        website: row.get(9)?,
        latitude: row.get(10)?,
        longitude: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        specialization: row.get(2)?,
        clinic_id: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    let status: String = row.get(6)?;
    Ok(Appointment {
        id: row.get(0)?,
        user_id: row.get(1)?,
        clinic_id: row.get(2)?,
        doctor_id: row.get(3)?,
        date: row.get(4)?,
        time: row.get(5)?,
        status: parse_wire(6, &status)?,
        notes: row.get(7)?,
        virtual_meeting: row.get::<_, i64>(8)? != 0,
        meeting_link: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<MedicalRecord> {
    let kind: String = row.get(2)?;
    Ok(MedicalRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: parse_wire(2, &kind)?,
        title: row.get(3)?,
        date: row.get(4)?,
        doctor_id: row.get(5)?,
        clinic_id: row.get(6)?,
        description: row.get(7)?,
        file_url: row.get(8)?,
        is_digitally_signed: row.get::<_, i64>(9)? != 0,
        signed_by: row.get(10)?,
        signature_date: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn payment_from_row(row: &Row<'_>) -> rusqlite::Result<Payment> {
    let status: String = row.get(6)?;
    Ok(Payment {
        id: row.get(0)?,
        user_id: row.get(1)?,
        appointment_id: row.get(2)?,
        medical_record_id: row.get(3)?,
        amount: row.get(4)?,
        currency: row.get(5)?,
        status: parse_wire(6, &status)?,
        payment_method: row.get(7)?,
        transaction_id: row.get(8)?,
        invoice_url: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn notification_from_row(row: &Row<'_>) -> rusqlite::Result<Notification> {
    let kind: String = row.get(4)?;
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        message: row.get(3)?,
        kind: parse_wire(4, &kind)?,
        read: row.get::<_, i64>(5)? != 0,
        appointment_id: row.get(6)?,
        medical_record_id: row.get(7)?,
        payment_id: row.get(8)?,
        action_url: row.get(9)?,
        created_at: row.get(10)?,
    })
}

const USER_COLUMNS: &str =
    "id, name, email, phone, date_of_birth, gender, profile_picture, created_at, updated_at";
const CLINIC_COLUMNS: &str = "id, name, address, city, state, zip_code, country, phone, email, \
                              website, latitude, longitude, created_at, updated_at";
const DOCTOR_COLUMNS: &str =
    "id, name, specialization, clinic_id, phone, email, created_at, updated_at";
const APPOINTMENT_COLUMNS: &str = "id, user_id, clinic_id, doctor_id, date, time, status, notes, \
                                   virtual_meeting, meeting_link, created_at, updated_at";
const RECORD_COLUMNS: &str = "id, user_id, type, title, date, doctor_id, clinic_id, description, \
                              file_url, is_digitally_signed, signed_by, signature_date, \
                              created_at, updated_at";
const PAYMENT_COLUMNS: &str = "id, user_id, appointment_id, medical_record_id, amount, currency, \
                               status, payment_method, transaction_id, invoice_url, created_at, \
                               updated_at";
const NOTIFICATION_COLUMNS: &str = "id, user_id, title, message, type, read, appointment_id, \
                                    medical_record_id, payment_id, action_url, created_at";

// ==================== User Operations ====================

impl ClinicStore {
    /// Inserts a user row.
    pub fn insert_user(&self, user: &User) -> Result<()> {
        self.conn()?
            .execute(
                &format!("INSERT INTO users ({USER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"),
                params![
                    user.id,
                    user.name,
                    user.email,
                    user.phone,
                    user.date_of_birth,
                    user.gender,
                    user.profile_picture,
                    user.created_at,
                    user.updated_at,
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Retrieves a user by id.
    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let result = self
            .conn()?
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
                params![id],
                user_from_row,
            )
            .optional()
            .map_err(QueryError::from)?;
        Ok(result)
    }

    /// Retrieves a user by email.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = self
            .conn()?
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"),
                params![email],
                user_from_row,
            )
            .optional()
            .map_err(QueryError::from)?;
        Ok(result)
    }

    /// Updates a user's profile fields and refreshes its update timestamp.
    pub fn update_user(&self, user: &User) -> Result<()> {
        let updated = self
            .conn()?
            .execute(
                "UPDATE users SET name = ?, email = ?, phone = ?, date_of_birth = ?, \
                 gender = ?, profile_picture = ?, updated_at = ? WHERE id = ?",
                params![
                    user.name,
                    user.email,
                    user.phone,
                    user.date_of_birth,
                    user.gender,
                    user.profile_picture,
                    generate_timestamp(),
                    user.id,
                ],
            )
            .map_err(QueryError::from)?;

        if updated == 0 {
            return Err(QueryError::NotFound {
                entity: "users",
                id: user.id.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Inserts a postal address for a user.
    pub fn insert_user_address(&self, address: &UserAddress) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT INTO user_addresses (id, user_id, street, city, state, zip_code, \
                 country, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    address.id,
                    address.user_id,
                    address.street,
                    address.city,
                    address.state,
                    address.zip_code,
                    address.country,
                    address.created_at,
                    address.updated_at,
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Lists a user's postal addresses.
    pub fn list_addresses_for_user(&self, user_id: &str) -> Result<Vec<UserAddress>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, street, city, state, zip_code, country, created_at, \
                 updated_at FROM user_addresses WHERE user_id = ? ORDER BY created_at",
            )
            .map_err(QueryError::from)?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(UserAddress {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    street: row.get(2)?,
                    city: row.get(3)?,
                    state: row.get(4)?,
                    zip_code: row.get(5)?,
                    country: row.get(6)?,
                    created_at: row.get(7)?,
                    updated_at: row.get(8)?,
                })
            })
            .map_err(QueryError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        Ok(rows)
    }

    /// Inserts an emergency contact for a user.
    pub fn insert_emergency_contact(&self, contact: &EmergencyContact) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT INTO emergency_contacts (id, user_id, name, relationship, phone, \
                 created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    contact.id,
                    contact.user_id,
                    contact.name,
                    contact.relationship,
                    contact.phone,
                    contact.created_at,
                    contact.updated_at,
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Lists a user's emergency contacts.
    pub fn list_emergency_contacts_for_user(&self, user_id: &str) -> Result<Vec<EmergencyContact>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, name, relationship, phone, created_at, updated_at \
                 FROM emergency_contacts WHERE user_id = ? ORDER BY created_at",
            )
            .map_err(QueryError::from)?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(EmergencyContact {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    name: row.get(2)?,
                    relationship: row.get(3)?,
                    phone: row.get(4)?,
                    created_at: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            })
            .map_err(QueryError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        Ok(rows)
    }

    /// Creates or replaces a user's preferences row.
    pub fn upsert_preferences(&self, prefs: &UserPreferences) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT OR REPLACE INTO user_preferences (id, user_id, notifications, \
                 dark_mode, language, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    prefs.id,
                    prefs.user_id,
                    i64::from(prefs.notifications),
                    i64::from(prefs.dark_mode),
                    prefs.language,
                    prefs.created_at,
                    prefs.updated_at,
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Retrieves a user's preferences, if stored.
    pub fn get_preferences_for_user(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        let result = self
            .conn()?
            .query_row(
                "SELECT id, user_id, notifications, dark_mode, language, created_at, \
                 updated_at FROM user_preferences WHERE user_id = ?",
                params![user_id],
                |row| {
                    Ok(UserPreferences {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        notifications: row.get::<_, i64>(2)? != 0,
                        dark_mode: row.get::<_, i64>(3)? != 0,
                        language: row.get(4)?,
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                },
            )
            .optional()
            .map_err(QueryError::from)?;
        Ok(result)
    }
}

// ==================== Medical Profile Operations ====================

impl ClinicStore {
    /// Inserts a medical profile anchor row.
    pub fn insert_medical_info(&self, info: &MedicalInfo) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT INTO medical_info (id, user_id, blood_type, notes, created_at, \
                 updated_at) VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    info.id,
                    info.user_id,
                    info.blood_type,
                    info.notes,
                    info.created_at,
                    info.updated_at,
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Retrieves the medical profile for a user, if stored.
    pub fn get_medical_info_for_user(&self, user_id: &str) -> Result<Option<MedicalInfo>> {
        let result = self
            .conn()?
            .query_row(
                "SELECT id, user_id, blood_type, notes, created_at, updated_at \
                 FROM medical_info WHERE user_id = ?",
                params![user_id],
                |row| {
                    Ok(MedicalInfo {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        blood_type: row.get(2)?,
                        notes: row.get(3)?,
                        created_at: row.get(4)?,
                        updated_at: row.get(5)?,
                    })
                },
            )
            .optional()
            .map_err(QueryError::from)?;
        Ok(result)
    }

    /// Inserts an allergy fact.
    pub fn insert_allergy(&self, allergy: &Allergy) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT INTO allergies (id, medical_info_id, name, created_at) VALUES (?, ?, ?, ?)",
                params![
                    allergy.id,
                    allergy.medical_info_id,
                    allergy.name,
                    allergy.created_at
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Lists allergy facts under a medical profile.
    pub fn list_allergies(&self, medical_info_id: &str) -> Result<Vec<Allergy>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, medical_info_id, name, created_at FROM allergies \
                 WHERE medical_info_id = ? ORDER BY created_at",
            )
            .map_err(QueryError::from)?;
        let rows = stmt
            .query_map(params![medical_info_id], |row| {
                Ok(Allergy {
                    id: row.get(0)?,
                    medical_info_id: row.get(1)?,
                    name: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })
            .map_err(QueryError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        Ok(rows)
    }

    /// Inserts a medication row.
    pub fn insert_medication(&self, medication: &Medication) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT INTO medications (id, medical_info_id, name, dosage, frequency, \
                 created_at) VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    medication.id,
                    medication.medical_info_id,
                    medication.name,
                    medication.dosage,
                    medication.frequency,
                    medication.created_at,
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Lists medications under a medical profile.
    pub fn list_medications(&self, medical_info_id: &str) -> Result<Vec<Medication>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, medical_info_id, name, dosage, frequency, created_at \
                 FROM medications WHERE medical_info_id = ? ORDER BY created_at",
            )
            .map_err(QueryError::from)?;
        let rows = stmt
            .query_map(params![medical_info_id], |row| {
                Ok(Medication {
                    id: row.get(0)?,
                    medical_info_id: row.get(1)?,
                    name: row.get(2)?,
                    dosage: row.get(3)?,
                    frequency: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })
            .map_err(QueryError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        Ok(rows)
    }

    /// Inserts a condition fact.
    pub fn insert_condition(&self, condition: &MedicalCondition) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT INTO medical_conditions (id, medical_info_id, name, created_at) \
                 VALUES (?, ?, ?, ?)",
                params![
                    condition.id,
                    condition.medical_info_id,
                    condition.name,
                    condition.created_at,
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Lists condition facts under a medical profile.
    pub fn list_conditions(&self, medical_info_id: &str) -> Result<Vec<MedicalCondition>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, medical_info_id, name, created_at FROM medical_conditions \
                 WHERE medical_info_id = ? ORDER BY created_at",
            )
            .map_err(QueryError::from)?;
        let rows = stmt
            .query_map(params![medical_info_id], |row| {
                Ok(MedicalCondition {
                    id: row.get(0)?,
                    medical_info_id: row.get(1)?,
                    name: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })
            .map_err(QueryError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        Ok(rows)
    }
}

// ==================== Clinic & Doctor Operations ====================

impl ClinicStore {
    /// Inserts a clinic row.
    pub fn insert_clinic(&self, clinic: &Clinic) -> Result<()> {
        self.conn()?
            .execute(
                &format!(
                    "INSERT INTO clinics ({CLINIC_COLUMNS}) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                ),
                params![
                    clinic.id,
                    clinic.name,
                    clinic.address,
                    clinic.city,
                    clinic.state,
                    clinic.zip_code,
                    clinic.country,
                    clinic.phone,
                    clinic.email,
                    clinic.website,
                    clinic.latitude,
                    clinic.longitude,
                    clinic.created_at,
                    clinic.updated_at,
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Retrieves a clinic by id.
    pub fn get_clinic(&self, id: &str) -> Result<Option<Clinic>> {
        let result = self
            .conn()?
            .query_row(
                &format!("SELECT {CLINIC_COLUMNS} FROM clinics WHERE id = ?"),
                params![id],
                clinic_from_row,
            )
            .optional()
            .map_err(QueryError::from)?;
        Ok(result)
    }

    /// Lists all clinics, ordered by name.
    pub fn list_clinics(&self) -> Result<Vec<Clinic>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {CLINIC_COLUMNS} FROM clinics ORDER BY name"
            ))
            .map_err(QueryError::from)?;
        let rows = stmt
            .query_map([], clinic_from_row)
            .map_err(QueryError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        Ok(rows)
    }

    /// Inserts a doctor row.
    pub fn insert_doctor(&self, doctor: &Doctor) -> Result<()> {
        self.conn()?
            .execute(
                &format!("INSERT INTO doctors ({DOCTOR_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"),
                params![
                    doctor.id,
                    doctor.name,
                    doctor.specialization,
                    doctor.clinic_id,
                    doctor.phone,
                    doctor.email,
                    doctor.created_at,
                    doctor.updated_at,
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Retrieves a doctor by id.
    pub fn get_doctor(&self, id: &str) -> Result<Option<Doctor>> {
        let result = self
            .conn()?
            .query_row(
                &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?"),
                params![id],
                doctor_from_row,
            )
            .optional()
            .map_err(QueryError::from)?;
        Ok(result)
    }

    /// Lists doctors practicing at a clinic.
    pub fn list_doctors_for_clinic(&self, clinic_id: &str) -> Result<Vec<Doctor>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {DOCTOR_COLUMNS} FROM doctors WHERE clinic_id = ? ORDER BY name"
            ))
            .map_err(QueryError::from)?;
        let rows = stmt
            .query_map(params![clinic_id], doctor_from_row)
            .map_err(QueryError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        Ok(rows)
    }

    /// Bookmarks a clinic for a user.
    pub fn insert_preferred_clinic(&self, row: &PreferredClinic) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT INTO preferred_clinics (id, user_id, clinic_id, created_at) \
                 VALUES (?, ?, ?, ?)",
                params![row.id, row.user_id, row.clinic_id, row.created_at],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Lists a user's bookmarked clinics.
    pub fn list_preferred_clinics_for_user(&self, user_id: &str) -> Result<Vec<PreferredClinic>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, clinic_id, created_at FROM preferred_clinics \
                 WHERE user_id = ? ORDER BY created_at",
            )
            .map_err(QueryError::from)?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(PreferredClinic {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    clinic_id: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })
            .map_err(QueryError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        Ok(rows)
    }

    /// Removes a clinic bookmark by its row id.
    pub fn remove_preferred_clinic(&self, id: &str) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM preferred_clinics WHERE id = ?", params![id])
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Bookmarks a doctor for a user.
    pub fn insert_preferred_doctor(&self, row: &PreferredDoctor) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT INTO preferred_doctors (id, user_id, doctor_id, created_at) \
                 VALUES (?, ?, ?, ?)",
                params![row.id, row.user_id, row.doctor_id, row.created_at],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Lists a user's bookmarked doctors.
    pub fn list_preferred_doctors_for_user(&self, user_id: &str) -> Result<Vec<PreferredDoctor>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, doctor_id, created_at FROM preferred_doctors \
                 WHERE user_id = ? ORDER BY created_at",
            )
            .map_err(QueryError::from)?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(PreferredDoctor {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    doctor_id: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })
            .map_err(QueryError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        Ok(rows)
    }

    /// Removes a doctor bookmark by its row id.
    pub fn remove_preferred_doctor(&self, id: &str) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM preferred_doctors WHERE id = ?", params![id])
            .map_err(QueryError::from)?;
        Ok(())
    }
}

// ==================== Appointment Operations ====================

impl ClinicStore {
    /// Inserts an appointment row.
    pub fn insert_appointment(&self, appointment: &Appointment) -> Result<()> {
        self.conn()?
            .execute(
                &format!(
                    "INSERT INTO appointments ({APPOINTMENT_COLUMNS}) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                ),
                params![
                    appointment.id,
                    appointment.user_id,
                    appointment.clinic_id,
                    appointment.doctor_id,
                    appointment.date,
                    appointment.time,
                    appointment.status.as_str(),
                    appointment.notes,
                    i64::from(appointment.virtual_meeting),
                    appointment.meeting_link,
                    appointment.created_at,
                    appointment.updated_at,
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Retrieves an appointment by id.
    pub fn get_appointment(&self, id: &str) -> Result<Option<Appointment>> {
        let result = self
            .conn()?
            .query_row(
                &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?"),
                params![id],
                appointment_from_row,
            )
            .optional()
            .map_err(QueryError::from)?;
        Ok(result)
    }

    /// Lists a user's appointments, most recent date first.
    pub fn list_appointments_for_user(&self, user_id: &str) -> Result<Vec<Appointment>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments \
                 WHERE user_id = ? ORDER BY date DESC, time DESC"
            ))
            .map_err(QueryError::from)?;
        let rows = stmt
            .query_map(params![user_id], appointment_from_row)
            .map_err(QueryError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        Ok(rows)
    }

    /// Updates an appointment's scheduling fields and refreshes its
    /// update timestamp.
    pub fn update_appointment(&self, appointment: &Appointment) -> Result<()> {
        let updated = self
            .conn()?
            .execute(
                "UPDATE appointments SET clinic_id = ?, doctor_id = ?, date = ?, time = ?, \
                 status = ?, notes = ?, virtual_meeting = ?, meeting_link = ?, updated_at = ? \
                 WHERE id = ?",
                params![
                    appointment.clinic_id,
                    appointment.doctor_id,
                    appointment.date,
                    appointment.time,
                    appointment.status.as_str(),
                    appointment.notes,
                    i64::from(appointment.virtual_meeting),
                    appointment.meeting_link,
                    generate_timestamp(),
                    appointment.id,
                ],
            )
            .map_err(QueryError::from)?;

        if updated == 0 {
            return Err(QueryError::NotFound {
                entity: "appointments",
                id: appointment.id.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Sets an appointment's status.
    pub fn set_appointment_status(&self, id: &str, status: AppointmentStatus) -> Result<()> {
        let updated = self
            .conn()?
            .execute(
                "UPDATE appointments SET status = ?, updated_at = ? WHERE id = ?",
                params![status.as_str(), generate_timestamp(), id],
            )
            .map_err(QueryError::from)?;

        if updated == 0 {
            return Err(QueryError::NotFound {
                entity: "appointments",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Cancels an appointment.
    pub fn cancel_appointment(&self, id: &str) -> Result<()> {
        self.set_appointment_status(id, AppointmentStatus::Cancelled)
    }
}

// ==================== Medical Record Operations ====================

impl ClinicStore {
    /// Inserts a medical record row.
    pub fn insert_medical_record(&self, record: &MedicalRecord) -> Result<()> {
        self.conn()?
            .execute(
                &format!(
                    "INSERT INTO medical_records ({RECORD_COLUMNS}) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                ),
                params![
                    record.id,
                    record.user_id,
                    record.kind.as_str(),
                    record.title,
                    record.date,
                    record.doctor_id,
                    record.clinic_id,
                    record.description,
                    record.file_url,
                    i64::from(record.is_digitally_signed),
                    record.signed_by,
                    record.signature_date,
                    record.created_at,
                    record.updated_at,
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Retrieves a medical record by id.
    pub fn get_medical_record(&self, id: &str) -> Result<Option<MedicalRecord>> {
        let result = self
            .conn()?
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM medical_records WHERE id = ?"),
                params![id],
                record_from_row,
            )
            .optional()
            .map_err(QueryError::from)?;
        Ok(result)
    }

    /// Lists a user's medical records, most recent date first.
    pub fn list_records_for_user(&self, user_id: &str) -> Result<Vec<MedicalRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {RECORD_COLUMNS} FROM medical_records \
                 WHERE user_id = ? ORDER BY date DESC"
            ))
            .map_err(QueryError::from)?;
        let rows = stmt
            .query_map(params![user_id], record_from_row)
            .map_err(QueryError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        Ok(rows)
    }
}

// ==================== Payment Operations ====================

impl ClinicStore {
    /// Inserts a payment row.
    pub fn insert_payment(&self, payment: &Payment) -> Result<()> {
        self.conn()?
            .execute(
                &format!(
                    "INSERT INTO payments ({PAYMENT_COLUMNS}) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                ),
                params![
                    payment.id,
                    payment.user_id,
                    payment.appointment_id,
                    payment.medical_record_id,
                    payment.amount,
                    payment.currency,
                    payment.status.as_str(),
                    payment.payment_method,
                    payment.transaction_id,
                    payment.invoice_url,
                    payment.created_at,
                    payment.updated_at,
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Retrieves a payment by id.
    pub fn get_payment(&self, id: &str) -> Result<Option<Payment>> {
        let result = self
            .conn()?
            .query_row(
                &format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?"),
                params![id],
                payment_from_row,
            )
            .optional()
            .map_err(QueryError::from)?;
        Ok(result)
    }

    /// Lists a user's payments, newest first.
    pub fn list_payments_for_user(&self, user_id: &str) -> Result<Vec<Payment>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {PAYMENT_COLUMNS} FROM payments \
                 WHERE user_id = ? ORDER BY created_at DESC"
            ))
            .map_err(QueryError::from)?;
        let rows = stmt
            .query_map(params![user_id], payment_from_row)
            .map_err(QueryError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        Ok(rows)
    }

    /// Sets a payment's status.
    pub fn set_payment_status(&self, id: &str, status: PaymentStatus) -> Result<()> {
        let updated = self
            .conn()?
            .execute(
                "UPDATE payments SET status = ?, updated_at = ? WHERE id = ?",
                params![status.as_str(), generate_timestamp(), id],
            )
            .map_err(QueryError::from)?;

        if updated == 0 {
            return Err(QueryError::NotFound {
                entity: "payments",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

// ==================== Notification Operations ====================

impl ClinicStore {
    /// Inserts a notification row.
    pub fn insert_notification(&self, notification: &Notification) -> Result<()> {
        self.conn()?
            .execute(
                &format!(
                    "INSERT INTO notifications ({NOTIFICATION_COLUMNS}) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                ),
                params![
                    notification.id,
                    notification.user_id,
                    notification.title,
                    notification.message,
                    notification.kind.as_str(),
                    i64::from(notification.read),
                    notification.appointment_id,
                    notification.medical_record_id,
                    notification.payment_id,
                    notification.action_url,
                    notification.created_at,
                ],
            )
            .map_err(QueryError::from)?;
        Ok(())
    }

    /// Lists a user's notifications, newest first.
    pub fn list_notifications_for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
                 WHERE user_id = ? ORDER BY created_at DESC"
            ))
            .map_err(QueryError::from)?;
        let rows = stmt
            .query_map(params![user_id], notification_from_row)
            .map_err(QueryError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(QueryError::from)?;
        Ok(rows)
    }

    /// Marks a notification as read.
    pub fn mark_notification_read(&self, id: &str) -> Result<()> {
        let updated = self
            .conn()?
            .execute(
                "UPDATE notifications SET read = 1 WHERE id = ?",
                params![id],
            )
            .map_err(QueryError::from)?;

        if updated == 0 {
            return Err(QueryError::NotFound {
                entity: "notifications",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Marks all of a user's notifications as read.
    pub fn mark_all_notifications_read(&self, user_id: &str) -> Result<usize> {
        let updated = self
            .conn()?
            .execute(
                "UPDATE notifications SET read = 1 WHERE user_id = ? AND read = 0",
                params![user_id],
            )
            .map_err(QueryError::from)?;
        Ok(updated)
    }

    /// Counts a user's unread notifications.
    pub fn unread_notification_count(&self, user_id: &str) -> Result<usize> {
        let count: i64 = self
            .conn()?
            .query_row(
                "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND read = 0",
                params![user_id],
                |row| row.get(0),
            )
            .map_err(QueryError::from)?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Deletes a notification row.
    pub fn delete_notification(&self, id: &str) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM notifications WHERE id = ?", params![id])
            .map_err(QueryError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::core::{NotificationKind, RecordKind};
    use crate::error::Error;
    use crate::storage::traits::Store;

    fn setup() -> ClinicStore {
        let mut store = ClinicStore::in_memory().unwrap();
        store.init().unwrap();
        store
    }

    fn sample_user(store: &ClinicStore) -> User {
        let user = User::new("Jane Doe".to_string(), "jane@example.com".to_string());
        store.insert_user(&user).unwrap();
        user
    }

    #[test]
    fn test_user_round_trip() {
        let store = setup();
        let mut user = User::new("Jane Doe".to_string(), "jane@example.com".to_string());
        user.phone = Some("(415) 555-1234".to_string());
        user.gender = Some("female".to_string());
        store.insert_user(&user).unwrap();

        let loaded = store.get_user(&user.id).unwrap().unwrap();
        assert_eq!(loaded, user);

        let by_email = store.get_user_by_email("jane@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let store = setup();
        sample_user(&store);
        let dup = User::new("Other Jane".to_string(), "jane@example.com".to_string());
        let err = store.insert_user(&dup).unwrap_err();
        assert!(matches!(err, Error::Query(QueryError::Execute(_))));
    }

    #[test]
    fn test_update_user_missing_row() {
        let store = setup();
        let user = User::new("Ghost".to_string(), "ghost@example.com".to_string());
        let err = store.update_user(&user).unwrap_err();
        assert!(matches!(err, Error::Query(QueryError::NotFound { .. })));
    }

    #[test]
    fn test_medical_cluster_round_trip() {
        let store = setup();
        let user = sample_user(&store);

        let mut info = MedicalInfo::new(user.id.clone());
        info.blood_type = Some("O+".to_string());
        store.insert_medical_info(&info).unwrap();

        store
            .insert_allergy(&Allergy::new(info.id.clone(), "Penicillin".to_string()))
            .unwrap();
        let mut medication = Medication::new(info.id.clone(), "Lisinopril".to_string());
        medication.dosage = Some("10mg".to_string());
        store.insert_medication(&medication).unwrap();
        store
            .insert_condition(&MedicalCondition::new(
                info.id.clone(),
                "Hypertension".to_string(),
            ))
            .unwrap();

        let loaded = store.get_medical_info_for_user(&user.id).unwrap().unwrap();
        assert_eq!(loaded.blood_type.as_deref(), Some("O+"));
        assert_eq!(store.list_allergies(&info.id).unwrap().len(), 1);
        assert_eq!(
            store.list_medications(&info.id).unwrap()[0]
                .dosage
                .as_deref(),
            Some("10mg")
        );
        assert_eq!(store.list_conditions(&info.id).unwrap().len(), 1);
    }

    #[test]
    fn test_clinic_and_doctor_round_trip() {
        let store = setup();
        let mut clinic = Clinic::new("City General Hospital".to_string());
        clinic.latitude = Some(37.7749);
        clinic.longitude = Some(-122.4194);
        store.insert_clinic(&clinic).unwrap();

        let mut doctor = Doctor::new("Dr. John Smith".to_string());
        doctor.specialization = Some("Cardiology".to_string());
        doctor.clinic_id = Some(clinic.id.clone());
        store.insert_doctor(&doctor).unwrap();

        let loaded = store.get_clinic(&clinic.id).unwrap().unwrap();
        assert_eq!(loaded.latitude, Some(37.7749));

        let doctors = store.list_doctors_for_clinic(&clinic.id).unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].specialization.as_deref(), Some("Cardiology"));
    }

    #[test]
    fn test_appointment_lifecycle() {
        let store = setup();
        let user = sample_user(&store);

        let appt = Appointment::new(
            user.id.clone(),
            "clinic-1".to_string(),
            "doctor-1".to_string(),
            "2024-03-15".to_string(),
            "10:00 AM".to_string(),
        );
        store.insert_appointment(&appt).unwrap();

        store
            .set_appointment_status(&appt.id, AppointmentStatus::Scheduled)
            .unwrap();
        let loaded = store.get_appointment(&appt.id).unwrap().unwrap();
        assert_eq!(loaded.status, AppointmentStatus::Scheduled);
        assert!(loaded.updated_at >= appt.updated_at);

        store.cancel_appointment(&appt.id).unwrap();
        let cancelled = store.get_appointment(&appt.id).unwrap().unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

        let err = store.cancel_appointment("missing").unwrap_err();
        assert!(matches!(err, Error::Query(QueryError::NotFound { .. })));
    }

    #[test]
    fn test_virtual_appointment_round_trip() {
        let store = setup();
        let user = sample_user(&store);

        let appt = Appointment::new(
            user.id.clone(),
            "clinic-2".to_string(),
            "doctor-2".to_string(),
            "2024-03-20".to_string(),
            "2:30 PM".to_string(),
        )
        .with_meeting_link("https://meeting.example.com/abc123".to_string());
        store.insert_appointment(&appt).unwrap();

        let loaded = store.get_appointment(&appt.id).unwrap().unwrap();
        assert!(loaded.virtual_meeting);
        assert_eq!(
            loaded.meeting_link.as_deref(),
            Some("https://meeting.example.com/abc123")
        );
    }

    #[test]
    fn test_medical_record_round_trip() {
        let store = setup();
        let user = sample_user(&store);

        let record = MedicalRecord::new(
            user.id.clone(),
            RecordKind::Prescription,
            "Antibiotic Prescription".to_string(),
            "2024-03-15".to_string(),
        )
        .signed("Dr. John Smith".to_string(), "2024-03-15".to_string());
        store.insert_medical_record(&record).unwrap();

        let loaded = store.get_medical_record(&record.id).unwrap().unwrap();
        assert_eq!(loaded, record);

        let listed = store.list_records_for_user(&user.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].kind, RecordKind::Prescription);
    }

    #[test]
    fn test_payment_status_update() {
        let store = setup();
        let user = sample_user(&store);

        let payment = Payment::new(user.id.clone(), 75.0, "USD".to_string())
            .for_appointment("appt-1".to_string());
        store.insert_payment(&payment).unwrap();

        store
            .set_payment_status(&payment.id, PaymentStatus::Completed)
            .unwrap();
        let loaded = store.get_payment(&payment.id).unwrap().unwrap();
        assert_eq!(loaded.status, PaymentStatus::Completed);
        assert!((loaded.amount - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_notification_read_tracking() {
        let store = setup();
        let user = sample_user(&store);

        for title in ["Appointment Reminder", "Lab Results Available"] {
            store
                .insert_notification(&Notification::new(
                    user.id.clone(),
                    NotificationKind::Appointment,
                    title.to_string(),
                    "See details".to_string(),
                ))
                .unwrap();
        }

        assert_eq!(store.unread_notification_count(&user.id).unwrap(), 2);

        let notifications = store.list_notifications_for_user(&user.id).unwrap();
        store.mark_notification_read(&notifications[0].id).unwrap();
        assert_eq!(store.unread_notification_count(&user.id).unwrap(), 1);

        assert_eq!(store.mark_all_notifications_read(&user.id).unwrap(), 1);
        assert_eq!(store.unread_notification_count(&user.id).unwrap(), 0);

        store.delete_notification(&notifications[0].id).unwrap();
        assert_eq!(store.list_notifications_for_user(&user.id).unwrap().len(), 1);
    }

    #[test]
    fn test_preferences_upsert() {
        let store = setup();
        let user = sample_user(&store);

        let mut prefs = UserPreferences::new(user.id.clone());
        store.upsert_preferences(&prefs).unwrap();

        prefs.dark_mode = true;
        prefs.language = "es".to_string();
        store.upsert_preferences(&prefs).unwrap();

        let loaded = store.get_preferences_for_user(&user.id).unwrap().unwrap();
        assert!(loaded.dark_mode);
        assert_eq!(loaded.language, "es");
    }

    #[test]
    fn test_preferred_clinic_toggle() {
        let store = setup();
        let user = sample_user(&store);

        let bookmark = PreferredClinic::new(user.id.clone(), "clinic-1".to_string());
        store.insert_preferred_clinic(&bookmark).unwrap();
        assert_eq!(
            store.list_preferred_clinics_for_user(&user.id).unwrap().len(),
            1
        );

        store.remove_preferred_clinic(&bookmark.id).unwrap();
        assert!(store
            .list_preferred_clinics_for_user(&user.id)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_addresses_and_contacts() {
        let store = setup();
        let user = sample_user(&store);

        let mut address = UserAddress::new(user.id.clone());
        address.street = Some("123 Main St".to_string());
        address.city = Some("San Francisco".to_string());
        store.insert_user_address(&address).unwrap();

        let contact = EmergencyContact::new(
            user.id.clone(),
            "John Doe".to_string(),
            "(415) 555-0000".to_string(),
        );
        store.insert_emergency_contact(&contact).unwrap();

        assert_eq!(store.list_addresses_for_user(&user.id).unwrap().len(), 1);
        let contacts = store.list_emergency_contacts_for_user(&user.id).unwrap();
        assert_eq!(contacts[0].phone, "(415) 555-0000");
    }

    #[test]
    fn test_typed_ops_fail_when_closed() {
        let mut store = setup();
        let user = User::new("Jane Doe".to_string(), "jane@example.com".to_string());
        store.close();
        let err = store.insert_user(&user).unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(crate::error::StorageError::NotOpen)
        ));
    }
}
