//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{
    OutputFormat, format_appointments, format_clinic_list, format_nearby, format_notifications,
    format_result_set, format_status,
};
use crate::cli::parser::{Cli, Commands};
use crate::core::{
    Appointment, Clinic, Doctor, MedicalRecord, Notification, NotificationKind, Payment,
    RecordKind, User,
};
use crate::error::{CommandError, QueryError, Result, StorageError};
use crate::geo::{filter_clinics, sort_by_distance};
use crate::storage::{ClinicStore, SqlValue, Store};

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let db_path = cli.get_db_path();

    match &cli.command {
        Commands::Init { force } => cmd_init(&db_path, *force, format),
        Commands::Status => cmd_status(&db_path, format),
        Commands::Reset { yes } => cmd_reset(&db_path, *yes, format),
        Commands::Exec { sql, params } => cmd_exec(&db_path, sql, params, format),
        Commands::Seed => cmd_seed(&db_path, format),
        Commands::Clinics { query } => cmd_clinics(&db_path, query.as_deref(), format),
        Commands::Nearby { lat, lon, limit } => cmd_nearby(&db_path, *lat, *lon, *limit, format),
        Commands::Appointments { user } => cmd_appointments(&db_path, user, format),
        Commands::Notifications { user, unread } => {
            cmd_notifications(&db_path, user, *unread, format)
        }
    }
}

/// Opens the store and ensures its schema exists.
fn open_store(db_path: &std::path::Path) -> Result<ClinicStore> {
    let store = ClinicStore::open(db_path)?;

    if !store.is_initialized()? {
        return Err(StorageError::NotInitialized.into());
    }

    Ok(store)
}

/// Resolves a patient identifier (id or email) to a user.
fn resolve_user(store: &ClinicStore, identifier: &str) -> Result<User> {
    if let Some(user) = store.get_user(identifier)? {
        return Ok(user);
    }
    if let Some(user) = store.get_user_by_email(identifier)? {
        return Ok(user);
    }
    Err(QueryError::NotFound {
        entity: "users",
        id: identifier.to_string(),
    }
    .into())
}

/// Coerces a CLI parameter string to a `SQLite` value.
///
/// Integers and reals bind as numbers, the literal `NULL` binds as null,
/// and everything else binds as text.
fn coerce_param(raw: &str) -> SqlValue {
    if raw == "NULL" {
        return SqlValue::Null;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return SqlValue::Integer(i);
    }
    if let Ok(r) = raw.parse::<f64>() {
        return SqlValue::Real(r);
    }
    SqlValue::Text(raw.to_string())
}

// ==================== Command Implementations ====================

fn cmd_init(db_path: &std::path::Path, force: bool, _format: OutputFormat) -> Result<String> {
    // Check if already exists
    if db_path.exists() && !force {
        return Err(CommandError::ExecutionFailed(
            "Database already exists. Use --force to reinitialize.".to_string(),
        )
        .into());
    }

    // Create parent directory if needed
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to create directory: {e}"))
        })?;
    }

    // If force, delete existing (including WAL sidecars, which would
    // carry old data into the new database)
    if force && db_path.exists() {
        std::fs::remove_file(db_path).map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to remove existing database: {e}"))
        })?;
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = db_path.as_os_str().to_os_string();
            sidecar.push(suffix);
            let sidecar = std::path::PathBuf::from(sidecar);
            if sidecar.exists() {
                std::fs::remove_file(&sidecar).map_err(|e| {
                    CommandError::ExecutionFailed(format!(
                        "Failed to remove {}: {e}",
                        sidecar.display()
                    ))
                })?;
            }
        }
    }

    let mut store = ClinicStore::open(db_path)?;
    store.init()?;

    Ok(format!(
        "Initialized clinic database at: {}\n",
        db_path.display()
    ))
}

fn cmd_status(db_path: &std::path::Path, format: OutputFormat) -> Result<String> {
    let store = open_store(db_path)?;
    let stats = store.stats()?;
    Ok(format_status(&stats, format))
}

fn cmd_reset(db_path: &std::path::Path, yes: bool, _format: OutputFormat) -> Result<String> {
    if !yes {
        return Err(CommandError::ExecutionFailed(
            "Use --yes to confirm reset. This will delete all data.".to_string(),
        )
        .into());
    }

    let mut store = open_store(db_path)?;
    store.reset()?;

    Ok("Clinic database reset successfully.\n".to_string())
}

fn cmd_exec(
    db_path: &std::path::Path,
    sql: &str,
    params: &[String],
    format: OutputFormat,
) -> Result<String> {
    let store = open_store(db_path)?;
    let values: Vec<SqlValue> = params.iter().map(|p| coerce_param(p)).collect();
    let result = store.execute(sql, &values)?;
    Ok(format_result_set(&result, format))
}

fn cmd_seed(db_path: &std::path::Path, _format: OutputFormat) -> Result<String> {
    let store = open_store(db_path)?;

    let clinics = sample_clinics();
    let mut doctor_count = 0;
    for (clinic, doctors) in &clinics {
        store.insert_clinic(clinic)?;
        for doctor in doctors {
            store.insert_doctor(doctor)?;
            doctor_count += 1;
        }
    }

    let user = User::new("John Doe".to_string(), "john.doe@example.com".to_string());
    store.insert_user(&user)?;

    let first_clinic = &clinics[0].0;
    let first_doctor = &clinics[0].1[0];
    let appointment = Appointment::new(
        user.id.clone(),
        first_clinic.id.clone(),
        first_doctor.id.clone(),
        "2026-09-15".to_string(),
        "10:00 AM".to_string(),
    );
    store.insert_appointment(&appointment)?;

    let mut record = MedicalRecord::new(
        user.id.clone(),
        RecordKind::Report,
        "Annual Physical Summary".to_string(),
        "2026-08-01".to_string(),
    )
    .signed(first_doctor.name.clone(), "2026-08-02".to_string());
    record.doctor_id = Some(first_doctor.id.clone());
    record.clinic_id = Some(first_clinic.id.clone());
    store.insert_medical_record(&record)?;

    let payment = Payment::new(user.id.clone(), 150.0, "USD".to_string())
        .for_appointment(appointment.id.clone());
    store.insert_payment(&payment)?;

    let notification = Notification::new(
        user.id.clone(),
        NotificationKind::Appointment,
        "Appointment Requested".to_string(),
        format!(
            "Your appointment at {} on {} is pending confirmation.",
            first_clinic.name, appointment.date
        ),
    );
    store.insert_notification(&notification)?;

    Ok(format!(
        "Seeded {} clinics, {} doctors, and 1 demo patient.\n",
        clinics.len(),
        doctor_count
    ))
}

fn cmd_clinics(
    db_path: &std::path::Path,
    query: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let store = open_store(db_path)?;
    let clinics = store.list_clinics()?;

    match query {
        Some(q) => {
            let matched: Vec<Clinic> = filter_clinics(&clinics, q).into_iter().cloned().collect();
            Ok(format_clinic_list(&matched, format))
        }
        None => Ok(format_clinic_list(&clinics, format)),
    }
}

fn cmd_nearby(
    db_path: &std::path::Path,
    lat: f64,
    lon: f64,
    limit: usize,
    format: OutputFormat,
) -> Result<String> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(CommandError::InvalidArgument(format!(
            "coordinates out of range: ({lat}, {lon})"
        ))
        .into());
    }

    let store = open_store(db_path)?;
    let clinics = store.list_clinics()?;
    let mut results = sort_by_distance(&clinics, lat, lon);
    results.truncate(limit);
    Ok(format_nearby(&results, format))
}

fn cmd_appointments(
    db_path: &std::path::Path,
    identifier: &str,
    format: OutputFormat,
) -> Result<String> {
    let store = open_store(db_path)?;
    let user = resolve_user(&store, identifier)?;
    let appointments = store.list_appointments_for_user(&user.id)?;
    Ok(format_appointments(&appointments, format))
}

fn cmd_notifications(
    db_path: &std::path::Path,
    identifier: &str,
    unread_only: bool,
    format: OutputFormat,
) -> Result<String> {
    let store = open_store(db_path)?;
    let user = resolve_user(&store, identifier)?;
    let mut notifications = store.list_notifications_for_user(&user.id)?;
    if unread_only {
        notifications.retain(|n| !n.read);
    }
    Ok(format_notifications(&notifications, format))
}

// ==================== Seed Fixtures ====================

fn seeded_clinic(
    name: &str,
    address: &str,
    zip_code: &str,
    phone: &str,
    lat: f64,
    lon: f64,
) -> Clinic {
    let mut clinic = Clinic::new(name.to_string());
    clinic.address = Some(address.to_string());
    clinic.city = Some("San Francisco".to_string());
    clinic.state = Some("CA".to_string());
    clinic.zip_code = Some(zip_code.to_string());
    clinic.country = Some("USA".to_string());
    clinic.phone = Some(phone.to_string());
    clinic.latitude = Some(lat);
    clinic.longitude = Some(lon);
    clinic
}

fn seeded_doctor(name: &str, specialization: &str, clinic_id: &str) -> Doctor {
    let mut doctor = Doctor::new(name.to_string());
    doctor.specialization = Some(specialization.to_string());
    doctor.clinic_id = Some(clinic_id.to_string());
    doctor
}

/// Sample San Francisco clinics with their practitioners.
fn sample_clinics() -> Vec<(Clinic, Vec<Doctor>)> {
    let city_general = seeded_clinic(
        "City General Hospital",
        "123 Main Street",
        "94102",
        "(415) 555-0101",
        37.7749,
        -122.4194,
    );
    let downtown = seeded_clinic(
        "Downtown Medical Center",
        "456 Market Street",
        "94103",
        "(415) 555-0102",
        37.7831,
        -122.4075,
    );
    let pediatrics = seeded_clinic(
        "Bay Area Pediatrics",
        "789 Mission Street",
        "94105",
        "(415) 555-0103",
        37.7759,
        -122.4245,
    );
    let urgent_care = seeded_clinic(
        "Golden Gate Urgent Care",
        "321 Embarcadero",
        "94111",
        "(415) 555-0104",
        37.7929,
        -122.3971,
    );
    let pacific_heights = seeded_clinic(
        "Pacific Heights Medical Group",
        "654 Fillmore Street",
        "94115",
        "(415) 555-0105",
        37.7902,
        -122.4324,
    );

    vec![
        (
            city_general.clone(),
            vec![
                seeded_doctor("Dr. John Smith", "Cardiology", &city_general.id),
                seeded_doctor("Dr. Emily Davis", "Internal Medicine", &city_general.id),
            ],
        ),
        (
            downtown.clone(),
            vec![seeded_doctor(
                "Dr. Sarah Johnson",
                "Dermatology",
                &downtown.id,
            )],
        ),
        (
            pediatrics.clone(),
            vec![seeded_doctor(
                "Dr. Michael Chen",
                "Pediatrics",
                &pediatrics.id,
            )],
        ),
        (
            urgent_care.clone(),
            vec![seeded_doctor(
                "Dr. Lisa Martinez",
                "Emergency Medicine",
                &urgent_care.id,
            )],
        ),
        (
            pacific_heights.clone(),
            vec![seeded_doctor(
                "Dr. Robert Kim",
                "Family Medicine",
                &pacific_heights.id,
            )],
        ),
    ]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_coerce_param_types() {
        assert_eq!(coerce_param("NULL"), SqlValue::Null);
        assert_eq!(coerce_param("42"), SqlValue::Integer(42));
        assert_eq!(coerce_param("-7"), SqlValue::Integer(-7));
        assert_eq!(coerce_param("37.7749"), SqlValue::Real(37.7749));
        assert_eq!(
            coerce_param("hello"),
            SqlValue::Text("hello".to_string())
        );
        // Lowercase null stays text
        assert_eq!(coerce_param("null"), SqlValue::Text("null".to_string()));
    }

    #[test]
    fn test_sample_clinics_have_coordinates() {
        let clinics = sample_clinics();
        assert_eq!(clinics.len(), 5);
        for (clinic, doctors) in &clinics {
            assert!(clinic.coordinates().is_some());
            for doctor in doctors {
                assert_eq!(doctor.clinic_id.as_deref(), Some(clinic.id.as_str()));
            }
        }
    }

    #[test]
    fn test_resolve_user_by_email_and_id() {
        let mut store = ClinicStore::in_memory().unwrap();
        store.init().unwrap();
        let user = User::new("Jane Doe".to_string(), "jane@example.com".to_string());
        store.insert_user(&user).unwrap();

        assert_eq!(resolve_user(&store, &user.id).unwrap().id, user.id);
        assert_eq!(resolve_user(&store, "jane@example.com").unwrap().id, user.id);
        assert!(resolve_user(&store, "nobody@example.com").is_err());
    }
}
