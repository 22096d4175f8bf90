//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::{Appointment, Clinic, Notification};
use crate::error::Error;
use crate::geo::ClinicDistance;
use crate::storage::{ResultSet, SqlValue, StoreStats};
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a status response.
#[must_use]
pub fn format_status(stats: &StoreStats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_status_text(stats),
        OutputFormat::Json => format_json(stats),
    }
}

fn format_status_text(stats: &StoreStats) -> String {
    let mut output = String::new();
    output.push_str("Clinic Store Status\n");
    output.push_str("===================\n\n");
    let _ = writeln!(output, "  Users:          {}", stats.user_count);
    let _ = writeln!(output, "  Clinics:        {}", stats.clinic_count);
    let _ = writeln!(output, "  Doctors:        {}", stats.doctor_count);
    let _ = writeln!(output, "  Appointments:   {}", stats.appointment_count);
    let _ = writeln!(output, "  Records:        {}", stats.record_count);
    let _ = writeln!(output, "  Payments:       {}", stats.payment_count);
    let _ = writeln!(output, "  Notifications:  {}", stats.notification_count);
    let _ = writeln!(output, "  Schema:         v{}", stats.schema_version);
    if let Some(size) = stats.db_size {
        let _ = writeln!(output, "  DB size:        {size} bytes");
    }
    output
}

/// Formats a clinic list.
#[must_use]
pub fn format_clinic_list(clinics: &[Clinic], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_clinic_list_text(clinics),
        OutputFormat::Json => format_json(&clinics),
    }
}

fn format_clinic_list_text(clinics: &[Clinic]) -> String {
    if clinics.is_empty() {
        return "No clinics found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str("Clinics:\n");
    let _ = writeln!(output, "{:<30} {:<28} {:<16} Phone", "Name", "Address", "City");
    output.push_str(&"-".repeat(90));
    output.push('\n');

    for clinic in clinics {
        let address = clinic.address.as_deref().unwrap_or("-");
        let city = clinic.city.as_deref().unwrap_or("-");
        let phone = clinic.phone.as_deref().unwrap_or("-");
        let _ = writeln!(
            output,
            "{:<30} {:<28} {:<16} {}",
            truncate(&clinic.name, 30),
            truncate(address, 28),
            truncate(city, 16),
            phone
        );
    }

    output
}

/// Formats a nearest-clinic list.
#[must_use]
pub fn format_nearby(results: &[ClinicDistance], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_nearby_text(results),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Entry<'a> {
                clinic: &'a Clinic,
                distance_km: f64,
            }
            let entries: Vec<Entry<'_>> = results
                .iter()
                .map(|r| Entry {
                    clinic: &r.clinic,
                    distance_km: r.distance_km,
                })
                .collect();
            format_json(&entries)
        }
    }
}

fn format_nearby_text(results: &[ClinicDistance]) -> String {
    if results.is_empty() {
        return "No clinics with coordinates found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str("Nearest clinics:\n");
    let _ = writeln!(output, "{:<10} {:<30} Address", "Distance", "Name");
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for result in results {
        let address = result.clinic.address.as_deref().unwrap_or("-");
        let _ = writeln!(
            output,
            "{:<10} {:<30} {}",
            format!("{:.1} km", result.distance_km),
            truncate(&result.clinic.name, 30),
            truncate(address, 28)
        );
    }

    output
}

/// Formats an appointment list.
#[must_use]
pub fn format_appointments(appointments: &[Appointment], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_appointments_text(appointments),
        OutputFormat::Json => format_json(&appointments),
    }
}

fn format_appointments_text(appointments: &[Appointment]) -> String {
    if appointments.is_empty() {
        return "No appointments found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str("Appointments:\n");
    let _ = writeln!(
        output,
        "{:<12} {:<10} {:<10} {:<8} Notes",
        "Date", "Time", "Status", "Virtual"
    );
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for appt in appointments {
        let notes = appt.notes.as_deref().unwrap_or("-");
        let _ = writeln!(
            output,
            "{:<12} {:<10} {:<10} {:<8} {}",
            appt.date,
            appt.time,
            appt.status,
            if appt.virtual_meeting { "yes" } else { "no" },
            truncate(notes, 30)
        );
    }

    output
}

/// Formats a notification list.
#[must_use]
pub fn format_notifications(notifications: &[Notification], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_notifications_text(notifications),
        OutputFormat::Json => format_json(&notifications),
    }
}

fn format_notifications_text(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "No notifications found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str("Notifications:\n");
    let _ = writeln!(output, "{:<8} {:<12} {:<30} Message", "Read", "Kind", "Title");
    output.push_str(&"-".repeat(90));
    output.push('\n');

    for notification in notifications {
        let _ = writeln!(
            output,
            "{:<8} {:<12} {:<30} {}",
            if notification.read { "read" } else { "unread" },
            notification.kind,
            truncate(&notification.title, 30),
            truncate(&notification.message, 38)
        );
    }

    output
}

/// Formats the result set of a generic statement.
#[must_use]
pub fn format_result_set(result: &ResultSet, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_result_set_text(result),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct JsonResult<'a> {
                columns: &'a [String],
                rows: Vec<Vec<serde_json::Value>>,
                rows_affected: usize,
            }
            let rows = result
                .rows
                .iter()
                .map(|row| row.iter().map(sql_value_to_json).collect())
                .collect();
            format_json(&JsonResult {
                columns: &result.columns,
                rows,
                rows_affected: result.rows_affected,
            })
        }
    }
}

fn format_result_set_text(result: &ResultSet) -> String {
    if result.columns.is_empty() {
        return format!("{} row(s) affected.\n", result.rows_affected);
    }

    let mut output = String::new();
    output.push_str(&result.columns.join(" | "));
    output.push('\n');
    output.push_str(&"-".repeat(output.len().saturating_sub(1).max(20)));
    output.push('\n');

    for row in &result.rows {
        let cells: Vec<String> = row.iter().map(sql_value_to_string).collect();
        output.push_str(&cells.join(" | "));
        output.push('\n');
    }

    let _ = writeln!(output, "({} row(s))", result.rows.len());
    output
}

fn sql_value_to_string(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Integer(i) => i.to_string(),
        SqlValue::Real(r) => r.to_string(),
        SqlValue::Text(t) => t.clone(),
        SqlValue::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}

fn sql_value_to_json(value: &SqlValue) -> serde_json::Value {
    match value {
        SqlValue::Null => serde_json::Value::Null,
        SqlValue::Integer(i) => serde_json::Value::from(*i),
        SqlValue::Real(r) => serde_json::Number::from_f64(*r)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        SqlValue::Text(t) => serde_json::Value::from(t.as_str()),
        SqlValue::Blob(b) => serde_json::Value::from(format!("<blob {} bytes>", b.len())),
    }
}

/// Formats an error for display.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct JsonError {
                error: String,
            }
            format_json(&JsonError {
                error: error.to_string(),
            })
        }
    }
}

fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Returns the largest char boundary at or below `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Truncates a string to at most `max_len` bytes with ellipsis, cutting
/// only on char boundaries.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s[..floor_char_boundary(s, max_len)].to_string()
    } else {
        format!("{}...", &s[..floor_char_boundary(s, max_len - 3)])
    }
}
