//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// clinic-store: local-first storage for patient clinic data.
///
/// A CLI tool for managing the on-device `SQLite` database behind a
/// patient clinic application: schema setup, sample data, generic
/// queries, and clinic proximity lookups.
#[derive(Parser, Debug)]
#[command(name = "clinic-store")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the clinic database file.
    ///
    /// Defaults to `.clinic/clinic.db` in the current directory.
    #[arg(short, long, env = "CLINIC_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the clinic database.
    ///
    /// Creates the database file and schema if they don't exist.
    Init {
        /// Force re-initialization (destroys existing data).
        #[arg(short, long)]
        force: bool,
    },

    /// Show database status and row counts.
    Status,

    /// Delete all rows but keep the schema.
    Reset {
        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Run a single parameterized SQL statement.
    Exec {
        /// The SQL statement, with `?` placeholders.
        sql: String,

        /// Positional parameter values, one per placeholder.
        ///
        /// Values parsing as integers or reals bind as numbers; the
        /// literal `NULL` binds as null; anything else binds as text.
        params: Vec<String>,
    },

    /// Load sample clinics, doctors, and a demo patient.
    Seed,

    /// List clinics, optionally filtered by search text.
    Clinics {
        /// Case-insensitive filter over name, address, and city.
        query: Option<String>,
    },

    /// List clinics sorted by distance from a coordinate.
    Nearby {
        /// Origin latitude in degrees.
        #[arg(allow_hyphen_values = true)]
        lat: f64,

        /// Origin longitude in degrees.
        #[arg(allow_hyphen_values = true)]
        lon: f64,

        /// Maximum number of clinics to show.
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// List a patient's appointments.
    Appointments {
        /// Patient id or email.
        user: String,
    },

    /// List a patient's notifications.
    Notifications {
        /// Patient id or email.
        user: String,

        /// Show only unread notifications.
        #[arg(short, long)]
        unread: bool,
    },
}

impl Cli {
    /// Returns the database path, falling back to the default.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::storage::DEFAULT_DB_PATH))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_db_path() {
        let cli = Cli::parse_from(["clinic-store", "status"]);
        assert_eq!(
            cli.get_db_path(),
            PathBuf::from(crate::storage::DEFAULT_DB_PATH)
        );
    }

    #[test]
    fn test_db_path_override() {
        let cli = Cli::parse_from(["clinic-store", "-d", "/tmp/x.db", "status"]);
        assert_eq!(cli.get_db_path(), PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn test_exec_collects_params() {
        let cli = Cli::parse_from([
            "clinic-store",
            "exec",
            "SELECT * FROM users WHERE id = ?",
            "u1",
        ]);
        match cli.command {
            Commands::Exec { sql, params } => {
                assert!(sql.starts_with("SELECT"));
                assert_eq!(params, vec!["u1".to_string()]);
            }
            _ => panic!("expected exec"),
        }
    }

    #[test]
    fn test_nearby_accepts_negative_coordinates() {
        let cli = Cli::parse_from(["clinic-store", "nearby", "37.7749", "-122.4194"]);
        match cli.command {
            Commands::Nearby { lat, lon, limit } => {
                assert!((lat - 37.7749).abs() < f64::EPSILON);
                assert!((lon + 122.4194).abs() < f64::EPSILON);
                assert_eq!(limit, 10);
            }
            _ => panic!("expected nearby"),
        }
    }
}
