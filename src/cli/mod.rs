//! CLI layer for clinic-store.
//!
//! Provides the command-line interface using clap, with commands for
//! initializing, populating, and querying the clinic database.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
