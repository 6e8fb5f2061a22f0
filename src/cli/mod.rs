//! CLI module for retail-oms
//!
//! Provides command-line interface for:
//! - serve: Run the HTTP handlers
//! - validate: Check a JSON payload against an Avro schema file
//! - schema: Print the product schema

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ModeArg};
pub use commands::{check_payload, load_config, print_schema, run, run_command, serve, validate};
pub use errors::{CliError, CliResult};
