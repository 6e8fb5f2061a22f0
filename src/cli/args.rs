//! CLI argument definitions using clap
//!
//! Commands:
//! - retail-oms serve [--config <path>] [--port <n>]
//! - retail-oms validate --schema <path> --payload <path>
//! - retail-oms schema [--mode backend|frontend]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::schema::SchemaMode;

/// retail-oms - schema-validated retail event handlers
#[derive(Parser, Debug)]
#[command(name = "retail-oms")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP handlers
    Serve {
        /// Path to configuration file; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured HTTP port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate a JSON payload against an Avro schema document
    Validate {
        /// Path to the Avro schema (.avsc / .json)
        #[arg(long)]
        schema: PathBuf,

        /// Path to the JSON payload
        #[arg(long)]
        payload: PathBuf,
    },

    /// Print the product Avro schema
    Schema {
        #[arg(long, value_enum, default_value_t = ModeArg::Backend)]
        mode: ModeArg,
    },
}

/// Product schema variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Backend,
    Frontend,
}

impl From<ModeArg> for SchemaMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Backend => SchemaMode::Backend,
            ModeArg::Frontend => SchemaMode::Frontend,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
