//! CLI command implementations

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::ServiceConfig;
use crate::http_server::{in_memory_state, HttpServer};
use crate::logging;
use crate::schema::{product_schema, Schema, SchemaMode};
use crate::validation::validate_value;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, write_json, write_lines};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Validate { schema, payload } => validate(&schema, &payload),
        Command::Schema { mode } => print_schema(mode.into()),
    }
}

/// Loads the configuration, or defaults when no path is given.
pub fn load_config(config_path: Option<&Path>, port: Option<u16>) -> CliResult<ServiceConfig> {
    let mut config = match config_path {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(port) = port {
        config.http.port = port;
        config.validate()?;
    }
    Ok(config)
}

/// Start the HTTP handlers over in-memory backends
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let config = load_config(config_path, port)?;
    logging::init(&config.log);

    let (state, _backends) = in_memory_state(config)?;
    let server = HttpServer::new(state);
    info!(addr = %server.socket_addr(), "starting server");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(server.start())?;

    Ok(())
}

/// Validate a payload file; prints `valid` or one message per line.
pub fn validate(schema_path: &Path, payload_path: &Path) -> CliResult<()> {
    let messages = check_payload(schema_path, payload_path)?;
    match messages {
        None => write_lines(["valid"]),
        Some(messages) => {
            write_lines(&messages)?;
            Err(CliError::Invalid(messages.len()))
        }
    }
}

/// Validation messages for a payload file, `None` when valid.
pub fn check_payload(schema_path: &Path, payload_path: &Path) -> CliResult<Option<Vec<String>>> {
    let text = fs::read_to_string(schema_path)?;
    let schema = Schema::from_avro_str(&schema_path.display().to_string(), &text)?;
    let payload = read_json_file(payload_path)?;
    Ok(validate_value(&schema, &payload))
}

/// Print the product schema as Avro JSON
pub fn print_schema(mode: SchemaMode) -> CliResult<()> {
    let schema = product_schema(mode)?;
    write_json(&schema.to_avro_json())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const ITEM_SCHEMA: &str = r#"{
        "type": "record",
        "name": "item",
        "fields": [
            {"name": "id", "type": "string"},
            {"name": "tags", "type": {"type": "array", "items": "string"}}
        ]
    }"#;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_check_payload_valid() {
        let dir = TempDir::new().unwrap();
        let schema = write_file(&dir, "item.avsc", ITEM_SCHEMA);
        let payload = write_file(&dir, "ok.json", r#"{"id": "a", "tags": []}"#);
        assert_eq!(check_payload(&schema, &payload).unwrap(), None);
    }

    #[test]
    fn test_check_payload_reports_messages() {
        let dir = TempDir::new().unwrap();
        let schema = write_file(&dir, "item.avsc", ITEM_SCHEMA);
        let payload = write_file(&dir, "bad.json", r#"{"tags": ["a"], "extra": 1}"#);
        assert_eq!(
            check_payload(&schema, &payload).unwrap(),
            Some(vec![
                "Missing required field \"id\"".to_string(),
                "Forbidden field extra".to_string(),
            ])
        );
    }

    #[test]
    fn test_validate_exits_with_error_when_invalid() {
        let dir = TempDir::new().unwrap();
        let schema = write_file(&dir, "item.avsc", ITEM_SCHEMA);
        let payload = write_file(&dir, "bad.json", r#"{}"#);
        assert!(matches!(validate(&schema, &payload), Err(CliError::Invalid(2))));
    }

    #[test]
    fn test_load_config_port_override() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"http": {{"port": 7000}}}}"#).unwrap();
        let config = load_config(Some(file.path()), Some(7100)).unwrap();
        assert_eq!(config.http.port, 7100);
        assert!(matches!(load_config(None, Some(0)), Err(CliError::Config(_))));
    }
}
