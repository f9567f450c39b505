//! CLI commands and argument parsing
//!
//! This module defines the command-line interface structure using clap.
//! The commands load a JSON document into a config store and print or
//! validate it.

use crate::config::{ConfigBuilder, LoginConfig};
use crate::error::{KvconfError, Result};
use crate::store::{split_envelope, ValueStore, ValueType};
use crate::utils::format::{DisplayUtils, OutputFormat, TableFormatter};
use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand};
use serde_json::Value as JsonValue;
use std::io::Read;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "kvconf")]
#[command(about = "Inspect and validate JSON key-value configs")]
#[command(version, author)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true, env = "KVCONF_DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table", env = "KVCONF_FORMAT")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where a command reads its config from
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// JSON file to read, or '-' for stdin
    pub input: String,

    /// Name for the loaded config
    #[arg(long, default_value = "config", conflicts_with = "envelope")]
    pub name: String,

    /// Input is a serialized store ({"name": ..., "map": {...}})
    #[arg(long)]
    pub envelope: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every entry of a config
    Show {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print a single value
    Get {
        #[command(flatten)]
        input: InputArgs,
        /// Key to look up
        key: String,
        /// Fail unless the value has exactly this type
        #[arg(long = "type", value_parser = parse_value_type)]
        value_type: Option<ValueType>,
    },
    /// Check that required fields are present
    Check {
        #[command(flatten)]
        input: InputArgs,
        /// Field that must be present (repeatable)
        #[arg(short, long)]
        require: Vec<String>,
        /// Field that must have a type, as key=type (repeatable)
        #[arg(long, value_parser = parse_key_type)]
        require_type: Vec<(String, ValueType)>,
        /// Freeze the config before validating
        #[arg(long)]
        freeze: bool,
    },
    /// Validate a login config (requires 'token')
    Login {
        /// JSON file to read, or '-' for stdin
        input: String,
    },
}

fn parse_value_type(s: &str) -> std::result::Result<ValueType, String> {
    ValueType::parse(s).ok_or_else(|| format!("unknown value type: '{s}'"))
}

fn parse_key_type(s: &str) -> std::result::Result<(String, ValueType), String> {
    let (key, ty) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid key=type: no '=' found in '{s}'"))?;
    Ok((key.to_string(), parse_value_type(ty)?))
}

/// Read and parse a JSON document from a path or stdin
pub fn read_json(input: &str) -> Result<JsonValue> {
    let contents = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)?
    };
    Ok(serde_json::from_str(&contents)?)
}

impl InputArgs {
    /// Config name and entry payload of the input
    pub fn payload(&self) -> Result<(String, JsonValue)> {
        let json = read_json(&self.input)?;
        if !self.envelope {
            return Ok((self.name.clone(), json));
        }
        let (name, map) = split_envelope(&json)?;
        Ok((name.to_string(), map.clone()))
    }

    pub fn load_store(&self) -> Result<ValueStore> {
        let json = read_json(&self.input)?;
        if self.envelope {
            return ValueStore::from_serialized(&json);
        }
        let store = ValueStore::new(self.name.as_str());
        store.put_all_from_structured(&json)?;
        Ok(store)
    }
}

impl Cli {
    /// Run the command and print its output
    pub fn execute(&self) -> Result<()> {
        let output = self.render()?;
        println!("{output}");
        Ok(())
    }

    /// Run the command and return its output
    pub fn render(&self) -> Result<String> {
        let formatter = TableFormatter::new(self.format, self.no_color);
        let display = DisplayUtils::new(self.no_color);

        match &self.command {
            Commands::Show { input } => {
                let store = input.load_store()?;
                debug!(config = %store.name(), entries = store.len(), "loaded config");
                formatter.format_store(&store)
            }
            Commands::Get {
                input,
                key,
                value_type,
            } => {
                let store = input.load_store()?;
                let value = store.get(key)?;
                if let Some(ty) = value_type {
                    if !value.is_type(*ty) {
                        return Err(KvconfError::wrong_type(key, ty.name()));
                    }
                }
                formatter.format_value(&value)
            }
            Commands::Check {
                input,
                require,
                require_type,
                freeze,
            } => {
                let (name, payload) = input.payload()?;
                let mut builder = ConfigBuilder::new(name).frozen(*freeze);
                for field in require {
                    builder = builder.require(field.as_str());
                }
                for (field, ty) in require_type {
                    builder = builder.require_type(field.as_str(), *ty);
                }

                let store = builder.build(&payload)?;
                info!(config = %store.name(), "config is valid");
                Ok(display.success(&format!(
                    "Config '{}' is valid ({} entries, {} requirements)",
                    store.name(),
                    store.len(),
                    builder.requirements().len()
                )))
            }
            Commands::Login { input } => {
                let login = LoginConfig::from_json(&read_json(input)?, true)?;
                info!("login config is valid");
                Ok(display.success(&format!(
                    "Login config is valid ({} entries)",
                    login.len()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn run(args: &[&str]) -> Result<String> {
        let mut argv = vec!["kvconf", "--no-color"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().render()
    }

    #[test]
    fn test_show_table() {
        let file = json_file(r#"{"token": "abc123", "retries": 3}"#);
        let output = run(&["show", file.path().to_str().unwrap()]).unwrap();
        assert!(output.contains("abc123"));
        assert!(output.contains("retries"));
    }

    #[test]
    fn test_show_json_envelope() {
        let file = json_file(r#"{"name": "login", "map": {"token": "abc"}}"#);
        let output = run(&[
            "--format",
            "json",
            "show",
            "--envelope",
            file.path().to_str().unwrap(),
        ])
        .unwrap();
        let parsed: JsonValue = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["name"], "login");
        assert_eq!(parsed["map"]["token"], "abc");
    }

    #[test]
    fn test_get_with_type() {
        let file = json_file(r#"{"token": "abc123"}"#);
        let path = file.path().to_str().unwrap();

        assert_eq!(run(&["get", path, "token", "--type", "string"]).unwrap(), "abc123");
        assert!(matches!(
            run(&["get", path, "token", "--type", "integer"]),
            Err(KvconfError::WrongType { .. })
        ));
        assert!(matches!(
            run(&["get", path, "missing"]),
            Err(KvconfError::NotFound { .. })
        ));
    }

    #[test]
    fn test_check_requirements() {
        let file = json_file(r#"{"host": "localhost", "port": 5432}"#);
        let path = file.path().to_str().unwrap();

        let output = run(&[
            "check",
            path,
            "--name",
            "db",
            "-r",
            "host",
            "--require-type",
            "port=integer",
        ])
        .unwrap();
        assert_eq!(output, "✓ Config 'db' is valid (2 entries, 2 requirements)");

        assert!(matches!(
            run(&["check", path, "-r", "user"]),
            Err(KvconfError::MissingField { ref field, .. }) if field == "user"
        ));
    }

    #[test]
    fn test_login() {
        let good = json_file(r#"{"user": "bob", "token": "t"}"#);
        assert!(run(&["login", good.path().to_str().unwrap()]).is_ok());

        let bad = json_file(r#"{"user": "bob"}"#);
        assert!(matches!(
            run(&["login", bad.path().to_str().unwrap()]),
            Err(KvconfError::MissingField { ref field, .. }) if field == "token"
        ));
    }

    #[test]
    fn test_rejects_bad_type_name() {
        assert!(Cli::try_parse_from(["kvconf", "get", "f.json", "k", "--type", "decimal"]).is_err());
        assert!(Cli::try_parse_from(["kvconf", "check", "f.json", "--require-type", "port"]).is_err());
    }
}
