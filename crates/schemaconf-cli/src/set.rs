//! # Set Subcommand
//!
//! Validates one property against its schema, assigns it and writes the
//! config file back in its original format.

use std::path::PathBuf;

use clap::Args;
use schemaconf_config::Config;
use serde_json::Value;

use crate::EXIT_OK;

/// Arguments for the set subcommand.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Config file (.json, .yaml or .yml); rewritten in place.
    pub config: PathBuf,

    /// Flattened property name, e.g. `server_tls_port`.
    pub property: String,

    /// New value as JSON. Text that is not valid JSON is taken as a string.
    pub value: String,

    /// Schema file (.json, .yaml or .yml).
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Always treat the value as a string, even if it parses as JSON.
    #[arg(long)]
    pub string: bool,
}

/// Run the set subcommand.
pub fn run_set(args: &SetArgs) -> anyhow::Result<u8> {
    let mut config = Config::open(&args.config, &args.schema)?;
    config.set(&args.property, parse_value(&args.value, args.string))?;
    let path = config.save(None)?;
    tracing::info!(property = %args.property, path = %path.display(), "property updated");
    Ok(EXIT_OK)
}

fn parse_value(text: &str, force_string: bool) -> Value {
    if force_string {
        return Value::String(text.to_string());
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
