//! # Get Subcommand

use std::path::PathBuf;

use clap::Args;
use schemaconf_config::Config;
use serde_json::Value;

use crate::EXIT_OK;

/// Arguments for the get subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Config file (.json, .yaml or .yml).
    pub config: PathBuf,

    /// Flattened property name, e.g. `server_tls_port`.
    pub property: String,

    /// Schema file (.json, .yaml or .yml).
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Print strings without JSON quoting.
    #[arg(long)]
    pub raw: bool,
}

/// Run the get subcommand.
pub fn run_get(args: &GetArgs) -> anyhow::Result<u8> {
    let config = Config::open(&args.config, &args.schema)?;
    let value = config.get(&args.property)?;
    println!("{}", render(value, args.raw)?);
    Ok(EXIT_OK)
}

fn render(value: &Value, raw: bool) -> anyhow::Result<String> {
    match value {
        Value::String(s) if raw => Ok(s.clone()),
        other => Ok(serde_json::to_string(other)?),
    }
}
