//! # Validate Subcommand
//!
//! Checks a config file against a schema and prints every violation, not
//! just the first one `load` would stop at.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use schemaconf_core::Source;
use schemaconf_schema::{validate, PropertyTable, Schema};

use crate::{EXIT_INVALID, EXIT_OK};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Config file (.json, .yaml or .yml).
    pub config: PathBuf,

    /// Schema file (.json, .yaml or .yml).
    #[arg(short, long)]
    pub schema: PathBuf,
}

/// Run the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> anyhow::Result<u8> {
    let schema = Schema::from_file(&args.schema)
        .with_context(|| format!("loading schema {}", args.schema.display()))?;
    PropertyTable::materialize(&schema)
        .with_context(|| format!("flattening schema {}", args.schema.display()))?;
    let (_, document) = Source::from(&args.config)
        .resolve()
        .with_context(|| format!("loading config {}", args.config.display()))?;

    let report = validate::validate(&document, schema.document())?;
    if report.is_valid() {
        println!("OK: {}", args.config.display());
        return Ok(EXIT_OK);
    }

    println!(
        "FAIL: {} ({} violation{})",
        args.config.display(),
        report.len(),
        if report.len() == 1 { "" } else { "s" }
    );
    for violation in report.violations() {
        println!("  {violation}");
    }
    Ok(EXIT_INVALID)
}
