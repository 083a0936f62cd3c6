//! # Properties Subcommand
//!
//! Lists the flattened property table a schema produces.

use std::path::PathBuf;

use clap::Args;
use schemaconf_schema::{PropertyTable, Schema};
use serde::Serialize;
use serde_json::Value;

use crate::EXIT_OK;

/// Arguments for the properties subcommand.
#[derive(Args, Debug)]
pub struct PropertiesArgs {
    /// Schema file (.json, .yaml or .yml).
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Emit JSON instead of a plain listing.
    #[arg(long)]
    pub json: bool,
}

/// One row of the listing.
#[derive(Debug, Serialize, PartialEq)]
pub struct PropertyRow {
    /// Flattened property name, e.g. `test_2_test3_test4`.
    pub name: String,
    /// Declared type label; a union reads `string|null`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The leaf's `default`, when the schema declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// The leaf's `description`, when the schema declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Build the listing rows for a schema.
pub fn rows(schema: &Schema) -> anyhow::Result<Vec<PropertyRow>> {
    let table = PropertyTable::materialize(schema)?;
    Ok(table
        .iter()
        .map(|p| PropertyRow {
            name: p.name().to_string(),
            kind: p.node().type_label(),
            default: p.node().default_value().cloned(),
            description: p.node().description().map(str::to_string),
        })
        .collect())
}

/// Run the properties subcommand.
pub fn run_properties(args: &PropertiesArgs) -> anyhow::Result<u8> {
    let schema = Schema::from_file(&args.schema)?;
    let rows = rows(&schema)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(EXIT_OK);
    }

    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    for row in &rows {
        match &row.description {
            Some(desc) => println!("{:<width$}  {:<8}  {desc}", row.name, row.kind),
            None => println!("{:<width$}  {}", row.name, row.kind),
        }
    }
    Ok(EXIT_OK)
}
