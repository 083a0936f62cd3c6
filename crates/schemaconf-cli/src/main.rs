//! # schemaconf CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use schemaconf_cli::get::{run_get, GetArgs};
use schemaconf_cli::properties::{run_properties, PropertiesArgs};
use schemaconf_cli::set::{run_set, SetArgs};
use schemaconf_cli::validate::{run_validate, ValidateArgs};

/// Schema-governed configuration files.
///
/// Validates JSON/YAML config files against a JSON Schema and reads or
/// writes their fields by flattened property name.
#[derive(Parser, Debug)]
#[command(name = "schemaconf", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a config file and report every violation.
    Validate(ValidateArgs),

    /// Print one property of a config file.
    Get(GetArgs),

    /// Validate and assign one property, then save the file in place.
    Set(SetArgs),

    /// List the flattened properties a schema defines.
    Properties(PropertiesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Get(args) => run_get(&args),
        Commands::Set(args) => run_set(&args),
        Commands::Properties(args) => run_properties(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
