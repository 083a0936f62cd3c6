//! # schemaconf-cli — Command-Line Front End
//!
//! ## Subcommands
//!
//! - `schemaconf validate <config> --schema <schema>` — report every
//!   violation of a config file.
//! - `schemaconf get <config> --schema <schema> <property>` — print one
//!   flattened property as JSON.
//! - `schemaconf set <config> --schema <schema> <property> <value>` —
//!   validate and assign one property, then save the file in place.
//! - `schemaconf properties --schema <schema>` — list the property table.
//!
//! Handlers return the process exit code; argument parsing lives in
//! `main.rs`.

pub mod get;
pub mod properties;
pub mod set;
pub mod validate;

/// Exit code for success.
pub const EXIT_OK: u8 = 0;

/// Exit code when a document fails validation.
pub const EXIT_INVALID: u8 = 1;
