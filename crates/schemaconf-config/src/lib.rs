//! # schemaconf-config — Schema-Governed Configuration
//!
//! [`Config`] owns one schema, one config document, the property table
//! derived from them and the descriptor of where the document came from.
//!
//! ```no_run
//! use schemaconf_config::Config;
//! use serde_json::json;
//!
//! # fn main() -> schemaconf_config::Result<()> {
//! let mut config = Config::open("settings.yaml", "settings.schema.json")?;
//! let port = config.get("server_port")?.clone();
//! config.set("server_port", json!(8081))?;
//! config.save(None)?;
//! # let _ = port;
//! # Ok(())
//! # }
//! ```
//!
//! ## Lifecycle
//!
//! 1. [`Config::load`] normalizes the config (and optionally a new schema),
//!    validates the whole document and only then commits schema, state,
//!    property table and source descriptor together.
//! 2. [`Config::get`] / [`Config::set`] address leaves by flattened name.
//!    `set` validates the value against the leaf's own schema and either
//!    applies it or leaves the previous value untouched.
//! 3. [`Config::save`] serializes the state in the format it was loaded
//!    from and replaces the target file atomically.
//!
//! ## Concurrency
//!
//! Everything is synchronous. A `Config` is plain owned data; share it
//! across threads behind your own lock.

mod config;
mod persist;
mod store;

pub use config::Config;
pub use schemaconf_core::{Format, Result, SchemaconfError, Source, SourceDescriptor};
pub use schemaconf_schema::{Property, PropertyTable, Schema, ValidationReport};
