//! # schemaconf-core — Foundational Types
//!
//! Every other `schemaconf-*` crate depends on this one; it depends on
//! nothing internal.
//!
//! ## Contents
//!
//! - [`error`] — the single [`SchemaconfError`] hierarchy shared by the
//!   loaders, the validation engine, the property store and persistence.
//! - [`format`] — source format detection from file extensions and the
//!   JSON / YAML codecs that turn text into a canonical
//!   [`serde_json::Value`] tree and back.
//! - [`source`] — in-memory vs. file sources and the descriptor recorded
//!   for writing state back where it came from.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `schemaconf-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod format;
pub mod source;

pub use error::{Result, SchemaconfError};
pub use format::{read_document, Format};
pub use source::{Source, SourceDescriptor};
