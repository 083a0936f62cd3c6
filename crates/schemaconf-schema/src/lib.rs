//! # schemaconf-schema — Schema Trees, Validation & Flattening
//!
//! ## Loading (`schema`)
//!
//! [`Schema`] normalizes a mapping, JSON file or YAML file into a typed
//! tree of [`SchemaNode`]s while keeping the raw document around for the
//! validator. The root must be an object node with a `properties` map.
//!
//! ## Validation (`validate`)
//!
//! One routine, [`validate`], checks an instance against any schema
//! subtree using the `jsonschema` crate. Whole-document validation is that
//! routine applied at the root; field validation applies it at a leaf.
//!
//! ## Flattening (`properties`)
//!
//! [`PropertyTable::materialize`] walks the object nodes of a schema and
//! registers every leaf under the underscore-joined chain of its ancestor
//! keys (`test_2.test3.test4` becomes `test_2_test3_test4`). Object nodes
//! are navigation-only. Two leaves flattening to the same name is a fatal
//! error.
//!
//! ## Crate Policy
//!
//! - Depends only on `schemaconf-core` internally.
//! - `$ref` is never resolved against the network or the filesystem.

pub mod properties;
pub mod schema;
pub mod validate;

pub use properties::{Property, PropertyTable};
pub use schema::{Schema, SchemaNode, SchemaType};
pub use validate::{validate, ValidationReport, Violation};
