//! # Schema Validation
//!
//! The single validation engine. [`validate`] checks an instance against
//! any schema subtree: whole-document validation passes the schema root,
//! field validation passes the leaf node's subtree.
//!
//! Validation is backed by the `jsonschema` crate with Draft 7 semantics:
//! type checks, `required` keys and recursion into nested `properties` and
//! `items`.
//!
//! ## Reference Resolution
//!
//! `$ref` is not part of the supported vocabulary. The installed retriever
//! refuses every URI except `json-schema.org` meta-schemas, which resolve
//! locally to an empty schema, so compilation never reaches the network or
//! the filesystem.

use std::fmt;

use jsonschema::{Draft, Retrieve, Uri, Validator};
use schemaconf_core::{Result, SchemaconfError};
use serde_json::Value;

/// Label used for violations at the top of the validated instance.
const ROOT_LABEL: &str = "(root)";

/// Hosts whose documents are JSON Schema meta-schemas. Schema generators
/// stamp `$schema` with URIs such as `http://json-schema.org/schema#`; the
/// draft is pinned, so these resolve to an empty (accept-all) schema.
const META_SCHEMA_PREFIXES: [&str; 2] = ["http://json-schema.org/", "https://json-schema.org/"];

/// Refuses every external reference except meta-schema URIs.
struct NoExternalRefs;

impl Retrieve for NoExternalRefs {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> std::result::Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri = uri.as_str();
        if META_SCHEMA_PREFIXES.iter().any(|p| uri.starts_with(p)) {
            return Ok(serde_json::json!({}));
        }
        Err(format!("external $ref '{uri}' is not supported").into())
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the violating value in the instance.
    pub instance_path: String,
    /// JSON pointer within the schema of the keyword that failed.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "{ROOT_LABEL}: {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Outcome of validating one instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// True if the instance satisfied the schema.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations found.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// All violations in the order the validator reported them.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The first violation, if any.
    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }

    /// Turn the report into a result, surfacing the first violation as
    /// [`SchemaconfError::SchemaValidation`].
    ///
    /// `label` names what was validated; the violation's instance pointer is
    /// appended to it. An empty label reports the bare pointer.
    pub fn into_result(self, label: &str) -> Result<()> {
        let Some(first) = self.violations.into_iter().next() else {
            return Ok(());
        };
        let path = match (label.is_empty(), first.instance_path.is_empty()) {
            (true, true) => ROOT_LABEL.to_string(),
            (true, false) => first.instance_path,
            (false, true) => label.to_string(),
            (false, false) => format!("{label}{}", first.instance_path),
        };
        Err(SchemaconfError::SchemaValidation {
            path,
            message: first.message,
        })
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Compile a schema (sub)tree into a reusable validator.
///
/// # Errors
///
/// Returns [`SchemaconfError::InvalidSchema`] if the tree is not a valid
/// Draft 7 schema or references an external document.
pub fn compile(schema: &Value) -> Result<Validator> {
    let mut opts = jsonschema::options();
    opts.with_draft(Draft::Draft7);
    opts.with_retriever(NoExternalRefs);
    opts.build(schema).map_err(|e| SchemaconfError::InvalidSchema {
        reason: e.to_string(),
    })
}

/// Validate `instance` against a schema (sub)tree and collect violations.
pub fn validate(instance: &Value, schema: &Value) -> Result<ValidationReport> {
    let validator = compile(schema)?;
    Ok(report(&validator, instance))
}

/// Run a compiled validator over an instance.
pub fn report(validator: &Validator, instance: &Value) -> ValidationReport {
    let violations = validator
        .iter_errors(instance)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();
    ValidationReport { violations }
}
