//! # Error Types
//!
//! All failures in schemaconf are deterministic given their inputs, so
//! there is no retryable class here. Every variant carries enough context
//! (offending path, human-readable reason) for a caller to react without
//! inspecting internals.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used across the workspace.
pub type Result<T, E = SchemaconfError> = std::result::Result<T, E>;

/// Top-level error type for schemaconf.
#[derive(Error, Debug)]
pub enum SchemaconfError {
    /// Source text was not well-formed JSON or YAML.
    #[error("parse error in {source_name}: {reason}")]
    Parse {
        /// File path or `<mapping>` for in-memory sources.
        source_name: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A schema or config file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// A document or a single field violated its schema.
    #[error("schema validation failed at {path}: {message}")]
    SchemaValidation {
        /// JSON pointer of the violating instance (`(root)` for the
        /// document itself) or the flattened property name for field sets.
        path: String,
        /// Validator diagnostic.
        message: String,
    },

    /// A flattened property name is not part of the property table.
    /// Intermediate object paths are never materialized and land here too.
    #[error("unknown property '{name}'")]
    UnknownProperty {
        /// The requested property name.
        name: String,
    },

    /// The schema document is structurally unusable.
    #[error("invalid schema: {reason}")]
    InvalidSchema {
        /// What is wrong with the schema.
        reason: String,
    },

    /// Two distinct schema leaves flatten to the same property name.
    #[error("property path collision on '{path}': {first} and {second}")]
    PathCollision {
        /// The flattened name both leaves produce.
        path: String,
        /// JSON pointer of the leaf registered first.
        first: String,
        /// JSON pointer of the leaf that collided with it.
        second: String,
    },

    /// Structural misuse: no schema loaded, no save target, unsupported
    /// file extension.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error while reading or writing a document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaconfError {
    /// Build a [`SchemaconfError::Config`] from anything displayable.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for the `SchemaValidation` variant.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::SchemaValidation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display_carries_path_and_message() {
        let err = SchemaconfError::SchemaValidation {
            path: "/age".to_string(),
            message: r#""33" is not of type "integer""#.to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("/age"));
        assert!(display.contains("is not of type"));
        assert!(err.is_validation());
    }

    #[test]
    fn not_found_display_shows_path() {
        let err = SchemaconfError::NotFound {
            path: PathBuf::from("/tmp/missing.yaml"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.yaml");
        assert!(!err.is_validation());
    }

    #[test]
    fn collision_display_names_both_leaves() {
        let err = SchemaconfError::PathCollision {
            path: "a_b".to_string(),
            first: "/properties/a_b".to_string(),
            second: "/properties/a/properties/b".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("'a_b'"));
        assert!(display.contains("/properties/a/properties/b"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SchemaconfError = io.into();
        assert!(matches!(err, SchemaconfError::Io(_)));
    }
}
