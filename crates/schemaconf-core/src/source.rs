//! # Document Sources
//!
//! A schema or config document arrives either as an in-memory mapping or
//! as a path to a JSON/YAML file. [`Source::resolve`] normalizes both into
//! the canonical value tree and reports where the tree came from as a
//! [`SourceDescriptor`], which persistence later uses to write the state
//! back in its original format.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::Result;
use crate::format::{read_document, Format};

/// Label used in diagnostics for in-memory sources.
pub const MAPPING_SOURCE_NAME: &str = "<mapping>";

/// A schema or config document, in memory or on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// An already-parsed nested mapping.
    Mapping(Value),
    /// A `.json`, `.yaml` or `.yml` file.
    File(PathBuf),
}

impl Source {
    /// Normalize the source into a value tree.
    ///
    /// In-memory mappings are taken as-is. Files are read and parsed with
    /// the format inferred from their extension.
    pub fn resolve(self) -> Result<(SourceDescriptor, Value)> {
        match self {
            Self::Mapping(value) => Ok((SourceDescriptor::mapping(), value)),
            Self::File(path) => {
                let (format, value) = read_document(&path)?;
                Ok((SourceDescriptor::file(format, path), value))
            }
        }
    }

    /// Human-readable name for diagnostics.
    pub fn name(&self) -> String {
        match self {
            Self::Mapping(_) => MAPPING_SOURCE_NAME.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

impl From<Value> for Source {
    fn from(value: Value) -> Self {
        Self::Mapping(value)
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl From<&PathBuf> for Source {
    fn from(path: &PathBuf) -> Self {
        Self::File(path.clone())
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Self {
        Self::File(PathBuf::from(path))
    }
}

/// Where the current config state was loaded from.
///
/// `format == None` means the state came from an in-memory mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDescriptor {
    format: Option<Format>,
    path: Option<PathBuf>,
}

impl SourceDescriptor {
    /// Descriptor for an in-memory mapping.
    pub fn mapping() -> Self {
        Self::default()
    }

    /// Descriptor for a file in a known format.
    pub fn file(format: Format, path: impl Into<PathBuf>) -> Self {
        Self {
            format: Some(format),
            path: Some(path.into()),
        }
    }

    /// The recorded file format, `None` for mappings.
    pub fn format(&self) -> Option<Format> {
        self.format
    }

    /// The recorded file path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True when the state came from an in-memory mapping.
    pub fn is_mapping(&self) -> bool {
        self.format.is_none()
    }

    /// Record a new save target. A mapping-backed descriptor adopts the
    /// format implied by the target's extension; a file-backed one keeps
    /// its original format.
    pub fn retarget(&mut self, path: &Path) -> Result<()> {
        if self.format.is_none() {
            self.format = Some(Format::from_path(path)?);
        }
        self.path = Some(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaconfError;
    use serde_json::json;

    #[test]
    fn mapping_resolves_without_io() {
        let (desc, value) = Source::from(json!({"age": 33})).resolve().unwrap();
        assert!(desc.is_mapping());
        assert!(desc.path().is_none());
        assert_eq!(value["age"], 33);
    }

    #[test]
    fn file_resolves_with_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"age": 33}"#).unwrap();

        let (desc, value) = Source::from(&path).resolve().unwrap();
        assert_eq!(desc.format(), Some(Format::Json));
        assert_eq!(desc.path(), Some(path.as_path()));
        assert_eq!(value, json!({"age": 33}));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Source::from(dir.path().join("nope.yaml"))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, SchemaconfError::NotFound { .. }), "got: {err}");
    }

    #[test]
    fn retarget_mapping_adopts_extension_format() {
        let mut desc = SourceDescriptor::mapping();
        desc.retarget(Path::new("out.yml")).unwrap();
        assert_eq!(desc.format(), Some(Format::Yaml));
        assert_eq!(desc.path(), Some(Path::new("out.yml")));
    }

    #[test]
    fn retarget_file_keeps_original_format() {
        let mut desc = SourceDescriptor::file(Format::Json, "in.json");
        desc.retarget(Path::new("copy.txt")).unwrap();
        assert_eq!(desc.format(), Some(Format::Json));
        assert_eq!(desc.path(), Some(Path::new("copy.txt")));
    }

    #[test]
    fn retarget_mapping_rejects_unknown_extension() {
        let mut desc = SourceDescriptor::mapping();
        assert!(desc.retarget(Path::new("out.toml")).is_err());
        assert!(desc.is_mapping());
        assert!(desc.path().is_none());
    }

    #[test]
    fn name_labels_mapping_and_file() {
        assert_eq!(Source::from(json!({})).name(), MAPPING_SOURCE_NAME);
        assert_eq!(Source::from("a/b.json").name(), "a/b.json");
    }
}
