//! # Source Formats
//!
//! Detects the on-disk format of a schema or config document from its file
//! extension and converts between text and the canonical
//! [`serde_json::Value`] tree.
//!
//! ## Canonical Form
//!
//! JSON is the canonical in-memory representation. YAML documents are
//! parsed with `serde_yaml` and converted into the equivalent JSON tree:
//! tags are dropped, scalar keys are stringified and non-finite floats are
//! rejected. Mappings keep their insertion order on both sides.
//!
//! ## Output
//!
//! JSON is written with 4-space indentation, YAML in `serde_yaml` block
//! style. Neither escapes non-ASCII text. Both end with a newline.

use std::fmt;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, SchemaconfError};

/// File formats a document can be read from and written back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// RFC 8259 JSON (`.json`).
    Json,
    /// YAML mapping/sequence/scalar subset (`.yaml`, `.yml`).
    Yaml,
}

impl Format {
    /// Infer the format from a path's extension, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaconfError::Config`] for a missing or unsupported
    /// extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "" => Err(SchemaconfError::config(format!(
                "cannot infer format of '{}': no file extension",
                path.display()
            ))),
            other => Err(SchemaconfError::config(format!(
                "unsupported file extension '.{other}' for '{}' (expected .json, .yaml or .yml)",
                path.display()
            ))),
        }
    }

    /// Parse document text into the canonical value tree.
    ///
    /// `source_name` is only used to label parse errors.
    pub fn parse(self, text: &str, source_name: &str) -> Result<Value> {
        match self {
            Self::Json => serde_json::from_str(text).map_err(|e| SchemaconfError::Parse {
                source_name: source_name.to_string(),
                reason: format!("invalid JSON: {e}"),
            }),
            Self::Yaml => {
                let yaml: serde_yaml::Value =
                    serde_yaml::from_str(text).map_err(|e| SchemaconfError::Parse {
                        source_name: source_name.to_string(),
                        reason: format!("invalid YAML: {e}"),
                    })?;
                yaml_into_json(yaml).map_err(|reason| SchemaconfError::Parse {
                    source_name: source_name.to_string(),
                    reason: format!("YAML-to-JSON conversion failed: {reason}"),
                })
            }
        }
    }

    /// Serialize a value tree into document text.
    pub fn serialize(self, value: &Value) -> Result<String> {
        let mut text = match self {
            Self::Json => {
                let mut buf = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
                let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
                value
                    .serialize(&mut ser)
                    .map_err(|e| SchemaconfError::Io(e.into()))?;
                String::from_utf8(buf)
                    .map_err(|e| SchemaconfError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?
            }
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| SchemaconfError::Io(io::Error::other(e)))?,
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}

/// Read and parse a document file, inferring its format from the extension.
///
/// # Errors
///
/// - [`SchemaconfError::Config`] if the extension is not supported.
/// - [`SchemaconfError::NotFound`] if the file does not exist.
/// - [`SchemaconfError::Parse`] if the text is malformed.
/// - [`SchemaconfError::Io`] for any other read failure.
pub fn read_document(path: &Path) -> Result<(Format, Value)> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SchemaconfError::NotFound {
            path: path.to_path_buf(),
        },
        _ => SchemaconfError::Io(e),
    })?;
    let value = format.parse(&text, &path.display().to_string())?;
    Ok((format, value))
}

/// Rebuild a parsed YAML tree as a JSON value tree, consuming it.
///
/// Tags are dropped. Scalar mapping keys become their string form; any
/// other key is rejected, as is a float JSON cannot carry (NaN, infinity).
fn yaml_into_json(yaml: serde_yaml::Value) -> std::result::Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(flag) => Value::Bool(flag),
        Yaml::Number(number) => Value::Number(yaml_number(&number)?),
        Yaml::String(text) => Value::String(text),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_into_json)
                .collect::<std::result::Result<_, _>>()?,
        ),
        Yaml::Mapping(entries) => {
            let mut object = serde_json::Map::with_capacity(entries.len());
            for (key, value) in entries {
                object.insert(yaml_key(key)?, yaml_into_json(value)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_into_json(tagged.value)?,
    })
}

/// Integers keep their exact value; everything else goes through `f64`.
fn yaml_number(number: &serde_yaml::Number) -> std::result::Result<serde_json::Number, String> {
    if let Some(int) = number.as_i64() {
        return Ok(int.into());
    }
    if let Some(uint) = number.as_u64() {
        return Ok(uint.into());
    }
    number
        .as_f64()
        .and_then(serde_json::Number::from_f64)
        .ok_or_else(|| format!("number {number} has no JSON representation"))
}

fn yaml_key(key: serde_yaml::Value) -> std::result::Result<String, String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(text) => Ok(text),
        Yaml::Number(number) => Ok(number.to_string()),
        Yaml::Bool(flag) => Ok(flag.to_string()),
        other => Err(format!("mapping key {other:?} is not a scalar")),
    }
}
