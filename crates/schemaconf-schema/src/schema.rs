//! # Schema Loading
//!
//! Normalizes a schema source into a typed tree of [`SchemaNode`]s.
//!
//! The supported vocabulary is `type`, `properties`, `items` and
//! `required`, plus the `default` and `description` annotations. Other
//! keywords are left in the raw document, where the validator still sees
//! them, but do not shape the tree.
//!
//! Every node remembers its JSON pointer inside the schema document so the
//! raw subtree can be handed to the validator without cloning the document
//! per node.

use std::fmt;
use std::path::Path;

use schemaconf_core::{Result, SchemaconfError, Source};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validate;

/// The `type` keywords understood by the materializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl SchemaType {
    /// The keyword as it appears in a schema document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pointer: String,
    types: Vec<SchemaType>,
    properties: Option<Vec<(String, SchemaNode)>>,
    required: Vec<String>,
    items: Option<Box<SchemaNode>>,
    default: Option<Value>,
    description: Option<String>,
}

impl SchemaNode {
    fn parse(value: &Value, pointer: String) -> Result<Self> {
        let obj = match value {
            Value::Object(obj) => obj,
            // Boolean schemas accept everything (`true`) or nothing (`false`);
            // either way they are untyped leaves.
            Value::Bool(_) => {
                return Ok(Self::untyped(pointer));
            }
            other => {
                return Err(invalid(format!(
                    "schema node at '{}' must be an object, found {}",
                    display_pointer(&pointer),
                    json_kind(other)
                )))
            }
        };

        let types = match obj.get("type") {
            None => Vec::new(),
            Some(Value::String(name)) => vec![parse_type(name, &pointer)?],
            Some(Value::Array(names)) => names
                .iter()
                .map(|n| match n {
                    Value::String(name) => parse_type(name, &pointer),
                    other => Err(invalid(format!(
                        "'type' entries at '{}' must be strings, found {}",
                        display_pointer(&pointer),
                        json_kind(other)
                    ))),
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(invalid(format!(
                    "'type' at '{}' must be a string or an array of strings, found {}",
                    display_pointer(&pointer),
                    json_kind(other)
                )))
            }
        };

        let properties = match obj.get("properties") {
            None => None,
            Some(Value::Object(children)) => {
                let mut parsed = Vec::with_capacity(children.len());
                for (key, child) in children {
                    let child_pointer =
                        format!("{pointer}/properties/{}", escape_pointer_token(key));
                    parsed.push((key.clone(), Self::parse(child, child_pointer)?));
                }
                Some(parsed)
            }
            Some(other) => {
                return Err(invalid(format!(
                    "'properties' at '{}' must be a map, found {}",
                    display_pointer(&pointer),
                    json_kind(other)
                )))
            }
        };

        let required = match obj.get("required") {
            None => Vec::new(),
            Some(Value::Array(keys)) => keys
                .iter()
                .map(|k| {
                    k.as_str().map(str::to_string).ok_or_else(|| {
                        invalid(format!(
                            "'required' at '{}' must list strings, found {}",
                            display_pointer(&pointer),
                            json_kind(k)
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(invalid(format!(
                    "'required' at '{}' must be an array, found {}",
                    display_pointer(&pointer),
                    json_kind(other)
                )))
            }
        };

        // Tuple-form `items` is left to the validator.
        let items = match obj.get("items") {
            Some(items @ (Value::Object(_) | Value::Bool(_))) => {
                Some(Box::new(Self::parse(items, format!("{pointer}/items"))?))
            }
            _ => None,
        };

        Ok(Self {
            pointer,
            types,
            properties,
            required,
            items,
            default: obj.get("default").cloned(),
            description: obj
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    fn untyped(pointer: String) -> Self {
        Self {
            pointer,
            types: Vec::new(),
            properties: None,
            required: Vec::new(),
            items: None,
            default: None,
            description: None,
        }
    }

    /// JSON pointer of this node inside the schema document (`""` for the root).
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Declared types; empty when the node does not constrain the type.
    pub fn types(&self) -> &[SchemaType] {
        &self.types
    }

    /// True when the node is declared with `"type": "object"` and nothing else.
    pub fn is_object(&self) -> bool {
        self.types == [SchemaType::Object]
    }

    /// True for object nodes that declare their own `properties`. These are
    /// walked through during flattening and never exposed as properties.
    pub fn is_branch(&self) -> bool {
        self.is_object() && self.properties.is_some()
    }

    /// Child nodes in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.properties
            .iter()
            .flatten()
            .map(|(key, node)| (key.as_str(), node))
    }

    /// Look up a direct child by key.
    pub fn property(&self, key: &str) -> Option<&SchemaNode> {
        self.properties()
            .find_map(|(k, node)| (k == key).then_some(node))
    }

    /// Keys listed under `required`.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// The `items` node of an array schema, when given as a single schema.
    pub fn items(&self) -> Option<&SchemaNode> {
        self.items.as_deref()
    }

    /// The `default` annotation, if present.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The `description` annotation, if present.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Short type label for listings, e.g. `integer` or `string|null`.
    pub fn type_label(&self) -> String {
        if self.types.is_empty() {
            return "any".to_string();
        }
        self.types
            .iter()
            .map(SchemaType::as_str)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// A loaded schema: the raw document plus its typed tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    document: Value,
    root: SchemaNode,
}

impl Schema {
    /// Build a schema from an in-memory document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaconfError::InvalidSchema`] if the root is not an
    /// object node with a `properties` map, if any node is malformed, or if
    /// the validator cannot compile the document.
    pub fn from_value(document: Value) -> Result<Self> {
        let root = SchemaNode::parse(&document, String::new())?;
        if !root.is_object() {
            return Err(invalid(format!(
                "root schema must have \"type\": \"object\", found '{}'",
                root.type_label()
            )));
        }
        if root.properties.is_none() {
            return Err(invalid("root schema must declare a 'properties' map"));
        }
        validate::compile(&document)?;

        tracing::debug!(
            properties = root.properties().count(),
            "schema tree normalized"
        );
        Ok(Self { document, root })
    }

    /// Load a schema from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(Source::File(path.as_ref().to_path_buf()))
    }

    /// Load a schema from any [`Source`].
    pub fn load(source: impl Into<Source>) -> Result<Self> {
        let source = source.into();
        let name = source.name();
        let (_, document) = source.resolve()?;
        let schema = Self::from_value(document)?;
        tracing::debug!(source = %name, "schema loaded");
        Ok(schema)
    }

    /// The raw schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The root node of the typed tree.
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// The raw subtree a node was parsed from.
    pub fn subschema(&self, node: &SchemaNode) -> Option<&Value> {
        self.document.pointer(node.pointer())
    }
}

fn parse_type(name: &str, pointer: &str) -> Result<SchemaType> {
    serde_json::from_value(Value::String(name.to_string())).map_err(|_| {
        invalid(format!(
            "unsupported type '{name}' at '{}'",
            display_pointer(pointer)
        ))
    })
}

fn invalid(reason: impl Into<String>) -> SchemaconfError {
    SchemaconfError::InvalidSchema {
        reason: reason.into(),
    }
}

fn display_pointer(pointer: &str) -> &str {
    if pointer.is_empty() {
        "(root)"
    } else {
        pointer
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Escape a map key for use as a JSON pointer token (RFC 6901).
pub(crate) fn escape_pointer_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
