//! Loading and ownership of schema + config state.

use schemaconf_core::{Result, SchemaconfError, Source, SourceDescriptor};
use schemaconf_schema::{validate, PropertyTable, Schema};
use serde_json::{Map, Value};

/// A schema-governed configuration document.
///
/// Schema, state, property table and source descriptor are replaced as a
/// unit by every successful load; a failed load leaves all four untouched.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) schema: Option<Schema>,
    pub(crate) state: Value,
    pub(crate) table: PropertyTable,
    pub(crate) source: SourceDescriptor,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// An empty instance with no schema and an empty state.
    pub fn new() -> Self {
        Self {
            schema: None,
            state: Value::Object(Map::new()),
            table: PropertyTable::default(),
            source: SourceDescriptor::mapping(),
        }
    }

    /// Build an instance from a config source and a schema source.
    pub fn open(config: impl Into<Source>, schema: impl Into<Source>) -> Result<Self> {
        let mut this = Self::new();
        this.load(config, Some(schema.into()))?;
        Ok(this)
    }

    /// Load a config document, optionally together with a new schema.
    ///
    /// Without `schema` the currently loaded schema is reused. The whole
    /// document is validated before anything is committed.
    ///
    /// # Errors
    ///
    /// - [`SchemaconfError::Config`] if no schema is given and none is loaded,
    ///   or a file extension is unsupported.
    /// - [`SchemaconfError::NotFound`] / [`SchemaconfError::Parse`] for
    ///   unreadable sources.
    /// - [`SchemaconfError::InvalidSchema`] / [`SchemaconfError::PathCollision`]
    ///   if the schema cannot be used.
    /// - [`SchemaconfError::SchemaValidation`] if the document violates the
    ///   schema.
    pub fn load(&mut self, config: impl Into<Source>, schema: Option<Source>) -> Result<()> {
        let config = config.into();
        let config_name = config.name();

        let new_schema = schema.map(Schema::load).transpose()?;
        let active = new_schema
            .as_ref()
            .or(self.schema.as_ref())
            .ok_or_else(|| {
                SchemaconfError::config(format!(
                    "cannot load '{config_name}': no schema given and none loaded"
                ))
            })?;

        let (descriptor, state) = config.resolve()?;
        if let Err(e) = validate::validate(&state, active.document())?.into_result("") {
            tracing::warn!(source = %config_name, error = %e, "config rejected by schema");
            return Err(e);
        }
        let table = PropertyTable::materialize(active)?;

        if let Some(schema) = new_schema {
            self.schema = Some(schema);
        }
        self.state = state;
        self.table = table;
        self.source = descriptor;

        tracing::debug!(
            source = %config_name,
            properties = self.table.len(),
            "config loaded"
        );
        Ok(())
    }

    /// Replace the schema and rebuild the property table.
    ///
    /// The config state is kept as-is; call [`Config::revalidate`] to check
    /// it against the new schema.
    pub fn load_schema(&mut self, source: impl Into<Source>) -> Result<()> {
        let schema = Schema::load(source)?;
        let table = PropertyTable::materialize(&schema)?;
        self.schema = Some(schema);
        self.table = table;
        Ok(())
    }

    /// The loaded schema, if any.
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// The whole config state.
    pub fn value(&self) -> &Value {
        &self.state
    }

    /// The materialized property table.
    pub fn table(&self) -> &PropertyTable {
        &self.table
    }

    /// Where the current state was loaded from.
    pub fn source(&self) -> &SourceDescriptor {
        &self.source
    }

    /// Flattened property names in schema declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.table.names()
    }

    /// True if `name` is a materialized leaf property.
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains(name)
    }

    pub(crate) fn require_schema(&self) -> Result<&Schema> {
        self.schema
            .as_ref()
            .ok_or_else(|| SchemaconfError::config("no schema loaded"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "age": {"type": "integer"},
                "nested": {
                    "type": "object",
                    "properties": {"flag": {"type": "boolean"}}
                }
            },
            "required": ["age"]
        })
    }

    #[test]
    fn new_is_empty() {
        let config = Config::new();
        assert!(config.schema().is_none());
        assert_eq!(config.value(), &json!({}));
        assert_eq!(config.properties().count(), 0);
        assert!(config.source().is_mapping());
    }

    #[test]
    fn open_commits_everything() {
        let config = Config::open(json!({"age": 33}), schema()).unwrap();
        assert_eq!(config.schema().unwrap().document(), &schema());
        assert_eq!(config.value(), &json!({"age": 33}));
        assert_eq!(
            config.properties().collect::<Vec<_>>(),
            vec!["age", "nested_flag"]
        );
        assert!(config.contains("nested_flag"));
        assert!(!config.contains("nested"));
    }

    #[test]
    fn load_without_any_schema_is_config_error() {
        let mut config = Config::new();
        let err = config.load(json!({"age": 1}), None).unwrap_err();
        assert!(matches!(err, SchemaconfError::Config(_)), "got: {err}");
    }

    #[test]
    fn load_reuses_current_schema() {
        let mut config = Config::open(json!({"age": 1}), schema()).unwrap();
        config.load(json!({"age": 2}), None).unwrap();
        assert_eq!(config.value(), &json!({"age": 2}));
    }

    #[test]
    fn failed_load_keeps_previous_state_and_schema() {
        let mut config = Config::open(json!({"age": 1}), schema()).unwrap();
        let other_schema = json!({
            "type": "object",
            "properties": {"name": {"type": "string"}},
            "required": ["name"]
        });

        let err = config
            .load(json!({"age": "one"}), Some(other_schema.into()))
            .unwrap_err();
        assert!(err.is_validation(), "got: {err}");
        assert_eq!(config.value(), &json!({"age": 1}));
        assert_eq!(config.schema().unwrap().document(), &schema());
        assert!(config.contains("age"));
        assert!(!config.contains("name"));
    }

    #[test]
    fn bad_schema_source_keeps_previous_state() {
        let mut config = Config::open(json!({"age": 1}), schema()).unwrap();
        let err = config
            .load(json!({"age": 2}), Some(json!({"type": "string"}).into()))
            .unwrap_err();
        assert!(matches!(err, SchemaconfError::InvalidSchema { .. }), "got: {err}");
        assert_eq!(config.value(), &json!({"age": 1}));
    }

    #[test]
    fn colliding_schema_is_rejected_on_load() {
        let colliding = json!({
            "type": "object",
            "properties": {
                "a_b": {"type": "integer"},
                "a": {"type": "object", "properties": {"b": {"type": "integer"}}}
            }
        });
        let mut config = Config::new();
        let err = config.load(json!({}), Some(colliding.into())).unwrap_err();
        assert!(matches!(err, SchemaconfError::PathCollision { .. }), "got: {err}");
        assert!(config.schema().is_none());
    }

    #[test]
    fn load_schema_keeps_state() {
        let mut config = Config::open(json!({"age": 1}), schema()).unwrap();
        config
            .load_schema(json!({
                "type": "object",
                "properties": {"age": {"type": "string"}}
            }))
            .unwrap();
        assert_eq!(config.value(), &json!({"age": 1}));
        assert!(config.revalidate().is_err());
    }
}
