//! Field-level reads and writes against the property table.

use schemaconf_core::{Result, SchemaconfError};
use schemaconf_schema::{validate, ValidationReport};
use serde_json::{Map, Value};

use crate::config::Config;

static NULL: Value = Value::Null;

impl Config {
    /// Current value of a leaf property.
    ///
    /// A declared leaf that is absent from the state reads as `null`.
    ///
    /// # Errors
    ///
    /// [`SchemaconfError::UnknownProperty`] for names that are not
    /// materialized leaves, including intermediate object paths.
    pub fn get(&self, name: &str) -> Result<&Value> {
        let property = self.table.lookup(name)?;
        Ok(property.locate(&self.state).unwrap_or(&NULL))
    }

    /// True if the leaf is present in the state.
    pub fn is_set(&self, name: &str) -> Result<bool> {
        let property = self.table.lookup(name)?;
        Ok(property.locate(&self.state).is_some())
    }

    /// Validate `value` against the leaf's schema and assign it.
    ///
    /// Missing intermediate objects are created. On any error the state is
    /// left exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`SchemaconfError::UnknownProperty`] for unknown names.
    /// - [`SchemaconfError::SchemaValidation`] if the value violates the
    ///   leaf's schema, or an ancestor in the state is not an object.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let property = self.table.lookup(name)?;
        let schema = self.require_schema()?;
        let subschema = schema.subschema(property.node()).ok_or_else(|| {
            SchemaconfError::InvalidSchema {
                reason: format!(
                    "schema node '{}' for property '{name}' is missing from the document",
                    property.node().pointer()
                ),
            }
        })?;

        if let Err(e) = validate::validate(&value, subschema)?.into_result(name) {
            tracing::warn!(property = name, error = %e, "set rejected");
            return Err(e);
        }

        assign(&mut self.state, property.segments(), value, name)?;
        tracing::debug!(property = name, "property set");
        Ok(())
    }

    /// Assign many leaves at once without per-field validation.
    ///
    /// Meant for values that already come from the schema, such as
    /// defaults. Names must still be known leaves; if any name or
    /// assignment fails, nothing is applied.
    pub fn update<I, K>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut staged = self.state.clone();
        for (name, value) in values {
            let name = name.as_ref();
            let property = self.table.lookup(name)?;
            assign(&mut staged, property.segments(), value, name)?;
        }
        self.state = staged;
        Ok(())
    }

    /// Re-run whole-document validation of the current state.
    pub fn revalidate(&self) -> Result<()> {
        self.validation_report()?.into_result("")
    }

    /// Every violation of the current state against the current schema.
    pub fn validation_report(&self) -> Result<ValidationReport> {
        let schema = self.require_schema()?;
        validate::validate(&self.state, schema.document())
    }

    /// `default` annotations of all leaves, by flattened name.
    pub fn defaults(&self) -> Vec<(String, Value)> {
        self.table.defaults()
    }

    /// Fill every absent leaf that declares a `default`.
    ///
    /// Returns the number of leaves filled.
    pub fn apply_defaults(&mut self) -> Result<usize> {
        let missing: Vec<(String, Value)> = self
            .table
            .defaults()
            .into_iter()
            .filter(|(name, _)| {
                self.table
                    .get(name)
                    .and_then(|p| p.locate(&self.state))
                    .is_none()
            })
            .collect();
        let filled = missing.len();
        self.update(missing)?;
        Ok(filled)
    }
}

/// Write `value` at `segments`, creating missing intermediate objects.
///
/// The path is checked before anything is touched, so a failure leaves
/// `state` unchanged.
fn assign(state: &mut Value, segments: &[String], value: Value, name: &str) -> Result<()> {
    let Some((leaf, parents)) = segments.split_last() else {
        return Err(SchemaconfError::UnknownProperty {
            name: name.to_string(),
        });
    };
    ensure_assignable(state, parents, name)?;

    let mut current = state;
    for key in parents {
        current = match current {
            Value::Object(map) => map
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new())),
            _ => return Err(blocked(name, parents)),
        };
    }
    match current {
        Value::Object(map) => {
            map.insert(leaf.clone(), value);
            Ok(())
        }
        _ => Err(blocked(name, parents)),
    }
}

fn ensure_assignable(state: &Value, parents: &[String], name: &str) -> Result<()> {
    let mut current = state;
    for (depth, key) in parents.iter().enumerate() {
        let Value::Object(map) = current else {
            return Err(blocked(name, &parents[..depth]));
        };
        match map.get(key) {
            Some(next) => current = next,
            None => return Ok(()),
        }
    }
    match current {
        Value::Object(_) => Ok(()),
        _ => Err(blocked(name, parents)),
    }
}

fn blocked(name: &str, at: &[String]) -> SchemaconfError {
    let location = if at.is_empty() {
        "(root)".to_string()
    } else {
        at.join(".")
    };
    SchemaconfError::SchemaValidation {
        path: name.to_string(),
        message: format!("cannot assign through non-object value at '{location}'"),
    }
}
