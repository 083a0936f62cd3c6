//! # Property Materialization
//!
//! Flattens a nested schema into a table of leaf properties.
//!
//! Every leaf is registered under the underscore-joined chain of keys from
//! the schema root. An object node that declares `properties` is a branch:
//! it is walked through and never registered itself. Everything else,
//! including arrays and objects without `properties`, is an opaque leaf.
//!
//! Flattened names must be unique. Keys that already contain underscores
//! can collide with deeper paths (`a_b` vs. `a` → `b`); such a collision
//! fails materialization instead of letting one leaf shadow the other.

use std::collections::HashMap;

use schemaconf_core::{Result, SchemaconfError};
use serde_json::Value;

use crate::schema::{Schema, SchemaNode};

/// Separator between ancestor keys in a flattened property name.
pub const PATH_SEPARATOR: &str = "_";

/// A materialized leaf property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    segments: Vec<String>,
    node: SchemaNode,
}

impl Property {
    /// The flattened property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keys leading from the config root to this property's value.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The leaf schema node the property is bound to.
    pub fn node(&self) -> &SchemaNode {
        &self.node
    }

    /// Read the property's value out of a config document.
    ///
    /// Returns `None` when the value, or any object on the way to it, is
    /// absent.
    pub fn locate<'a>(&self, state: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(state, |current, key| current.as_object()?.get(key))
    }
}

/// Flattened name → leaf property, in schema declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyTable {
    properties: Vec<Property>,
    index: HashMap<String, usize>,
}

impl PropertyTable {
    /// Walk a schema and register every leaf property.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaconfError::PathCollision`] if two leaves flatten to
    /// the same name.
    pub fn materialize(schema: &Schema) -> Result<Self> {
        let mut table = Self::default();
        let mut prefix = Vec::new();
        table.walk(schema.root(), &mut prefix)?;
        tracing::debug!(count = table.len(), "property table materialized");
        Ok(table)
    }

    fn walk(&mut self, node: &SchemaNode, prefix: &mut Vec<String>) -> Result<()> {
        for (key, child) in node.properties() {
            prefix.push(key.to_string());
            if child.is_branch() {
                self.walk(child, prefix)?;
            } else {
                self.register(prefix.clone(), child)?;
            }
            prefix.pop();
        }
        Ok(())
    }

    fn register(&mut self, segments: Vec<String>, node: &SchemaNode) -> Result<()> {
        let name = segments.join(PATH_SEPARATOR);
        if let Some(&existing) = self.index.get(&name) {
            return Err(SchemaconfError::PathCollision {
                path: name,
                first: self.properties[existing].node.pointer().to_string(),
                second: node.pointer().to_string(),
            });
        }
        self.index.insert(name.clone(), self.properties.len());
        self.properties.push(Property {
            name,
            segments,
            node: node.clone(),
        });
        Ok(())
    }

    /// Look up a property by flattened name.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.index.get(name).map(|&i| &self.properties[i])
    }

    /// Look up a property, failing for names that are not leaves.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaconfError::UnknownProperty`] for absent names,
    /// including intermediate object paths.
    pub fn lookup(&self, name: &str) -> Result<&Property> {
        self.get(name).ok_or_else(|| SchemaconfError::UnknownProperty {
            name: name.to_string(),
        })
    }

    /// True if `name` is a materialized leaf.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of leaf properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True when the schema has no leaves.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Properties in schema declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// Flattened names in schema declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    /// Name → `default` annotation for every leaf that declares one.
    pub fn defaults(&self) -> Vec<(String, Value)> {
        self.properties
            .iter()
            .filter_map(|p| {
                p.node
                    .default_value()
                    .map(|v| (p.name.clone(), v.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample_schema() -> Schema {
        Schema::from_value(json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer"},
                "test_1": {"type": "array", "items": {"type": "integer"}},
                "test_2": {
                    "type": "object",
                    "properties": {
                        "test3": {
                            "type": "object",
                            "properties": {
                                "test4": {"type": "integer", "default": 1},
                                "test5": {"type": "integer"}
                            }
                        },
                        "test6": {"type": "string"}
                    }
                },
                "raw": {"type": "object"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn flattens_nested_leaves_in_declaration_order() {
        let table = PropertyTable::materialize(&sample_schema()).unwrap();
        let names: Vec<&str> = table.names().collect();
        assert_eq!(
            names,
            vec![
                "name",
                "age",
                "test_1",
                "test_2_test3_test4",
                "test_2_test3_test5",
                "test_2_test6",
                "raw",
            ]
        );
    }

    #[test]
    fn intermediate_objects_are_not_registered() {
        let table = PropertyTable::materialize(&sample_schema()).unwrap();
        assert!(!table.contains("test_2"));
        assert!(!table.contains("test_2_test3"));
        let err = table.lookup("test_2_test3").unwrap_err();
        assert!(matches!(err, SchemaconfError::UnknownProperty { .. }), "got: {err}");
    }

    #[test]
    fn object_without_properties_is_a_leaf() {
        let table = PropertyTable::materialize(&sample_schema()).unwrap();
        let raw = table.lookup("raw").unwrap();
        assert!(raw.node().is_object());
        assert_eq!(raw.segments(), &["raw".to_string()]);
    }

    #[test]
    fn property_binds_segments_and_node() {
        let table = PropertyTable::materialize(&sample_schema()).unwrap();
        let p = table.lookup("test_2_test3_test4").unwrap();
        assert_eq!(p.segments(), &["test_2", "test3", "test4"]);
        assert_eq!(
            p.node().pointer(),
            "/properties/test_2/properties/test3/properties/test4"
        );
    }

    #[test]
    fn locate_reads_nested_values() {
        let table = PropertyTable::materialize(&sample_schema()).unwrap();
        let state = json!({"test_2": {"test3": {"test4": 1, "test5": 2}}});
        let p4 = table.lookup("test_2_test3_test4").unwrap();
        let p6 = table.lookup("test_2_test6").unwrap();
        assert_eq!(p4.locate(&state), Some(&json!(1)));
        assert_eq!(p6.locate(&state), None);
        assert_eq!(p4.locate(&json!({"test_2": 5})), None);
    }

    #[test]
    fn collision_is_fatal() {
        let schema = Schema::from_value(json!({
            "type": "object",
            "properties": {
                "a_b": {"type": "string"},
                "a": {"type": "object", "properties": {"b": {"type": "integer"}}}
            }
        }))
        .unwrap();
        match PropertyTable::materialize(&schema).unwrap_err() {
            SchemaconfError::PathCollision { path, first, second } => {
                assert_eq!(path, "a_b");
                assert_eq!(first, "/properties/a_b");
                assert_eq!(second, "/properties/a/properties/b");
            }
            other => panic!("Expected PathCollision, got: {other}"),
        }
    }

    #[test]
    fn defaults_come_from_annotations() {
        let table = PropertyTable::materialize(&sample_schema()).unwrap();
        assert_eq!(
            table.defaults(),
            vec![("test_2_test3_test4".to_string(), json!(1))]
        );
    }

    #[test]
    fn empty_branch_contributes_nothing() {
        let schema = Schema::from_value(json!({
            "type": "object",
            "properties": {
                "empty": {"type": "object", "properties": {}},
                "x": {"type": "boolean"}
            }
        }))
        .unwrap();
        let table = PropertyTable::materialize(&schema).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["x"]);
    }

    proptest! {
        /// Underscore-free keys never collide, and every leaf is registered.
        #[test]
        fn underscore_free_keys_flatten_uniquely(
            groups in prop::collection::btree_map(
                "[a-z]{1,6}",
                prop::collection::btree_set("[a-z]{1,6}", 1..4),
                1..5,
            )
        ) {
            let properties: serde_json::Map<String, Value> = groups
                .iter()
                .map(|(group, leaves)| {
                    let children: serde_json::Map<String, Value> = leaves
                        .iter()
                        .map(|leaf| (leaf.clone(), json!({"type": "string"})))
                        .collect();
                    (group.clone(), json!({"type": "object", "properties": children}))
                })
                .collect();
            let schema = Schema::from_value(json!({"type": "object", "properties": properties})).unwrap();
            let table = PropertyTable::materialize(&schema).unwrap();

            let expected: usize = groups.values().map(|s| s.len()).sum();
            prop_assert_eq!(table.len(), expected);
            for (group, leaves) in &groups {
                for leaf in leaves {
                    let name = format!("{group}_{leaf}");
                    prop_assert!(table.contains(&name), "missing {}", name);
                }
            }
        }
    }
}
