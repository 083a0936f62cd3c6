//! Shared fixtures for the config integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use schemaconf_config::Format;
use serde_json::{json, Value};

/// The reference config document.
pub fn test_config() -> Value {
    json!({
        "name": "홍길동",
        "cellphone": "010-1345-7764",
        "address": "이상국 행복리 234",
        "age": 33,
        "test_1": [1, 2, 3],
        "test_2": {
            "test3": {
                "test4": 1,
                "test5": 2
            },
            "test6": "Hello World"
        }
    })
}

/// Schema describing [`test_config`], in the shape a schema generator
/// would infer from it.
pub fn test_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/schema#",
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "cellphone": {"type": "string"},
            "address": {"type": "string"},
            "age": {"type": "integer"},
            "test_1": {"type": "array", "items": {"type": "integer"}},
            "test_2": {
                "type": "object",
                "properties": {
                    "test3": {
                        "type": "object",
                        "properties": {
                            "test4": {"type": "integer"},
                            "test5": {"type": "integer"}
                        },
                        "required": ["test4", "test5"]
                    },
                    "test6": {"type": "string"}
                },
                "required": ["test3", "test6"]
            }
        },
        "required": ["address", "age", "cellphone", "name", "test_1", "test_2"]
    })
}

/// A document violating [`test_schema`] in several places.
pub fn wrong_config() -> Value {
    json!({
        "name": 123,
        "cellphone": "010-1345-7764",
        "address": "이상국 행복리 234",
        "age": "33",
        "test_1": [1, 2, 3],
        "test_2": {
            "test3": {
                "test4": 1,
                "test5": 2
            },
            "test6": 2222
        }
    })
}

/// Write `value` to `dir/file_name` in the format implied by the extension.
pub fn write_document(dir: &Path, file_name: &str, value: &Value) -> PathBuf {
    let path = dir.join(file_name);
    let format = Format::from_path(&path).unwrap();
    std::fs::write(&path, format.serialize(value).unwrap()).unwrap();
    path
}
