//! Configuration fragment type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{MergeError, ValueKind};

/// A partial bundler configuration: a JSON object with optional
/// `module.rules`, `plugins`, scalar settings and nested sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fragment(Map<String, Value>);

impl Fragment {
    /// The empty fragment, identity element of every merge.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, MergeError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(MergeError::NotAnObject(ValueKind::of(&other))),
        }
    }

    /// Fragment holding a single `module.rules` list.
    pub fn with_rules(rules: Vec<Value>) -> Self {
        let mut module = Map::new();
        module.insert("rules".to_string(), Value::Array(rules));
        let mut map = Map::new();
        map.insert("module".to_string(), Value::Object(module));
        Self(map)
    }

    /// Fragment holding a single `plugins` list.
    pub fn with_plugins(plugins: Vec<Value>) -> Self {
        let mut map = Map::new();
        map.insert("plugins".to_string(), Value::Array(plugins));
        Self(map)
    }

    /// Set a top-level key, returning the fragment.
    pub fn set(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get a value by dot-separated path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Get a value as string by dot-separated path
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    /// The `module.rules` list, empty if absent.
    pub fn rules(&self) -> &[Value] {
        self.get("module.rules")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The `plugins` list, empty if absent.
    pub fn plugins(&self) -> &[Value] {
        self.get("plugins")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Serialize to JSON (pretty printed)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<Map<String, Value>> for Fragment {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
