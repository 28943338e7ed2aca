//! Opaque plugin instances.

use serde_json::{Map, Value};

/// A plugin instance: constructor name plus constructor arguments.
///
/// Serialized as `{"plugin": name, "id": id, "args": [...]}`; `id` is only
/// present on shared instances handed out by the extraction registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Plugin {
    name: String,
    id: Option<String>,
    args: Vec<Value>,
}

impl Plugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            args: Vec::new(),
        }
    }

    /// Append a constructor argument.
    pub fn arg(mut self, value: Value) -> Self {
        self.args.push(value);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("plugin".to_string(), Value::String(self.name.clone()));
        if let Some(ref id) = self.id {
            map.insert("id".to_string(), Value::String(id.clone()));
        }
        if !self.args.is_empty() {
            map.insert("args".to_string(), Value::Array(self.args.clone()));
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plugin_without_args() {
        assert_eq!(
            Plugin::new("NoEmitOnErrorsPlugin").to_value(),
            json!({"plugin": "NoEmitOnErrorsPlugin"})
        );
    }

    #[test]
    fn test_plugin_with_id_and_args() {
        let plugin = Plugin::new("MiniCssExtractPlugin")
            .with_id("extract:default")
            .arg(json!({"filename": "[name].css"}));

        assert_eq!(plugin.id(), Some("extract:default"));
        assert_eq!(
            plugin.to_value(),
            json!({
                "plugin": "MiniCssExtractPlugin",
                "id": "extract:default",
                "args": [{"filename": "[name].css"}]
            })
        );
    }
}
