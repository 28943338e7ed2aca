//! Module rule building blocks.

use serde_json::{json, Map, Value};

use super::{check_pattern, PartError};

/// An `include`/`exclude` filter: an absolute path prefix or a regex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Path(String),
    Pattern(String),
}

impl Condition {
    pub fn path(path: impl Into<String>) -> Self {
        Condition::Path(path.into())
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Condition::Pattern(pattern.into())
    }

    /// Paths serialize as strings, patterns as `{"regex": source}`.
    pub fn to_value(&self) -> Value {
        match self {
            Condition::Path(path) => Value::String(path.clone()),
            Condition::Pattern(pattern) => json!({ "regex": pattern }),
        }
    }

    fn validate(&self, part: &'static str, field: &'static str) -> Result<(), PartError> {
        match self {
            Condition::Path(path) if path.is_empty() => {
                Err(PartError::invalid(part, field, "empty path"))
            }
            Condition::Path(_) => Ok(()),
            Condition::Pattern(pattern) => check_pattern(part, field, pattern),
        }
    }
}

/// Include/exclude filters shared by most rule-producing parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub include: Option<Condition>,
    pub exclude: Option<Condition>,
}

impl Scope {
    pub fn include(mut self, condition: Condition) -> Self {
        self.include = Some(condition);
        self
    }

    pub fn exclude(mut self, condition: Condition) -> Self {
        self.exclude = Some(condition);
        self
    }

    /// Everything outside `node_modules`.
    pub fn skip_node_modules() -> Self {
        Self::default().exclude(Condition::pattern("node_modules"))
    }

    pub(crate) fn validate(&self, part: &'static str) -> Result<(), PartError> {
        if let Some(ref include) = self.include {
            include.validate(part, "include")?;
        }
        if let Some(ref exclude) = self.exclude {
            exclude.validate(part, "exclude")?;
        }
        Ok(())
    }
}

/// One processing step of a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Loader(String),
    WithOptions { loader: String, options: Value },
}

impl Step {
    pub fn loader(name: impl Into<String>) -> Self {
        Step::Loader(name.into())
    }

    pub fn with_options(name: impl Into<String>, options: Value) -> Self {
        Step::WithOptions {
            loader: name.into(),
            options,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Step::Loader(name) => name,
            Step::WithOptions { loader, .. } => loader,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Step::Loader(name) => Value::String(name.clone()),
            Step::WithOptions { loader, options } => json!({
                "loader": loader,
                "options": options
            }),
        }
    }
}

/// A `module.rules` entry. Steps run last to first.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    test: String,
    scope: Scope,
    steps: Vec<Step>,
}

impl Rule {
    pub fn new(test: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            scope: Scope::default(),
            steps: Vec::new(),
        }
    }

    pub fn scoped(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn test(&self) -> &str {
        &self.test
    }

    /// Check the test pattern and scope filters.
    pub fn validate(&self, part: &'static str) -> Result<(), PartError> {
        check_pattern(part, "test", &self.test)?;
        self.scope.validate(part)
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("test".to_string(), Value::String(self.test.clone()));
        if let Some(ref include) = self.scope.include {
            map.insert("include".to_string(), include.to_value());
        }
        if let Some(ref exclude) = self.scope.exclude {
            map.insert("exclude".to_string(), exclude.to_value());
        }
        map.insert(
            "use".to_string(),
            Value::Array(self.steps.iter().map(Step::to_value).collect()),
        );
        Value::Object(map)
    }
}
