//! Merge errors.

use serde_json::Value;
use std::fmt;

/// Coarse shape of a JSON value, used when reporting conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Scalar,
    Sequence,
    Mapping,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Array(_) => ValueKind::Sequence,
            Value::Object(_) => ValueKind::Mapping,
            _ => ValueKind::Scalar,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Scalar => "scalar",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
        }
    }

    /// Sequences and mappings are containers; they never silently swallow
    /// a value of another kind under [`crate::ConflictPolicy::Reject`].
    pub fn is_container(&self) -> bool {
        matches!(self, ValueKind::Sequence | ValueKind::Mapping)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while composing fragments
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("Type conflict at `{path}`: cannot merge a {right} into a {left}")]
    TypeConflict {
        path: String,
        left: ValueKind,
        right: ValueKind,
    },

    #[error("Fragment must be a JSON object, got a {0}")]
    NotAnObject(ValueKind),
}
