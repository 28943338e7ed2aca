//! Boolean-or-named option values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An option that is off, on, or on with a specific named variant
/// (`hot: "only"`, `open: "/some/page"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Switch {
    #[default]
    Off,
    On,
    Named(String),
}

impl Switch {
    pub fn named(name: impl Into<String>) -> Self {
        Switch::Named(name.into())
    }

    /// `On` and `Named` both count as enabled.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Switch::Off)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Switch::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl From<bool> for Switch {
    fn from(flag: bool) -> Self {
        if flag {
            Switch::On
        } else {
            Switch::Off
        }
    }
}

impl From<&str> for Switch {
    fn from(name: &str) -> Self {
        Switch::Named(name.to_string())
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Switch::Off => write!(f, "false"),
            Switch::On => write!(f, "true"),
            Switch::Named(name) => write!(f, "{:?}", name),
        }
    }
}

impl Serialize for Switch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Switch::Off => serializer.serialize_bool(false),
            Switch::On => serializer.serialize_bool(true),
            Switch::Named(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for Switch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Name(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Flag(flag) => Switch::from(flag),
            Repr::Name(name) => Switch::Named(name),
        })
    }
}
