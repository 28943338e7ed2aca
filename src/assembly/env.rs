//! Environment toggles read once per invocation.

use std::env;
use std::fmt;
use std::str::FromStr;

/// A final configuration variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Development,
    Production,
}

impl Profile {
    /// `production` selects [`Profile::Production`]; anything else,
    /// including an unset variable, selects development.
    pub fn from_node_env(node_env: Option<&str>) -> Self {
        match node_env {
            Some("production") => Profile::Production,
            _ => Profile::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Production => "production",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            other => Err(format!("unknown profile: {}", other)),
        }
    }
}

/// Environment toggles consumed by assembly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyEnv {
    /// `NODE_ENV`
    pub node_env: Option<String>,

    /// `WEBPACK_MONITOR=true` adds the build monitor to production
    pub monitor: bool,

    /// `POLL`: set and non-empty enables watch polling, set and empty
    /// disables it, unset leaves the dev server default
    pub poll: Option<bool>,
}

impl AssemblyEnv {
    /// Read toggles from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read toggles through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            node_env: lookup("NODE_ENV"),
            monitor: lookup("WEBPACK_MONITOR").as_deref() == Some("true"),
            poll: lookup("POLL").map(|value| !value.is_empty()),
        }
    }

    pub fn profile(&self) -> Profile {
        Profile::from_node_env(self.node_env.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> AssemblyEnv {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AssemblyEnv::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_profile_from_node_env() {
        assert_eq!(Profile::from_node_env(Some("production")), Profile::Production);
        assert_eq!(Profile::from_node_env(Some("development")), Profile::Development);
        assert_eq!(Profile::from_node_env(Some("test")), Profile::Development);
        assert_eq!(Profile::from_node_env(None), Profile::Development);
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!("prod".parse::<Profile>(), Ok(Profile::Production));
        assert_eq!("development".parse::<Profile>(), Ok(Profile::Development));
        assert!("staging".parse::<Profile>().is_err());
    }

    #[test]
    fn test_empty_environment() {
        let env = env_of(&[]);
        assert_eq!(env, AssemblyEnv::default());
        assert_eq!(env.profile(), Profile::Development);
    }

    #[test]
    fn test_toggles() {
        let env = env_of(&[
            ("NODE_ENV", "production"),
            ("WEBPACK_MONITOR", "true"),
            ("POLL", "1"),
        ]);

        assert_eq!(env.profile(), Profile::Production);
        assert!(env.monitor);
        assert_eq!(env.poll, Some(true));
    }

    #[test]
    fn test_monitor_requires_literal_true() {
        assert!(!env_of(&[("WEBPACK_MONITOR", "1")]).monitor);
        assert_eq!(env_of(&[("POLL", "")]).poll, Some(false));
    }
}
