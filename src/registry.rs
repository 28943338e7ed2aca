//! Extraction sink registry.
//!
//! Style extraction parts share one plugin instance per output bucket, so
//! that `.css` and `.scss` rules targeting the same bucket end up in the same
//! file. A registry lives for exactly one assembly run.

use std::collections::BTreeMap;
use tracing::debug;

use crate::parts::Plugin;

/// Bucket used when a part does not name one.
pub const DEFAULT_BUCKET: &str = "default";

/// A sink handed out by [`ExtractRegistry::acquire`].
#[derive(Debug, Clone)]
pub struct Sink {
    /// The shared plugin instance (carries its id)
    pub plugin: Plugin,
    /// True only for the call that constructed the instance
    pub created: bool,
}

impl Sink {
    pub fn id(&self) -> &str {
        self.plugin.id().unwrap_or(DEFAULT_BUCKET)
    }
}

/// Run-scoped map from bucket name to extraction plugin instance.
#[derive(Debug, Default)]
pub struct ExtractRegistry {
    sinks: BTreeMap<String, Plugin>,
}

impl ExtractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instance id for a bucket
    pub fn sink_id(bucket: Option<&str>) -> String {
        format!("extract:{}", bucket.unwrap_or(DEFAULT_BUCKET))
    }

    /// Return the bucket's instance, constructing it with `make` on first use.
    pub fn acquire<F>(&mut self, bucket: Option<&str>, make: F) -> Sink
    where
        F: FnOnce() -> Plugin,
    {
        let key = bucket.unwrap_or(DEFAULT_BUCKET).to_string();

        if let Some(existing) = self.sinks.get(&key) {
            debug!(bucket = %key, "reusing extraction sink");
            return Sink {
                plugin: existing.clone(),
                created: false,
            };
        }

        let plugin = make().with_id(Self::sink_id(bucket));
        debug!(bucket = %key, plugin = plugin.name(), "created extraction sink");
        self.sinks.insert(key, plugin.clone());
        Sink {
            plugin,
            created: true,
        }
    }

    pub fn get(&self, bucket: Option<&str>) -> Option<&Plugin> {
        self.sinks.get(bucket.unwrap_or(DEFAULT_BUCKET))
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}
