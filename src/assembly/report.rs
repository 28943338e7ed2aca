//! Assembly report
//!
//! Summary of one assembly run: what was built, from which settings layers,
//! and a content fingerprint of the final configuration.

use chrono::{DateTime, Utc};
use fragment_merge::Fragment;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::AssemblyError;
use crate::settings::SettingsSource;

/// Schema identifier
pub const SCHEMA_ID: &str = "webpack-parts/assembly_report@1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyReport {
    pub schema_id: String,

    /// `development`, `production` or `library`
    pub target: String,

    pub created_at: DateTime<Utc>,

    /// Settings layers in precedence order
    pub sources: Vec<SettingsSource>,

    /// SHA-256 of the canonical JSON form of the configuration
    pub fingerprint: String,

    /// Number of `module.rules` entries
    pub rules: usize,

    pub plugins: usize,
}

impl AssemblyReport {
    pub fn new(
        target: impl Into<String>,
        config: &Fragment,
        sources: Vec<SettingsSource>,
    ) -> Result<Self, AssemblyError> {
        Ok(Self {
            schema_id: SCHEMA_ID.to_string(),
            target: target.into(),
            created_at: Utc::now(),
            sources,
            fingerprint: fingerprint(config)?,
            rules: config.rules().len(),
            plugins: config.plugins().len(),
        })
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Key order does not affect the fingerprint.
pub fn fingerprint(config: &Fragment) -> Result<String, AssemblyError> {
    let canonical = serde_json_canonicalizer::to_vec(config)
        .map_err(|e| AssemblyError::Fingerprint(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(hex::encode(hasher.finalize()))
}
