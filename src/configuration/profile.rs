//! File-driven merge profiles.

use super::{Configuration, ImmutableConfiguration, PolicyConfiguration};
use crate::merge::{MergeError, Merger, Policy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// ProfileError represents a failure to load or apply a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML profile: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON profile: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// MergeProfile describes a merger: one policy per collection kind and
/// whether merged sequences, sets and mappings are frozen.
///
/// ```yaml
/// rules:
///   sequence: union
///   mapping: override
/// immutable: true
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeProfile {
    pub rules: PolicyConfiguration,
    pub immutable: bool,
}

impl MergeProfile {
    /// Parses a profile from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a profile from JSON.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a profile from disk. `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let profile = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_yaml(&content)?
        };
        tracing::debug!(path = %path.display(), ?profile, "loaded merge profile");
        Ok(profile)
    }

    /// Sets every collection policy to `policy`.
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.rules = PolicyConfiguration::uniform(policy);
        self
    }

    pub fn with_immutable(mut self, immutable: bool) -> Self {
        self.immutable = immutable;
        self
    }

    /// Builds a merger configured by this profile.
    pub fn build(&self) -> Result<Merger, ProfileError> {
        Ok(Merger::configured(self)?)
    }
}

impl Configuration for MergeProfile {
    fn configure(&self, merger: &mut Merger) -> Result<(), MergeError> {
        self.rules.configure(merger)?;
        if self.immutable {
            ImmutableConfiguration.configure(merger)?;
        }
        Ok(())
    }
}
