//! YAML configuration file support for Jivvy concept tagging.
//!
//! One file configures the concept matcher and the batch tagger. Every
//! section is optional and falls back to the library defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # Jivvy tagging configuration
//! version: "1.0"
//! name: "biology-101"
//!
//! concepts:
//!   version: 1
//!   max_matches: 5
//!   normalize_unicode: true
//!
//! tagging:
//!   parallel: true
//!   parallel_threshold: 64
//! ```

use std::fs;
use std::path::Path;

use concepts::ConceptMatchConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tagger::TaggerConfig;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JivvyConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Concept normalization and matching
    #[serde(default)]
    pub concepts: ConceptMatchConfig,

    /// Batch tagging
    #[serde(default)]
    pub tagging: TaggingYamlConfig,
}

impl JivvyConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), name = ?config.name, "loaded tagging config");
        Ok(config)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: JivvyConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.concepts
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("concepts: {err}")))?;
        self.tagger_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("tagging: {err}")))?;

        Ok(())
    }

    /// Runtime configuration for [`QuizTagger`](crate::QuizTagger).
    pub fn tagger_config(&self) -> TaggerConfig {
        TaggerConfig {
            matching: self.concepts.clone(),
            parallel: self.tagging.parallel,
            parallel_threshold: self.tagging.parallel_threshold,
        }
    }
}

impl Default for JivvyConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            concepts: ConceptMatchConfig::default(),
            tagging: TaggingYamlConfig::default(),
        }
    }
}

/// Batch tagging YAML configuration
///
/// The matcher settings live in the `concepts` section, so this only carries
/// the batching knobs of [`TaggerConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggingYamlConfig {
    #[serde(default)]
    pub parallel: bool,

    /// Smallest batch that is worth spreading across the rayon pool
    #[serde(default = "TaggerConfig::default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for TaggingYamlConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            parallel_threshold: TaggerConfig::default_parallel_threshold(),
        }
    }
}
