//! YAML configuration file support.
//!
//! Every stage of a run (ingest, tokenizer, matcher) plus output formatting
//! can be configured from a single YAML file. All sections and fields are
//! optional; anything left out takes its default.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "annotation round 3"
//!
//! ingest:
//!   label_tags: ["manual_label", "auto_label"]
//!   category_keys: ["name", "labelName"]
//!   excluded_attributes: ["style"]
//!   encodings: ["utf-8", "latin-1"]
//!   max_input_bytes: 67108864
//!
//! tokenize:
//!   version: 1
//!   normalize_unicode: false
//!   lowercase: true
//!
//! matcher:
//!   min_overlap: 0.5
//!   parallel: false
//!
//! overview:
//!   label_tags: ["manual_label"]
//!
//! output:
//!   pretty: true
//! ```

use std::fs;
use std::path::Path;

use canonical::TokenizeConfig;
use ingest::IngestConfig;
use matcher::MatchConfig;

use crate::overview::OverviewConfig;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

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

/// Top-level configuration for a labelmatch run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    /// Configuration format version. `version: 1` and `version: "1.0"` are both accepted.
    #[serde(default = "default_version", deserialize_with = "version_string")]
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub tokenize: TokenizeConfig,

    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub overview: OverviewConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: AppConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the version and every stage configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => {}
            v => return Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }

        self.ingest
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("ingest: {err}")))?;
        self.tokenize
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("tokenize: {err}")))?;
        self.matcher
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("matcher: {err}")))?;
        if self.overview.label_tags.is_empty() {
            return Err(ConfigLoadError::Validation(
                "overview: label_tags must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            name: None,
            ingest: IngestConfig::default(),
            tokenize: TokenizeConfig::default(),
            matcher: MatchConfig::default(),
            overview: OverviewConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// How reports are rendered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Indent JSON output.
    #[serde(default = "true_value")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn true_value() -> bool {
    true
}

fn version_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Version {
        Text(String),
        Int(u64),
        Float(f64),
    }

    Ok(match Version::deserialize(deserializer)? {
        Version::Text(text) => text,
        Version::Int(n) => n.to_string(),
        Version::Float(f) if f.fract() == 0.0 => format!("{f:.1}"),
        Version::Float(f) => f.to_string(),
    })
}
