//! YAML configuration for the collation pipeline.
//!
//! All stage settings live in one file, loaded and validated at startup.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "sample edition"
//!
//! tokenizer:
//!   detect_numbering_labels: true
//!   default_language: "la"
//!   punctuation_overrides:
//!     - character: "-"
//!       is_punctuation_inside_word: false
//!     - character: "“"
//!       language: "he"
//!       sticks_to_next: false
//!       sticks_to_previous: true
//!
//! witness:
//!   use_normalized_text: true
//!   swallow_newline_after_no_word_break: true
//!   normalizers: [unicode_nfc, lowercase]
//!
//! diff:
//!   use_parallel: true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use diff::DiffConfig;
use token::{NormalizerKind, TokenizerConfig};
use witness::WitnessConfig;

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

/// Top-level YAML configuration for the collation pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CollatioConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub tokenizer: TokenizerConfig,

    /// Witness builder settings other than the tokenizer
    #[serde(default)]
    pub witness: WitnessYamlConfig,

    #[serde(default)]
    pub diff: DiffConfig,
}

impl CollatioConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: CollatioConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.tokenizer
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("tokenizer: {err}")))?;
        Ok(())
    }

    /// Witness builder configuration with the tokenizer section folded in.
    pub fn witness_config(&self) -> WitnessConfig {
        WitnessConfig {
            tokenizer: self.tokenizer.clone(),
            use_normalized_text: self.witness.use_normalized_text,
            swallow_newline_after_no_word_break: self.witness.swallow_newline_after_no_word_break,
            normalizers: self.witness.normalizers.clone(),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl Default for CollatioConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            tokenizer: TokenizerConfig::default(),
            witness: WitnessYamlConfig::default(),
            diff: DiffConfig::default(),
        }
    }
}

/// Witness builder YAML section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WitnessYamlConfig {
    #[serde(default = "true_value")]
    pub use_normalized_text: bool,

    #[serde(default = "true_value")]
    pub swallow_newline_after_no_word_break: bool,

    /// Word normalizers, applied in order before collating.
    #[serde(default)]
    pub normalizers: Vec<NormalizerKind>,
}

impl Default for WitnessYamlConfig {
    fn default() -> Self {
        Self {
            use_normalized_text: true,
            swallow_newline_after_no_word_break: true,
            normalizers: Vec::new(),
        }
    }
}

fn true_value() -> bool {
    true
}
