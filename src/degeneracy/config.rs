// Thresholds for degeneracy detection
//
// Defaults are compiled in; a TOML file can override any subset of them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors loading or validating a [`DegeneracyConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Configuration for the degeneracy analyzer
///
/// # Example
/// ```
/// use codex_canon::degeneracy::DegeneracyConfig;
///
/// let config = DegeneracyConfig::default();
/// assert_eq!(config.window_size, 50);
/// assert_eq!(config.compression_threshold, 0.30);
///
/// let config = DegeneracyConfig::from_toml_str("window_size = 20").unwrap();
/// assert_eq!(config.window_size, 20);
/// assert_eq!(config.min_consecutive, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DegeneracyConfig {
    /// Bytes per analysis window; consecutive windows overlap by half
    ///
    /// Default: 50
    pub window_size: usize,

    /// NCD below which two consecutive windows count as near-identical
    ///
    /// Default: 0.15
    pub similarity_threshold: f64,

    /// Consecutive near-identical window pairs needed to declare a plateau
    ///
    /// Default: 3
    pub min_consecutive: usize,

    /// Global compression ratio below which the sequence is degenerate
    ///
    /// Default: 0.30
    pub compression_threshold: f64,

    /// Entropy estimate below which the sequence is degenerate
    ///
    /// Default: 0.50
    pub entropy_threshold: f64,
}

impl Default for DegeneracyConfig {
    fn default() -> Self {
        Self {
            window_size: 50,
            similarity_threshold: 0.15,
            min_consecutive: 3,
            compression_threshold: 0.30,
            entropy_threshold: 0.50,
        }
    }
}

impl DegeneracyConfig {
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Parse overrides from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load overrides from a TOML file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject values the analyzer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.min_consecutive == 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_consecutive",
                reason: "must be at least 1".to_string(),
            });
        }
        for (field, value) in [
            ("similarity_threshold", self.similarity_threshold),
            ("compression_threshold", self.compression_threshold),
            ("entropy_threshold", self.entropy_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be a finite non-negative number, got {}", value),
                });
            }
        }
        Ok(())
    }
}
