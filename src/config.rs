//! Analysis configuration.
//!
//! Configuration is read from TOML. Every field has a default, so an empty
//! file, a missing section or a missing field all fall back to the values
//! below.

use crate::analysis::SearchLimits;
use crate::graph::factory::DEFAULT_AUB;
use crate::report::listing::ListingOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Loads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalysisConfig {
    /// Address unit bits of memory maps that declare none.
    #[serde(default = "default_aub")]
    pub default_aub: u64,

    #[serde(default = "default_max_paths")]
    pub max_paths: usize,

    /// Maximum number of interfaces on one path.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl AnalysisConfig {
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_paths: self.max_paths,
            max_depth: self.max_depth,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let limits = SearchLimits::default();
        Self {
            default_aub: DEFAULT_AUB,
            max_paths: limits.max_paths,
            max_depth: limits.max_depth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub include_registers: bool,

    #[serde(default = "default_true")]
    pub include_fields: bool,
}

impl OutputConfig {
    pub fn listing_options(&self) -> ListingOptions {
        ListingOptions {
            include_registers: self.include_registers,
            include_fields: self.include_fields,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include_registers: true,
            include_fields: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_aub() -> u64 {
    DEFAULT_AUB
}

fn default_max_paths() -> usize {
    SearchLimits::default().max_paths
}

fn default_max_depth() -> usize {
    SearchLimits::default().max_depth
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}
