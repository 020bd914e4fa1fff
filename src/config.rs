//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - config.toml (default configuration)
//! - config.local.toml (git-ignored local overrides)
//! - Environment variables (WEARABLE_INGEST_* prefix)
//!
//! ## Example
//!
//! ```toml
//! # config.toml
//! [validation]
//! missing_required = "reject"
//! enforce_types = true
//!
//! [classifier]
//! reference_date = "2024-03-01"
//!
//! [schema]
//! catalog_path = "/etc/wearable-ingest/catalog.json"
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! WEARABLE_INGEST_VALIDATION__MISSING_REQUIRED=sentinel
//! WEARABLE_INGEST_INGEST__NUM_THREADS=4
//! ```

use chrono::NaiveDate;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const ENV_PREFIX: &str = "WEARABLE_INGEST_";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub schema: SchemaConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Row validation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// What to do with a row whose REQUIRED column is missing. A malformed
    /// REQUIRED value always rejects the row.
    #[serde(default)]
    pub missing_required: MissingRequiredPolicy,

    /// Check values against column types (false = presence checks only)
    #[serde(default = "default_true")]
    pub enforce_types: bool,
}

/// Handling of REQUIRED-column errors in the corrected row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingRequiredPolicy {
    /// Fill the column with the sentinel `0` and keep the row
    #[default]
    Sentinel,
    /// Report the row but leave it out of the corrected payload
    Reject,
}

/// Classifier settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Date stamped on snapshot endpoints (profile, devices, friends,
    /// lifetime stats). Unset = current UTC date at startup.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

/// Schema catalog source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// JSON catalog replacing the built-in one
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

/// Fetch-job processing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Worker threads for endpoint classification (0 = rayon default)
    #[serde(default)]
    pub num_threads: usize,

    /// Rows per file chunk when exporting JSONL
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_true() -> bool {
    true
}
fn default_chunk_size() -> usize {
    100
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. config.toml (base configuration)
    /// 2. config.local.toml (local overrides, git-ignored)
    /// 3. Environment variables (WEARABLE_INGEST_* prefix)
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Toml::file("config.local.toml"))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    /// Load configuration from specific file path
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            missing_required: MissingRequiredPolicy::Sentinel,
            enforce_types: true,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            num_threads: 0,
            chunk_size: default_chunk_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
