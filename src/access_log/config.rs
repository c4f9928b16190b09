//! Access log configuration.
//!
//! Settings are read from YAML and can then be overridden from the
//! environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `BRRTR_ACCESS_LOG_ENABLED` | `enabled` |
//! | `BRRTR_ACCESS_LOG_PATTERN` | `pattern` |
//! | `BRRTR_ACCESS_LOG_TO_FILE` | `log_to_file` |
//! | `BRRTR_ACCESS_LOG_BASE_FILE_NAME` | `base_file_name` |
//! | `BRRTR_ACCESS_LOG_DIRECTORY` | `log_directory` |
//! | `BRRTR_ACCESS_LOG_SUFFIX` | `log_suffix` |
//! | `BRRTR_ACCESS_LOG_CATEGORY` | `category` |
//! | `BRRTR_ACCESS_LOG_ROTATE` | `rotate` |
//! | `BRRTR_ACCESS_LOG_EXCLUDE_PATTERN` | `exclude_pattern` |
//!
//! ```yaml
//! enabled: true
//! pattern: combined
//! log_to_file: true
//! log_directory: /var/log/pets
//! exclude_pattern: "/health|/metrics"
//! ```

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

fn default_pattern() -> String {
    "common".to_string()
}

fn default_base_file_name() -> String {
    "access".to_string()
}

fn default_log_suffix() -> String {
    ".log".to_string()
}

fn default_category() -> String {
    "brrtrouter.access_log".to_string()
}

fn default_rotate() -> bool {
    true
}

/// Access log settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogConfig {
    /// Whether access logging is on (default: off)
    #[serde(default)]
    pub enabled: bool,

    /// A named pattern (`common`, `combined`, `long`) or a literal pattern
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Write to a file instead of emitting `tracing` events
    #[serde(default)]
    pub log_to_file: bool,

    #[serde(default = "default_base_file_name")]
    pub base_file_name: String,

    /// Directory for the log file; the working directory when unset
    #[serde(default)]
    pub log_directory: Option<PathBuf>,

    #[serde(default = "default_log_suffix")]
    pub log_suffix: String,

    /// Category attached to `tracing` events
    #[serde(default = "default_category")]
    pub category: String,

    /// Daily rotation of the log file
    #[serde(default = "default_rotate")]
    pub rotate: bool,

    /// Requests whose whole path matches this regex are not logged
    #[serde(default)]
    pub exclude_pattern: Option<String>,
}

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            pattern: default_pattern(),
            log_to_file: false,
            base_file_name: default_base_file_name(),
            log_directory: None,
            log_suffix: default_log_suffix(),
            category: default_category(),
            rotate: default_rotate(),
            exclude_pattern: None,
        }
    }
}

impl AccessLogConfig {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse access log config")
    }

    /// Load a YAML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read access log config: {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse access log config: {}", path.display()))
    }

    /// Defaults overridden by `BRRTR_ACCESS_LOG_*`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Override fields from `BRRTR_ACCESS_LOG_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Override fields from any key lookup. Unparseable booleans are logged
    /// and ignored; an empty directory or exclude pattern clears the field.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str, field: &mut bool| {
            if let Some(value) = lookup(key) {
                match parse_bool(&value) {
                    Some(parsed) => *field = parsed,
                    None => warn!(variable = key, value = %value, "Ignoring invalid boolean"),
                }
            }
        };
        flag("BRRTR_ACCESS_LOG_ENABLED", &mut self.enabled);
        flag("BRRTR_ACCESS_LOG_TO_FILE", &mut self.log_to_file);
        flag("BRRTR_ACCESS_LOG_ROTATE", &mut self.rotate);

        if let Some(value) = lookup("BRRTR_ACCESS_LOG_PATTERN") {
            self.pattern = value;
        }
        if let Some(value) = lookup("BRRTR_ACCESS_LOG_BASE_FILE_NAME") {
            self.base_file_name = value;
        }
        if let Some(value) = lookup("BRRTR_ACCESS_LOG_SUFFIX") {
            self.log_suffix = value;
        }
        if let Some(value) = lookup("BRRTR_ACCESS_LOG_CATEGORY") {
            self.category = value;
        }
        if let Some(value) = lookup("BRRTR_ACCESS_LOG_DIRECTORY") {
            self.log_directory = (!value.is_empty()).then(|| PathBuf::from(value));
        }
        if let Some(value) = lookup("BRRTR_ACCESS_LOG_EXCLUDE_PATTERN") {
            self.exclude_pattern = (!value.is_empty()).then_some(value);
        }
    }

    /// Directory the log file goes into
    pub fn directory(&self) -> PathBuf {
        self.log_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
