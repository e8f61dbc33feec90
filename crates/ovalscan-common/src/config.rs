//! Configuration management for OVALScan components

use ovalscan_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Test catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Merge with environment variables (OVALSCAN_ prefix)
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    fn merge_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = var("OVALSCAN_TESTS_DIR") {
            self.catalog.tests_dir = Some(val);
        }
        if let Some(val) = var("OVALSCAN_STRICT") {
            if let Ok(strict) = val.parse() {
                self.catalog.strict = strict;
            }
        }

        if let Some(val) = var("OVALSCAN_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = var("OVALSCAN_LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Some(val) = var("OVALSCAN_LOG_FILE") {
            self.logging.file = Some(val);
        }

        self
    }
}

/// Test catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory holding serialized test definitions
    pub tests_dir: Option<String>,

    /// Fail on the first malformed test file instead of skipping it
    #[serde(default)]
    pub strict: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            tests_dir: Some(String::from("/etc/ovalscan/tests")),
            strict: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log file; logs go to stderr when unset
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("pretty")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

/// Builder for constructing Config
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn tests_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.catalog.tests_dir = Some(dir.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.config.catalog.strict = strict;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn log_format(mut self, format: impl Into<String>) -> Self {
        self.config.logging.format = format.into();
        self
    }

    pub fn log_file(mut self, path: impl Into<String>) -> Self {
        self.config.logging.file = Some(path.into());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
