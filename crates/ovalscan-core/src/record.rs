//! Host records consumed by the evaluator
//!
//! These are produced by inventory collection and only ever read here.

use serde::{Deserialize, Serialize};

/// An installed software package as reported by the host inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Software {
    /// Package name (e.g., "openssl")
    pub name: String,

    /// Package architecture (e.g., "x86_64", "noarch")
    #[serde(default)]
    pub arch: String,

    /// Raw package version, may encode epoch and release inline
    /// (`epoch:version-release`)
    pub version: String,

    /// Inventory source that reported the package (e.g., "rpm_packages")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Software {
    /// Create a new software record
    pub fn new(name: impl Into<String>, arch: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arch: arch.into(),
            version: version.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl std::fmt::Display for Software {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.arch.is_empty() {
            write!(f, "{}-{}", self.name, self.version)
        } else {
            write!(f, "{}-{}.{}", self.name, self.version, self.arch)
        }
    }
}

/// Operating system identity of a host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsVersion {
    /// Distribution family tag (e.g., "rhel", "centos", "ubuntu")
    pub platform: String,

    /// Free-text product name including the version (e.g., "CentOS Linux 8")
    pub name: String,
}

impl OsVersion {
    pub fn new(platform: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for OsVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name.trim(), self.platform)
    }
}
