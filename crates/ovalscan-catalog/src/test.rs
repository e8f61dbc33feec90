//! Info tests and host inventories

use ovalscan_core::{Error, OsVersion, Result, Software};
use ovalscan_eval::{EvalObserver, InfoState};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Kind of record a test is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Installed packages
    Software,
    /// The host's OS identity
    OsVersion,
}

impl TestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestKind::Software => "software",
            TestKind::OsVersion => "os_version",
        }
    }
}

impl std::fmt::Display for TestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named state and the kind of record it applies to
#[derive(Debug, Clone, Deserialize)]
pub struct InfoTest {
    /// Unique identifier (e.g., "oval:com.redhat.rhsa:tst:20221065001")
    pub id: String,

    pub kind: TestKind,

    #[serde(default)]
    pub description: String,

    pub state: InfoState,
}

impl InfoTest {
    pub fn new(id: impl Into<String>, kind: TestKind, state: InfoState) -> Self {
        Self {
            id: id.into(),
            kind,
            description: String::new(),
            state,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Evaluate the test against a host inventory.
    ///
    /// Software tests match when any installed package matches; evaluation
    /// stops at the first match or the first error. A state that constrains
    /// no package attribute fails even when the host has no packages. OS tests need the
    /// inventory's OS record.
    pub fn evaluate(&self, inventory: &Inventory, observer: &dyn EvalObserver) -> Result<bool> {
        match self.kind {
            TestKind::Software => {
                self.state.validate_software()?;
                for software in &inventory.software {
                    let outcome = self.state.eval_software(software);
                    observer.on_outcome(&self.id, &software.to_string(), &outcome);
                    if outcome? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            TestKind::OsVersion => {
                let os = inventory
                    .os_version
                    .as_ref()
                    .ok_or_else(|| Error::MissingOsVersion {
                        host: inventory.host.clone(),
                    })?;
                let outcome = self.state.eval_os_version(os);
                observer.on_outcome(&self.id, &os.to_string(), &outcome);
                outcome
            }
        }
    }
}

/// Everything known about one host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// Host identifier (hostname or UUID)
    pub host: String,

    #[serde(default)]
    pub os_version: Option<OsVersion>,

    #[serde(default)]
    pub software: Vec<Software>,
}

impl Inventory {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn with_os_version(mut self, os: OsVersion) -> Self {
        self.os_version = Some(os);
        self
    }

    pub fn with_software(mut self, software: Software) -> Self {
        self.software.push(software);
        self
    }

    /// Parse an inventory from JSON
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load an inventory from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovalscan_eval::{EvrComparator, NoopObserver, ScalarComparator};

    fn bash_test() -> InfoTest {
        let state = InfoState::builder()
            .name(ScalarComparator::equals("bash"))
            .evr(EvrComparator::less_than("0:4.4.20-4.el8_6"))
            .build();
        InfoTest::new("oval:test:bash", TestKind::Software, state)
            .with_description("bash before 4.4.20-4.el8_6")
    }

    #[test]
    fn test_software_test_any_package() {
        let inventory = Inventory::new("web-01")
            .with_software(Software::new("openssl", "x86_64", "1:1.1.1k-5.el8_5"))
            .with_software(Software::new("bash", "x86_64", "4.4.20-1.el8_4"));

        let test = bash_test();
        assert_eq!(test.description, "bash before 4.4.20-4.el8_6");
        assert!(test.evaluate(&inventory, &NoopObserver).unwrap());

        let patched = Inventory::new("web-02")
            .with_software(Software::new("bash", "x86_64", "4.4.20-4.el8_6"));
        assert!(!bash_test().evaluate(&patched, &NoopObserver).unwrap());

        assert!(!bash_test()
            .evaluate(&Inventory::new("empty"), &NoopObserver)
            .unwrap());
    }

    #[test]
    fn test_empty_state_fails_without_packages() {
        let empty = InfoState::builder().build();
        let test = InfoTest::new("oval:test:empty", TestKind::Software, empty);
        let err = test
            .evaluate(&Inventory::new("h"), &NoopObserver)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyState));

        let file_only = InfoState::builder()
            .file_path(ScalarComparator::equals("/usr/bin/bash"))
            .build();
        let test = InfoTest::new("oval:test:file", TestKind::Software, file_only);
        assert!(matches!(
            test.evaluate(&Inventory::new("h"), &NoopObserver),
            Err(Error::EmptyState)
        ));
    }

    #[test]
    fn test_os_test_requires_os_record() {
        let state = InfoState::builder()
            .version(ScalarComparator::pattern("^8"))
            .build();
        let test = InfoTest::new("oval:test:os", TestKind::OsVersion, state);

        let err = test
            .evaluate(&Inventory::new("db-01"), &NoopObserver)
            .unwrap_err();
        assert!(matches!(err, Error::MissingOsVersion { host } if host == "db-01"));

        let inventory =
            Inventory::new("db-01").with_os_version(OsVersion::new("rhel", "RHEL 8.6"));
        assert!(test.evaluate(&inventory, &NoopObserver).unwrap());
    }

    #[test]
    fn test_inventory_from_json() {
        let json = r#"{
            "host": "app-03",
            "os_version": {"platform": "centos", "name": "CentOS Linux 8"},
            "software": [
                {"name": "bash", "arch": "x86_64", "version": "4.4.19-12.el8"}
            ]
        }"#;

        let inventory = Inventory::from_json(json).unwrap();
        assert_eq!(inventory.host, "app-03");
        assert_eq!(inventory.software.len(), 1);
        assert_eq!(
            inventory.os_version,
            Some(OsVersion::new("centos", "CentOS Linux 8"))
        );
    }

    #[test]
    fn test_test_from_yaml() {
        let yaml = r#"
id: "oval:test:kernel"
kind: software
description: "kernel before 4.18.0-372"
state:
  Name:
    value: kernel
  Evr:
    op: less than
    value: "0:4.18.0-372.9.1.el8"
"#;
        let test: InfoTest = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(test.kind, TestKind::Software);
        assert_eq!(test.description, "kernel before 4.18.0-372");
    }
}
