//! Test loader - loads serialized test definitions from files
//!
//! A file holds either a single test or a list of tests, as JSON (`.json`) or
//! YAML (`.yaml`, `.yml`).

use crate::registry::TestRegistry;
use crate::test::InfoTest;
use ovalscan_core::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loader behaviour
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Fail on the first malformed file or duplicate id instead of skipping it
    pub strict: bool,
}

/// Load all tests from a directory
pub fn load_tests_from_dir(dir: impl AsRef<Path>, options: LoadOptions) -> Result<TestRegistry> {
    let dir = dir.as_ref();
    let mut registry = TestRegistry::new();

    if !dir.exists() {
        return Err(Error::FileNotFound {
            path: dir.display().to_string(),
        });
    }

    info!("Loading tests from: {}", dir.display());
    load_recursive(&mut registry, dir, options)?;

    info!("Loaded {} tests", registry.len());
    Ok(registry)
}

fn load_recursive(registry: &mut TestRegistry, dir: &Path, options: LoadOptions) -> Result<()> {
    let mut paths = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<PathBuf>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            load_recursive(registry, &path, options)?;
            continue;
        }

        let Some(format) = FileFormat::from_path(&path) else {
            continue;
        };

        let tests = match load_test_file(&path, format) {
            Ok(tests) => tests,
            Err(e) if !options.strict => {
                warn!("Failed to load tests from {}: {}", path.display(), e);
                continue;
            }
            Err(e) => return Err(e),
        };

        for test in tests {
            let id = test.id.clone();
            match registry.register(test) {
                Ok(()) => debug!("Loaded test: {} from {}", id, path.display()),
                Err(e) if !options.strict => {
                    warn!("Skipping test from {}: {}", path.display(), e)
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(FileFormat::Json),
            "yaml" | "yml" => Some(FileFormat::Yaml),
            _ => None,
        }
    }
}

fn load_test_file(path: &Path, format: FileFormat) -> Result<Vec<InfoTest>> {
    let content = std::fs::read_to_string(path)?;
    let invalid = |message: String| Error::InvalidTestDefinition {
        path: path.display().to_string(),
        message,
    };

    match format {
        FileFormat::Json => {
            let value: serde_json::Value =
                serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
            if value.is_array() {
                serde_json::from_value(value).map_err(|e| invalid(e.to_string()))
            } else {
                serde_json::from_value(value)
                    .map(|test| vec![test])
                    .map_err(|e| invalid(e.to_string()))
            }
        }
        FileFormat::Yaml => {
            let value: serde_yaml::Value =
                serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?;
            if value.is_sequence() {
                serde_yaml::from_value(value).map_err(|e| invalid(e.to_string()))
            } else {
                serde_yaml::from_value(value)
                    .map(|test| vec![test])
                    .map_err(|e| invalid(e.to_string()))
            }
        }
    }
}
