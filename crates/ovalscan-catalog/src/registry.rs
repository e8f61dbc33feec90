//! Test registry - index of all loaded tests

use crate::test::{InfoTest, TestKind};
use ovalscan_core::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registry of loaded info tests, ordered by id
#[derive(Debug, Default, Clone)]
pub struct TestRegistry {
    tests: BTreeMap<String, Arc<InfoTest>>,
}

impl TestRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a test. Ids must be unique.
    pub fn register(&mut self, test: InfoTest) -> Result<()> {
        if self.tests.contains_key(&test.id) {
            return Err(Error::DuplicateTest { test_id: test.id });
        }
        self.tests.insert(test.id.clone(), Arc::new(test));
        Ok(())
    }

    /// Get a test by ID
    pub fn get(&self, id: &str) -> Option<Arc<InfoTest>> {
        self.tests.get(id).cloned()
    }

    /// Get all test IDs
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tests.keys().map(|s| s.as_str())
    }

    /// Get all tests
    pub fn all(&self) -> impl Iterator<Item = &Arc<InfoTest>> {
        self.tests.values()
    }

    /// Filter tests by the kind of record they apply to
    pub fn by_kind(&self, kind: TestKind) -> Vec<Arc<InfoTest>> {
        self.tests
            .values()
            .filter(|t| t.kind == kind)
            .cloned()
            .collect()
    }

    /// Get number of registered tests
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}
