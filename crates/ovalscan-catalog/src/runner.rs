//! Inventory runner - evaluates every registered test against host inventories

use crate::registry::TestRegistry;
use crate::test::Inventory;
use ovalscan_core::Error;
use ovalscan_eval::{EvalObserver, NoopObserver};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one test on one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Matched,
    NotMatched,
    /// The test could not be decided
    Error { code: String, message: String },
}

impl From<Result<bool, Error>> for Outcome {
    fn from(result: Result<bool, Error>) -> Self {
        match result {
            Ok(true) => Outcome::Matched,
            Ok(false) => Outcome::NotMatched,
            Err(e) => Outcome::Error {
                code: e.code().to_string(),
                message: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestVerdict {
    pub test_id: String,
    pub outcome: Outcome,
}

/// All verdicts for one host, ordered by test id
#[derive(Debug, Clone, Serialize)]
pub struct HostReport {
    pub host: String,
    pub verdicts: Vec<TestVerdict>,
}

impl HostReport {
    /// Ids of matched tests
    pub fn matched(&self) -> impl Iterator<Item = &str> {
        self.verdicts
            .iter()
            .filter(|v| v.outcome == Outcome::Matched)
            .map(|v| v.test_id.as_str())
    }

    /// Verdicts that ended in an error
    pub fn errors(&self) -> impl Iterator<Item = &TestVerdict> {
        self.verdicts
            .iter()
            .filter(|v| matches!(v.outcome, Outcome::Error { .. }))
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

/// Evaluates a registry of tests against inventories
pub struct InventoryRunner {
    registry: Arc<TestRegistry>,
    observer: Arc<dyn EvalObserver>,
}

impl InventoryRunner {
    pub fn new(registry: Arc<TestRegistry>) -> Self {
        Self {
            registry,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Report every evaluation to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn EvalObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Evaluate every test against one inventory
    pub fn run(&self, inventory: &Inventory) -> HostReport {
        debug!(
            "Evaluating {} tests against host {} ({} packages)",
            self.registry.len(),
            inventory.host,
            inventory.software.len()
        );

        let verdicts = self
            .registry
            .all()
            .map(|test| TestVerdict {
                test_id: test.id.clone(),
                outcome: test.evaluate(inventory, self.observer.as_ref()).into(),
            })
            .collect();

        HostReport {
            host: inventory.host.clone(),
            verdicts,
        }
    }

    /// Evaluate every test against many inventories using up to `workers`
    /// threads. Reports keep the order of `inventories`.
    pub fn run_all(&self, inventories: &[Inventory], workers: usize) -> Vec<HostReport> {
        let workers = workers.max(1);

        info!(
            "Evaluating {} tests against {} hosts with {} workers",
            self.registry.len(),
            inventories.len(),
            workers
        );

        let evaluate = || -> Vec<HostReport> {
            inventories.par_iter().map(|inv| self.run(inv)).collect()
        };

        match ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(evaluate),
            Err(e) => {
                warn!("Failed to build worker pool, using the global pool: {}", e);
                evaluate()
            }
        }
    }
}
