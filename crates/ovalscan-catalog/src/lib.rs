//! OVALScan Catalog - Test registry, loader and inventory runner
//!
//! This crate provides:
//! - `InfoTest`: a named state bound to the kind of record it applies to
//! - `TestRegistry`: index of loaded tests
//! - Loader reading serialized tests from JSON/YAML files
//! - `InventoryRunner`: evaluates every test against a host inventory

pub mod loader;
pub mod registry;
pub mod runner;
pub mod test;

pub use loader::{load_tests_from_dir, LoadOptions};
pub use registry::TestRegistry;
pub use runner::{HostReport, InventoryRunner, Outcome, TestVerdict};
pub use test::{InfoTest, Inventory, TestKind};
