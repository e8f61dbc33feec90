//! OVALScan Common - Shared utilities: configuration and logging
//!
//! This crate provides the ambient setup used by the OVALScan binaries.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigBuilder};
pub use logging::{init_logging_with_config, LogConfig, LogFormat};
