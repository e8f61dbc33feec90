//! OVALScan Core - Foundation types and error handling
//!
//! This crate provides the types shared by every OVALScan crate:
//! - `Error` / `Result`: the single error enum used across the engine
//! - `Software`, `OsVersion`: the host records that states are evaluated against

pub mod error;
pub mod record;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use record::{OsVersion, Software};
