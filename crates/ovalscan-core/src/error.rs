//! Error types for the OVALScan engine

use thiserror::Error;

/// Result type alias using the OVALScan Error
pub type Result<T> = std::result::Result<T, Error>;

/// OVALScan error types
#[derive(Error, Debug)]
pub enum Error {
    // === State Evaluation Errors ===
    #[error("invalid empty state")]
    EmptyState,

    #[error("Unsupported operation '{operation}' for datatype '{datatype}'")]
    UnsupportedOperation { operation: String, datatype: String },

    #[error("Unsupported datatype: {0}")]
    UnsupportedDatatype(String),

    #[error("Malformed version '{version}': {reason}")]
    MalformedVersion { version: String, reason: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    PatternCompile {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid {datatype} value: '{value}'")]
    InvalidValue { value: String, datatype: String },

    // === Catalog Errors ===
    #[error("Inventory for host '{host}' has no OS version record")]
    MissingOsVersion { host: String },

    #[error("Duplicate test id: {test_id}")]
    DuplicateTest { test_id: String },

    #[error("Invalid test definition: {path} - {message}")]
    InvalidTestDefinition { path: String, message: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Check if this error was caused by the state configuration itself
    /// rather than by the record being evaluated or the environment.
    pub fn is_definition_defect(&self) -> bool {
        matches!(
            self,
            Error::EmptyState
                | Error::UnsupportedOperation { .. }
                | Error::UnsupportedDatatype(_)
                | Error::PatternCompile { .. }
                | Error::InvalidTestDefinition { .. }
        )
    }

    /// Get an error code for logging/reports
    pub fn code(&self) -> &'static str {
        match self {
            Error::EmptyState => "EMPTY_STATE",
            Error::UnsupportedOperation { .. } => "UNSUPPORTED_OPERATION",
            Error::UnsupportedDatatype(_) => "UNSUPPORTED_DATATYPE",
            Error::MalformedVersion { .. } => "MALFORMED_VERSION",
            Error::PatternCompile { .. } => "PATTERN_COMPILE",
            Error::InvalidValue { .. } => "INVALID_VALUE",
            Error::MissingOsVersion { .. } => "MISSING_OS_VERSION",
            Error::DuplicateTest { .. } => "DUPLICATE_TEST",
            Error::InvalidTestDefinition { .. } => "INVALID_TEST_DEF",
            Error::Configuration(_) => "CONFIG_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::FileNotFound { .. } => "FILE_NOT_FOUND",
            Error::Json(_) => "JSON_ERROR",
            Error::Yaml(_) => "YAML_ERROR",
        }
    }
}
