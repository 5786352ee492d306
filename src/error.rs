//! Error types for json2parquet
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use std::fmt;
use thiserror::Error;

/// Sub-kind of a credential loading failure
///
/// The three kinds share the same propagation path; they differ only in the
/// diagnostic logged before the error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// The credential file does not exist or cannot be accessed
    FileNotFound,
    /// The file exists but is malformed or fails validation
    InvalidConfig,
    /// Anything else (missing profile, unreadable file, ...)
    Unexpected,
}

impl ConfigErrorKind {
    /// Human-readable diagnostic printed before the error propagates
    pub fn diagnostic(self) -> &'static str {
        match self {
            Self::FileNotFound => {
                "OCI config file not found. Please ensure the file exists and is accessible."
            }
            Self::InvalidConfig => "Invalid OCI config. Please check your configuration settings.",
            Self::Unexpected => "An unexpected error occurred.",
        }
    }
}

impl fmt::Display for ConfigErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FileNotFound => "config file not found",
            Self::InvalidConfig => "invalid config",
            Self::Unexpected => "unexpected config error",
        };
        f.write_str(label)
    }
}

/// The main error type for json2parquet
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("OCI credentials ({kind}): {message}")]
    Credentials {
        kind: ConfigErrorKind,
        message: String,
    },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Invalid URI '{uri}': {message}")]
    InvalidUri { uri: String, message: String },

    #[error("Path does not exist: {path}")]
    PathNotFound { path: String },

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a credential loading error
    pub fn credentials(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self::Credentials {
            kind,
            message: message.into(),
        }
    }

    /// Create an invalid URI error
    pub fn invalid_uri(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUri {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Create a path not found error
    pub fn path_not_found(path: impl Into<String>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Credential error sub-kind, if this is a credential error
    pub fn credentials_kind(&self) -> Option<ConfigErrorKind> {
        match self {
            Error::Credentials { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Result type alias for json2parquet
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
