//! Error types for loading schema files and form requests.
//!
//! Provides a unified error type covering I/O, serialization, declaration
//! compilation and registration failures.

use std::path::PathBuf;

use form_schema_core::{FieldConfigurationError, RegistryError};
use thiserror::Error;

/// Errors that can occur while loading schemas or requests.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension names no supported format.
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A field declaration cannot be compiled into a validator.
    #[error("invalid declaration in schema '{schema}': {source}")]
    InvalidDeclaration {
        schema: String,
        source: FieldConfigurationError,
    },

    /// A compiled schema was refused by the registry.
    #[error("registration failed: {0}")]
    Registry(#[from] RegistryError),

    /// All configured loader sources failed.
    #[error("no schema sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`DatabaseError`].
pub type Result<T> = std::result::Result<T, DatabaseError>;
