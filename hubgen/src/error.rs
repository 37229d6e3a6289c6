//! Error types.
//!
//! Only [`ConfigError`] aborts a generation run. Per-type mapping failures
//! ([`MapError`]) are turned into [`Diagnostic`](crate::diagnostics::Diagnostic)s
//! by the pipeline and never escape it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generation runs.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Top level error of a generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The run could not be configured.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Error configuring a generation run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A mandatory marker attribute is not known to the type oracle.
    #[error("Marker attribute '{metadata_name}' could not be resolved")]
    MissingMarker { metadata_name: String },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a missing marker error.
    pub fn missing_marker(metadata_name: impl Into<String>) -> Self {
        Self::MissingMarker {
            metadata_name: metadata_name.into(),
        }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Error building a symbol graph from a manifest.
#[derive(Debug, Error)]
pub enum SymbolError {
    /// A type reference names a type that was never declared.
    #[error("Unresolved type reference '{name}'")]
    UnresolvedType { name: String },

    /// The same metadata name was declared with conflicting kinds.
    #[error("Type '{name}' is declared as both {first} and {second}")]
    DuplicateDefinition {
        name: String,
        first: String,
        second: String,
    },

    /// A generic definition was constructed with the wrong number of
    /// type arguments.
    #[error("Type '{name}' expects {expected} type argument(s), found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Manifest is not valid JSON or does not match the manifest schema.
    #[error("Invalid symbol manifest: {0}")]
    Json(#[from] serde_json::Error),
}

impl SymbolError {
    /// Create an unresolved type error.
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::UnresolvedType { name: name.into() }
    }
}

/// Error rendering a single type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// No mapper claimed the type and it carries no data-type marker.
    #[error("Unsupported type '{type_name}'")]
    Unsupported { type_name: String },

    /// A generic wrapper was used without its type argument.
    #[error("Type '{type_name}' is missing its type argument")]
    MissingTypeArgument { type_name: String },
}

impl MapError {
    /// Create an unsupported type error.
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::Unsupported {
            type_name: type_name.into(),
        }
    }

    /// Create a missing type argument error.
    pub fn missing_argument(type_name: impl Into<String>) -> Self {
        Self::MissingTypeArgument {
            type_name: type_name.into(),
        }
    }
}
