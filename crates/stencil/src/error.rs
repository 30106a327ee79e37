//! Error types for template compilation and configuration.
//!
//! Rendering itself never fails: every per-placeholder problem degrades to an
//! empty substitution. [`TemplateError`] therefore only covers the cases that
//! indicate a programmer or configuration mistake.

use thiserror::Error;

use crate::template::PlaceholderKind;

/// Errors raised while compiling templates or loading settings.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A delimiter pattern is not a valid regular expression, or the combined
    /// scanner built from the configured patterns could not be compiled.
    #[error("invalid {kind} delimiter pattern: {source}")]
    InvalidPattern {
        kind: PlaceholderKind,
        #[source]
        source: regex::Error,
    },

    /// A delimiter pattern has no capture group for the placeholder expression.
    #[error("{kind} delimiter pattern must capture the placeholder expression in a group")]
    MissingCaptureGroup { kind: PlaceholderKind },

    /// Settings could not be parsed from YAML or JSON.
    #[error("invalid template settings: {0}")]
    InvalidSettings(String),

    /// No template registered under the given name.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Data could not be converted into a JSON value before rendering.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<serde_yaml::Error> for TemplateError {
    fn from(err: serde_yaml::Error) -> Self {
        TemplateError::InvalidSettings(err.to_string())
    }
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;
