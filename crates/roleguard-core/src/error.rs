//! Error types for roleguard core operations.
//!
//! This module defines the error types used throughout the `roleguard-core` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in roleguard core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A key path could not be parsed.
    #[error("Invalid key path '{path}': {reason}")]
    InvalidKeyPath {
        /// The offending key path text.
        path: String,
        /// Reason the path is invalid.
        reason: String,
    },

    /// A rules file could not be read.
    #[error("Failed to load rules from {path}: {source}")]
    RuleLoadError {
        /// Path to the rules file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A rule set is structurally invalid.
    #[error("Invalid rule set: {reason}")]
    InvalidRuleSet {
        /// Reason the rule set is invalid.
        reason: String,
    },

    /// A source layout entry is invalid.
    #[error("Invalid source '{name}': {reason}")]
    InvalidSource {
        /// Logical source name.
        name: String,
        /// Reason the source is invalid.
        reason: String,
    },

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}
