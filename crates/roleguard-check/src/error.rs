//! Error types for role checking.
//!
//! Everything here is fatal to a run. Rule violations are not errors; they are
//! collected into a [`Report`](crate::Report).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for check operations.
pub type Result<T> = std::result::Result<T, CheckError>;

/// Errors that stop a check run.
#[derive(Error, Debug)]
pub enum CheckError {
    /// I/O error with path context.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path involved in the operation.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The roles root could not be enumerated.
    #[error("Role discovery failed: {0}")]
    Discovery(String),

    /// A source file exists but is not valid YAML.
    #[error("Failed to parse {path}: {source}")]
    SourceParse {
        /// Path to the source file.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A rule or caller named a source the layout does not know.
    #[error("Unknown configuration source '{name}'")]
    UnknownSource {
        /// The source name.
        name: String,
    },

    /// Core error.
    #[error(transparent)]
    CoreError(#[from] roleguard_core::Error),
}
